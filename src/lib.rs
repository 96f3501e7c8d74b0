//! Study partner matching engine.
//!
//! Ranks candidate study partners for a user by combining tiered course
//! overlap, topic overlap, program-name similarity, year proximity, and
//! institution match into a transparent 0-100 score with a human-readable
//! breakdown. Persistence and transport live behind the collaborator traits
//! in [`store`]; the engine itself is pure computation over a per-request
//! snapshot, so concurrent searches need no synchronization.

pub mod config;
pub mod connections;
pub mod error;
pub mod overlap;
pub mod profile;
pub mod scoring;
pub mod search;
pub mod store;

pub use config::{EngineConfig, StoreCapabilities};
pub use connections::{ConnectionRecord, ConnectionStatus, resolve_connection_state};
pub use error::{MatchError, SearchError, StoreError};
pub use profile::{
    CourseEnrollment, EnrollmentStatus, RawProfile, StudyPreferences, Topic, UserProfile,
    normalize_profile,
};
pub use scoring::{ScoreResult, compute_score};
pub use search::{MatchResult, SearchCriteria, run_search, score_connections, search_partners};
pub use store::{CandidateFilter, ConnectionStore, MemoryStore, ProfileStore};
