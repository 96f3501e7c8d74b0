//! Collaborator interfaces for the persistence layer, plus an in-memory
//! implementation.
//!
//! The engine never talks to storage directly; it receives snapshots through
//! these traits. [`MemoryStore`] backs the test suite and any caller that
//! embeds the engine without a live document store.

use async_trait::async_trait;

use crate::config::StoreCapabilities;
use crate::connections::ConnectionRecord;
use crate::error::StoreError;
use crate::profile::RawProfile;

/// Constraints the persistence layer applies when assembling the candidate
/// pool.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    /// Exact institution to restrict the pool to.
    pub institution: Option<String>,
    /// Free-text search term matched against name fields.
    pub query: Option<String>,
}

/// Read access to user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a single profile; [`StoreError::NotFound`] when absent.
    async fn get_profile(&self, id: &str) -> Result<RawProfile, StoreError>;

    /// List the candidate pool under the given filter. Entries may be
    /// partial or malformed; callers normalize per record.
    async fn list_candidates(&self, filter: &CandidateFilter)
    -> Result<Vec<RawProfile>, StoreError>;
}

/// Read access to connection records.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// All records involving the given user, in either role.
    async fn list_connections(&self, user_id: &str) -> Result<Vec<ConnectionRecord>, StoreError>;
}

/// In-memory store over plain vectors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    capabilities: StoreCapabilities,
    profiles: Vec<RawProfile>,
    connections: Vec<ConnectionRecord>,
}

impl MemoryStore {
    pub fn new(capabilities: StoreCapabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    pub fn with_profiles(mut self, profiles: Vec<RawProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_connections(mut self, connections: Vec<ConnectionRecord>) -> Self {
        self.connections = connections;
        self
    }

    fn matches_filter(profile: &RawProfile, filter: &CandidateFilter) -> bool {
        if let Some(institution) = filter.institution.as_deref()
            && profile.institution.as_deref().map(str::trim) != Some(institution)
        {
            return false;
        }

        if let Some(query) = filter.query.as_deref() {
            let query = query.trim().to_lowercase();
            if !query.is_empty() {
                let haystack = [
                    profile.program_name.as_deref().unwrap_or_default(),
                    profile.bio.as_deref().unwrap_or_default(),
                ]
                .join(" ")
                .to_lowercase();
                if !haystack.contains(&query) {
                    return false;
                }
            }
        }

        true
    }

    /// Strip fields the configured schema version cannot serve, mirroring a
    /// deployment whose store predates those columns.
    fn apply_capabilities(&self, mut profile: RawProfile) -> RawProfile {
        if !self.capabilities.has_course_topics
            && let Some(enrollments) = profile.enrolled_courses.as_mut()
        {
            for enrollment in enrollments {
                enrollment.topics = None;
            }
        }
        if !self.capabilities.has_study_hours {
            profile.total_study_hours = None;
        }
        profile
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, id: &str) -> Result<RawProfile, StoreError> {
        self.profiles
            .iter()
            .find(|profile| profile.id.as_deref() == Some(id))
            .cloned()
            .map(|profile| self.apply_capabilities(profile))
            .ok_or_else(|| StoreError::NotFound { id: id.to_owned() })
    }

    async fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<RawProfile>, StoreError> {
        Ok(self
            .profiles
            .iter()
            .filter(|profile| Self::matches_filter(profile, filter))
            .cloned()
            .map(|profile| self.apply_capabilities(profile))
            .collect())
    }
}

#[async_trait]
impl ConnectionStore for MemoryStore {
    async fn list_connections(&self, user_id: &str) -> Result<Vec<ConnectionRecord>, StoreError> {
        Ok(self
            .connections
            .iter()
            .filter(|record| record.requester_id == user_id || record.recipient_id == user_id)
            .cloned()
            .collect())
    }
}
