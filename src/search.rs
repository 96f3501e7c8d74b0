//! Ranked partner search: criteria validation, orchestration, ordering.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use ts_rs::TS;

use crate::config::EngineConfig;
use crate::connections::{self, ConnectionRecord, ConnectionStatus};
use crate::error::{MatchError, SearchError};
use crate::profile::{self, RawProfile, UserProfile};
use crate::scoring::{self, ScoreResult};
use crate::store::{CandidateFilter, ConnectionStore, ProfileStore};

/// Caller-supplied search constraints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct SearchCriteria {
    /// Restrict the pool to one institution.
    pub institution: Option<String>,
    /// Free-text term the pool is filtered by upstream.
    pub query: Option<String>,
    /// Maximum results to return; engine default when absent.
    pub limit: Option<i64>,
}

impl SearchCriteria {
    /// Validate the requested limit and resolve the effective one.
    /// Rejected limits abort the request before any scoring happens.
    fn resolve_limit(&self, config: &EngineConfig) -> Result<usize, MatchError> {
        match self.limit {
            None => Ok(config.default_limit),
            Some(limit) if limit <= 0 => Err(MatchError::InvalidCriteria(format!(
                "limit must be positive, got {limit}"
            ))),
            Some(limit) if limit as usize > config.max_limit => Err(MatchError::InvalidCriteria(
                format!("limit {limit} exceeds maximum {}", config.max_limit),
            )),
            Some(limit) => Ok(limit as usize),
        }
    }
}

/// One ranked candidate, ready for display.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MatchResult {
    pub candidate_id: String,
    /// Composite compatibility score in `[0, 100]`.
    pub score: u32,
    /// One line per contributing factor.
    pub breakdown: Vec<String>,
    /// Every shared course name, never truncated.
    pub shared_courses: Vec<String>,
    pub shared_topics_count: usize,
    pub connection_status: Option<ConnectionStatus>,
    pub is_pending_sent: bool,
    pub is_pending_received: bool,
}

/// Rank candidate profiles against the current user.
///
/// Candidates arrive as raw store records and are normalized one by one, so
/// a malformed record degrades its own score instead of failing the batch.
/// Results are ordered by score descending with candidate id ascending as
/// the tie-break, then truncated to the validated limit.
pub fn search_partners(
    current: &UserProfile,
    criteria: &SearchCriteria,
    config: &EngineConfig,
    candidates: Vec<RawProfile>,
    connections: &[ConnectionRecord],
) -> Result<Vec<MatchResult>, MatchError> {
    let limit = criteria.resolve_limit(config)?;

    let mut results: Vec<MatchResult> = Vec::with_capacity(candidates.len());
    for raw in candidates {
        let candidate = profile::normalize_profile(raw);
        // Records without an id cannot be addressed by the caller; the
        // current user never ranks against themselves.
        if candidate.id.is_empty() || candidate.id == current.id {
            continue;
        }
        results.push(build_match(current, &candidate, connections));
    }

    rank(&mut results);
    results.truncate(limit);
    Ok(results)
}

/// Score already-connected partners for the connections listing, so they
/// carry the same score and breakdown as ranked search results.
pub fn score_connections(
    current: &UserProfile,
    peers: &[UserProfile],
    connections: &[ConnectionRecord],
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = peers
        .iter()
        .filter(|peer| !peer.id.is_empty() && peer.id != current.id)
        .map(|peer| build_match(current, peer, connections))
        .collect();
    rank(&mut results);
    results
}

/// Fetch the current profile, candidate pool, and connection snapshot from
/// the collaborators, then rank.
///
/// Store failures propagate unchanged: without the pool there is no
/// meaningful partial ranking, and the caller can retry.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn run_search(
    profiles: &impl ProfileStore,
    connections: &impl ConnectionStore,
    config: &EngineConfig,
    user_id: &str,
    criteria: &SearchCriteria,
) -> Result<Vec<MatchResult>, SearchError> {
    let start = std::time::Instant::now();

    // Bad criteria fail the request before any collaborator round-trip.
    criteria.resolve_limit(config)?;

    let current = profile::normalize_profile(profiles.get_profile(user_id).await?);
    let filter = CandidateFilter {
        institution: criteria.institution.clone(),
        query: criteria.query.clone(),
    };
    let pool = profiles.list_candidates(&filter).await?;
    let records = connections.list_connections(user_id).await?;

    let pool_size = pool.len();
    let results = search_partners(&current, criteria, config, pool, &records)?;

    info!(
        pool_size,
        results = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "partner search complete"
    );

    Ok(results)
}

fn build_match(
    current: &UserProfile,
    candidate: &UserProfile,
    connections: &[ConnectionRecord],
) -> MatchResult {
    let ScoreResult {
        score,
        breakdown,
        shared_courses,
        shared_topics_count,
    } = scoring::compute_score(current, candidate);

    let state = connections::resolve_connection_state(&current.id, &candidate.id, connections);

    MatchResult {
        candidate_id: candidate.id.clone(),
        score,
        breakdown,
        shared_courses,
        shared_topics_count,
        connection_status: state.status,
        is_pending_sent: state.is_pending_sent,
        is_pending_received: state.is_pending_received,
    }
}

/// Score descending, candidate id ascending. Storage order never leaks into
/// the final ordering.
fn rank(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
}
