//! Connection records and per-candidate state resolution.
//!
//! Connection lifecycles (request, accept, decline) are driven by a separate
//! collaborator; this engine only reads a snapshot of the records and derives
//! each candidate's relationship to the requesting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle state of a partner request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Declined,
}

/// Durable record of a partner request between two users.
/// Status transitions are append-only; records are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConnectionRecord {
    pub id: String,
    pub requester_id: String,
    pub recipient_id: String,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConnectionRecord {
    /// Whether this record links the two given users, in either direction.
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.requester_id == a && self.recipient_id == b)
            || (self.requester_id == b && self.recipient_id == a)
    }
}

/// A candidate's relationship to the requesting user.
///
/// `is_pending_sent` and `is_pending_received` are mutually exclusive and
/// only ever set while the status is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub status: Option<ConnectionStatus>,
    pub is_pending_sent: bool,
    pub is_pending_received: bool,
}

/// Resolve the candidate's connection state from the requesting user's
/// record snapshot.
///
/// At most one record per user pair is expected. If the store ever returns
/// several (a data anomaly), the most recently updated record wins; the
/// outcome never depends on iteration order.
pub fn resolve_connection_state(
    current_user_id: &str,
    candidate_id: &str,
    records: &[ConnectionRecord],
) -> ConnectionState {
    let record = records
        .iter()
        .filter(|record| record.links(current_user_id, candidate_id))
        .max_by_key(|record| record.updated_at);

    let Some(record) = record else {
        return ConnectionState::default();
    };

    match record.status {
        ConnectionStatus::Pending => {
            let sent = record.requester_id == current_user_id;
            ConnectionState {
                status: Some(ConnectionStatus::Pending),
                is_pending_sent: sent,
                is_pending_received: !sent,
            }
        }
        status => ConnectionState {
            status: Some(status),
            ..ConnectionState::default()
        },
    }
}
