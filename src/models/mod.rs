use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of one completed round. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    /// Winners in lock-in order.
    pub winners: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub title: String,
}

impl ResultRecord {
    pub fn new(winners: Vec<String>, title: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            winners,
            timestamp: Utc::now(),
            title,
        }
    }
}

/// What a call to `stop` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The engine was not running.
    Ignored,
    /// The round still needs more winners. `locked` is the winner finalized
    /// by this stop, if there was a displayable candidate.
    Pending {
        locked: Option<String>,
        remaining: usize,
    },
    /// The round reached its target and was written to the ledger.
    Completed(ResultRecord),
}

/// Trim a raw name, returning `None` if nothing is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
