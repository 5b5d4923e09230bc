use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Push,
    PullRequest,
    Merge,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Push => "PUSH",
            ActionKind::PullRequest => "PULL_REQUEST",
            ActionKind::Merge => "MERGE",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUSH" => Ok(ActionKind::Push),
            "PULL_REQUEST" => Ok(ActionKind::PullRequest),
            "MERGE" => Ok(ActionKind::Merge),
            _ => Err(format!("Unknown action kind: {}", s)),
        }
    }
}

/// Canonical, storage-ready form of a classified webhook event.
///
/// `request_id` and `to_branch` are always present on well-formed deliveries;
/// they are `None` only when the sender omitted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub request_id: Option<String>,
    pub author: Option<String>,
    pub action: ActionKind,
    pub from_branch: Option<String>,
    pub to_branch: Option<String>,
    pub timestamp: String,
}

/// A record as returned by the history endpoint. The storage identifier is
/// always rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub record: EventRecord,
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
