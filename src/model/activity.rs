//! Recent-activity feed records

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an activity entry. Unknown tags are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    Proposal,
    Staking,
    Governance,
    Treasury,
    Other(String),
}

impl From<String> for ActivityKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "proposal" => ActivityKind::Proposal,
            "staking" => ActivityKind::Staking,
            "governance" => ActivityKind::Governance,
            "treasury" => ActivityKind::Treasury,
            _ => ActivityKind::Other(tag),
        }
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Proposal => f.write_str("proposal"),
            ActivityKind::Staking => f.write_str("staking"),
            ActivityKind::Governance => f.write_str("governance"),
            ActivityKind::Treasury => f.write_str("treasury"),
            ActivityKind::Other(tag) => f.write_str(tag),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub activity_type: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl ActivityRecord {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}
