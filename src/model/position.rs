use serde::{Deserialize, Serialize};

use super::Id;

/// Which part of the electorate votes for a position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionTier {
    University,
    School,
    Department,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(alias = "_id")]
    pub id: Id,
    pub election_id: Id,
    pub name: String,
    pub tier: PositionTier,
    /// Only set for school- and department-tier positions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionList {
    #[serde(default)]
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEnvelope {
    pub position: Position,
}

#[cfg(test)]
mod examples {
    use super::*;

    impl Position {
        pub fn example(id: &str, name: &str) -> Self {
            Self {
                id: id.to_string(),
                election_id: "e1".to_string(),
                name: name.to_string(),
                tier: PositionTier::University,
                school: None,
                description: None,
            }
        }
    }
}
