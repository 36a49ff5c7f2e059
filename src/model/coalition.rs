use serde::{Deserialize, Serialize};

use super::Id;

/// A group of candidates running on a shared platform. Its member list (the
/// slate) is fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coalition {
    #[serde(alias = "_id")]
    pub id: Id,
    pub election_id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slogan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Coalition {
    /// Name shown in headings: the acronym when there is one.
    pub fn display_name(&self) -> &str {
        self.acronym
            .as_deref()
            .filter(|acronym| !acronym.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalitionList {
    #[serde(default)]
    pub coalitions: Vec<Coalition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalitionEnvelope {
    pub coalition: Coalition,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_acronym() {
        let coalition = Coalition::example("c1", "Students First Alliance", Some("SFA"));
        assert_eq!(coalition.display_name(), "SFA");

        let coalition = Coalition::example("c2", "Unity Movement", Some("  "));
        assert_eq!(coalition.display_name(), "Unity Movement");

        let coalition = Coalition::example("c3", "Green Campus", None);
        assert_eq!(coalition.display_name(), "Green Campus");
    }
}
