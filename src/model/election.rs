use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

/// Server-side lifecycle status of an election.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    /// Announced, voting has not opened.
    Upcoming,
    /// Voting is open.
    Ongoing,
    /// Voting closed and results are final.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Election unique ID.
    #[serde(alias = "_id")]
    pub id: Id,
    /// Election name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Voting opens.
    pub start_date: DateTime<Utc>,
    /// Voting closes.
    pub end_date: DateTime<Utc>,
    pub status: ElectionStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionList {
    #[serde(default)]
    pub elections: Vec<Election>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionEnvelope {
    pub election: Election,
}

/// Example test data.
#[cfg(test)]
mod examples {
    use chrono::{Duration, TimeZone};

    use super::*;

    impl Election {
        pub fn example(id: &str, created_at: DateTime<Utc>) -> Self {
            let start_date = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
            Self {
                id: id.to_string(),
                name: format!("SRC General Election {id}"),
                description: None,
                start_date,
                end_date: start_date + Duration::hours(10),
                status: ElectionStatus::Upcoming,
                created_at: Some(created_at),
                updated_at: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_backend_shape() {
        let election: Election = serde_json::from_value(json!({
            "_id": "e1",
            "name": "SRC 2026",
            "start_date": "2026-03-02T08:00:00Z",
            "end_date": "2026-03-02T18:00:00Z",
            "status": "ongoing",
            "createdAt": "2026-01-10T12:00:00Z",
            "__v": 0
        }))
        .unwrap();
        assert_eq!(election.id, "e1");
        assert_eq!(election.status, ElectionStatus::Ongoing);
        assert!(election.created_at.is_some());
        assert!(election.updated_at.is_none());
    }
}
