use serde::{Deserialize, Serialize};

use super::Id;

/// A candidate standing for a position. Created server-side when an
/// application is approved; the client only reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(alias = "_id")]
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Id>,
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub manifesto: String,
    #[serde(default)]
    pub bio: String,
    pub position_id: Id,
    /// Coalition the candidate runs under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coalition_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub election_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateList {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEnvelope {
    pub candidate: Candidate,
}
