use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: Id,
    pub name: String,
    /// University registration number, used to sign in.
    pub reg_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_graduation: Option<String>,
}

impl User {
    /// A profile is complete once the fields the apply flow needs are filled in.
    pub fn profile_complete(&self) -> bool {
        [&self.school, &self.email, &self.expected_graduation]
            .iter()
            .all(|field| field.as_deref().map_or(false, |v| !v.trim().is_empty()))
    }
}

/// Request body for profile edits; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_graduation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[cfg(test)]
mod examples {
    use super::*;

    impl User {
        pub fn example() -> Self {
            Self {
                id: "u1".to_string(),
                name: "Amina Otieno".to_string(),
                reg_no: "SCT211-0001/2022".to_string(),
                school: Some("School of Computing".to_string()),
                role: "student".to_string(),
                email: Some("amina@students.example.edu".to_string()),
                expected_graduation: Some("2026".to_string()),
            }
        }
    }
}
