use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

/// Outcome of a single approval stage, or of the application overall.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// The three offices that must sign off on a candidacy, in workflow order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStage {
    SchoolDean,
    Accounts,
    DeanOfStudents,
}

impl ApprovalStage {
    pub const ALL: [ApprovalStage; 3] = [
        ApprovalStage::SchoolDean,
        ApprovalStage::Accounts,
        ApprovalStage::DeanOfStudents,
    ];
}

impl Display for ApprovalStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::SchoolDean => "School Dean",
            Self::Accounts => "Accounts",
            Self::DeanOfStudents => "Dean of Students",
        };
        f.write_str(label)
    }
}

/// A student's request to stand as a candidate. `overall_status` is derived
/// by the server from the three stage statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateApplication {
    #[serde(alias = "_id")]
    pub id: Id,
    pub student_id: String,
    pub position_id: Id,
    pub election_id: Id,
    #[serde(default)]
    pub manifesto: String,
    #[serde(default)]
    pub documents_url: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,

    #[serde(default)]
    pub school_dean_status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_dean_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_dean_approver_id: Option<Id>,

    #[serde(default)]
    pub accounts_status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts_approver_id: Option<Id>,

    #[serde(default)]
    pub dean_of_students_status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dean_of_students_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dean_of_students_approver_id: Option<Id>,

    #[serde(default)]
    pub overall_status: ApprovalStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A read-only view of one approval stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StageReview<'a> {
    pub stage: ApprovalStage,
    pub status: ApprovalStatus,
    pub comment: Option<&'a str>,
    pub approver_id: Option<&'a str>,
}

impl CandidateApplication {
    /// The review for one stage.
    pub fn review(&self, stage: ApprovalStage) -> StageReview<'_> {
        let (status, comment, approver_id) = match stage {
            ApprovalStage::SchoolDean => (
                self.school_dean_status,
                &self.school_dean_comment,
                &self.school_dean_approver_id,
            ),
            ApprovalStage::Accounts => (
                self.accounts_status,
                &self.accounts_comment,
                &self.accounts_approver_id,
            ),
            ApprovalStage::DeanOfStudents => (
                self.dean_of_students_status,
                &self.dean_of_students_comment,
                &self.dean_of_students_approver_id,
            ),
        };
        StageReview {
            stage,
            status,
            comment: comment.as_deref(),
            approver_id: approver_id.as_deref(),
        }
    }

    /// All three stage reviews in workflow order.
    pub fn stages(&self) -> [StageReview<'_>; 3] {
        ApprovalStage::ALL.map(|stage| self.review(stage))
    }

    /// The earliest stage that rejected this application, if any.
    pub fn first_rejection(&self) -> Option<StageReview<'_>> {
        self.stages()
            .into_iter()
            .find(|review| review.status == ApprovalStatus::Rejected)
    }

    /// The stage currently waiting on a decision, if no stage has rejected.
    pub fn awaiting(&self) -> Option<ApprovalStage> {
        if self.first_rejection().is_some() {
            return None;
        }
        self.stages()
            .into_iter()
            .find(|review| review.status == ApprovalStatus::Pending)
            .map(|review| review.stage)
    }
}

/// Request body for submitting an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub student_id: String,
    pub position_id: Id,
    pub election_id: Id,
    pub manifesto: String,
    #[serde(default)]
    pub documents_url: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

/// Request body for an approver's decision on one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatusUpdate {
    pub stage: ApprovalStage,
    pub status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub applications: Vec<CandidateApplication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEnvelope {
    pub application: CandidateApplication,
}

/// Mutation response: a message and, usually, the affected application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationMutation {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<CandidateApplication>,
}
