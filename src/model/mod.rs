//! Server-owned entities as the client sees them, plus the JSON envelopes they
//! arrive in. The client holds only transient copies of these.

pub mod application;
pub mod ballot;
pub mod candidate;
pub mod coalition;
pub mod election;
pub mod notification;
pub mod position;
pub mod user;

pub use application::{
    ApplicationStatusUpdate, ApprovalStage, ApprovalStatus, CandidateApplication, NewApplication,
    StageReview,
};
pub use ballot::{Ballot, BallotChoice, CandidateTally, ElectionResults, PositionResult, VoteStatus};
pub use candidate::Candidate;
pub use coalition::Coalition;
pub use election::{Election, ElectionStatus};
pub use notification::Notification;
pub use position::{Position, PositionTier};
pub use user::{User, UserUpdate};

use serde::{Deserialize, Serialize};

/// Identifiers are opaque strings handed out by the server.
pub type Id = String;

/// Body of mutation responses that carry nothing but a status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: String,
}
