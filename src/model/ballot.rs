use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::Id;

/// One selection on a ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotChoice {
    pub position_id: Id,
    pub candidate_id: Id,
}

/// A voter's selections for an election, at most one per position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub votes: Vec<BallotChoice>,
}

impl Ballot {
    /// Select `candidate_id` for `position_id`, replacing any earlier selection
    /// for the same position.
    pub fn choose(&mut self, position_id: &str, candidate_id: &str) {
        match self.votes.iter_mut().find(|c| c.position_id == position_id) {
            Some(choice) => choice.candidate_id = candidate_id.to_string(),
            None => self.votes.push(BallotChoice {
                position_id: position_id.to_string(),
                candidate_id: candidate_id.to_string(),
            }),
        }
    }

    /// Remove the selection for a position, if any.
    pub fn clear(&mut self, position_id: &str) {
        self.votes.retain(|c| c.position_id != position_id);
    }

    pub fn choice_for(&self, position_id: &str) -> Option<&str> {
        self.votes
            .iter()
            .find(|c| c.position_id == position_id)
            .map(|c| c.candidate_id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

/// Whether the signed-in user has already voted in an election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatus {
    #[serde(default)]
    pub has_voted: bool,
}

/// Published tally for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub candidate_id: Id,
    pub name: String,
    #[serde(default)]
    pub votes: u64,
}

impl Display for CandidateTally {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{}",
            self.name,
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionResult {
    pub position_id: Id,
    pub position_name: String,
    #[serde(default)]
    pub candidates: Vec<CandidateTally>,
}

impl PositionResult {
    /// Tallies ordered by votes, then name.
    pub fn ranked(&self) -> Vec<&CandidateTally> {
        let mut ranked: Vec<_> = self.candidates.iter().collect();
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
        ranked
    }

    /// The candidate with the most votes. `None` when there are no votes or
    /// the top spot is tied.
    pub fn leader(&self) -> Option<&CandidateTally> {
        match self.ranked().as_slice() {
            [first, second, ..] if first.votes == second.votes => None,
            [first, ..] if first.votes > 0 => Some(*first),
            _ => None,
        }
    }

    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.votes).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub election_id: Id,
    #[serde(default)]
    pub positions: Vec<PositionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsEnvelope {
    pub results: ElectionResults,
}
