use super::{ApiClient, Endpoint, Method, Subscription, Tag};
use crate::error::Result;
use crate::model::{
    candidate::CandidateList,
    coalition::{CoalitionEnvelope, CoalitionList},
    Candidate, Coalition, Message,
};

pub static GET_ALL: Endpoint = Endpoint::query("getAllCoalitions", "/coalitions", &[Tag::Coalitions]);
pub static GET_BY_ELECTION: Endpoint = Endpoint::query(
    "getCoalitionsByElection",
    "/coalitions/election/:electionId",
    &[Tag::Coalitions],
);
pub static GET_BY_ID: Endpoint =
    Endpoint::query("getCoalitionById", "/coalitions/:id", &[Tag::Coalitions]);
pub static GET_SLATE: Endpoint = Endpoint::query(
    "getCoalitionSlate",
    "/coalitions/:id/candidates",
    &[Tag::Coalitions, Tag::Candidates],
);
pub static JOIN: Endpoint = Endpoint::mutation(
    "joinCoalition",
    Method::Post,
    "/coalitions/:id/join",
    &[Tag::Coalitions, Tag::Candidates],
);
pub static LEAVE: Endpoint = Endpoint::mutation(
    "leaveCoalition",
    Method::Post,
    "/coalitions/:id/leave",
    &[Tag::Coalitions, Tag::Candidates],
);

pub struct CoalitionsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn coalitions(&self) -> CoalitionsApi<'_> {
        CoalitionsApi { client: self }
    }
}

impl CoalitionsApi<'_> {
    pub async fn all(&self) -> Result<Vec<Coalition>> {
        let list: CoalitionList = self.client.query(&GET_ALL, &[], &[]).await?;
        Ok(list.coalitions)
    }

    pub async fn by_election(&self, election_id: Option<&str>) -> Result<Option<Vec<Coalition>>> {
        let list: Option<CoalitionList> = self
            .client
            .query_dependent(&GET_BY_ELECTION, "electionId", election_id)
            .await?;
        Ok(list.map(|l| l.coalitions))
    }

    pub async fn by_id(&self, id: Option<&str>) -> Result<Option<Coalition>> {
        let envelope: Option<CoalitionEnvelope> =
            self.client.query_dependent(&GET_BY_ID, "id", id).await?;
        Ok(envelope.map(|e| e.coalition))
    }

    /// The coalition's member candidates.
    pub async fn slate(&self, id: Option<&str>) -> Result<Option<Vec<Candidate>>> {
        let list: Option<CandidateList> =
            self.client.query_dependent(&GET_SLATE, "id", id).await?;
        Ok(list.map(|l| l.candidates))
    }

    pub async fn watch_slate(&self, id: &str) -> Result<Subscription<CandidateList>> {
        self.client.watch(&GET_SLATE, &[("id", id)], &[]).await
    }

    /// Join as the signed-in candidate.
    pub async fn join(&self, id: &str) -> Result<Message> {
        self.client.mutate(&JOIN, &[("id", id)], None).await
    }

    pub async fn leave(&self, id: &str) -> Result<Message> {
        self.client.mutate(&LEAVE, &[("id", id)], None).await
    }
}
