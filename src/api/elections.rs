use super::{json_body, ApiClient, Endpoint, Method, Subscription, Tag};
use crate::error::Result;
use crate::model::{
    ballot::ResultsEnvelope,
    election::{ElectionEnvelope, ElectionList},
    Ballot, Election, ElectionResults, Message, VoteStatus,
};

pub static GET_ALL: Endpoint = Endpoint::query("getAllElections", "/elections", &[Tag::Elections]);
pub static GET_BY_ID: Endpoint =
    Endpoint::query("getElectionById", "/elections/:id", &[Tag::Elections]);
pub static GET_RESULTS: Endpoint =
    Endpoint::query("getElectionResults", "/elections/:id/results", &[Tag::Results]);
pub static GET_VOTE_STATUS: Endpoint =
    Endpoint::query("getVoteStatus", "/elections/:id/vote-status", &[Tag::Elections]);
pub static CAST_VOTE: Endpoint = Endpoint::mutation(
    "castVote",
    Method::Post,
    "/elections/:id/vote",
    &[Tag::Elections, Tag::Results],
);

/// Election routes, including vote casting and results.
pub struct ElectionsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn elections(&self) -> ElectionsApi<'_> {
        ElectionsApi { client: self }
    }
}

impl ElectionsApi<'_> {
    pub async fn all(&self) -> Result<Vec<Election>> {
        let list: ElectionList = self.client.query(&GET_ALL, &[], &[]).await?;
        Ok(list.elections)
    }

    pub async fn watch_all(&self) -> Result<Subscription<ElectionList>> {
        self.client.watch(&GET_ALL, &[], &[]).await
    }

    pub async fn by_id(&self, id: Option<&str>) -> Result<Option<Election>> {
        let envelope: Option<ElectionEnvelope> =
            self.client.query_dependent(&GET_BY_ID, "id", id).await?;
        Ok(envelope.map(|e| e.election))
    }

    pub async fn results(&self, id: Option<&str>) -> Result<Option<ElectionResults>> {
        let envelope: Option<ResultsEnvelope> =
            self.client.query_dependent(&GET_RESULTS, "id", id).await?;
        Ok(envelope.map(|e| e.results))
    }

    pub async fn vote_status(&self, id: Option<&str>) -> Result<Option<VoteStatus>> {
        self.client.query_dependent(&GET_VOTE_STATUS, "id", id).await
    }

    /// Submit a ballot. An empty ballot is rejected before any request is made.
    pub async fn cast_vote(&self, election_id: &str, ballot: &Ballot) -> Result<Message> {
        if ballot.is_empty() {
            return Err(crate::Error::InvalidRequest(
                "Select at least one candidate before submitting".to_string(),
            ));
        }
        self.client
            .mutate(&CAST_VOTE, &[("id", election_id)], json_body(ballot)?)
            .await
    }
}
