use super::{ApiClient, Endpoint, Tag};
use crate::error::Result;
use crate::model::{
    position::{PositionEnvelope, PositionList},
    Position,
};

pub static GET_ALL: Endpoint = Endpoint::query("getAllPositions", "/positions", &[Tag::Positions]);
pub static GET_BY_ELECTION: Endpoint = Endpoint::query(
    "getPositionsByElection",
    "/positions/election/:electionId",
    &[Tag::Positions],
);
pub static GET_BY_ID: Endpoint =
    Endpoint::query("getPositionById", "/positions/:id", &[Tag::Positions]);

pub struct PositionsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn positions(&self) -> PositionsApi<'_> {
        PositionsApi { client: self }
    }
}

impl PositionsApi<'_> {
    pub async fn all(&self) -> Result<Vec<Position>> {
        let list: PositionList = self.client.query(&GET_ALL, &[], &[]).await?;
        Ok(list.positions)
    }

    pub async fn by_election(&self, election_id: Option<&str>) -> Result<Option<Vec<Position>>> {
        let list: Option<PositionList> = self
            .client
            .query_dependent(&GET_BY_ELECTION, "electionId", election_id)
            .await?;
        Ok(list.map(|l| l.positions))
    }

    pub async fn by_id(&self, id: Option<&str>) -> Result<Option<Position>> {
        let envelope: Option<PositionEnvelope> =
            self.client.query_dependent(&GET_BY_ID, "id", id).await?;
        Ok(envelope.map(|e| e.position))
    }
}
