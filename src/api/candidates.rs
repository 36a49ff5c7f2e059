use super::{ApiClient, Endpoint, Subscription, Tag};
use crate::error::Result;
use crate::model::{
    candidate::{CandidateEnvelope, CandidateList},
    Candidate,
};

pub static GET_ALL: Endpoint = Endpoint::query("getAllCandidates", "/candidates", &[Tag::Candidates]);
pub static GET_BY_ID: Endpoint =
    Endpoint::query("getCandidateById", "/candidates/:id", &[Tag::Candidates]);
pub static GET_BY_ELECTION: Endpoint = Endpoint::query(
    "getCandidatesByElection",
    "/candidates/election/:electionId",
    &[Tag::Candidates],
);
pub static GET_BY_POSITION: Endpoint = Endpoint::query(
    "getCandidatesByPosition",
    "/candidates/position/:positionId",
    &[Tag::Candidates],
);
pub static SEARCH: Endpoint =
    Endpoint::query("searchCandidates", "/candidates/search", &[Tag::Candidates]);

/// Candidate routes. Read-only: candidates are created server-side when an
/// application is approved.
pub struct CandidatesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn candidates(&self) -> CandidatesApi<'_> {
        CandidatesApi { client: self }
    }
}

impl CandidatesApi<'_> {
    pub async fn all(&self) -> Result<Vec<Candidate>> {
        let list: CandidateList = self.client.query(&GET_ALL, &[], &[]).await?;
        Ok(list.candidates)
    }

    pub async fn watch_all(&self) -> Result<Subscription<CandidateList>> {
        self.client.watch(&GET_ALL, &[], &[]).await
    }

    pub async fn by_id(&self, id: Option<&str>) -> Result<Option<Candidate>> {
        let envelope: Option<CandidateEnvelope> =
            self.client.query_dependent(&GET_BY_ID, "id", id).await?;
        Ok(envelope.map(|e| e.candidate))
    }

    pub async fn by_election(&self, election_id: Option<&str>) -> Result<Option<Vec<Candidate>>> {
        let list: Option<CandidateList> = self
            .client
            .query_dependent(&GET_BY_ELECTION, "electionId", election_id)
            .await?;
        Ok(list.map(|l| l.candidates))
    }

    pub async fn by_position(&self, position_id: Option<&str>) -> Result<Option<Vec<Candidate>>> {
        let list: Option<CandidateList> = self
            .client
            .query_dependent(&GET_BY_POSITION, "positionId", position_id)
            .await?;
        Ok(list.map(|l| l.candidates))
    }

    /// Free-text search. A blank term is "no search" and issues no request.
    pub async fn search(&self, term: &str) -> Result<Option<Vec<Candidate>>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(None);
        }
        let list: CandidateList = self.client.query(&SEARCH, &[], &[("q", term)]).await?;
        Ok(Some(list.candidates))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::{client_with_store, MockTransport};
    use crate::api::Method;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn search_is_cached_per_term() {
        let transport = MockTransport::new();
        let hit = json!({"candidates": [Candidate::example("c1", "Wanjiru Kamau", "p1")]});
        transport.ok(Method::Get, "/candidates/search?q=wanjiru", hit);
        transport.ok(Method::Get, "/candidates/search?q=otieno", json!({"candidates": []}));
        let client = client_with_store(transport.clone(), Arc::new(MemoryStore::new()));

        let found = client.candidates().search(" wanjiru ").await.unwrap().unwrap();
        assert_eq!(found.len(), 1);
        client.candidates().search("wanjiru").await.unwrap();
        let none = client.candidates().search("otieno").await.unwrap().unwrap();
        assert!(none.is_empty());

        assert_eq!(transport.count(Method::Get, "/candidates/search?q=wanjiru"), 1);
        assert_eq!(transport.count(Method::Get, "/candidates/search?q=otieno"), 1);
    }

    #[tokio::test]
    async fn blank_search_is_inactive() {
        let transport = MockTransport::new();
        let client = client_with_store(transport.clone(), Arc::new(MemoryStore::new()));
        assert_eq!(client.candidates().search("   ").await.unwrap(), None);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn by_position_uses_position_route() {
        let transport = MockTransport::new();
        transport.ok(
            Method::Get,
            "/candidates/position/p2",
            json!({"candidates": [Candidate::example("c4", "Kiprop", "p2")]}),
        );
        let client = client_with_store(transport.clone(), Arc::new(MemoryStore::new()));
        let list = client.candidates().by_position(Some("p2")).await.unwrap().unwrap();
        assert_eq!(list[0].position_id, "p2");
        assert_eq!(client.candidates().by_position(None).await.unwrap(), None);
        assert_eq!(transport.requests().len(), 1);
    }
}
