//! A recording in-memory transport for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ApiClient, ApiRequest, ApiResponse, Method, Transport};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::storage::KeyValueStore;

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Option<ApiResponse>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `method path` with the given status and body from now on.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Some(ApiResponse { status, body }));
    }

    pub fn ok(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, 200, body);
    }

    /// Make `method path` fail as if the network were down.
    pub fn unreachable(&self, method: Method, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), None);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<ApiRequest> {
        self.log.lock().unwrap().last().cloned()
    }

    pub fn last_of(&self, method: Method) -> Option<ApiRequest> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == method)
            .cloned()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path() == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.log.lock().unwrap().push(request.clone());
        let route = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, request.path()))
            .cloned();
        match route {
            Some(Some(response)) => Ok(response),
            Some(None) => Err(Error::Transport("connection refused".into())),
            None => Ok(ApiResponse {
                status: 404,
                body: json!({"message": format!("No route for {}", request.path())}),
            }),
        }
    }
}

/// A client over `transport` with a fresh, signed-out session on `store`.
pub fn client_with_store(
    transport: Arc<MockTransport>,
    store: Arc<dyn KeyValueStore>,
) -> ApiClient {
    ApiClient::new(transport, Arc::new(Session::new(store)))
}
