use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::endpoint::Method;
use crate::error::{Error, Result};

/// A concrete request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Unencoded path segments below the base URL.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Attached as `Authorization: Bearer <token>` when present.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// The path as it appears in logs and cache keys, query string included.
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.segments.join("/"));
        if !self.query.is_empty() {
            let pairs: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            path.push('?');
            path.push_str(&pairs.join("&"));
        }
        path
    }
}

/// What came back. The body is `Value::Null` when the server sent none.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body on 2xx, otherwise an [`Error::Api`] carrying the server's reason.
    pub fn into_result(self) -> Result<Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(Error::from_response(self.status, &self.body))
        }
    }
}

/// Anything that can carry an [`ApiRequest`] to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request. Only transport failures are errors here; non-2xx
    /// statuses come back as ordinary responses.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// HTTP(S) transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidRequest(format!("bad base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidRequest(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// The full URL for a request, with segments and query percent-encoded.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidRequest(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(request)?;
        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(segments: &[&str], query: &[(&str, &str)]) -> ApiRequest {
        ApiRequest {
            method: Method::Get,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
            bearer: None,
        }
    }

    #[test]
    fn urls_keep_base_path_and_encode_segments() {
        let transport =
            ReqwestTransport::new("https://vote.example.edu/api/", Duration::from_secs(5)).unwrap();
        let url = transport
            .url_for(&request(&["candidates", "search"], &[("q", "ann marie")]))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://vote.example.edu/api/candidates/search?q=ann+marie"
        );

        let url = transport
            .url_for(&request(&["users", "SCT/001"], &[]))
            .unwrap();
        assert_eq!(url.as_str(), "https://vote.example.edu/api/users/SCT%2F001");
    }

    #[test]
    fn rejects_unusable_base() {
        assert!(ReqwestTransport::new("not a url", Duration::from_secs(5)).is_err());
        assert!(ReqwestTransport::new("mailto:vote@example.edu", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn non_success_becomes_api_error() {
        let response = ApiResponse {
            status: 401,
            body: json!({"message": "Token expired"}),
        };
        match response.into_result() {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Token expired"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn display_path_includes_query() {
        assert_eq!(
            request(&["candidate-applications"], &[("status", "PENDING")]).path(),
            "/candidate-applications?status=PENDING"
        );
        assert_eq!(request(&[], &[]).path(), "/");
    }
}
