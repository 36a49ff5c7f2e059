//! Remote resource clients. Each backend resource gets a handle borrowed from
//! [`ApiClient`] (`client.elections()`, `client.candidates()`, ...) whose
//! operations map one-to-one onto backend routes.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::cache::{QueryCache, QueryKey};
use crate::error::Result;
use crate::logging::{log_failure, log_request, log_response, RequestId};
use crate::session::Session;

pub mod applications;
pub mod auth;
pub mod candidates;
pub mod coalitions;
pub mod elections;
pub mod endpoint;
pub mod notifications;
pub mod positions;
pub mod transport;
pub mod users;

#[cfg(test)]
pub(crate) mod mock;

pub use endpoint::{Endpoint, Method, Tag};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// Shared entry point for every resource client. Cloning is cheap and clones
/// share the same cache and session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    cache: Arc<Mutex<QueryCache>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self {
            transport,
            session,
            cache: Arc::new(Mutex::new(QueryCache::new())),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Perform a read, answering from the cache when possible.
    pub async fn query<T>(
        &self,
        endpoint: &'static Endpoint,
        params: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = build_request(endpoint, params, query)?;
        let (_, value) = self.cached_or_fetch(endpoint, request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// A read whose prerequisite id may not be known yet. Without the id no
    /// request is issued and `Ok(None)` ("not yet available") is returned.
    pub async fn query_dependent<T>(
        &self,
        endpoint: &'static Endpoint,
        param: &str,
        id: Option<&str>,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match id {
            Some(id) => self.query(endpoint, &[(param, id)], &[]).await.map(Some),
            None => Ok(None),
        }
    }

    /// Perform a read and keep it active: it will be re-issued whenever one of
    /// its endpoint's tags is invalidated, until the subscription is dropped.
    pub async fn watch<T>(
        &self,
        endpoint: &'static Endpoint,
        params: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<Subscription<T>>
    where
        T: DeserializeOwned,
    {
        let request = build_request(endpoint, params, query)?;
        let (key, value) = self.cached_or_fetch(endpoint, request.clone()).await?;
        // Fail early if the payload doesn't fit the expected shape.
        serde_json::from_value::<T>(value.clone())?;

        let mut cache = self.lock();
        if !cache.subscribe(&key) {
            // Evicted by an invalidation while we were decoding.
            cache.store(key.clone(), request, endpoint.provides, value);
            cache.subscribe(&key);
        }
        Ok(Subscription {
            key,
            cache: self.cache.clone(),
            phantom: PhantomData,
        })
    }

    /// Perform a mutation. On success, every read tagged with one of the
    /// endpoint's `invalidates` tags is refreshed or evicted before returning.
    /// A failed mutation invalidates nothing.
    pub async fn mutate<T>(
        &self,
        endpoint: &'static Endpoint,
        params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self.execute(endpoint, params, body).await?;
        self.invalidate(endpoint.invalidates).await;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a mutation without touching the cache. The caller is
    /// responsible for invalidating `endpoint.invalidates` afterwards.
    pub(crate) async fn execute(
        &self,
        endpoint: &'static Endpoint,
        params: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value> {
        let mut request = build_request(endpoint, params, &[])?;
        request.body = body;
        self.dispatch(endpoint.name, request).await
    }

    /// Invalidate cached reads by tag. Active reads are re-fetched
    /// concurrently and this returns once all of them have settled; a failed
    /// re-fetch keeps the previous value.
    pub async fn invalidate(&self, tags: &[Tag]) {
        if tags.is_empty() {
            return;
        }
        let refetch = self.lock().invalidate(tags);
        debug!(
            "Invalidated {tags:?}, re-fetching {} active read(s)",
            refetch.len()
        );
        let results = join_all(refetch.into_iter().map(|refetch| async move {
            let result = self.dispatch(refetch.key.endpoint, refetch.request).await;
            (refetch.key, result)
        }))
        .await;

        let mut cache = self.lock();
        for (key, result) in results {
            match result {
                Ok(value) => cache.refresh(&key, value),
                Err(e) => warn!("Re-fetch of {} failed, keeping stale data: {e}", key.path),
            }
        }
    }

    /// Drop every cached read. Active subscriptions read as "not yet
    /// available" until they are watched again.
    pub fn clear_cache(&self) {
        let mut cache = self.lock();
        debug!("Clearing {} cached read(s)", cache.len());
        cache.clear();
    }

    /// Number of cached reads. Mostly useful for diagnostics.
    pub fn cached_reads(&self) -> usize {
        self.lock().len()
    }

    async fn cached_or_fetch(
        &self,
        endpoint: &'static Endpoint,
        request: ApiRequest,
    ) -> Result<(QueryKey, Value)> {
        let key = QueryKey::new(endpoint.name, &request);
        let cached = self.lock().get(&key).cloned();
        if let Some(value) = cached {
            debug!("Cache hit for {} {}", endpoint.name, key.path);
            return Ok((key, value));
        }
        let value = self.dispatch(endpoint.name, request.clone()).await?;
        self.lock()
            .store(key.clone(), request, endpoint.provides, value.clone());
        Ok((key, value))
    }

    /// Attach the bearer token, send, and log both directions.
    async fn dispatch(&self, name: &str, mut request: ApiRequest) -> Result<Value> {
        request.bearer = self.session.bearer_token().await;
        let id = RequestId::next();
        log_request(id, &request);
        match self.transport.send(&request).await {
            Ok(response) => {
                log_response(id, name, &response);
                response.into_result()
            }
            Err(e) => {
                log_failure(id, name, &e);
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An active read. Dropping it lets the cache evict the entry on the next
/// invalidation instead of re-fetching it.
pub struct Subscription<T> {
    key: QueryKey,
    cache: Arc<Mutex<QueryCache>>,
    phantom: PhantomData<fn() -> T>,
}

impl<T> Subscription<T>
where
    T: DeserializeOwned,
{
    /// The latest value in the cache, or `None` once the cache has been
    /// cleared underneath this subscription.
    pub fn current(&self) -> Result<Option<T>> {
        let value = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&self.key)
            .cloned();
        match value {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unsubscribe(&self.key);
    }
}

/// Serialise a request body.
pub fn json_body<B>(body: &B) -> Result<Option<Value>>
where
    B: Serialize + ?Sized,
{
    Ok(Some(serde_json::to_value(body)?))
}

fn build_request(
    endpoint: &Endpoint,
    params: &[(&str, &str)],
    query: &[(&str, &str)],
) -> Result<ApiRequest> {
    Ok(ApiRequest {
        method: endpoint.method,
        segments: endpoint.segments(params)?,
        query: query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body: None,
        bearer: None,
    })
}
