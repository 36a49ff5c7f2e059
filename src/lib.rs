#[macro_use]
extern crate log;

pub mod api;
pub mod cache;
pub mod config;
pub mod countdown;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;
pub mod storage;
pub mod view;

use std::sync::Arc;

use api::{ApiClient, ReqwestTransport};
use config::Config;
use session::Session;
use storage::FileStore;

pub use error::{Error, Result};

/// Everything an app session needs, wired from configuration: the file-backed
/// store, a rehydrated [`Session`] and an [`ApiClient`] talking HTTP.
pub async fn connect(config: &Config) -> Result<ApiClient> {
    let store = FileStore::open(config.storage_path()).await?;
    let session = Arc::new(Session::new(Arc::new(store)));
    session.initialize().await?;
    let transport = ReqwestTransport::new(config.api_base_url(), config.request_timeout())?;
    info!("Connected to {}", config.api_base_url());
    Ok(ApiClient::new(Arc::new(transport), session))
}

#[cfg(test)]
mod tests {
    use figment::providers::Serialized;

    use super::*;

    #[tokio::test]
    async fn connects_over_a_damaged_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, br#"{"token": "ab"#).await.unwrap();
        let config = Config::from_figment(
            Config::figment(dir.path().join("missing.toml"))
                .merge(Serialized::default("storage_path", &path)),
        )
        .unwrap();

        let client = connect(&config).await.unwrap();
        assert!(!client.session().is_authenticated());
    }
}
