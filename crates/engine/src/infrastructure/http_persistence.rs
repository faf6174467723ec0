//! HTTP persistence client
//!
//! Posts each versioned snapshot as JSON to
//! `{base_url}/players/{player_id}/inventory`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use dnaforge_domain::PlayerId;

use crate::infrastructure::config::DEFAULT_FLUSH_TIMEOUT_SECS;
use crate::infrastructure::ports::{FlushRequest, PersistenceError, PersistencePort};

#[derive(Clone)]
pub struct HttpPersistenceClient {
    client: Client,
    base_url: String,
}

impl HttpPersistenceClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_FLUSH_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn inventory_url(&self, player_id: PlayerId) -> String {
        format!("{}/players/{}/inventory", self.base_url, player_id)
    }
}

#[async_trait]
impl PersistencePort for HttpPersistenceClient {
    async fn flush(&self, request: &FlushRequest) -> Result<(), PersistenceError> {
        let response = self
            .client
            .post(self.inventory_url(request.player_id))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    PersistenceError::serialization(e)
                } else {
                    PersistenceError::transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(PersistenceError::transport)?;
            return Err(PersistenceError::rejected(status.as_u16(), body));
        }

        tracing::debug!(
            player_id = %request.player_id,
            version = request.version,
            "Snapshot accepted by backend"
        );
        Ok(())
    }
}
