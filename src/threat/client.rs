use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::error;

use super::dto::{BreachRecord, BreachResponse, ExposureBundle};
use crate::config::ThreatApiConfig;

/// Outbound interface to the threat-intelligence API. Both calls degrade to
/// empty results on upstream failure so the dashboard always renders.
#[async_trait]
pub trait ThreatIntel: Send + Sync {
    async fn fetch_breaches(&self, email: &str) -> Vec<BreachRecord>;
    async fn fetch_exposures(&self, email: &str) -> ExposureBundle;
}

pub struct HttpThreatClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpThreatClient {
    pub fn new(config: &ThreatApiConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Non-2xx statuses, transport failures and undecodable bodies are all
    /// logged and mapped to the type's default value.
    async fn get_json<T: DeserializeOwned + Default>(&self, path: &str, email: &str) -> T {
        let url = format!("{}/{}", self.base_url, path);
        let response = match self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("email", email)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, path, "threat api request failed");
                return T::default();
            }
        };

        if !response.status().is_success() {
            error!(status = %response.status(), path, "threat api returned non-success");
            return T::default();
        }

        match response.json::<T>().await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, path, "threat api response decode failed");
                T::default()
            }
        }
    }
}

#[async_trait]
impl ThreatIntel for HttpThreatClient {
    async fn fetch_breaches(&self, email: &str) -> Vec<BreachRecord> {
        self.get_json::<BreachResponse>("breaches", email)
            .await
            .breaches
    }

    async fn fetch_exposures(&self, email: &str) -> ExposureBundle {
        self.get_json::<ExposureBundle>("exposures", email).await
    }
}
