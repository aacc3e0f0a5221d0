use serde::Deserialize;

/// Settings for the upstream threat-intelligence API.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreatApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub threat: ThreatApiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let threat = ThreatApiConfig {
            base_url: std::env::var("THREAT_API_URL")?,
            api_key: std::env::var("THREAT_API_KEY").unwrap_or_default(),
            timeout_secs: std::env::var("THREAT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            database_url,
            threat,
        })
    }
}
