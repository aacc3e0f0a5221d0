use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::repo::{CredentialStore, PgCredentialStore};
use crate::config::AppConfig;
use crate::session::store::{MemorySessionStore, SessionStore};
use crate::threat::client::{HttpThreatClient, ThreatIntel};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub threat: Arc<dyn ThreatIntel>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let users = Arc::new(PgCredentialStore::new(db)) as Arc<dyn CredentialStore>;
        let sessions = Arc::new(MemorySessionStore::default()) as Arc<dyn SessionStore>;
        let threat = Arc::new(HttpThreatClient::new(&config.threat)?) as Arc<dyn ThreatIntel>;

        Ok(Self::from_parts(users, sessions, threat))
    }

    pub fn from_parts(
        users: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        threat: Arc<dyn ThreatIntel>,
    ) -> Self {
        Self {
            users,
            sessions,
            threat,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::repo::MemoryCredentialStore;
        use crate::threat::dto::{BreachRecord, ExposureBundle};
        use async_trait::async_trait;

        struct FakeThreat;

        #[async_trait]
        impl ThreatIntel for FakeThreat {
            async fn fetch_breaches(&self, _email: &str) -> Vec<BreachRecord> {
                Vec::new()
            }
            async fn fetch_exposures(&self, _email: &str) -> ExposureBundle {
                ExposureBundle::default()
            }
        }

        Self::from_parts(
            Arc::new(MemoryCredentialStore::default()),
            Arc::new(MemorySessionStore::default()),
            Arc::new(FakeThreat),
        )
    }
}
