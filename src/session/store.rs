use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Server-side association between an opaque token held by the client and an
/// authenticated user id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issues a fresh token bound to `user_id`. Every login gets a new token.
    async fn create(&self, user_id: Uuid) -> String;

    async fn get(&self, token: &str) -> Option<Uuid>;

    /// No-op when the token is unknown.
    async fn clear(&self, token: &str);
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// In-process session storage. Sessions do not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Uuid>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: Uuid) -> String {
        let token = generate_token();
        self.sessions.write().await.insert(token.clone(), user_id);
        token
    }

    async fn get(&self, token: &str) -> Option<Uuid> {
        self.sessions.read().await.get(token).copied()
    }

    async fn clear(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}
