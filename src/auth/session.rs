//! In-memory session store.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// One authenticated operator session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub created_at: DateTime<Utc>,
}

/// Token -> session map guarding the analysis endpoints.
///
/// Purely in-memory: restarting the service logs everyone out, which is the
/// intended lifecycle. Tokens are unguessable but carry no claims; the store
/// is the single source of truth.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    counter: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for an already-verified user and return its token.
    pub async fn create(&self, user: &str) -> String {
        let now = Utc::now();
        let nonce = self.counter.fetch_add(1, Ordering::Relaxed);
        let seed = format!(
            "{}:{}:{}",
            user,
            now.timestamp_nanos_opt().unwrap_or_default(),
            nonce
        );
        let token: String = Sha256::digest(seed.as_bytes())
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();

        let session = Session {
            user: user.to_string(),
            created_at: now,
        };
        self.sessions.write().await.insert(token.clone(), session);
        debug!(user, "session created");
        token
    }

    pub async fn validate(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Remove the session for `token`. Returns whether one existed;
    /// revoking an unknown token is a no-op.
    pub async fn revoke(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            debug!(user = %session.user, "session revoked");
        }
        removed.is_some()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
