//! Key-value session store: opaque token -> user snapshot with a fixed
//! absolute expiry. One lookup per request, no renewal on activity.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use teamdesk_types::SessionUser;
use tracing::debug;
use uuid::Uuid;

const SESSION_TTL_HOURS: i64 = 24;

struct SessionRecord {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(SESSION_TTL_HOURS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a session for the given snapshot and returns the opaque
    /// token. Expiry is absolute from this moment.
    pub fn create(&self, user: SessionUser) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let record = SessionRecord {
            user,
            expires_at: Utc::now() + self.ttl,
        };
        self.lock()?.insert(token.clone(), record);
        Ok(token)
    }

    /// Looks up a token. Expired records are removed on observation and
    /// resolve to `None`, same as an unknown token.
    pub fn resolve(&self, token: &str) -> Result<Option<SessionUser>> {
        let mut sessions = self.lock()?;
        match sessions.get(token) {
            Some(record) if Utc::now() < record.expires_at => Ok(Some(record.user.clone())),
            Some(_) => {
                debug!("Session expired: {}", token);
                sessions.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Idempotent: removing an unknown token is a no-op.
    pub fn destroy(&self, token: &str) -> Result<()> {
        self.lock()?.remove(token);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionRecord>>> {
        self.sessions
            .lock()
            .map_err(|e| anyhow::anyhow!("session store lock poisoned: {}", e))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamdesk_types::Role;

    fn snapshot() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: "budi".into(),
            role: Role::Contributor,
        }
    }

    #[test]
    fn create_then_resolve() {
        let store = SessionStore::new();
        let token = store.create(snapshot()).unwrap();
        let user = store.resolve(&token).unwrap().unwrap();
        assert_eq!(user.username, "budi");
        assert_eq!(user.role, Role::Contributor);
    }

    #[test]
    fn unknown_token_resolves_to_none() {
        let store = SessionStore::new();
        assert!(store.resolve("not-a-token").unwrap().is_none());
    }

    #[test]
    fn expired_session_is_dead_and_removed() {
        let store = SessionStore::with_ttl(Duration::zero());
        let token = store.create(snapshot()).unwrap();
        assert!(store.resolve(&token).unwrap().is_none());
        // Second lookup hits the removed-record path, still None.
        assert!(store.resolve(&token).unwrap().is_none());
    }

    #[test]
    fn destroy_is_idempotent() {
        let store = SessionStore::new();
        let token = store.create(snapshot()).unwrap();
        store.destroy(&token).unwrap();
        assert!(store.resolve(&token).unwrap().is_none());
        store.destroy(&token).unwrap();
    }

    #[test]
    fn tokens_are_unique() {
        let store = SessionStore::new();
        let a = store.create(snapshot()).unwrap();
        let b = store.create(snapshot()).unwrap();
        assert_ne!(a, b);
    }
}
