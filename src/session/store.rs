use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::{sync::RwLock, task::JoinHandle};

use super::{SessionId, SessionRecord};

#[derive(Debug)]
struct Entry {
    record: SessionRecord,
    touched_at: DateTime<Utc>,
}

/// In-memory session storage.
///
/// A session expires once it has not been loaded or saved for `ttl`.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the record of a live session and refreshes its idle timer.
    pub async fn load(&self, id: &SessionId) -> Option<SessionRecord> {
        self.load_at(id, Utc::now()).await
    }

    pub async fn save(&self, id: &SessionId, record: SessionRecord) {
        self.save_at(id, record, Utc::now()).await
    }

    /// Drops every expired session and returns how many were dropped.
    pub async fn prune(&self) -> usize {
        self.prune_at(Utc::now()).await
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn load_at(&self, id: &SessionId, now: DateTime<Utc>) -> Option<SessionRecord> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        if self.is_expired(entry, now) {
            sessions.remove(id);
            return None;
        }
        entry.touched_at = now;
        Some(entry.record.clone())
    }

    async fn save_at(&self, id: &SessionId, record: SessionRecord, now: DateTime<Utc>) {
        self.sessions.write().await.insert(
            id.clone(),
            Entry {
                record,
                touched_at: now,
            },
        );
    }

    async fn prune_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }

    fn is_expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.touched_at >= self.ttl
    }
}

/// Spawns a task that prunes expired sessions every `every`.
pub fn spawn_reaper(store: Arc<SessionStore>, every: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let pruned = store.prune().await;
            if pruned > 0 {
                tracing::debug!(pruned, "expired sessions removed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(access_token: &str) -> SessionRecord {
        SessionRecord {
            access_token: Some(access_token.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = SessionStore::new(Duration::minutes(5));
        let id = SessionId::generate();

        assert!(store.load(&id).await.is_none());
        store.save(&id, record("AT1")).await;
        assert_eq!(store.load(&id).await, Some(record("AT1")));

        store.save(&id, record("AT2")).await;
        assert_eq!(store.load(&id).await, Some(record("AT2")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_expired_session() {
        let store = SessionStore::new(Duration::minutes(5));
        let id = SessionId::generate();
        let start = Utc::now();

        store.save_at(&id, record("AT1"), start).await;
        assert!(
            store
                .load_at(&id, start + Duration::minutes(4))
                .await
                .is_some()
        );

        // The load above reset the idle timer
        assert!(
            store
                .load_at(&id, start + Duration::minutes(8))
                .await
                .is_some()
        );
        assert!(
            store
                .load_at(&id, start + Duration::minutes(14))
                .await
                .is_none()
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_prune() {
        let store = SessionStore::new(Duration::minutes(5));
        let old = SessionId::generate();
        let young = SessionId::generate();
        let start = Utc::now();

        store.save_at(&old, record("old"), start).await;
        store
            .save_at(&young, record("young"), start + Duration::minutes(3))
            .await;

        assert_eq!(store.prune_at(start + Duration::minutes(6)).await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.load_at(&young, start + Duration::minutes(6)).await.is_some());
    }
}
