//! Identity data and the load-time rotation rule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::storage::IdentityStorage;

/// Idle gap after which the session id rotates (30 minutes).
pub const IDLE_GAP_MS: i64 = 30 * 60 * 1000;

/// Persisted visitor identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Rotates when the idle gap is exceeded.
    pub session_id: Uuid,

    /// Epoch milliseconds of the most recent widget load.
    pub last_active_at_ms: i64,

    /// Permanent once created; never rotates.
    pub user_id: Uuid,
}

/// Owns identity persistence and the rotation rule.
pub struct IdentityStore {
    storage: Arc<dyn IdentityStorage>,
}

impl IdentityStore {
    pub fn new(storage: Arc<dyn IdentityStorage>) -> Self {
        Self { storage }
    }

    /// Read or create the identity for this widget load.
    ///
    /// Rotates the session id when there is no persisted record or the idle
    /// gap since the last load exceeds 30 minutes. The last-active stamp is
    /// persisted unconditionally on every call. Storage write failures are
    /// logged and the in-memory identity is still returned; identity
    /// creation itself has no error conditions.
    pub async fn get_or_create(&self, now: DateTime<Utc>) -> Identity {
        let now_ms = now.timestamp_millis();
        let previous = self.storage.load().await.ok();

        let session_id = match &previous {
            Some(record) if now_ms - record.last_active_at_ms <= IDLE_GAP_MS => record.session_id,
            _ => Uuid::new_v4(),
        };
        let user_id = previous
            .as_ref()
            .map(|record| record.user_id)
            .unwrap_or_else(Uuid::new_v4);

        let identity = Identity {
            session_id,
            last_active_at_ms: now_ms,
            user_id,
        };

        if let Err(err) = self.storage.save(&identity).await {
            tracing::warn!("failed to persist identity: {err}");
        }

        identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileIdentityStorage, MemoryIdentityStorage};
    use chrono::Duration;
    use tempfile::tempdir;

    fn store() -> IdentityStore {
        IdentityStore::new(Arc::new(MemoryIdentityStorage::new()))
    }

    #[tokio::test]
    async fn creates_fresh_identity_on_first_load() {
        let store = store();
        let now = Utc::now();

        let identity = store.get_or_create(now).await;
        assert_eq!(identity.last_active_at_ms, now.timestamp_millis());
    }

    #[tokio::test]
    async fn session_survives_within_idle_window() {
        let store = store();
        let first_load = Utc::now();
        let second_load = first_load + Duration::minutes(29);

        let first = store.get_or_create(first_load).await;
        let second = store.get_or_create(second_load).await;

        assert_eq!(first.session_id, second.session_id);
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.last_active_at_ms, second_load.timestamp_millis());
    }

    #[tokio::test]
    async fn session_rotates_after_idle_window() {
        let store = store();
        let first_load = Utc::now();
        let second_load = first_load + Duration::minutes(31);

        let first = store.get_or_create(first_load).await;
        let second = store.get_or_create(second_load).await;

        assert_ne!(first.session_id, second.session_id);
        assert_eq!(first.user_id, second.user_id);
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent_within_window() {
        let store = store();
        let now = Utc::now();

        let first = store.get_or_create(now).await;
        let second = store.get_or_create(now).await;

        assert_eq!(first.session_id, second.session_id);
        assert_eq!(first.user_id, second.user_id);
    }

    #[tokio::test]
    async fn identity_persists_across_store_instances() {
        let dir = tempdir().unwrap();
        let now = Utc::now();

        let first = IdentityStore::new(Arc::new(FileIdentityStorage::new(dir.path())))
            .get_or_create(now)
            .await;
        let second = IdentityStore::new(Arc::new(FileIdentityStorage::new(dir.path())))
            .get_or_create(now + Duration::minutes(5))
            .await;

        assert_eq!(first.session_id, second.session_id);
        assert_eq!(first.user_id, second.user_id);
    }

    #[tokio::test]
    async fn exact_boundary_keeps_session() {
        let store = store();
        let first_load = Utc::now();
        let boundary = first_load + Duration::milliseconds(IDLE_GAP_MS);

        let first = store.get_or_create(first_load).await;
        let second = store.get_or_create(boundary).await;

        assert_eq!(first.session_id, second.session_id);
    }
}
