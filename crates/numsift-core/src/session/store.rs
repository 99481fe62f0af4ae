//! Session store: the registry of live sessions.
//!
//! Sessions are created by `start` and removed by `evict`; nothing else adds
//! or drops entries.

use super::model::{OwnerId, Session};
use super::settings::SessionSettings;
use crate::error::{NumsiftError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Shared handle to one owner's session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Process-wide registry of live sessions.
///
/// `SessionStore` is responsible for:
/// - Creating (or replacing) a session when an owner starts
/// - Handing out the per-session lock so that overlapping events for one
///   owner run one after another
/// - Evicting sessions on request
///
/// The map itself sits behind an `RwLock` that is only held long enough to
/// clone a handle out; the per-session `Mutex` is what serializes mutation.
/// Events for different owners never wait on each other's session lock.
pub struct SessionStore {
    /// In-memory session registry
    sessions: Arc<RwLock<HashMap<OwnerId, SessionHandle>>>,
    /// Settings new sessions start with
    defaults: SessionSettings,
}

impl SessionStore {
    /// Creates an empty store whose sessions start with `defaults`.
    pub fn new(defaults: SessionSettings) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            defaults,
        }
    }

    /// Creates a fresh session for `owner`, replacing any existing one.
    pub async fn start(&self, owner: OwnerId) -> SessionHandle {
        let session = Session::new(owner, self.defaults);
        tracing::info!(owner, session_id = %session.id, "Session started");
        let handle = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        sessions.insert(owner, handle.clone());
        handle
    }

    /// Returns the session handle for `owner`, if one is live.
    pub async fn get(&self, owner: OwnerId) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(&owner).cloned()
    }

    /// Acquires exclusive access to `owner`'s session.
    ///
    /// # Errors
    ///
    /// Returns [`NumsiftError::ExpiredSession`] if the owner has no session.
    pub async fn lock(&self, owner: OwnerId) -> Result<OwnedMutexGuard<Session>> {
        let handle = self
            .get(owner)
            .await
            .ok_or_else(|| NumsiftError::expired(owner))?;
        Ok(handle.lock_owned().await)
    }

    /// Runs `f` against `owner`'s session while holding its lock.
    ///
    /// # Errors
    ///
    /// Returns [`NumsiftError::ExpiredSession`] if the owner has no session,
    /// otherwise whatever `f` returns.
    pub async fn with_session<F, R>(&self, owner: OwnerId, f: F) -> Result<R>
    where
        F: FnOnce(&mut Session) -> Result<R>,
    {
        let mut session = self.lock(owner).await?;
        f(&mut session)
    }

    /// Removes `owner`'s session. Returns whether one existed.
    pub async fn evict(&self, owner: OwnerId) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&owner).is_some();
        if removed {
            tracing::info!(owner, "Session evicted");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformKind;
    use strum::EnumCount;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unknown_owner_is_expired() {
        let store = SessionStore::default();
        let err = store.with_session(7, |_| Ok(())).await.unwrap_err();
        assert_eq!(err, NumsiftError::ExpiredSession { owner: 7 });
    }

    #[tokio::test]
    async fn test_start_replaces_existing_session() {
        let store = SessionStore::default();
        store.start(1).await;
        store
            .with_session(1, |s| {
                s.commit(tokens(&["5551234567"]));
                Ok(())
            })
            .await
            .unwrap();

        store.start(1).await;
        let empty = store
            .with_session(1, |s| Ok(s.active_tokens().is_empty()))
            .await
            .unwrap();
        assert!(empty);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_evict() {
        let store = SessionStore::default();
        store.start(1).await;
        store.start(2).await;
        assert!(store.evict(1).await);
        assert!(!store.evict(1).await);
        assert!(store.get(1).await.is_none());
        assert!(store.get(2).await.is_some());
        assert!(!store.is_empty().await);
    }

    #[tokio::test]
    async fn test_defaults_applied_to_new_sessions() {
        let store = SessionStore::new(SessionSettings {
            per_page: 3,
            show_all_enabled: true,
        });
        store.start(9).await;
        let settings = store.with_session(9, |s| Ok(s.settings)).await.unwrap();
        assert_eq!(settings.per_page, 3);
        assert!(settings.show_all_enabled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_transforms_are_serialized() {
        let store = Arc::new(SessionStore::default());
        store.start(1).await;
        store
            .with_session(1, |s| {
                s.commit(tokens(&["+14155550123", "442071838750"]));
                Ok(())
            })
            .await
            .unwrap();

        let invocations = 53;
        let mut tasks = Vec::new();
        for _ in 0..invocations {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let mut session = store.lock(1).await.unwrap();
                let before = session.history.current_index();
                // Give other tasks a chance to interleave while the lock is held.
                tokio::task::yield_now().await;
                session.apply_next_transform().unwrap();
                let after = session.history.current_index();
                assert_eq!(after, (before + 1) % TransformKind::COUNT);
                assert!(after < session.history.slot_count());
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let (index, len) = store
            .with_session(1, |s| Ok((s.history.current_index(), s.history.slot_count())))
            .await
            .unwrap();
        assert_eq!(index, invocations % TransformKind::COUNT);
        assert_eq!(len, TransformKind::COUNT);
    }
}
