//! Session store: the single source of truth for "who is logged in".
//!
//! Exactly one identity (or none) is current at any time. The store owns the
//! persisted copy on disk, restores it on startup, and notifies subscribers
//! synchronously on every change. All mutation goes through
//! [`SessionStore::set_identity`] / [`SessionStore::clear`]; nothing else in
//! the workspace touches the session file.
//!
//! Restore is split in two so an async caller can run the disk read off the
//! UI thread: [`read_persisted`] does the read (failing open to logged-out),
//! [`SessionStore::finish_restore`] applies the result. While the store is
//! restoring, the route guard refuses to make redirect decisions.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Identity;

/// Handle returned by [`SessionStore::subscribe`], used to de-register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Option<&Identity>)>;

/// Process-wide holder of at most one current [`Identity`].
pub struct SessionStore {
    path: PathBuf,
    current: Option<Identity>,
    restoring: bool,
    subscribers: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.path)
            .field("current", &self.current)
            .field("restoring", &self.restoring)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Reads a previously persisted identity from `path`.
///
/// Missing, unreadable, and corrupt files all yield `None`: a broken session
/// file means "logged out", never an error the caller has to handle.
pub fn read_persisted(path: &Path) -> Option<Identity> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "discarding corrupt session file");
            None
        }
    }
}

impl SessionStore {
    /// Creates an empty store in the restoring state.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
            restoring: true,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Synchronous restore: reads the persisted identity and applies it.
    pub fn initialize(&mut self) {
        let found = read_persisted(&self.path);
        self.finish_restore(found);
    }

    /// Applies the result of a restore read and leaves the restoring state.
    pub fn finish_restore(&mut self, found: Option<Identity>) {
        self.current = found;
        self.restoring = false;
        self.notify();
    }

    /// True only during the initial load-from-persistence window.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    /// The on-disk location of the persisted session.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current identity, if any.
    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Replaces the current identity unconditionally, persists it, and
    /// notifies subscribers. A persistence failure is logged; the in-memory
    /// session still changes so the login itself never fails on disk errors.
    pub fn set_identity(&mut self, identity: Identity) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::warn!(error = %e, "failed to create session directory");
        }
        match serde_json::to_string_pretty(&identity) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize session"),
        }
        self.current = Some(identity);
        self.notify();
    }

    /// Removes the current identity and erases the persisted copy.
    /// Idempotent: clearing an already-empty store is a no-op.
    pub fn clear(&mut self) {
        if self.current.is_none() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove session file");
        }
        self.current = None;
        self.notify();
    }

    /// Registers a listener invoked synchronously on every change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(Option<&Identity>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// De-registers a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&mut self) {
        let current = self.current.as_ref();
        for (_, listener) in &mut self.subscribers {
            listener(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::types::UserType;

    fn identity(user_id: u64) -> Identity {
        Identity {
            user_id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            user_type: UserType::Patient,
            access_code: format!("AC-{user_id}"),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_set_identity_notifies_subscribers_synchronously() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.initialize();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_a = Rc::clone(&seen);
        let seen_b = Rc::clone(&seen);
        store.subscribe(move |current| {
            seen_a.borrow_mut().push(("a", current.map(|i| i.user_id)));
        });
        store.subscribe(move |current| {
            seen_b.borrow_mut().push(("b", current.map(|i| i.user_id)));
        });

        store.set_identity(identity(7));

        // Both subscribers observed the new identity before set_identity returned.
        assert_eq!(
            *seen.borrow(),
            vec![("a", Some(7)), ("b", Some(7))]
        );
        assert_eq!(store.current().unwrap().user_id, 7);
    }

    #[test]
    fn test_persistence_roundtrip_restores_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::new(&path);
        store.initialize();
        store.set_identity(identity(42));

        // Fresh store over the same path, simulating a restart.
        let mut restored = SessionStore::new(&path);
        assert!(restored.is_restoring());
        restored.initialize();
        assert!(!restored.is_restoring());
        assert_eq!(restored.current(), Some(&identity(42)));
    }

    #[test]
    fn test_corrupt_session_file_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not valid json").unwrap();

        let mut store = SessionStore::new(&path);
        store.initialize();
        assert!(store.current().is_none());
        assert!(!store.is_restoring());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.initialize();
        store.set_identity(identity(1));

        let notifications = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&notifications);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.clear();
        store.clear();

        assert!(store.current().is_none());
        // Second clear fired no additional notification.
        assert_eq!(*notifications.borrow(), 1);
    }

    #[test]
    fn test_clear_erases_the_persisted_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut store = SessionStore::new(&path);
        store.initialize();
        store.set_identity(identity(3));
        assert!(path.exists());

        store.clear();
        assert!(!path.exists());

        let mut fresh = SessionStore::new(&path);
        fresh.initialize();
        assert!(fresh.current().is_none());
    }

    #[test]
    fn test_set_identity_overwrites_unconditionally() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.initialize();
        store.set_identity(identity(1));
        store.set_identity(identity(2));
        assert_eq!(store.current().unwrap().user_id, 2);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.initialize();

        let count = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&count);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.set_identity(identity(1));
        store.unsubscribe(id);
        store.set_identity(identity(2));

        assert_eq!(*count.borrow(), 1);
    }
}
