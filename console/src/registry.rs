//! Registry of connected console sessions.
//!
//! Each remote user owns one [`Session`]: the server connection that carries
//! it, plus the shell channel and proxy connection attached later. The
//! registry is an ordinary owned value; share it with `Arc` where several
//! sessions need it.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, warn};

use crate::error::{ConsoleError, Result};

/// A closable transport endpoint owned by a session.
pub trait Channel: Send + Sync {
    fn close(&self) -> io::Result<()>;
}

/// One connected user.
pub struct Session {
    id: String,
    server: Box<dyn Channel>,
    shell: Mutex<Option<Box<dyn Channel>>>,
    proxy: Mutex<Option<Box<dyn Channel>>>,
}

impl Session {
    fn new(id: String, server: Box<dyn Channel>) -> Self {
        Self {
            id,
            server,
            shell: Mutex::new(None),
            proxy: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the channel the user's input is currently forwarded to,
    /// returning the one it replaces.
    pub fn attach_shell(&self, shell: Box<dyn Channel>) -> Option<Box<dyn Channel>> {
        let mut slot = self.shell.lock().unwrap_or_else(PoisonError::into_inner);
        slot.replace(shell)
    }

    /// Sets the proxy connection, returning the one it replaces.
    pub fn attach_proxy(&self, proxy: Box<dyn Channel>) -> Option<Box<dyn Channel>> {
        let mut slot = self.proxy.lock().unwrap_or_else(PoisonError::into_inner);
        slot.replace(proxy)
    }

    pub fn has_shell(&self) -> bool {
        self.shell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn has_proxy(&self) -> bool {
        self.proxy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Closes the proxy, then the server connection, then the shell.
    /// Failures are logged and do not stop the remaining closes.
    fn close(&self) {
        if let Some(proxy) = self
            .proxy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            log_close(&self.id, "proxy", proxy.close());
        }

        log_close(&self.id, "server", self.server.close());

        if let Some(shell) = self
            .shell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            log_close(&self.id, "shell", shell.close());
        }
    }
}

fn log_close(id: &str, channel: &str, result: io::Result<()>) {
    if let Err(err) = result {
        warn!(session = id, channel, error = %err, "Failed to close channel");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("shell", &self.has_shell())
            .field("proxy", &self.has_proxy())
            .finish()
    }
}

/// Sessions by id.
///
/// Adds and removes take the write lock; lookups share the read lock.
///
/// # Examples
///
/// ```
/// use std::io;
/// use termline_console::{Channel, SessionRegistry};
///
/// struct Loopback;
///
/// impl Channel for Loopback {
///     fn close(&self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let registry = SessionRegistry::new();
/// registry.add("alice", Box::new(Loopback)).unwrap();
/// assert!(registry.get("alice").is_some());
///
/// registry.remove("alice");
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session for `id` over `server`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::DuplicateSession`] if `id` is taken.
    pub fn add(&self, id: impl Into<String>, server: Box<dyn Channel>) -> Result<Arc<Session>> {
        let id = id.into();
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if sessions.contains_key(&id) {
            return Err(ConsoleError::DuplicateSession(id));
        }

        let session = Arc::new(Session::new(id.clone(), server));
        sessions.insert(id.clone(), Arc::clone(&session));
        info!(session = %id, total = sessions.len(), "Session registered");
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Unregisters `id` and closes every channel it owns. Returns the removed
    /// session, or `None` if it was not registered.
    pub fn remove(&self, id: &str) -> Option<Arc<Session>> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)?;

        removed.close();
        info!(session = id, "Session removed");
        Some(removed)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
