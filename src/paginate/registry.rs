//! Live session registry.
//!
//! Owns every open [`PaginationSession`] behind its own lock. A navigation
//! event is applied and persisted while that lock is held, so rapid repeated
//! input on one session serializes instead of losing updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{
    Navigation, PaginatedText, PaginationSession, SessionId, SessionKey, SessionStore,
    DEFAULT_PAGE_SIZE,
};

/// Default idle time after which a session is discarded.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Options for pagination sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Page size in characters
    pub page_size: usize,

    /// Idle time before a session expires
    pub idle_timeout: Duration,
}

impl SessionOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// What a display layer needs to render one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    /// Session handle for follow-up navigation
    pub session: SessionId,

    /// 0-based page index
    pub index: usize,

    /// Total number of pages
    pub page_count: usize,

    /// Page text
    pub text: String,

    /// Footer, e.g. "Page 1/3"
    pub footer: String,
}

impl PageView {
    fn of(session: &PaginationSession) -> Self {
        Self {
            session: session.id(),
            index: session.cursor(),
            page_count: session.page_count(),
            text: session.current_page().unwrap_or_default().to_string(),
            footer: session.footer(),
        }
    }

    /// Check if navigation controls are worth showing.
    pub fn is_multi_page(&self) -> bool {
        self.page_count > 1
    }
}

type SessionHandle = Arc<Mutex<PaginationSession>>;

/// Registry of open pagination sessions.
pub struct SessionRegistry {
    options: SessionOptions,
    store: Option<Arc<dyn SessionStore>>,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    /// Create a registry without persistence.
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            store: None,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Persist cursors through a store.
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Registry options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Paginate `text` and open a session on it.
    ///
    /// If the store already holds a cursor for this `(user, query, created_at)`
    /// key, the session resumes there.
    pub fn open(
        &self,
        user: &str,
        query: &str,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<PageView> {
        let pages = PaginatedText::new(text, self.options.page_size)?;
        let key = SessionKey::new(user, query, created_at);
        let mut session = PaginationSession::new(key, pages);

        if let Some(store) = &self.store {
            let storage_key = session.key().storage_key();
            match store.get(&storage_key) {
                Ok(Some(page)) => {
                    log::debug!("Resuming session {} at page {}", storage_key, page);
                    session.seek(page);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Failed to read session {}: {}", storage_key, e),
            }
        }

        let view = PageView::of(&session);
        let id = session.id();
        self.sessions
            .write()
            .map_err(|_| poisoned())?
            .insert(id, Arc::new(Mutex::new(session)));
        log::debug!("Opened session {} ({} pages)", id, view.page_count);
        Ok(view)
    }

    /// Apply a navigation event to a session.
    ///
    /// Store failures are logged; navigation still succeeds in memory.
    pub fn navigate(
        &self,
        id: SessionId,
        navigation: Navigation,
        now: DateTime<Utc>,
    ) -> Result<PageView> {
        let handle = self.handle(id)?;
        let mut session = handle.lock().map_err(|_| poisoned())?;

        session.touch(now);
        if session.apply(navigation) {
            self.persist(&session);
        }
        Ok(PageView::of(&session))
    }

    /// Record activity on a session without moving it.
    pub fn touch(&self, id: SessionId, now: DateTime<Utc>) -> Result<()> {
        let handle = self.handle(id)?;
        handle.lock().map_err(|_| poisoned())?.touch(now);
        Ok(())
    }

    /// Current page of a session.
    pub fn current(&self, id: SessionId) -> Result<PageView> {
        let handle = self.handle(id)?;
        let session = handle.lock().map_err(|_| poisoned())?;
        Ok(PageView::of(&session))
    }

    /// Close a session. Returns `false` if it was not open.
    ///
    /// The stored cursor is kept, so reopening the same interaction resumes
    /// where it stopped. Idle expiry forgets it instead.
    pub fn close(&self, id: SessionId) -> bool {
        match self.sessions.write() {
            Ok(mut sessions) => sessions.remove(&id).is_some(),
            Err(_) => false,
        }
    }

    /// Discard sessions idle past the timeout and forget their stored
    /// cursors. Returns the expired handles.
    ///
    /// Session locks are never taken while the registry is write-locked. A
    /// session that is busy at either check is left alone.
    pub fn expire_idle(&self, now: DateTime<Utc>) -> Vec<SessionId> {
        let timeout = self.options.idle_timeout;
        let snapshot: Vec<(SessionId, SessionHandle)> = match self.sessions.read() {
            Ok(sessions) => sessions
                .iter()
                .map(|(id, handle)| (*id, Arc::clone(handle)))
                .collect(),
            Err(_) => return Vec::new(),
        };

        let candidates: Vec<SessionId> = snapshot
            .iter()
            .filter(|(_, handle)| is_expired(handle, now, timeout).is_some())
            .map(|(id, _)| *id)
            .collect();
        drop(snapshot);
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut expired = Vec::new();
        let mut stale_keys = Vec::new();
        {
            let Ok(mut sessions) = self.sessions.write() else {
                return Vec::new();
            };
            for id in candidates {
                // Activity since the first check keeps the session
                let Some(storage_key) = sessions
                    .get(&id)
                    .and_then(|handle| is_expired(handle, now, timeout))
                else {
                    continue;
                };
                sessions.remove(&id);
                expired.push(id);
                stale_keys.extend(storage_key);
            }
        }

        if let Some(store) = &self.store {
            for key in &stale_keys {
                if let Err(e) = store.remove(key) {
                    log::warn!("Failed to forget session {}: {}", key, e);
                }
            }
        }
        if !expired.is_empty() {
            log::debug!("Expired {} idle sessions", expired.len());
        }
        expired
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or_default()
    }

    /// Check if no sessions are open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, id: SessionId) -> Result<SessionHandle> {
        self.sessions
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned()
            .ok_or(Error::SessionNotFound(id))
    }

    fn persist(&self, session: &PaginationSession) {
        let Some(store) = &self.store else {
            return;
        };
        let key = session.key().storage_key();
        if let Err(e) = store.put(&key, session.cursor()) {
            log::warn!("Failed to persist session {}: {}", key, e);
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

fn poisoned() -> Error {
    Error::Other("session registry lock poisoned".to_string())
}

/// `Some` if the session should expire, carrying its storage key when it is
/// still readable. Never blocks on a busy session.
fn is_expired(
    handle: &SessionHandle,
    now: DateTime<Utc>,
    timeout: Duration,
) -> Option<Option<String>> {
    match handle.try_lock() {
        Ok(session) if session.is_idle(now, timeout) => Some(Some(session.key().storage_key())),
        Ok(_) | Err(TryLockError::WouldBlock) => None,
        Err(TryLockError::Poisoned(_)) => Some(None),
    }
}
