//! Pagination sessions: a bounded cursor over paginated text.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use super::PaginatedText;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle a display layer uses to refer to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate a process-unique identifier.
    pub fn next() -> Self {
        SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SessionId {
    fn from(value: u64) -> Self {
        SessionId(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Hex MD5 fingerprint of a query string.
pub fn query_fingerprint(query: &str) -> String {
    format!("{:x}", Md5::digest(query.as_bytes()))
}

/// Durable identity of a session: who asked, what, and when.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    /// Requesting user
    pub user: String,

    /// Fingerprint of the query text
    pub fingerprint: String,

    /// When the interaction was created
    pub created_at: DateTime<Utc>,
}

impl SessionKey {
    /// Build a key, fingerprinting the query.
    pub fn new(user: impl Into<String>, query: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            user: user.into(),
            fingerprint: query_fingerprint(query),
            created_at,
        }
    }

    /// Flat string form used by session stores.
    pub fn storage_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.user,
            self.fingerprint,
            self.created_at.timestamp_millis()
        )
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// A navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Navigation {
    /// Move to the next page
    Advance,
    /// Move to the previous page
    Retreat,
}

/// Navigation cursor over one paginated result.
///
/// The cursor stays within `0..page_count` and never wraps.
#[derive(Debug, Clone)]
pub struct PaginationSession {
    id: SessionId,
    key: SessionKey,
    pages: PaginatedText,
    cursor: usize,
    last_active: DateTime<Utc>,
}

impl PaginationSession {
    /// Start a session on the first page.
    pub fn new(key: SessionKey, pages: PaginatedText) -> Self {
        let last_active = key.created_at;
        Self {
            id: SessionId::next(),
            key,
            pages,
            cursor: 0,
            last_active,
        }
    }

    /// Session handle.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Durable key.
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Paginated text being browsed.
    pub fn pages(&self) -> &PaginatedText {
        &self.pages
    }

    /// Current 0-based page index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    /// Check if navigation controls are worth showing.
    pub fn is_multi_page(&self) -> bool {
        self.page_count() > 1
    }

    /// Text of the current page, or `None` for empty text.
    pub fn current_page(&self) -> Option<&str> {
        self.pages.page(self.cursor).ok()
    }

    /// Move forward. Returns `false` on the last page.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.page_count() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move back. Returns `false` on the first page.
    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Apply a navigation event. Returns whether the cursor moved.
    pub fn apply(&mut self, navigation: Navigation) -> bool {
        match navigation {
            Navigation::Advance => self.advance(),
            Navigation::Retreat => self.retreat(),
        }
    }

    /// Jump to a page, clamped to the last page.
    pub fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.page_count().saturating_sub(1));
    }

    /// Footer text, e.g. `"Page 2/5"`.
    pub fn footer(&self) -> String {
        if self.pages.is_empty() {
            return "Page 0/0".to_string();
        }
        format!("Page {}/{}", self.cursor + 1, self.page_count())
    }

    /// Record activity.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_active {
            self.last_active = now;
        }
    }

    /// Time of the last recorded activity.
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Check whether the session has been idle longer than `timeout`.
    pub fn is_idle(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        match chrono::Duration::from_std(timeout) {
            Ok(timeout) => now.signed_duration_since(self.last_active) > timeout,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn session(text: &str, page_size: usize) -> PaginationSession {
        let key = SessionKey::new("user-1", "Movement", created());
        PaginationSession::new(key, PaginatedText::new(text, page_size).unwrap())
    }

    #[test]
    fn test_three_page_bounds() {
        let mut s = session("aaabbbccc", 3);
        assert_eq!(s.cursor(), 0);

        assert!(!s.retreat());
        assert_eq!(s.cursor(), 0);

        assert!(s.advance());
        assert!(s.advance());
        assert_eq!(s.cursor(), 2);
        assert!(!s.advance());
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.current_page(), Some("ccc"));
        assert_eq!(s.footer(), "Page 3/3");
    }

    #[test]
    fn test_apply_navigation() {
        let mut s = session("aaabbb", 3);
        assert!(s.apply(Navigation::Advance));
        assert_eq!(s.current_page(), Some("bbb"));
        assert!(s.apply(Navigation::Retreat));
        assert_eq!(s.footer(), "Page 1/2");
    }

    #[test]
    fn test_single_and_empty_sessions() {
        let mut s = session("short", 1000);
        assert!(!s.is_multi_page());
        assert!(!s.advance());

        let mut empty = session("", 1000);
        assert_eq!(empty.current_page(), None);
        assert!(!empty.advance());
        assert!(!empty.retreat());
        assert_eq!(empty.footer(), "Page 0/0");
    }

    #[test]
    fn test_seek_clamps() {
        let mut s = session("aaabbbccc", 3);
        s.seek(10);
        assert_eq!(s.cursor(), 2);
        s.seek(1);
        assert_eq!(s.cursor(), 1);

        let mut empty = session("", 3);
        empty.seek(4);
        assert_eq!(empty.cursor(), 0);
    }

    #[test]
    fn test_idle_detection() {
        let mut s = session("abc", 3);
        let timeout = Duration::from_secs(60);
        assert!(!s.is_idle(created() + chrono::Duration::seconds(59), timeout));
        assert!(s.is_idle(created() + chrono::Duration::seconds(61), timeout));

        s.touch(created() + chrono::Duration::seconds(50));
        assert!(!s.is_idle(created() + chrono::Duration::seconds(100), timeout));
    }

    #[test]
    fn test_storage_key() {
        let key = SessionKey::new("user-1", "Movement", created());
        assert_eq!(key.fingerprint, query_fingerprint("Movement"));
        assert_eq!(key.fingerprint.len(), 32);
        assert_eq!(
            key.storage_key(),
            format!("user-1:{}:{}", key.fingerprint, created().timestamp_millis())
        );
        assert_ne!(
            key.storage_key(),
            SessionKey::new("user-1", "Charge", created()).storage_key()
        );
    }

    #[test]
    fn test_query_fingerprint_known_value() {
        assert_eq!(query_fingerprint(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = session("abc", 3);
        let b = session("abc", 3);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().to_string().len(), 16);
    }
}
