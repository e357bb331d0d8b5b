//! Integration tests for pagination and page sessions.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use docsect::source::RunStreamBuilder;
use docsect::{
    extract_section, paginate, Error, JsonFileStore, Navigation, PaginatedText, SessionKey,
    SessionOptions, SessionRegistry, SessionStore,
};
use tempfile::TempDir;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 18, 30, 0).unwrap() + chrono::Duration::seconds(secs)
}

#[test]
fn test_pages_reconstruct_text() {
    let text = "Lorem ipsum dolor sit amet, \u{e9}l\u{e8}ve \u{1F600}\n".repeat(120);
    let pages = paginate(&text, 1000).unwrap();

    assert_eq!(pages.concat(), text);
    assert_eq!(pages.len(), text.chars().count().div_ceil(1000));
    for page in &pages[..pages.len() - 1] {
        assert_eq!(page.chars().count(), 1000);
    }
}

#[test]
fn test_three_page_session_bounds() {
    let registry = SessionRegistry::new(SessionOptions::new().with_page_size(4));
    let view = registry.open("alice", "Movement", "aaaabbbbcc", at(0)).unwrap();
    assert_eq!(view.page_count, 3);
    assert_eq!(view.footer, "Page 1/3");

    let id = view.session;
    let view = registry.navigate(id, Navigation::Retreat, at(1)).unwrap();
    assert_eq!(view.index, 0);

    registry.navigate(id, Navigation::Advance, at(2)).unwrap();
    registry.navigate(id, Navigation::Advance, at(3)).unwrap();
    let view = registry.navigate(id, Navigation::Advance, at(4)).unwrap();
    assert_eq!(view.index, 2);
    assert_eq!(view.text, "cc");
    assert_eq!(view.footer, "Page 3/3");
}

#[test]
fn test_short_result_has_single_page() {
    let registry = SessionRegistry::default();
    let view = registry.open("alice", "Aura", "Short text.", at(0)).unwrap();
    assert!(!view.is_multi_page());
    assert_eq!(view.footer, "Page 1/1");
}

#[test]
fn test_page_out_of_range() {
    let pages = PaginatedText::new("abcdef", 4).unwrap();
    assert!(matches!(pages.page(2), Err(Error::PageOutOfRange(2, 2))));
}

#[test]
fn test_session_resumes_from_file_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sessions.json");
    let options = SessionOptions::new().with_page_size(4);

    {
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let registry = SessionRegistry::new(options.clone()).with_store(store);
        let view = registry.open("alice", "Movement", "aaaabbbbcc", at(0)).unwrap();
        registry.navigate(view.session, Navigation::Advance, at(1)).unwrap();
    }

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let key = SessionKey::new("alice", "Movement", at(0)).storage_key();
    assert_eq!(store.get(&key).unwrap(), Some(1));

    let registry = SessionRegistry::new(options).with_store(store);
    let view = registry.open("alice", "Movement", "aaaabbbbcc", at(0)).unwrap();
    assert_eq!(view.index, 1);
    assert_eq!(view.text, "bbbb");

    // Another user asking the same thing starts fresh
    let view = registry.open("bob", "Movement", "aaaabbbbcc", at(0)).unwrap();
    assert_eq!(view.index, 0);
}

#[test]
fn test_stored_cursor_is_clamped() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::open(dir.path().join("s.json")).unwrap());
    let key = SessionKey::new("alice", "Charge", at(0)).storage_key();
    store.put(&key, 7).unwrap();

    let registry = SessionRegistry::new(SessionOptions::new().with_page_size(4)).with_store(store);
    let view = registry.open("alice", "Charge", "aaaabb", at(0)).unwrap();
    assert_eq!(view.index, 1);
}

#[test]
fn test_idle_sessions_expire() {
    let registry = SessionRegistry::new(
        SessionOptions::new()
            .with_page_size(4)
            .with_idle_timeout(Duration::from_secs(30)),
    );
    let view = registry.open("alice", "Movement", "aaaabbbb", at(0)).unwrap();

    assert!(registry.expire_idle(at(20)).is_empty());
    assert_eq!(registry.expire_idle(at(31)), vec![view.session]);
    assert!(matches!(
        registry.navigate(view.session, Navigation::Advance, at(32)),
        Err(Error::SessionNotFound(_))
    ));
}

#[test]
fn test_section_to_pages() {
    let mut builder = RunStreamBuilder::new().line("Movement", 30.0, "Arial");
    for i in 0..100 {
        builder = builder.line(
            &format!("Rule line number {:03} with some words.", i),
            11.0,
            "Times",
        );
    }
    let runs = builder.build();

    let section = extract_section(&runs, "Movement", 30, 14, "Arial").unwrap();
    let registry = SessionRegistry::default();
    let view = registry.open("alice", "Movement", &section.body, at(0)).unwrap();

    let pages = PaginatedText::with_default_size(&section.body);
    assert_eq!(view.page_count, pages.page_count());
    assert!(view.is_multi_page());
    assert_eq!(pages.text(), section.body);
}
