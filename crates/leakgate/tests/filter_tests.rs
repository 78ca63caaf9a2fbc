//! Integration tests for filter configuration persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use leakgate::prelude::*;

fn temp_path(tag: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("leakgate-filter-it-{tag}-{}-{n}.json", std::process::id()))
}

#[test]
fn toggled_state_survives_a_reload() {
    let registry = PatternRegistry::builtin();
    let path = temp_path("reload");

    let store = FilterStore::with_defaults(&path, &registry);
    assert_eq!(
        store.toggle("github_token"),
        Toggle::Switched {
            enabled: false,
            persisted: true
        }
    );
    drop(store);

    let reopened = FilterStore::open(&path, &registry);
    let config = reopened.snapshot();
    assert!(!config.is_enabled("github_token"));
    assert!(config.is_enabled("openai_key"));

    fs::remove_file(&path).ok();
}

#[test]
fn legacy_keys_are_reconciled_away_on_load() {
    let registry = PatternRegistry::builtin();
    let path = temp_path("legacy");

    // A file written by an older build: one retired detector, one
    // current detector disabled, the rest missing.
    let mut legacy = BTreeMap::new();
    legacy.insert("telnet_password", false);
    legacy.insert("email", false);
    fs::write(&path, serde_json::to_string(&legacy).expect("serializable")).expect("fixture");

    let store = FilterStore::open(&path, &registry);
    let config = store.snapshot();

    assert_eq!(config.get("telnet_password"), None);
    assert_eq!(config.get("email"), Some(false));
    // Detectors the old file never knew about default to enabled.
    assert_eq!(config.get("generic_secret"), Some(true));

    fs::remove_file(&path).ok();
}

#[test]
fn unknown_toggle_reports_not_found_and_writes_nothing() {
    let registry = PatternRegistry::builtin();
    let path = temp_path("unknown");
    let store = FilterStore::with_defaults(&path, &registry);

    assert_eq!(store.toggle("not_a_real_filter"), Toggle::Unknown);
    assert!(!path.exists());
}

#[test]
fn save_writes_every_detector_flag() {
    let registry = PatternRegistry::builtin();
    let path = temp_path("save");
    let store = FilterStore::with_defaults(&path, &registry);

    store.save().expect("save succeeds");
    let on_disk: BTreeMap<String, bool> =
        serde_json::from_str(&fs::read_to_string(&path).expect("file written"))
            .expect("valid json");
    assert_eq!(on_disk.len(), registry.detector_names().count());

    fs::remove_file(&path).ok();
}
