//! End-to-end tests for the guarded exchange flow.
//!
//! The two external collaborators are stubbed through their public
//! traits, so these tests cover everything the firewall owns: both
//! sanitization directions, history hygiene, and failure handling.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use leakgate::prelude::*;

/// Scripted relay that records every history it is handed.
struct CannedRelay {
    replies: Mutex<Vec<String>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl CannedRelay {
    fn new<const N: usize>(replies: [&str; N]) -> (Self, Arc<Mutex<Vec<Vec<Message>>>>) {
        let mut replies: Vec<String> = replies.iter().map(ToString::to_string).collect();
        replies.reverse();
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                replies: Mutex::new(replies),
                seen: Arc::clone(&seen),
            },
            seen,
        )
    }
}

impl BackendRelay for CannedRelay {
    async fn complete(&self, _system_prompt: &str, history: &[Message]) -> Result<String> {
        self.seen.lock().expect("test lock").push(history.to_vec());
        self.replies
            .lock()
            .expect("test lock")
            .pop()
            .ok_or_else(|| FirewallError::Relay("no scripted reply left".to_string()))
    }
}

/// Recognizes the literal "Ada Lovelace" as a person.
struct NameStub;

impl ContextualDetector for NameStub {
    fn detect(&self, text: &str, categories: &[EntityCategory]) -> Result<Vec<EntitySpan>> {
        if !categories.contains(&EntityCategory::Person) {
            return Ok(Vec::new());
        }
        Ok(text
            .match_indices("Ada Lovelace")
            .map(|(start, found)| {
                EntitySpan::new(start, start + found.len(), EntityCategory::Person)
            })
            .collect())
    }
}

fn temp_path(tag: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("leakgate-gw-it-{tag}-{}-{n}.json", std::process::id()))
}

fn guarded(relay: CannedRelay, tag: &str) -> (Gateway<CannedRelay>, Arc<FilterStore>) {
    let registry = PatternRegistry::builtin();
    let filters = Arc::new(FilterStore::with_defaults(temp_path(tag), &registry));
    let sanitizer = Sanitizer::new(Box::new(NameStub))
        .with_blocklist(Blocklist::from_terms(["project nightfall"]));
    let gateway = Gateway::new(sanitizer, Arc::clone(&filters), relay, "You are terse.");
    (gateway, filters)
}

#[tokio::test]
async fn both_directions_are_sanitized() {
    let (relay, _) =
        CannedRelay::new(["Ada Lovelace also mentioned sk-1234567890abcdef1234567890abcdef"]);
    let (mut gateway, _) = guarded(relay, "both");

    let exchange = gateway
        .send("tell me about Ada Lovelace and Project Nightfall")
        .await
        .expect("exchange succeeds");

    assert!(exchange.inbound_redacted);
    assert!(exchange.outbound_redacted);
    assert!(exchange.reply.contains("[REDACTED: PII]"));
    assert!(exchange.reply.contains("[REDACTED: OPENAI_KEY]"));

    for message in gateway.conversation().snapshot() {
        assert!(!message.content.contains("Ada Lovelace"));
        assert!(!message.content.contains("sk-"));
        assert!(!message.content.to_lowercase().contains("project nightfall"));
    }
}

#[tokio::test]
async fn relay_receives_only_sanitized_history() {
    let (relay, seen) = CannedRelay::new(["noted", "noted again"]);
    let (mut gateway, _) = guarded(relay, "history");

    gateway
        .send("the lead is Ada Lovelace")
        .await
        .expect("first exchange");
    gateway
        .send("and the codename is project nightfall")
        .await
        .expect("second exchange");

    let seen = seen.lock().expect("test lock");
    // Second call carries the full, still-sanitized history.
    let last = seen.last().expect("relay was called");
    assert_eq!(last.len(), 3);
    assert!(last.iter().all(|m| !m.content.contains("Ada Lovelace")));
    assert!(
        last.iter()
            .all(|m| !m.content.to_lowercase().contains("project nightfall"))
    );
}

#[tokio::test]
async fn toggling_person_off_lets_names_through() {
    let (relay, _) = CannedRelay::new(["ok"]);
    let (mut gateway, filters) = guarded(relay, "toggle");

    assert!(matches!(
        filters.toggle("person"),
        Toggle::Switched { enabled: false, .. }
    ));

    let exchange = gateway
        .send("tell me about Ada Lovelace")
        .await
        .expect("exchange succeeds");
    assert!(!exchange.inbound_redacted);

    let history = gateway.conversation().snapshot();
    assert!(history[0].content.contains("Ada Lovelace"));
}

#[tokio::test]
async fn empty_reply_is_an_error_without_an_appended_reply() {
    let (relay, _) = CannedRelay::new(["   "]);
    let (mut gateway, _) = guarded(relay, "empty-reply");

    assert!(matches!(
        gateway.send("hello").await,
        Err(FirewallError::EmptyReply)
    ));
    assert_eq!(gateway.conversation().len(), 1);
}

#[tokio::test]
async fn exhausted_relay_surfaces_an_opaque_error() {
    let (relay, _) = CannedRelay::new([]);
    let (mut gateway, _) = guarded(relay, "down");

    let err = gateway.send("hello").await.expect_err("relay is down");
    assert!(matches!(err, FirewallError::Relay(_)));

    // The sanitized user message stays; no reply was appended.
    assert_eq!(gateway.conversation().len(), 1);
    assert_eq!(gateway.conversation().snapshot()[0].role, Role::User);
}

#[tokio::test]
async fn clear_preserves_the_system_prompt() {
    let (relay, _) = CannedRelay::new(["hi"]);
    let (mut gateway, _) = guarded(relay, "clear");

    gateway.send("hello").await.expect("exchange succeeds");
    gateway.clear();

    assert!(gateway.conversation().is_empty());
    assert_eq!(gateway.conversation().system_prompt(), "You are terse.");
}
