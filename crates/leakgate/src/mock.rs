//! Scripted collaborator doubles for testing.
//!
//! These stand in for the two external collaborators — the model
//! backend and the contextual recognizer — so firewall behavior can be
//! exercised deterministically, without a network or an NLP model.
//!
//! # Example
//!
//! ```rust
//! use leakgate::mock::ScriptedRelay;
//!
//! let relay = ScriptedRelay::new(["first reply", "second reply"]);
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::contextual::{ContextualDetector, EntityCategory, EntitySpan};
use crate::error::{FirewallError, Result};
use crate::relay::BackendRelay;
use crate::session::Message;

/// A relay that replays a fixed script of replies.
///
/// Each `complete` call pops the next reply and records the history it
/// was handed, so tests can assert on exactly what would have crossed
/// the wire.
#[derive(Debug, Default)]
pub struct ScriptedRelay {
    replies: Mutex<VecDeque<String>>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedRelay {
    /// Create a relay with the given reply script.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Queue another reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies
            .lock()
            .expect("scripted relay lock")
            .push_back(reply.into());
    }

    /// The histories observed by each `complete` call, in order.
    #[must_use]
    pub fn observed_histories(&self) -> Vec<Vec<Message>> {
        self.seen.lock().expect("scripted relay lock").clone()
    }
}

impl BackendRelay for ScriptedRelay {
    async fn complete(&self, _system_prompt: &str, history: &[Message]) -> Result<String> {
        self.seen
            .lock()
            .expect("scripted relay lock")
            .push(history.to_vec());
        self.replies
            .lock()
            .expect("scripted relay lock")
            .pop_front()
            .ok_or_else(|| FirewallError::Relay("scripted relay exhausted".to_string()))
    }
}

/// A relay that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingRelay(pub String);

impl BackendRelay for FailingRelay {
    async fn complete(&self, _: &str, _: &[Message]) -> Result<String> {
        Err(FirewallError::Relay(self.0.clone()))
    }
}

/// A detector that reports every occurrence of scripted literal terms.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    entities: Vec<(String, EntityCategory)>,
}

impl ScriptedDetector {
    /// Create a detector that recognizes the given (literal, category)
    /// pairs.
    pub fn new<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = (S, EntityCategory)>,
        S: Into<String>,
    {
        Self {
            entities: entities
                .into_iter()
                .map(|(term, category)| (term.into(), category))
                .collect(),
        }
    }
}

impl ContextualDetector for ScriptedDetector {
    fn detect(&self, text: &str, categories: &[EntityCategory]) -> Result<Vec<EntitySpan>> {
        let mut spans: Vec<EntitySpan> = Vec::new();
        for (term, category) in &self.entities {
            if !categories.contains(category) {
                continue;
            }
            for (start, found) in text.match_indices(term.as_str()) {
                spans.push(EntitySpan::new(start, start + found.len(), *category));
            }
        }

        // Keep the earlier span on overlap, as a real recognizer would.
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        let mut resolved: Vec<EntitySpan> = Vec::with_capacity(spans.len());
        for span in spans {
            if resolved.last().is_none_or(|prev| span.start >= prev.end) {
                resolved.push(span);
            }
        }
        Ok(resolved)
    }
}

/// A detector that always fails, for exercising the swallow rule.
#[derive(Debug, Clone)]
pub struct FailingDetector(pub String);

impl ContextualDetector for FailingDetector {
    fn detect(&self, _: &str, _: &[EntityCategory]) -> Result<Vec<EntitySpan>> {
        Err(FirewallError::Detector(self.0.clone()))
    }
}
