//! leakgate: bidirectional content-redaction firewall for LLM chat
//!
//! This crate sits between a human user and a conversational model
//! backend: every message leaving the user and every message returned
//! by the model passes through a layered sanitization pipeline that
//! masks secrets and personal data before the text is stored,
//! forwarded, or displayed.
//!
//! # Pipeline
//!
//! One sanitization pass applies three layers in a fixed order:
//!
//! 1. **Contextual entities** — a pluggable recognizer (names,
//!    locations, financial identifiers) behind the
//!    [`ContextualDetector`] trait, masked as `[REDACTED: PII]`
//! 2. **Technical secrets** — rigid lexical patterns (key prefixes,
//!    private-key headers, key-value shapes) from the
//!    [`PatternRegistry`], masked as `[REDACTED: <NAME>]`
//! 3. **Custom blocklist** — user-supplied literal terms, masked as
//!    `[REDACTED: CUSTOM]`
//!
//! Each detector can be toggled through the persisted [`FilterStore`].
//!
//! # Example
//!
//! ```rust
//! use leakgate::prelude::*;
//!
//! let registry = PatternRegistry::builtin();
//! let filters = FilterConfig::all_enabled(&registry);
//! let engine = Sanitizer::new(Box::new(PatternEntityDetector::new()));
//!
//! let result = engine.sanitize("my key is sk-1234567890abcdef1234567890abcdef", &filters);
//! assert!(result.was_redacted());
//! assert!(result.text().contains("[REDACTED: OPENAI_KEY]"));
//! ```

pub mod blocklist;
pub mod contextual;
pub mod engine;
pub mod error;
pub mod filters;
pub mod gateway;
pub mod prelude;
pub mod registry;
pub mod relay;
pub mod session;

/// Scripted collaborator doubles for testing.
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use blocklist::{Blocklist, CUSTOM_LABEL};
pub use contextual::{
    ContextualDetector, EntityCategory, EntitySpan, NoopDetector, PatternEntityDetector,
};
pub use engine::{PII_LABEL, REDACTION_MARKER, Redaction, Sanitizer};
pub use error::{FirewallError, Result};
pub use filters::{FilterConfig, FilterStore, Toggle};
pub use gateway::{Exchange, Gateway};
pub use registry::{PatternRegistry, SecretPattern};
pub use relay::BackendRelay;
pub use session::{Conversation, Message, Role};
