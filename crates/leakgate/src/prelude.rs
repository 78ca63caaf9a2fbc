//! Convenient re-exports for common usage.
//!
//! ```rust
//! use leakgate::prelude::*;
//! ```

pub use crate::blocklist::Blocklist;
pub use crate::contextual::{
    ContextualDetector, EntityCategory, EntitySpan, NoopDetector, PatternEntityDetector,
};
pub use crate::engine::{REDACTION_MARKER, Redaction, Sanitizer};
pub use crate::error::{FirewallError, Result};
pub use crate::filters::{FilterConfig, FilterStore, Toggle};
pub use crate::gateway::{Exchange, Gateway};
pub use crate::registry::PatternRegistry;
pub use crate::relay::BackendRelay;
pub use crate::session::{Conversation, Message, Role};
