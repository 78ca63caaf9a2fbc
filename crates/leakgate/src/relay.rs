//! Backend relay seam.
//!
//! The conversational model backend is an external collaborator reached
//! through this one trait: a plain request/response exchange that takes
//! the full (sanitized) message history and returns the model's raw
//! reply. Transport, authentication, and retries are the
//! implementation's business; the core only sees an opaque error.

use crate::error::Result;
use crate::session::Message;

/// A conversational model backend.
pub trait BackendRelay: Send + Sync {
    /// Send the system prompt plus message history, returning the raw
    /// reply text.
    ///
    /// Failures surface as [`crate::FirewallError::Relay`] with an
    /// opaque message; the caller's conversation state is never touched
    /// by a failed exchange.
    fn complete(
        &self,
        system_prompt: &str,
        history: &[Message],
    ) -> impl Future<Output = Result<String>> + Send;
}
