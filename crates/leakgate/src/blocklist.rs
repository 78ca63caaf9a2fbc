//! User-supplied literal blocklist.
//!
//! The blocklist is the one runtime-extensible layer of the pipeline: a
//! plain-text file, one literal term per line, compiled into a single
//! case-insensitive alternation. Absence is a valid state; every load
//! failure degrades to "no matcher".

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use tracing::{info, warn};

/// Label substituted for every blocklist match.
pub const CUSTOM_LABEL: &str = "[REDACTED: CUSTOM]";

/// A compiled matcher over user-supplied literal terms.
#[derive(Debug, Clone)]
pub struct Blocklist {
    matcher: Regex,
    term_count: usize,
}

impl Blocklist {
    /// Load terms from a newline-delimited file.
    ///
    /// Lines are trimmed and empty lines discarded. Returns `None` when
    /// the file is absent, unreadable, or yields zero terms.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable blocklist file, custom layer disabled");
                return None;
            }
        };

        let blocklist = Self::from_terms(raw.lines());
        if let Some(ref b) = blocklist {
            info!(path = %path.display(), terms = b.term_count, "custom blocklist loaded");
        }
        blocklist
    }

    /// Compile a matcher from an iterator of literal terms.
    ///
    /// Rebuildable on demand; test harnesses use this to reload terms
    /// without touching the filesystem.
    #[must_use]
    pub fn from_terms<I, S>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let escaped: Vec<String> = terms
            .into_iter()
            .filter_map(|t| {
                let t = t.as_ref().trim();
                (!t.is_empty()).then(|| regex::escape(t))
            })
            .collect();

        if escaped.is_empty() {
            return None;
        }

        match RegexBuilder::new(&escaped.join("|"))
            .case_insensitive(true)
            .build()
        {
            Ok(matcher) => Some(Self {
                matcher,
                term_count: escaped.len(),
            }),
            Err(err) => {
                warn!(%err, "blocklist compilation failed, custom layer disabled");
                None
            }
        }
    }

    /// Number of terms in the matcher.
    #[must_use]
    pub const fn term_count(&self) -> usize {
        self.term_count
    }

    /// Replace every occurrence of a listed term.
    #[must_use]
    pub fn redact<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.matcher.replace_all(text, CUSTOM_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_case_insensitive() {
        let blocklist = Blocklist::from_terms(["SecretProjectX"]).expect("one term");
        let redacted = blocklist.redact("I work on secretprojectx daily");
        assert!(redacted.contains(CUSTOM_LABEL));
        assert!(!redacted.to_lowercase().contains("secretprojectx"));
    }

    #[test]
    fn terms_are_escaped_literals() {
        let blocklist = Blocklist::from_terms(["a.b (c)"]).expect("one term");
        assert!(blocklist.redact("say a.b (c) now").contains(CUSTOM_LABEL));
        // The dot must not act as a wildcard.
        assert_eq!(blocklist.redact("say aXb (c) now"), "say aXb (c) now");
    }

    #[test]
    fn blank_lines_are_discarded() {
        let blocklist = Blocklist::from_terms(["  alpha  ", "", "   ", "beta"]).expect("two terms");
        assert_eq!(blocklist.term_count(), 2);
    }

    #[test]
    fn empty_term_set_yields_no_matcher() {
        assert!(Blocklist::from_terms(["", "  "]).is_none());
        assert!(Blocklist::from_terms(Vec::<String>::new()).is_none());
    }

    #[test]
    fn missing_file_yields_no_matcher() {
        assert!(Blocklist::load("/no/such/blocklist.txt").is_none());
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "leakgate-blocklist-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "alpha\n\nbeta\n").expect("write fixture");

        let blocklist = Blocklist::load(&path).expect("two terms");
        assert_eq!(blocklist.term_count(), 2);
        assert!(blocklist.redact("ALPHA beta").contains(CUSTOM_LABEL));

        std::fs::remove_file(&path).ok();
    }
}
