//! Contextual entity detection seam.
//!
//! Contextual entities (names, locations, financial identifiers) are
//! recognized by meaning rather than rigid syntax, so the recognizer is
//! pluggable: the engine depends only on the [`ContextualDetector`]
//! trait. The built-in [`PatternEntityDetector`] covers the common
//! categories with regex heuristics; an NLP-model-backed recognizer can
//! be swapped in through the same trait.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::Result;

/// A category of contextual sensitive data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    /// Email address.
    Email,
    /// Phone number.
    PhoneNumber,
    /// IP address.
    IpAddress,
    /// Credit card or similar financial identifier.
    CreditCard,
    /// Cryptocurrency wallet address.
    CryptoWallet,
    /// Person name.
    Person,
    /// Location (street address, city).
    Location,
    /// Medical license number.
    MedicalLicense,
}

impl EntityCategory {
    /// Every category, in the stable order used for configuration listings.
    pub const ALL: [Self; 8] = [
        Self::Email,
        Self::PhoneNumber,
        Self::IpAddress,
        Self::CreditCard,
        Self::CryptoWallet,
        Self::Person,
        Self::Location,
        Self::MedicalLicense,
    ];

    /// The detector name under which this category appears in the
    /// filter configuration.
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::IpAddress => "ip_address",
            Self::CreditCard => "credit_card",
            Self::CryptoWallet => "crypto_wallet",
            Self::Person => "person",
            Self::Location => "location",
            Self::MedicalLicense => "medical_license",
        }
    }

    /// Resolve a configuration name back to its category.
    #[must_use]
    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.config_name() == name)
    }
}

/// A span of text recognized as a contextual entity.
///
/// Positions are byte offsets into the analyzed text. Implementations
/// must return non-overlapping spans; the engine applies them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// The category that matched.
    pub category: EntityCategory,
}

impl EntitySpan {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, category: EntityCategory) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A contextual entity recognizer.
///
/// `detect` receives the set of enabled categories and returns the
/// spans to redact. A failure is reported as an error value; the
/// sanitization pipeline swallows it and continues with its remaining
/// layers, so implementations need not be defensive about panics in
/// their own dependencies.
pub trait ContextualDetector: Send + Sync {
    /// Detect entity spans in `text`, restricted to `categories`.
    fn detect(&self, text: &str, categories: &[EntityCategory]) -> Result<Vec<EntitySpan>>;
}

/// A detector that never reports anything.
///
/// Useful when no contextual backend is available; the technical-secret
/// and blocklist layers still run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDetector;

impl ContextualDetector for NoopDetector {
    fn detect(&self, _text: &str, _categories: &[EntityCategory]) -> Result<Vec<EntitySpan>> {
        Ok(Vec::new())
    }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is a valid regex")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\+?\d{1,3}[-. ]?)?(?:\(\d{3}\)|\d{3})[-. ]?\d{3}[-. ]?\d{4}\b")
        .expect("phone pattern is a valid regex")
});

static IP_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b")
        .expect("IP address pattern is a valid regex")
});

// Any 13-16 digit grouping is a card candidate, checksum-valid or not.
static CREDIT_CARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{4}[- ]?){3}\d{1,4}\b").expect("credit card pattern is a valid regex")
});

// Base58 body excludes 0, O, I, and l; keeping the class strict stops
// hex blobs and prefixed API keys from being mistaken for wallets.
static CRYPTO_WALLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:bc1|[13])[a-km-zA-HJ-NP-Z1-9]{25,39}\b|\b0x[a-fA-F0-9]{40}\b")
        .expect("crypto wallet pattern is a valid regex")
});

static PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?i:my name is|i am|i'm|call me))\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)")
        .expect("person pattern is a valid regex")
});

static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,5}\s+(?:[A-Za-z]+\s+){1,3}(?:St(?:reet)?|Ave(?:nue)?|Blvd|Boulevard|Dr(?:ive)?|Ln|Lane|Rd|Road|Way|Ct|Court|Pl(?:ace)?|Cir(?:cle)?)\b",
    )
    .expect("location pattern is a valid regex")
});

static MEDICAL_LICENSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{2}\d{7}\b").expect("medical license pattern is a valid regex")
});

/// Pattern-based contextual entity recognizer.
///
/// Regex heuristics per category, with overlap resolution so the
/// returned spans satisfy the [`ContextualDetector`] contract. Detection
/// leans toward over-reporting: a plausible candidate is preferred over
/// a missed leak.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternEntityDetector;

impl PatternEntityDetector {
    /// Create a new detector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn detect_category(text: &str, category: EntityCategory, spans: &mut Vec<EntitySpan>) {
        match category {
            EntityCategory::Person => {
                // Only the captured name is the entity, not the lead-in phrase.
                for cap in PERSON.captures_iter(text) {
                    if let Some(name) = cap.get(1) {
                        spans.push(EntitySpan::new(name.start(), name.end(), category));
                    }
                }
            }
            _ => {
                let pattern: &Regex = match category {
                    EntityCategory::Email => &EMAIL,
                    EntityCategory::PhoneNumber => &PHONE,
                    EntityCategory::IpAddress => &IP_ADDRESS,
                    EntityCategory::CreditCard => &CREDIT_CARD,
                    EntityCategory::CryptoWallet => &CRYPTO_WALLET,
                    EntityCategory::Location => &LOCATION,
                    EntityCategory::MedicalLicense => &MEDICAL_LICENSE,
                    EntityCategory::Person => unreachable!("handled above"),
                };
                for m in pattern.find_iter(text) {
                    spans.push(EntitySpan::new(m.start(), m.end(), category));
                }
            }
        }
    }

    /// Drop overlapping spans, keeping the earlier (and on ties, longer) one.
    fn resolve_overlaps(mut spans: Vec<EntitySpan>) -> Vec<EntitySpan> {
        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut resolved: Vec<EntitySpan> = Vec::with_capacity(spans.len());
        for span in spans {
            let overlaps = resolved
                .last()
                .is_some_and(|prev| span.start < prev.end);
            if !overlaps {
                resolved.push(span);
            }
        }
        resolved
    }
}

impl ContextualDetector for PatternEntityDetector {
    fn detect(&self, text: &str, categories: &[EntityCategory]) -> Result<Vec<EntitySpan>> {
        let mut spans = Vec::new();
        for category in categories {
            Self::detect_category(text, *category, &mut spans);
        }
        Ok(Self::resolve_overlaps(spans))
    }
}
