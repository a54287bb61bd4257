//! Compiled regular expressions used across validation and sanitizing.

use std::sync::OnceLock;

use regex::Regex;

/// Discord snowflake: 17 to 19 digits.
pub const SNOWFLAKE: &str = r"^\d{17,19}$";
/// Calendar date, `YYYY-MM-DD`.
pub const DATE: &str = r"^\d{4}-\d{2}-\d{2}$";
/// LST timestamp: UTC with optional fraction and a literal `Z`.
pub const LST_TIMESTAMP: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z$";
/// Client offset, `UTC+2` / `UTC-11`.
pub const TIMEZONE_OFFSET: &str = r"^UTC([+-])(\d{1,2})$";

/// PII categories in application order, paired with their placeholder.
pub const PII: [(&str, &str); 5] = [
    (
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b",
        "[EMAIL_REDACTED]",
    ),
    (r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b", "[PHONE_REDACTED]"),
    (r"\b\d{3}-?\d{2}-?\d{4}\b", "[SSN_REDACTED]"),
    (
        r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
        "[CREDIT_CARD_REDACTED]",
    ),
    (r"\b(?:\d{1,3}\.){3}\d{1,3}\b", "[IP_ADDRESS_REDACTED]"),
];

// Only ever called with the literals above; `all_patterns_compile` covers them.
#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("literal pattern compiles")
}

pub(crate) fn snowflake() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(SNOWFLAKE))
}

pub(crate) fn date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(DATE))
}

pub(crate) fn lst_timestamp() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(LST_TIMESTAMP))
}

pub(crate) fn timezone_offset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(TIMEZONE_OFFSET))
}

pub(crate) fn pii() -> &'static [(Regex, &'static str)] {
    static SET: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    SET.get_or_init(|| {
        PII.iter()
            .map(|(pattern, token)| (compile(pattern), *token))
            .collect()
    })
}
