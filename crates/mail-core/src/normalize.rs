//! Canonicalization of raw sender and recipient strings.
//!
//! The log spells the same mailbox many ways: `John.Doe@enron.com`,
//! `john doe`, `john.doe@ect`, `John Doe at ENRON`. All of them map to the
//! key `john doe`.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Person;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").expect("regex is valid"));

/// One or more trailing `" at <word>"` groups, e.g. `"jane at enron"`.
static AT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s+at\s+\w+)+\s*$").expect("regex is valid"));

/// Normalize a raw mailbox string into a [`Person`].
///
/// Steps: lower-case, cut at the first `@` or `/`, turn `.` into a space,
/// turn every other non-word character into a space, drop trailing
/// `at <word>` groups, trim.
///
/// # Examples
///
/// ```
/// use mail_core::normalize::normalize;
///
/// assert_eq!(normalize("John.Doe@enron.com").as_str(), "john doe");
/// assert_eq!(normalize("john doe at ENRON").as_str(), "john doe");
/// assert_eq!(normalize("pete/HOU/ECT").as_str(), "pete");
/// ```
pub fn normalize(raw: &str) -> Person {
    let lower = raw.to_lowercase();

    let local = match lower.find(['@', '/']) {
        Some(idx) => &lower[..idx],
        None => lower.as_str(),
    };

    let spaced = local.replace('.', " ");
    let words = NON_WORD.replace_all(&spaced, " ");
    let stripped = AT_SUFFIX.replace(&words, "");

    Person::from_key(stripped.trim().to_string())
}

/// Normalize raw bytes, replacing invalid UTF-8 sequences first.
///
/// Never fails: undecodable input degrades to its lossy string form.
pub fn normalize_bytes(raw: &[u8]) -> Person {
    normalize(&String::from_utf8_lossy(raw))
}
