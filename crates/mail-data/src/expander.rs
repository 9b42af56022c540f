//! Recipient list expansion.
//!
//! A row with `a|b|c` in its recipient column stands for three contacts.
//! Two views are provided: a flat token stream for global counting, and a
//! positional stream of [`ContactEvent`]s that keeps each contact tied to its
//! source row, sender and time.

use mail_core::models::{Event, Person};
use mail_core::normalize::normalize;

/// Separator between recipients in the raw field.
pub const RECIPIENT_SEPARATOR: char = '|';

/// One (time, sender, recipient) contact derived from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEvent<'a> {
    /// Index of the source event in the store.
    pub row: usize,
    /// Position of the recipient within the raw recipient field.
    pub position: usize,
    pub time: i64,
    pub sender: &'a Person,
    pub recipient: Person,
}

/// Split a raw recipient field into its non-empty tokens, in order.
///
/// Tokens are trimmed but not normalized.
pub fn split_recipients(raw: &str) -> impl Iterator<Item = &str> {
    positional_tokens(raw).map(|(_, token)| token)
}

/// Like [`split_recipients`], but each token carries its slot index in the
/// raw field. Empty slots are skipped without shifting later positions.
pub fn positional_tokens(raw: &str) -> impl Iterator<Item = (usize, &str)> {
    raw.split(RECIPIENT_SEPARATOR)
        .map(str::trim)
        .enumerate()
        .filter(|(_, token)| !token.is_empty())
}

/// All recipient tokens of all events, concatenated in row order.
pub fn flatten(events: &[Event]) -> impl Iterator<Item = &str> {
    events.iter().flat_map(|e| split_recipients(&e.recipients))
}

/// Number of recipient slots in the widest row.
pub fn max_recipients(events: &[Event]) -> usize {
    events
        .iter()
        .map(|e| positional_tokens(&e.recipients).last().map_or(0, |(pos, _)| pos + 1))
        .max()
        .unwrap_or(0)
}

/// Lazily expand every event into normalized [`ContactEvent`]s.
///
/// Nothing is materialized: callers that only care about a few recipients
/// can filter as they go.
pub fn contact_events(events: &[Event]) -> impl Iterator<Item = ContactEvent<'_>> {
    events.iter().enumerate().flat_map(|(row, event)| {
        positional_tokens(&event.recipients).map(move |(position, token)| ContactEvent {
            row,
            position,
            time: event.time,
            sender: &event.sender,
            recipient: normalize(token),
        })
    })
}
