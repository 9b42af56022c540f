//! Per-person sent/received counting and ranking.

use std::collections::HashMap;

use mail_core::models::{Person, PersonCounts};
use mail_core::normalize::normalize;

use crate::expander::flatten;
use crate::reader::EventStore;

// ── ContactCounts ─────────────────────────────────────────────────────────────

/// Sent and received totals for every person in the log.
///
/// Entries are kept in first-seen order: senders in row order, then people
/// who only ever received, in flattened recipient order.
#[derive(Debug, Clone, Default)]
pub struct ContactCounts {
    entries: Vec<PersonCounts>,
}

impl ContactCounts {
    pub fn entries(&self) -> &[PersonCounts] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts for one person.
    pub fn get(&self, person: &Person) -> Option<&PersonCounts> {
        self.entries.iter().find(|c| &c.person == person)
    }

    pub fn total_sent(&self) -> u64 {
        self.entries.iter().map(|c| c.sent).sum()
    }

    pub fn total_received(&self) -> u64 {
        self.entries.iter().map(|c| c.received).sum()
    }

    /// Sort by `sent` descending. The sort is stable, so people with equal
    /// counts stay in first-seen order.
    pub fn ranked(&self) -> RankedPersons {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.sent.cmp(&a.sent));
        RankedPersons { entries }
    }
}

// ── RankedPersons ─────────────────────────────────────────────────────────────

/// [`ContactCounts`] ordered by messages sent, most prolific first.
#[derive(Debug, Clone, Default)]
pub struct RankedPersons {
    entries: Vec<PersonCounts>,
}

impl RankedPersons {
    pub fn entries(&self) -> &[PersonCounts] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most prolific senders (fewer if the log has fewer people).
    pub fn top(&self, n: usize) -> Vec<Person> {
        self.entries
            .iter()
            .take(n)
            .map(|c| c.person.clone())
            .collect()
    }
}

// ── ContactAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that counts messages per person.
pub struct ContactAggregator;

impl ContactAggregator {
    /// Count messages sent and received by every person in `store`.
    ///
    /// `sent` counts rows by normalized sender; `received` counts flattened
    /// recipient tokens by their normalized form.
    pub fn aggregate(store: &EventStore) -> ContactCounts {
        let mut entries: Vec<PersonCounts> = Vec::new();
        let mut index: HashMap<Person, usize> = HashMap::new();

        for event in store.events() {
            let slot = Self::slot(&mut entries, &mut index, &event.sender);
            entries[slot].sent += 1;
        }

        for token in flatten(store.events()) {
            let person = normalize(token);
            let slot = Self::slot(&mut entries, &mut index, &person);
            entries[slot].received += 1;
        }

        ContactCounts { entries }
    }

    /// Position of `person` in `entries`, appending a zeroed row if new.
    fn slot(
        entries: &mut Vec<PersonCounts>,
        index: &mut HashMap<Person, usize>,
        person: &Person,
    ) -> usize {
        if let Some(&i) = index.get(person) {
            return i;
        }
        entries.push(PersonCounts {
            person: person.clone(),
            sent: 0,
            received: 0,
        });
        index.insert(person.clone(), entries.len() - 1);
        entries.len() - 1
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
