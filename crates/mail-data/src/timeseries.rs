//! Cumulative per-person series over an irregular time axis.
//!
//! Both series share [`densify`]: sparse points are laid onto a sorted axis
//! and the last known value is held forward across gaps. Axis points before
//! a person's first event stay `None`.

use std::collections::{HashMap, HashSet};

use mail_core::models::{Person, PersonSeries, TimeSeriesSet};

use crate::expander::contact_events;
use crate::reader::EventStore;

// ── Forward fill ──────────────────────────────────────────────────────────────

/// How a sparse point updates a running series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointValue {
    /// Add to the running total.
    Increment(u64),
    /// Replace the running value.
    Absolute(u64),
}

/// One observation for one person at one time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparsePoint {
    pub time: i64,
    /// Index into the `people` slice passed to [`densify`].
    pub person: usize,
    pub value: PointValue,
}

/// Lay sparse points onto `axis`, holding the last value forward.
///
/// `axis` must be sorted ascending. Points are applied in time order; points
/// with equal times are applied in the order given, so for
/// [`PointValue::Absolute`] the last one wins. A point whose time falls
/// between axis entries takes effect at the next axis entry. Points naming a
/// person outside `people` are ignored.
pub fn densify(axis: &[i64], people: &[Person], points: Vec<SparsePoint>) -> Vec<PersonSeries> {
    let mut per_person: Vec<Vec<(i64, PointValue)>> = vec![Vec::new(); people.len()];
    for point in points {
        if let Some(bucket) = per_person.get_mut(point.person) {
            bucket.push((point.time, point.value));
        }
    }

    people
        .iter()
        .zip(per_person)
        .map(|(person, mut bucket)| {
            bucket.sort_by_key(|(time, _)| *time);

            let mut values = Vec::with_capacity(axis.len());
            let mut current: Option<u64> = None;
            let mut pending = bucket.into_iter().peekable();

            for &t in axis {
                while let Some((_, value)) = pending.next_if(|(time, _)| *time <= t) {
                    current = Some(match value {
                        PointValue::Increment(n) => current.unwrap_or(0) + n,
                        PointValue::Absolute(n) => n,
                    });
                }
                values.push(current);
            }

            PersonSeries {
                person: person.clone(),
                values,
            }
        })
        .collect()
}

/// Sort and deduplicate timestamps into an axis.
fn build_axis(mut times: Vec<i64>) -> Vec<i64> {
    times.sort_unstable();
    times.dedup();
    times
}

/// Drop repeated people while keeping first-occurrence order.
fn unique_people(selected: &[Person]) -> Vec<Person> {
    let mut seen = HashSet::new();
    selected
        .iter()
        .filter(|p| seen.insert(*p))
        .cloned()
        .collect()
}

fn index_of(people: &[Person]) -> HashMap<&Person, usize> {
    people.iter().enumerate().map(|(i, p)| (p, i)).collect()
}

// ── SentTimeSeries ────────────────────────────────────────────────────────────

/// Cumulative messages sent by each selected person.
pub struct SentTimeSeries;

impl SentTimeSeries {
    /// Running count of messages sent by each of `selected`.
    ///
    /// The axis is every distinct timestamp at which one of `selected` sent
    /// something.
    pub fn compute(store: &EventStore, selected: &[Person]) -> TimeSeriesSet {
        let people = unique_people(selected);
        if people.is_empty() {
            return TimeSeriesSet::default();
        }
        let index = index_of(&people);

        let mut times = Vec::new();
        let mut points = Vec::new();
        for event in store.events() {
            if let Some(&person) = index.get(&event.sender) {
                times.push(event.time);
                points.push(SparsePoint {
                    time: event.time,
                    person,
                    value: PointValue::Increment(1),
                });
            }
        }

        let axis = build_axis(times);
        let series = densify(&axis, &people, points);
        TimeSeriesSet { axis, series }
    }
}

// ── DistinctContactTimeSeries ─────────────────────────────────────────────────

/// Cumulative number of distinct people who have written to each selected
/// person.
pub struct DistinctContactTimeSeries;

impl DistinctContactTimeSeries {
    /// Running count of distinct senders reaching each of `selected`.
    ///
    /// Contact events are streamed once; only events addressed to a selected
    /// person are kept. A person listed twice on one message counts that
    /// message once. Each person's events are walked in ascending time, with
    /// equal timestamps in file order.
    pub fn compute(store: &EventStore, selected: &[Person]) -> TimeSeriesSet {
        let people = unique_people(selected);
        if people.is_empty() {
            return TimeSeriesSet::default();
        }
        let index = index_of(&people);

        // (time, row, sender) per selected recipient.
        let mut received: Vec<Vec<(i64, usize, &Person)>> = vec![Vec::new(); people.len()];
        for contact in contact_events(store.events()) {
            let Some(&person) = index.get(&contact.recipient) else {
                continue;
            };
            let bucket = &mut received[person];
            if bucket.last().is_some_and(|(_, row, _)| *row == contact.row) {
                continue;
            }
            bucket.push((contact.time, contact.row, contact.sender));
        }

        let mut times = Vec::new();
        let mut points = Vec::new();
        for (person, mut bucket) in received.into_iter().enumerate() {
            bucket.sort_by_key(|(time, _, _)| *time);

            let mut seen: HashSet<&Person> = HashSet::new();
            for (time, _, sender) in bucket {
                seen.insert(sender);
                times.push(time);
                points.push(SparsePoint {
                    time,
                    person,
                    value: PointValue::Absolute(seen.len() as u64),
                });
            }
        }

        let axis = build_axis(times);
        let series = densify(&axis, &people, points);
        TimeSeriesSet { axis, series }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
