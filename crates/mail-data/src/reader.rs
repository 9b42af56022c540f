//! Event log loading.
//!
//! Reads the headerless six-column CSV log into an [`EventStore`], normalizing
//! the sender column on the way in.

use std::io::Read;
use std::path::Path;

use mail_core::error::{MailError, Result};
use mail_core::models::{Event, MalformedRowPolicy, EVENT_COLUMNS};
use mail_core::normalize::normalize_bytes;
use mail_core::time_utils::from_millis;
use tracing::{debug, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters collected while loading the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records seen, including skipped ones.
    pub rows_read: u64,
    /// Records dropped under [`MalformedRowPolicy::Skip`].
    pub rows_skipped: u64,
}

/// The event log held in memory, in file order.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
    stats: LoadStats,
}

impl EventStore {
    /// Load the event log at `path`.
    pub fn load(path: &Path, policy: MalformedRowPolicy) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| MailError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_reader(std::io::BufReader::new(file), policy)?;
        debug!(
            "Loaded {} events from {} ({} skipped)",
            store.len(),
            path.display(),
            store.stats.rows_skipped
        );
        Ok(store)
    }

    /// Parse an event log from any reader.
    pub fn from_reader<R: Read>(reader: R, policy: MalformedRowPolicy) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut events = Vec::new();
        let mut stats = LoadStats::default();
        let mut record = csv::ByteRecord::new();

        while rdr.read_byte_record(&mut record)? {
            stats.rows_read += 1;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(stats.rows_read);

            match parse_record(&record, line) {
                Ok(event) => events.push(event),
                Err(err) => match policy {
                    MalformedRowPolicy::Fail => return Err(err),
                    MalformedRowPolicy::Skip => {
                        warn!("Skipping row: {}", err);
                        stats.rows_skipped += 1;
                    }
                },
            }
        }

        Ok(Self { events, stats })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Earliest and latest event timestamps.
    pub fn time_span(&self) -> Option<(i64, i64)> {
        let min = self.events.iter().map(|e| e.time).min()?;
        let max = self.events.iter().map(|e| e.time).max()?;
        Some((min, max))
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Turn one CSV record into an [`Event`].
fn parse_record(record: &csv::ByteRecord, line: u64) -> Result<Event> {
    if record.len() != EVENT_COLUMNS {
        return Err(MailError::MalformedRow {
            line,
            found: record.len(),
            expected: EVENT_COLUMNS,
        });
    }

    let raw_time = String::from_utf8_lossy(&record[0]);
    let time = raw_time
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|ms| from_millis(*ms).is_some())
        .ok_or_else(|| MailError::InvalidTimestamp {
            line,
            value: raw_time.to_string(),
        })?;

    Ok(Event {
        time,
        message_id: lossy(&record[1]),
        sender: normalize_bytes(&record[2]),
        recipients: lossy(&record[3]),
        topic: lossy(&record[4]),
        mode: lossy(&record[5]),
        line,
    })
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
