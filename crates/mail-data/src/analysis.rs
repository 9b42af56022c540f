//! Main analysis pipeline.
//!
//! Runs counting, ranking and both time series over a loaded
//! [`EventStore`], passing each stage's output explicitly to the next.

use chrono::Utc;
use mail_core::formatting::{format_count, format_elapsed};
use mail_core::models::{Person, TimeSeriesSet};
use tracing::{debug, info};

use crate::aggregator::{ContactAggregator, ContactCounts, RankedPersons};
use crate::expander::{flatten, max_recipients};
use crate::reader::EventStore;
use crate::timeseries::{DistinctContactTimeSeries, SentTimeSeries};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of events analysed.
    pub events_processed: usize,
    /// Rows dropped by the loader.
    pub rows_skipped: u64,
    /// Distinct people seen as sender or recipient.
    pub people_count: usize,
    /// Non-empty recipient tokens across all events.
    pub recipient_tokens: u64,
    /// Largest number of recipient slots on a single message.
    pub max_recipients: usize,
    /// Earliest and latest event time (ms), if any events were loaded.
    pub time_span: Option<(i64, i64)>,
    /// Wall-clock milliseconds spent counting and ranking.
    pub aggregate_time_ms: f64,
    /// Wall-clock milliseconds spent building both time series.
    pub series_time_ms: f64,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Per-person totals in first-seen order.
    pub counts: ContactCounts,
    /// The same totals, most prolific sender first.
    pub ranked: RankedPersons,
    /// People selected for the charts.
    pub prolific: Vec<Person>,
    /// Cumulative messages sent by each prolific sender.
    pub sent_series: TimeSeriesSet,
    /// Cumulative distinct contacts reaching each prolific sender.
    pub contact_series: TimeSeriesSet,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Count sent/received per person.
/// 2. Rank by sent and pick the `top_n` most prolific senders.
/// 3. Build the cumulative sent series for them.
/// 4. Build the cumulative distinct-contacts series for them.
pub fn analyze(store: &EventStore, top_n: usize) -> AnalysisResult {
    // ── Step 1-2: Count and rank ──────────────────────────────────────────────
    let aggregate_start = std::time::Instant::now();
    let counts = ContactAggregator::aggregate(store);
    let ranked = counts.ranked();
    let prolific = ranked.top(top_n);
    let aggregate_time_ms = aggregate_start.elapsed().as_secs_f64() * 1000.0;

    debug!(
        "Counted {} people in {}",
        format_count(counts.len() as u64),
        format_elapsed(aggregate_time_ms)
    );

    // ── Step 3-4: Time series ─────────────────────────────────────────────────
    let series_start = std::time::Instant::now();
    let sent_series = SentTimeSeries::compute(store, &prolific);
    let contact_series = DistinctContactTimeSeries::compute(store, &prolific);
    let series_time_ms = series_start.elapsed().as_secs_f64() * 1000.0;

    debug!(
        "Built series over {} / {} time points in {}",
        sent_series.axis.len(),
        contact_series.axis.len(),
        format_elapsed(series_time_ms)
    );

    // ── Step 5: Build result ──────────────────────────────────────────────────
    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        events_processed: store.len(),
        rows_skipped: store.stats().rows_skipped,
        people_count: counts.len(),
        recipient_tokens: flatten(store.events()).count() as u64,
        max_recipients: max_recipients(store.events()),
        time_span: store.time_span(),
        aggregate_time_ms,
        series_time_ms,
    };

    info!(
        "Analysed {} messages between {} people ({} recipient entries)",
        format_count(metadata.events_processed as u64),
        format_count(metadata.people_count as u64),
        format_count(metadata.recipient_tokens)
    );
    for person in &ranked.entries()[..prolific.len()] {
        info!(
            "Prolific sender {:?}: {} sent, {} received",
            person.person.as_str(),
            format_count(person.sent),
            format_count(person.received)
        );
    }

    AnalysisResult {
        counts,
        ranked,
        prolific,
        sent_series,
        contact_series,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
