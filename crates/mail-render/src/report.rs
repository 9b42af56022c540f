//! Per-person counts report.

use std::io::Write;
use std::path::Path;

use mail_core::error::Result;
use mail_data::aggregator::RankedPersons;

/// Column names of the counts report.
pub const REPORT_HEADER: [&str; 3] = ["person", "sent", "received"];

/// Persists the ranked sent/received table.
pub trait ReportWriter {
    fn write_counts(&self, ranked: &RankedPersons, path: &Path) -> Result<()>;
}

/// Writes the table as comma-separated text with a header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportWriter;

impl CsvReportWriter {
    /// Write `ranked` to any writer, header first, one row per person.
    ///
    /// The header is written even when there are no rows.
    pub fn write_to<W: Write>(&self, ranked: &RankedPersons, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(REPORT_HEADER)?;
        for counts in ranked.entries() {
            wtr.serialize(counts)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_counts(&self, ranked: &RankedPersons, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(ranked, std::io::BufWriter::new(file))
    }
}
