use clap::Parser;
use std::path::PathBuf;

use crate::error::{MailError, Result};
use crate::models::MalformedRowPolicy;
use crate::time_utils::TimezoneHandler;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarize an email event log into per-person counts and activity charts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mail-summary",
    about = "Summarize an email event log into per-person counts and activity charts",
    version
)]
pub struct Settings {
    /// Headerless CSV event log: time,message_id,sender,recipients,topic,mode
    pub input: PathBuf,

    /// Where to write the per-person sent/received counts
    #[arg(long, default_value = "out.csv")]
    pub output_csv: PathBuf,

    /// Where to write the messages-sent-over-time chart
    #[arg(long, default_value = "sent_mails.png")]
    pub sent_chart: PathBuf,

    /// Where to write the unique-contacts-over-time chart
    #[arg(long, default_value = "unique_contacts.png")]
    pub contacts_chart: PathBuf,

    /// Number of prolific senders to chart (1-20)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..=20))]
    pub top: u16,

    /// What to do with rows that do not have six columns or a numeric time
    #[arg(long, default_value = "fail", value_parser = ["fail", "skip"])]
    pub on_malformed: String,

    /// Timezone used for chart axis labels ("auto" uses the system timezone)
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Chart theme
    #[arg(long, default_value = "light", value_parser = ["light", "dark"])]
    pub theme: String,

    /// Chart width in pixels
    #[arg(long, default_value = "1200", value_parser = clap::value_parser!(u32).range(200..=8000))]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value = "800", value_parser = clap::value_parser!(u32).range(150..=8000))]
    pub height: u32,

    /// TrueType/OpenType font for chart text (system fonts are tried otherwise)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::resolve_auto_values(Settings::parse())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// The typed malformed-row policy.
    pub fn malformed_policy(&self) -> Result<MalformedRowPolicy> {
        self.on_malformed.parse()
    }

    /// Number of prolific senders as a count.
    pub fn top_n(&self) -> usize {
        usize::from(self.top)
    }

    /// Reject an unknown timezone and output paths that would overwrite the
    /// input or each other.
    pub fn validate(&self) -> Result<()> {
        if !TimezoneHandler::validate_timezone(&self.timezone) {
            return Err(MailError::Config(format!(
                "unknown timezone: {}",
                self.timezone
            )));
        }

        let outputs = [&self.output_csv, &self.sent_chart, &self.contacts_chart];
        for (i, out) in outputs.iter().enumerate() {
            if *out == &self.input {
                return Err(MailError::Config(format!(
                    "output path {} is the input file",
                    out.display()
                )));
            }
            if outputs[i + 1..].contains(out) {
                return Err(MailError::Config(format!(
                    "output path {} is used twice",
                    out.display()
                )));
            }
        }
        Ok(())
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["mail-summary", "events.csv"]);

        assert_eq!(settings.input, PathBuf::from("events.csv"));
        assert_eq!(settings.output_csv, PathBuf::from("out.csv"));
        assert_eq!(settings.sent_chart, PathBuf::from("sent_mails.png"));
        assert_eq!(settings.contacts_chart, PathBuf::from("unique_contacts.png"));
        assert_eq!(settings.top, 5);
        assert_eq!(settings.on_malformed, "fail");
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.width, 1200);
        assert_eq!(settings.height, 800);
        assert!(settings.font.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Settings::try_parse_from(["mail-summary"]).is_err());
    }

    #[test]
    fn test_top_range_enforced() {
        assert!(Settings::try_parse_from(["mail-summary", "in.csv", "--top", "0"]).is_err());
        assert!(Settings::try_parse_from(["mail-summary", "in.csv", "--top", "21"]).is_err());
        let s = Settings::try_parse_from(["mail-summary", "in.csv", "--top", "10"]).unwrap();
        assert_eq!(s.top_n(), 10);
    }

    #[test]
    fn test_malformed_policy_parsing() {
        let s = Settings::parse_from(["mail-summary", "in.csv", "--on-malformed", "skip"]);
        assert_eq!(s.malformed_policy().unwrap(), MalformedRowPolicy::Skip);
        assert!(
            Settings::try_parse_from(["mail-summary", "in.csv", "--on-malformed", "ignore"])
                .is_err()
        );
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let s = Settings::load_from_args(["mail-summary", "in.csv", "--debug"]);
        assert_eq!(s.log_level, "DEBUG");
    }

    #[test]
    fn test_auto_timezone_resolved() {
        let s = Settings::load_from_args(["mail-summary", "in.csv", "--timezone", "auto"]);
        assert_ne!(s.timezone, "auto");
        assert!(!s.timezone.is_empty());
    }

    #[test]
    fn test_validate_rejects_unknown_timezone() {
        let s = Settings::parse_from(["mail-summary", "in.csv", "--timezone", "Mars/Olympus"]);
        match s.validate() {
            Err(MailError::Config(msg)) => assert!(msg.contains("Mars/Olympus")),
            other => panic!("expected config error, got {other:?}"),
        }

        let ok = Settings::parse_from(["mail-summary", "in.csv", "--timezone", "America/Chicago"]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_input_as_output() {
        let s = Settings::parse_from(["mail-summary", "out.csv"]);
        assert!(matches!(s.validate(), Err(MailError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_outputs() {
        let s = Settings::parse_from([
            "mail-summary",
            "in.csv",
            "--sent-chart",
            "chart.png",
            "--contacts-chart",
            "chart.png",
        ]);
        assert!(matches!(s.validate(), Err(MailError::Config(_))));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let s = Settings::parse_from(["mail-summary", "in.csv"]);
        assert!(s.validate().is_ok());
    }
}
