use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Output directories ─────────────────────────────────────────────────────────

/// Create the parent directory of every output path that lacks one.
pub fn ensure_output_dirs<'a>(paths: impl IntoIterator<Item = &'a Path>) -> anyhow::Result<()> {
    for path in paths {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to a tracing filter directive.
///
/// Unknown values are passed through unchanged so that full `EnvFilter`
/// directives (e.g. `mail_data=trace`) also work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`. Falls back to
/// `"info"` if the directive cannot be parsed.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_directive(log_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_directive_maps_python_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("mail_data=trace"), "mail_data=trace");
    }

    #[test]
    fn test_ensure_output_dirs_creates_parents() {
        let tmp = TempDir::new().expect("tempdir");
        let csv = tmp.path().join("reports").join("out.csv");
        let png = tmp.path().join("charts").join("nested").join("sent.png");

        ensure_output_dirs([csv.as_path(), png.as_path()]).expect("create dirs");

        assert!(tmp.path().join("reports").is_dir());
        assert!(tmp.path().join("charts").join("nested").is_dir());
    }

    #[test]
    fn test_ensure_output_dirs_bare_file_name() {
        ensure_output_dirs([Path::new("out.csv")]).expect("nothing to create");
    }
}
