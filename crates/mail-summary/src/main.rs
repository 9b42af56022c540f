mod bootstrap;
mod pipeline;

use anyhow::Result;
use mail_core::settings::Settings;
use mail_core::time_utils::TimezoneHandler;
use mail_render::chart::PngChartRenderer;
use mail_render::fonts::ensure_font;
use mail_render::report::CsvReportWriter;
use mail_render::themes::ChartTheme;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("mail-summary v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Input: {}, top: {}, timezone: {}, theme: {}",
        settings.input.display(),
        settings.top,
        settings.timezone,
        settings.theme
    );

    settings.validate()?;
    bootstrap::ensure_output_dirs([
        settings.output_csv.as_path(),
        settings.sent_chart.as_path(),
        settings.contacts_chart.as_path(),
    ])?;

    let with_text = ensure_font(settings.font.as_deref());
    let charts = PngChartRenderer::new(
        settings.width,
        settings.height,
        ChartTheme::from_name(&settings.theme),
        TimezoneHandler::new(&settings.timezone),
        with_text,
    );

    let result = pipeline::run(&settings, &CsvReportWriter, &charts)?;

    tracing::info!(
        "Done: {} people, {} prolific senders charted",
        result.metadata.people_count,
        result.prolific.len()
    );

    Ok(())
}
