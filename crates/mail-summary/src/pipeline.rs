use anyhow::Context;
use mail_core::settings::Settings;
use mail_data::analysis::{analyze, AnalysisResult};
use mail_data::reader::EventStore;
use mail_render::chart::{ChartRenderer, CONTACTS_CHART, SENT_CHART};
use mail_render::report::ReportWriter;
use tracing::info;

/// Load the log named in `settings`, analyse it and write all three outputs.
pub fn run(
    settings: &Settings,
    report: &dyn ReportWriter,
    charts: &dyn ChartRenderer,
) -> anyhow::Result<AnalysisResult> {
    let policy = settings.malformed_policy()?;
    let store = EventStore::load(&settings.input, policy)
        .with_context(|| format!("loading {}", settings.input.display()))?;

    let result = analyze(&store, settings.top_n());

    report
        .write_counts(&result.ranked, &settings.output_csv)
        .with_context(|| format!("writing {}", settings.output_csv.display()))?;
    info!(
        "Sent/received counts per person written to {}",
        settings.output_csv.display()
    );

    charts
        .render(&SENT_CHART, &result.sent_series, &settings.sent_chart)
        .with_context(|| format!("rendering {}", settings.sent_chart.display()))?;
    info!(
        "Messages sent over time for prolific senders saved to {}",
        settings.sent_chart.display()
    );

    charts
        .render(&CONTACTS_CHART, &result.contact_series, &settings.contacts_chart)
        .with_context(|| format!("rendering {}", settings.contacts_chart.display()))?;
    info!(
        "Unique contacts over time for prolific senders saved to {}",
        settings.contacts_chart.display()
    );

    Ok(result)
}
