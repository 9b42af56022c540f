//! Line charts of cumulative per-person series.
//!
//! Each person becomes one step line: the value holds until the next time
//! point and then jumps, matching the forward-filled data.

use std::path::Path;

use mail_core::error::{MailError, Result};
use mail_core::formatting::format_count;
use mail_core::models::TimeSeriesSet;
use mail_core::time_utils::{label_format_for_span, TimezoneHandler};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::fonts::FONT_FAMILY;
use crate::themes::ChartTheme;

const HOUR_MS: i64 = 3_600_000;
const MARKER_RADIUS: i32 = 3;

// ── ChartSpec ─────────────────────────────────────────────────────────────────

/// Title and y-axis description of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub y_desc: &'static str,
}

/// Cumulative messages sent by the prolific senders.
pub const SENT_CHART: ChartSpec = ChartSpec {
    title: "Messages sent over time by prolific senders",
    y_desc: "Messages sent (cumulative)",
};

/// Cumulative distinct contacts reaching the prolific senders.
pub const CONTACTS_CHART: ChartSpec = ChartSpec {
    title: "Unique contacts over time for prolific senders",
    y_desc: "Distinct people who wrote to them (cumulative)",
};

// ── ChartRenderer ─────────────────────────────────────────────────────────────

/// Renders a [`TimeSeriesSet`] to an image file.
pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec, data: &TimeSeriesSet, path: &Path) -> Result<()>;
}

/// Draws PNG line charts with the bitmap backend.
pub struct PngChartRenderer {
    width: u32,
    height: u32,
    theme: ChartTheme,
    timezone: TimezoneHandler,
    with_text: bool,
}

impl PngChartRenderer {
    /// `with_text` should be the result of [`crate::fonts::ensure_font`];
    /// without a registered font, titles, labels and legend are left out.
    pub fn new(
        width: u32,
        height: u32,
        theme: ChartTheme,
        timezone: TimezoneHandler,
        with_text: bool,
    ) -> Self {
        Self {
            width,
            height,
            theme,
            timezone,
            with_text,
        }
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, spec: &ChartSpec, data: &TimeSeriesSet, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        self.draw(&root, spec, data)?;
        root.present().map_err(chart_err)?;
        Ok(())
    }
}

impl PngChartRenderer {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        data: &TimeSeriesSet,
    ) -> Result<()> {
        let fg = self.theme.foreground;
        let (x_start, x_end) = x_range(data);
        let y_top = y_max(data);
        let label_fmt = label_format_for_span(x_start, x_end);

        root.fill(&self.theme.background).map_err(chart_err)?;

        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if self.with_text {
            builder
                .caption(spec.title, (FONT_FAMILY, 28).into_font().color(&fg))
                .x_label_area_size(50)
                .y_label_area_size(80);
        }
        let mut chart = builder
            .build_cartesian_2d(x_start..x_end, 0u64..y_top)
            .map_err(chart_err)?;

        let format_x = |ms: &i64| self.timezone.format(*ms, label_fmt);
        let format_y = |v: &u64| format_count(*v);

        let mut mesh = chart.configure_mesh();
        mesh.bold_line_style(&self.theme.grid)
            .light_line_style(&self.theme.background)
            .axis_style(&fg)
            .x_labels(8)
            .y_labels(10);
        if self.with_text {
            mesh.x_desc(format!("Date ({})", self.timezone.tz().name()))
                .y_desc(spec.y_desc)
                .x_label_formatter(&format_x)
                .y_label_formatter(&format_y)
                .label_style((FONT_FAMILY, 14).into_font().color(&fg))
                .axis_desc_style((FONT_FAMILY, 16).into_font().color(&fg));
        }
        mesh.draw().map_err(chart_err)?;

        let mut labelled = 0usize;
        for (i, series) in data.series.iter().enumerate() {
            let points: Vec<(i64, u64)> = series.defined_points(&data.axis).collect();
            if points.is_empty() {
                debug!("No data for {} in {:?}", series.person, spec.title);
                continue;
            }
            let color = self.theme.series_color(i);

            // A lone point has no line segment, so every point also gets a marker.
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&point| Circle::new(point, MARKER_RADIUS, color.filled())),
                )
                .map_err(chart_err)?;
            let anno = chart
                .draw_series(LineSeries::new(step_points(points), color.stroke_width(2)))
                .map_err(chart_err)?;

            if self.with_text {
                let name = if series.person.is_empty() {
                    "(unnamed)".to_string()
                } else {
                    series.person.to_string()
                };
                anno.label(name).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });
                labelled += 1;
            }
        }

        if labelled > 0 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&self.theme.legend_background)
                .border_style(&fg)
                .label_font((FONT_FAMILY, 14).into_font().color(&fg))
                .draw()
                .map_err(chart_err)?;
        }

        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn chart_err(err: impl std::fmt::Display) -> MailError {
    MailError::Chart(err.to_string())
}

/// Horizontal extent of the chart, padded when the axis has fewer than two
/// distinct points so the coordinate range is never empty.
fn x_range(data: &TimeSeriesSet) -> (i64, i64) {
    match data.time_range() {
        Some((start, end)) if start < end => (start, end),
        Some((t, _)) => (t.saturating_sub(HOUR_MS), t.saturating_add(HOUR_MS)),
        None => (0, HOUR_MS),
    }
}

/// Top of the value axis with a little headroom.
fn y_max(data: &TimeSeriesSet) -> u64 {
    let max = data.max_value().max(1);
    max + (max / 20).max(1)
}

/// Turn `(time, value)` points into a staircase: each value is held until
/// the next time point before jumping.
fn step_points(points: impl IntoIterator<Item = (i64, u64)>) -> Vec<(i64, u64)> {
    let mut out: Vec<(i64, u64)> = Vec::new();
    for (t, v) in points {
        if let Some(&(_, prev)) = out.last() {
            if prev != v {
                out.push((t, prev));
            }
        }
        out.push((t, v));
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mail_core::models::{Person, PersonSeries};
    use tempfile::TempDir;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    fn renderer() -> PngChartRenderer {
        PngChartRenderer::new(
            320,
            240,
            ChartTheme::light(),
            TimezoneHandler::new("UTC"),
            false,
        )
    }

    fn sample() -> TimeSeriesSet {
        TimeSeriesSet {
            axis: vec![989_858_340_000, 989_944_740_000, 990_031_140_000],
            series: vec![
                PersonSeries {
                    person: Person::parse("jeff dasovich"),
                    values: vec![Some(1), Some(2), Some(4)],
                },
                PersonSeries {
                    person: Person::parse("kay mann"),
                    values: vec![None, Some(1), Some(1)],
                },
                PersonSeries {
                    person: Person::parse("nobody"),
                    values: vec![None, None, None],
                },
            ],
        }
    }

    /// Draw into an in-memory RGB buffer instead of a file.
    fn draw_to_buffer(r: &PngChartRenderer, data: &TimeSeriesSet) -> Vec<u8> {
        let mut buf = vec![0u8; (r.width * r.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (r.width, r.height)).into_drawing_area();
            r.draw(&root, &CONTACTS_CHART, data).unwrap();
            root.present().unwrap();
        }
        buf
    }

    fn count_pixels(buf: &[u8], color: RGBColor) -> usize {
        buf.chunks_exact(3)
            .filter(|px| *px == [color.0, color.1, color.2])
            .count()
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).expect("chart written");
        assert!(bytes.starts_with(PNG_SIGNATURE), "not a PNG");
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_writes_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sent.png");
        renderer().render(&SENT_CHART, &sample(), &path).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_render_empty_set() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.png");
        renderer()
            .render(&CONTACTS_CHART, &TimeSeriesSet::default(), &path)
            .unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_render_single_time_point() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("single.png");
        let data = TimeSeriesSet {
            axis: vec![100],
            series: vec![PersonSeries {
                person: Person::parse("a"),
                values: vec![Some(1)],
            }],
        };
        renderer().render(&SENT_CHART, &data, &path).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_render_dark_theme() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dark.png");
        let r = PngChartRenderer::new(
            320,
            240,
            ChartTheme::dark(),
            TimezoneHandler::new("America/Chicago"),
            false,
        );
        r.render(&CONTACTS_CHART, &sample(), &path).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_single_point_series_is_visible() {
        let r = renderer();
        let color = r.theme.series_color(0);
        let only_last = |values| TimeSeriesSet {
            axis: vec![989_858_340_000, 989_944_740_000, 990_031_140_000],
            series: vec![PersonSeries {
                person: Person::parse("bob"),
                values,
            }],
        };

        let blank = draw_to_buffer(&r, &only_last(vec![None, None, None]));
        assert_eq!(count_pixels(&blank, color), 0);

        let late = draw_to_buffer(&r, &only_last(vec![None, None, Some(1)]));
        assert!(count_pixels(&late, color) > 0, "contact at the last time point not drawn");

        let single_axis = TimeSeriesSet {
            axis: vec![100],
            series: vec![PersonSeries {
                person: Person::parse("a"),
                values: vec![Some(1)],
            }],
        };
        let lone = draw_to_buffer(&r, &single_axis);
        assert!(count_pixels(&lone, color) > 0, "single time point not drawn");
    }

    #[test]
    fn test_render_missing_directory_fails() {
        let path = Path::new("/tmp/no-such-dir-mail-summary/chart.png");
        let err = renderer().render(&SENT_CHART, &sample(), path).unwrap_err();
        assert!(matches!(err, MailError::Chart(_)));
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_step_points() {
        let steps = step_points(vec![(1, 1), (2, 1), (3, 3), (4, 4)]);
        assert_eq!(steps, vec![(1, 1), (2, 1), (3, 1), (3, 3), (4, 3), (4, 4)]);
        assert!(step_points(Vec::new()).is_empty());
    }

    #[test]
    fn test_x_range_padding() {
        assert_eq!(x_range(&TimeSeriesSet::default()), (0, HOUR_MS));
        let single = TimeSeriesSet {
            axis: vec![5 * HOUR_MS],
            series: Vec::new(),
        };
        assert_eq!(x_range(&single), (4 * HOUR_MS, 6 * HOUR_MS));
        assert_eq!(x_range(&sample()), (989_858_340_000, 990_031_140_000));
    }

    #[test]
    fn test_y_max_headroom() {
        assert_eq!(y_max(&TimeSeriesSet::default()), 2);
        assert_eq!(y_max(&sample()), 5);
    }
}
