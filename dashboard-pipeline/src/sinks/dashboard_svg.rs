use std::{collections::BTreeMap, ops::Range, path::PathBuf};

use anyhow::Result;
use energy_client::{
    domain::EnergyRecord,
    queries::{self, BuildingSummary, DailyTotal, PeakHour, WeeklyAverage},
};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use time::Date;

use crate::{
    config::DashboardConfig,
    pipeline::{Aggregates, PipelineError, Sink},
};

type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const HEADER_GREY: RGBColor = RGBColor(225, 225, 225);
const SUMMARY_COLUMNS: [&str; 5] = ["building", "avg_kwh", "min_kwh", "max_kwh", "total_kwh"];

/// Renders the four-panel dashboard as a single SVG file.
///
/// The target directory must already exist; nothing here creates it.
pub struct DashboardSvgSink {
    path: PathBuf,
    title: String,
    size: (u32, u32),
}

impl DashboardSvgSink {
    pub fn new<P: Into<PathBuf>>(path: P, cfg: &DashboardConfig) -> Self {
        Self {
            path: path.into(),
            title: cfg.title.clone(),
            size: (cfg.width, cfg.height),
        }
    }

    pub fn render(&self, records: &[EnergyRecord], aggregates: &Aggregates) -> Result<()> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(&self.title, (FONT, 28))?;

        let panels = root.split_evenly((2, 2));
        draw_daily_trend(&panels[0], &aggregates.daily)?;
        draw_weekly_average(&panels[1], &queries::weekly_average(&aggregates.weekly))?;
        draw_peak_hours(&panels[2], &queries::peak_hours(records))?;
        draw_summary_table(&panels[3], &aggregates.summary)?;

        root.present()?;
        Ok(())
    }
}

impl Sink for DashboardSvgSink {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn run(&self, records: &[EnergyRecord], aggregates: &Aggregates) -> Result<(), PipelineError> {
        self.render(records, aggregates)
            .map_err(|e| PipelineError::Sink(format!("failed to render dashboard: {e:#}")))?;

        metrics::counter!("dashboard_renders_total").increment(1);
        tracing::info!(path = %self.path.display(), "dashboard saved");
        Ok(())
    }
}

/// Group `(building, point)` pairs, keeping point order within each building.
fn by_building<'a, P>(rows: impl Iterator<Item = (&'a str, P)>) -> BTreeMap<&'a str, Vec<P>> {
    let mut groups: BTreeMap<&str, Vec<P>> = BTreeMap::new();
    for (building, point) in rows {
        groups.entry(building).or_default().push(point);
    }
    groups
}

/// Y range with some headroom; never empty.
fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.1 } else { lo.abs().max(1.0) * 0.1 };
    (lo - pad)..(hi + pad)
}

fn date_label(julian_day: i32) -> String {
    Date::from_julian_day(julian_day)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

fn draw_daily_trend(area: &Panel<'_>, daily: &[DailyTotal]) -> Result<()> {
    let days = daily.iter().map(|d| d.date.to_julian_day());
    let x_min = days.clone().min().unwrap_or_default();
    let x_max = days.max().unwrap_or_default();

    let mut chart = ChartBuilder::on(area)
        .caption("Daily Consumption Trend", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x_min - 1)..(x_max + 1), value_range(daily.iter().map(|d| d.kwh)))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("kWh")
        .x_label_formatter(&|d| date_label(*d))
        .draw()?;

    let series = by_building(
        daily
            .iter()
            .map(|d| (d.building.as_str(), (d.date.to_julian_day(), d.kwh))),
    );
    for (idx, (building, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(*building)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_weekly_average(area: &Panel<'_>, averages: &[WeeklyAverage]) -> Result<()> {
    let names: Vec<&str> = averages.iter().map(|a| a.building.as_str()).collect();
    let top = value_range(averages.iter().map(|a| a.avg_kwh).chain([0.0])).end;
    let bottom = averages.iter().map(|a| a.avg_kwh).fold(0.0, f64::min);

    let mut chart = ChartBuilder::on(area)
        .caption("Average Weekly Consumption per Building", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..names.len() as u32).into_segmented(), bottom..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Building")
        .y_desc("Avg kWh")
        .x_label_formatter(&|v| match v {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                names.get(*i as usize).map(|s| s.to_string()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(SKY_BLUE.filled())
            .margin(10)
            .data(averages.iter().enumerate().map(|(i, a)| (i as u32, a.avg_kwh))),
    )?;
    Ok(())
}

fn draw_peak_hours(area: &Panel<'_>, peaks: &[PeakHour]) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption("Peak Hour Consumption", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-1i32..24i32, value_range(peaks.iter().map(|p| p.kwh)))?;

    chart
        .configure_mesh()
        .x_desc("Hour of Day")
        .y_desc("Peak kWh")
        .draw()?;

    let series = by_building(
        peaks
            .iter()
            .map(|p| (p.building.as_str(), (i32::from(p.hour), p.kwh))),
    );
    for (idx, (building, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 5, color.mix(0.7).filled())))?
            .label(*building)
            .legend(move |(x, y)| Rectangle::new([(x - 5, y - 5), (x + 5, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn summary_cells(s: &BuildingSummary) -> [String; 5] {
    [
        s.building.clone(),
        format!("{:.2}", s.avg_kwh),
        format!("{:.2}", s.min_kwh),
        format!("{:.2}", s.max_kwh),
        format!("{:.2}", s.total_kwh),
    ]
}

fn draw_summary_table(area: &Panel<'_>, summary: &[BuildingSummary]) -> Result<()> {
    let area = area.titled("Building Summary", (FONT, 20))?;
    let (width, height) = area.dim_in_pixel();

    let rows: Vec<[String; 5]> = std::iter::once(SUMMARY_COLUMNS.map(String::from))
        .chain(summary.iter().map(summary_cells))
        .collect();

    let margin = 20;
    let cell_w = (width as i32 - 2 * margin) / SUMMARY_COLUMNS.len() as i32;
    let cell_h = ((height as i32 - 2 * margin) / rows.len() as i32).min(32);
    let top = (height as i32 - cell_h * rows.len() as i32) / 2;
    let text_style = (FONT, 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for (r, cells) in rows.iter().enumerate() {
        let fill = if r == 0 { HEADER_GREY } else { WHITE };
        for (c, text) in cells.iter().enumerate() {
            let x0 = margin + c as i32 * cell_w;
            let y0 = top + r as i32 * cell_h;
            let corners = [(x0, y0), (x0 + cell_w, y0 + cell_h)];

            area.draw(&Rectangle::new(corners, fill.filled()))?;
            area.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))?;
            area.draw(&Text::new(
                text.as_str(),
                (x0 + cell_w / 2, y0 + cell_h / 2),
                text_style.clone(),
            ))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use time::macros::datetime;

    fn records() -> Vec<EnergyRecord> {
        vec![
            EnergyRecord::new(datetime!(2024-01-01 00:00:00), 150.0, "building1"),
            EnergyRecord::new(datetime!(2024-01-02 01:00:00), 145.0, "building1"),
            EnergyRecord::new(datetime!(2024-01-01 00:00:00), 200.0, "building2"),
        ]
    }

    #[test]
    fn value_range_pads_and_handles_degenerate_input() {
        assert_eq!(value_range(std::iter::empty()), 0.0..1.0);

        let flat = value_range([5.0, 5.0].into_iter());
        assert!(flat.start < 5.0 && flat.end > 5.0);

        let r = value_range([10.0, 20.0].into_iter());
        assert!((r.start - 9.0).abs() < 1e-9);
        assert!((r.end - 21.0).abs() < 1e-9);
    }

    #[test]
    fn by_building_groups_in_name_order() {
        let groups = by_building([("b", 1), ("a", 2), ("b", 3)].into_iter());
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(groups["b"], vec![1, 3]);
    }

    #[test]
    fn date_label_round_trips_julian_day() {
        let day = time::macros::date!(2024-01-03).to_julian_day();
        assert_eq!(date_label(day), "2024-01-03");
    }

    #[test]
    fn renders_svg_with_all_panels() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("dashboard.svg");
        let records = records();
        let aggregates = Aggregates::compute(&records);

        DashboardSvgSink::new(&path, &DashboardConfig::default())
            .run(&records, &aggregates)
            .expect("render");

        let svg = fs::read_to_string(&path).expect("svg written");
        assert!(svg.starts_with("<svg"));
        for title in [
            "Campus Energy Dashboard",
            "Daily Consumption Trend",
            "Average Weekly Consumption per Building",
            "Peak Hour Consumption",
            "Building Summary",
            "total_kwh",
        ] {
            assert!(svg.contains(title), "missing {title}");
        }
    }

    #[test]
    fn missing_output_dir_fails_the_sink() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let records = records();
        let aggregates = Aggregates::compute(&records);

        let res = DashboardSvgSink::new(tmp.path().join("missing/dashboard.svg"), &DashboardConfig::default())
            .run(&records, &aggregates);
        assert!(matches!(res, Err(PipelineError::Sink(_))));
    }
}
