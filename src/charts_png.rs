// PNG dashboard charts - distributions and the stacked category x action breakdown
use anyhow::Result;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::TallyConfig;
use crate::models::{ActivityReport, Counted, CrossTab};

pub const CATEGORY_CHART: &str = "category_distribution.png";
pub const ACTION_CHART: &str = "action_distribution.png";
pub const BREAKDOWN_CHART: &str = "category_action_breakdown.png";

/// One stacked bar segment: x slot, series index, bottom and top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub slot: usize,
    pub series: usize,
    pub bottom: usize,
    pub top: usize,
}

/// Lay out stacked segments in `tab.actions` order, skipping absent actions
pub fn stack_segments(tab: &CrossTab) -> Vec<Segment> {
    let mut segments = Vec::new();

    for (slot, row) in tab.rows.iter().enumerate() {
        let mut base = 0;
        for (series, action) in tab.actions.iter().enumerate() {
            let value = row.get(action);
            if value == 0 {
                continue;
            }
            segments.push(Segment {
                slot,
                series,
                bottom: base,
                top: base + value,
            });
            base += value;
        }
    }

    segments
}

pub struct ChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl ChartRenderer {
    pub fn new(config: &TallyConfig) -> Self {
        Self {
            output_dir: config.chart_dir(),
            width: config.chart_width,
            height: config.chart_height,
        }
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Write every chart, returning the paths generated
    pub fn render_all(&self, report: &ActivityReport) -> Result<Vec<PathBuf>> {
        if report.is_empty() {
            warn!("No records, skipping chart generation");
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.output_dir)?;

        let generated = vec![
            self.distribution_chart(
                CATEGORY_CHART,
                "Activity Distribution by Category",
                &report.category_counts,
                report.total_records,
            )?,
            self.distribution_chart(
                ACTION_CHART,
                "Activity Distribution by Action",
                &report.action_counts,
                report.total_records,
            )?,
            self.breakdown_chart(&report.cross_tab)?,
        ];

        info!("Wrote {} charts to {}", generated.len(), self.output_dir.display());
        Ok(generated)
    }

    fn distribution_chart<T: Counted>(
        &self,
        file_name: &str,
        title: &str,
        counts: &[T],
        total: usize,
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        self.draw_distribution(&path, title, counts, total)?;
        Ok(path)
    }

    fn draw_distribution<T: Counted>(
        &self,
        path: &Path,
        title: &str,
        counts: &[T],
        total: usize,
    ) -> Result<()> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let labels: Vec<String> = counts
            .iter()
            .map(|c| {
                let pct = c.count() as f64 / total.max(1) as f64 * 100.0;
                format!("{} {:.0}%", c.label(), pct)
            })
            .collect();
        let max_count = counts.iter().map(|c| c.count()).max().unwrap_or(1) as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 40).into_font())
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..counts.len() as f64, 0..max_count + 1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(counts.len())
            .x_label_formatter(&|x: &f64| {
                labels
                    .get(x.floor() as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .y_desc("Records")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
            let color = Palette99::pick(i).mix(0.9);
            Rectangle::new(
                [(i as f64 + 0.1, 0), (i as f64 + 0.9, c.count() as i32)],
                color.filled(),
            )
        }))?;

        root.present()?;
        Ok(())
    }

    fn breakdown_chart(&self, tab: &CrossTab) -> Result<PathBuf> {
        let path = self.output_dir.join(BREAKDOWN_CHART);
        self.draw_breakdown(&path, tab)?;
        Ok(path)
    }

    fn draw_breakdown(&self, path: &Path, tab: &CrossTab) -> Result<()> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let segments = stack_segments(tab);
        let max_total = segments.iter().map(|s| s.top).max().unwrap_or(1) as i32;
        let categories = &tab.categories;

        let mut chart = ChartBuilder::on(&root)
            .caption("Category by Action Breakdown", ("sans-serif", 40).into_font())
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..categories.len() as f64, 0..max_total + 1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(categories.len())
            .x_label_formatter(&|x: &f64| {
                categories
                    .get(x.floor() as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .y_desc("Records")
            .draw()?;

        // One series per action so the legend lists them in stacking order
        for (series, action) in tab.actions.iter().enumerate() {
            let color = Palette99::pick(series).mix(0.9);
            chart
                .draw_series(segments.iter().filter(|s| s.series == series).map(|s| {
                    Rectangle::new(
                        [
                            (s.slot as f64 + 0.15, s.bottom as i32),
                            (s.slot as f64 + 0.85, s.top as i32),
                        ],
                        color.filled(),
                    )
                }))?
                .label(action.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}
