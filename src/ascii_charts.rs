//! ASCII chart rendering for terminal dashboards
//!
//! - BarChart: share of total per label, one bar per entry
//! - SummaryCard: top-N list with a bar scaled to the record total
//! - StackedBarChart: category rows split into per-action segments
//!
//! Colors go through `colored`, so plain mode only needs the global override
//! switched off.

use colored::Colorize;

use crate::models::{Counted, CrossTab};

/// Series palette, cycled by index
pub const COLORS: [&str; 6] = ["cyan", "magenta", "yellow", "green", "blue", "red"];

/// Fill glyphs per series, so stacked segments stay readable without color
const SERIES_GLYPHS: [char; 6] = ['█', '▓', '▒', '■', '◆', '●'];

const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

pub fn color_for(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

fn percentage(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

fn filled_cells(value: f64, total: f64, width: usize) -> usize {
    if total <= 0.0 {
        return 0;
    }
    ((value / total * width as f64) as usize).min(width)
}

/// Horizontal bar chart for distribution displays
pub struct BarChart {
    pub title: String,
    pub items: Vec<BarItem>,
    pub width: usize,
}

#[derive(Clone, Debug)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
    pub color: String,
}

impl BarChart {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            items: Vec::new(),
            width: 40,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn add(&mut self, label: &str, value: f64, color: &str) {
        self.items.push(BarItem {
            label: label.to_string(),
            value,
            color: color.to_string(),
        });
    }

    pub fn from_counts<T: Counted>(title: &str, counts: &[T]) -> Self {
        let mut chart = Self::new(title);
        for (i, item) in counts.iter().enumerate() {
            chart.add(&item.label(), item.count() as f64, color_for(i));
        }
        chart
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        if !self.title.is_empty() {
            output.push_str(&format!("  {}\n\n", self.title.bold()));
        }

        if self.items.is_empty() {
            output.push_str("  No data available\n");
            return output;
        }

        let total: f64 = self.items.iter().map(|i| i.value).sum();
        let max_label_len = self
            .items
            .iter()
            .map(|i| i.label.chars().count())
            .max()
            .unwrap_or(10);

        for item in &self.items {
            let pct = percentage(item.value, total);
            let filled = filled_cells(item.value, total, self.width);
            let bar = format!(
                "{}{}",
                BAR_FULL.to_string().repeat(filled),
                BAR_EMPTY.to_string().repeat(self.width - filled)
            );

            output.push_str(&format!(
                "  {} {:width$} {:>5} ({:5.1}%)\n",
                colorize_text("●", &item.color),
                item.label,
                item.value,
                pct,
                width = max_label_len
            ));
            output.push_str(&format!("    {}\n", colorize_text(&bar, &item.color)));
        }

        output
    }
}

/// Top-N card; bars are relative to the total record count, not to the card
pub struct SummaryCard {
    pub title: String,
    pub rows: Vec<(String, usize)>,
    pub total: usize,
    pub bar_width: usize,
    pub color: String,
}

impl SummaryCard {
    pub fn new(title: &str, total: usize) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
            total,
            bar_width: 24,
            color: "cyan".to_string(),
        }
    }

    pub fn from_counts<T: Counted>(title: &str, items: &[T], total: usize) -> Self {
        let mut card = Self::new(title, total);
        card.rows = items.iter().map(|i| (i.label(), i.count())).collect();
        card
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("  {}\n", self.title.bold()));

        if self.rows.is_empty() {
            output.push_str("    No data available\n");
            return output;
        }

        let max_label = self
            .rows
            .iter()
            .map(|(l, _)| l.chars().count())
            .max()
            .unwrap_or(10);

        for (label, count) in &self.rows {
            let filled = filled_cells(*count as f64, self.total as f64, self.bar_width);
            let bar = format!(
                "{}{}",
                BAR_FULL.to_string().repeat(filled),
                BAR_EMPTY.to_string().repeat(self.bar_width - filled)
            );
            output.push_str(&format!(
                "    {:width$}  {:>4}  {}\n",
                label,
                count,
                colorize_text(&bar, &self.color),
                width = max_label
            ));
        }

        output
    }
}

/// Stacked horizontal bars: one row per category, one segment per action
pub struct StackedBarChart {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<String>,
    /// values[row][series]
    pub values: Vec<Vec<usize>>,
    pub width: usize,
}

impl StackedBarChart {
    pub fn from_cross_tab(title: &str, tab: &CrossTab) -> Self {
        let values = tab
            .rows
            .iter()
            .map(|row| tab.actions.iter().map(|a| row.get(a)).collect())
            .collect();

        Self {
            title: title.to_string(),
            categories: tab.rows.iter().map(|r| r.category.clone()).collect(),
            series: tab.actions.clone(),
            values,
            width: 40,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("  {}\n\n", self.title.bold()));

        if self.categories.is_empty() {
            output.push_str("  No data available\n");
            return output;
        }

        let max_total = self
            .values
            .iter()
            .map(|row| row.iter().sum::<usize>())
            .max()
            .unwrap_or(0)
            .max(1);
        let max_label = self
            .categories
            .iter()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(10);

        for (category, row) in self.categories.iter().zip(&self.values) {
            let mut bar = String::new();
            for (i, value) in row.iter().enumerate() {
                if *value == 0 {
                    continue;
                }
                // Every observed action gets at least one cell
                let cells = filled_cells(*value as f64, max_total as f64, self.width).max(1);
                let segment = SERIES_GLYPHS[i % SERIES_GLYPHS.len()]
                    .to_string()
                    .repeat(cells);
                bar.push_str(&colorize_text(&segment, color_for(i)).to_string());
            }

            output.push_str(&format!(
                "  {:width$} │{} {}\n",
                category,
                bar,
                row.iter().sum::<usize>(),
                width = max_label
            ));
        }

        output.push('\n');
        output.push_str(&self.render_legend());
        output
    }

    fn render_legend(&self) -> String {
        let entries: Vec<String> = self
            .series
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let glyph = SERIES_GLYPHS[i % SERIES_GLYPHS.len()].to_string();
                format!("{} {}", colorize_text(&glyph, color_for(i)), name)
            })
            .collect();
        format!("  {}\n", entries.join("   "))
    }
}

pub fn colorize_text(text: &str, color: &str) -> colored::ColoredString {
    match color {
        "cyan" => text.cyan(),
        "magenta" => text.magenta(),
        "yellow" => text.yellow(),
        "green" => text.green(),
        "blue" => text.blue(),
        "red" => text.red(),
        _ => text.white(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crosstab::build_cross_tab;
    use crate::models::{ActivityRecord, CategoryCount};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_bar_chart() {
        plain();
        let mut chart = BarChart::new("Test Chart");
        chart.add("Item 1", 50.0, "cyan");
        chart.add("Item 2", 30.0, "magenta");
        chart.add("Item 3", 20.0, "yellow");
        let rendered = chart.render();
        assert!(rendered.contains("Item 1"));
        assert!(rendered.contains("50.0%"));
        assert!(rendered.contains("20.0%"));
    }

    #[test]
    fn test_bar_chart_empty() {
        plain();
        let chart = BarChart::new("Nothing");
        assert!(chart.render().contains("No data available"));
    }

    #[test]
    fn test_summary_card_scales_to_total() {
        plain();
        let counts = vec![
            CategoryCount {
                category: "OB".to_string(),
                count: 4,
            },
            CategoryCount {
                category: "ACCOUNT".to_string(),
                count: 2,
            },
        ];
        let mut card = SummaryCard::from_counts("Activity by Category", &counts, 8);
        card.bar_width = 8;
        let rendered = card.render();

        let ob_line = rendered.lines().find(|l| l.contains("OB")).unwrap();
        assert_eq!(ob_line.matches(BAR_FULL).count(), 4);
        let account_line = rendered.lines().find(|l| l.contains("ACCOUNT")).unwrap();
        assert_eq!(account_line.matches(BAR_FULL).count(), 2);
    }

    #[test]
    fn test_stacked_chart_from_cross_tab() {
        plain();
        let records = vec![
            ActivityRecord::untimed("OB", "PROCESS"),
            ActivityRecord::untimed("OB", "PROCESS"),
            ActivityRecord::untimed("OB", "WC"),
            ActivityRecord::untimed("ACCOUNT", "EMAIL"),
        ];
        let tab = build_cross_tab(&records);
        let chart = StackedBarChart::from_cross_tab("Breakdown", &tab).with_width(6);

        assert_eq!(chart.values, vec![vec![2, 1, 0], vec![0, 0, 1]]);

        let rendered = chart.render();
        let ob_line = rendered.lines().find(|l| l.contains("OB")).unwrap();
        assert_eq!(ob_line.matches(SERIES_GLYPHS[0]).count(), 4);
        assert_eq!(ob_line.matches(SERIES_GLYPHS[1]).count(), 2);
        assert!(rendered.contains("PROCESS"));
        assert!(rendered.contains("EMAIL"));
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(color_for(0), "cyan");
        assert_eq!(color_for(6), "cyan");
        assert_eq!(color_for(7), "magenta");
    }
}
