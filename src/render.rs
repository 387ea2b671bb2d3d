// Terminal tables for records, counters and count lists
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::aggregation::{label_or_unknown, take_top};
use crate::ascii_charts::{BarChart, StackedBarChart, SummaryCard};
use crate::classifier::NamedCounters;
use crate::config::TallyConfig;
use crate::models::{ActivityRecord, ActivityReport, CategoryActionCount};

pub const NO_RECORDS_MESSAGE: &str = "No records found. Import some data to get started.";
pub const NO_DATA_MESSAGE: &str = "No data available. Import some data to see visualizations.";

/// Category badge, used to color the category column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Account,
    Ob,
    Ib,
    Team,
    Other,
}

impl Badge {
    pub fn for_category(category: &str) -> Self {
        let lower = category.to_lowercase();
        match lower.as_str() {
            "account" => Badge::Account,
            "ob" => Badge::Ob,
            "ib" => Badge::Ib,
            _ if lower.contains("team") => Badge::Team,
            _ => Badge::Other,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Badge::Account => Color::Blue,
            Badge::Ob => Color::Magenta,
            Badge::Ib => Color::Green,
            Badge::Team => Color::Yellow,
            Badge::Other => Color::Grey,
        }
    }
}

fn new_table(styled: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if !styled {
        table.force_no_tty();
    }
    table
}

pub fn records_table(records: &[ActivityRecord], styled: bool) -> String {
    let mut table = new_table(styled);
    table.set_header(vec!["#", "Category", "Action"]);

    if records.is_empty() {
        table.add_row(vec![Cell::new(""), Cell::new(NO_RECORDS_MESSAGE), Cell::new("")]);
    }

    for (i, record) in records.iter().enumerate() {
        let badge = Badge::for_category(&record.category);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(label_or_unknown(&record.category)).fg(badge.color()),
            Cell::new(label_or_unknown(&record.action)),
        ]);
    }

    format!("{table}\n  Activity Records ({} total)\n", records.len())
}

pub fn counters_table(counters: &NamedCounters, styled: bool) -> String {
    let mut table = new_table(styled);
    table.set_header(vec!["Activity Type", "Count"]);

    for (counter, count) in counters.iter() {
        table.add_row(vec![
            Cell::new(counter.label()),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }

    format!("{table}\n  Summary of activity counts\n")
}

pub fn category_action_table(counts: &[CategoryActionCount], styled: bool) -> String {
    let mut table = new_table(styled);
    table.set_header(vec!["Category", "Action", "Count"]);

    for item in counts {
        table.add_row(vec![
            Cell::new(&item.category).fg(Badge::for_category(&item.category).color()),
            Cell::new(&item.action),
            Cell::new(item.count).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

/// Counters table followed by the top-N category and action cards
pub fn summary_view(report: &ActivityReport, config: &TallyConfig, styled: bool) -> String {
    let mut output = counters_table(&report.counters, styled);
    if report.is_empty() {
        return output;
    }

    output.push('\n');
    let categories = take_top(&report.category_counts, config.top_n);
    let mut card =
        SummaryCard::from_counts("Activity by Category", &categories, report.total_records);
    card.bar_width = config.bar_width.min(24);
    output.push_str(&card.render());

    output.push('\n');
    let actions = take_top(&report.action_counts, config.top_n);
    let mut card = SummaryCard::from_counts("Activity by Action", &actions, report.total_records)
        .with_color("magenta");
    card.bar_width = config.bar_width.min(24);
    output.push_str(&card.render());

    output
}

/// Distribution charts plus the stacked category x action breakdown
pub fn dashboard_view(report: &ActivityReport, config: &TallyConfig) -> String {
    if report.is_empty() {
        return format!("  {}\n", NO_DATA_MESSAGE);
    }

    let mut output = String::new();
    output.push_str(
        &BarChart::from_counts("Activity Distribution by Category", &report.category_counts)
            .with_width(config.bar_width)
            .render(),
    );
    output.push('\n');
    output.push_str(
        &BarChart::from_counts("Activity Distribution by Action", &report.action_counts)
            .with_width(config.bar_width)
            .render(),
    );
    output.push('\n');
    output.push_str(
        &StackedBarChart::from_cross_tab("Category by Action Breakdown", &report.cross_tab)
            .with_width(config.bar_width)
            .render(),
    );
    output
}

/// Markdown rendition of the full report
pub fn markdown_report(report: &ActivityReport) -> String {
    let mut md = String::new();
    md.push_str("# Account Activity Report\n\n");
    md.push_str(&format!("Total records: **{}**\n\n", report.total_records));

    md.push_str("## Activity Summary\n\n| Activity Type | Count |\n|---|---:|\n");
    for (counter, count) in report.counters.iter() {
        md.push_str(&format!("| {} | {} |\n", counter.label(), count));
    }

    md.push_str("\n## Activity by Category\n\n| Category | Count |\n|---|---:|\n");
    for item in &report.category_counts {
        md.push_str(&format!("| {} | {} |\n", item.category, item.count));
    }

    md.push_str("\n## Activity by Action\n\n| Action | Count |\n|---|---:|\n");
    for item in &report.action_counts {
        md.push_str(&format!("| {} | {} |\n", item.action, item.count));
    }

    md.push_str("\n## Category by Action\n\n");
    if report.cross_tab.is_empty() {
        md.push_str("_No data_\n");
        return md;
    }

    // Zero-filled only here, for display; the cross-tab rows stay sparse
    md.push_str(&format!("| Category | {} |\n", report.cross_tab.actions.join(" | ")));
    md.push_str(&format!(
        "|---|{}\n",
        "---:|".repeat(report.cross_tab.actions.len())
    ));
    for row in &report.cross_tab.rows {
        let cells: Vec<String> = report
            .cross_tab
            .actions
            .iter()
            .map(|a| row.get(a).to_string())
            .collect();
        md.push_str(&format!("| {} | {} |\n", row.category, cells.join(" | ")));
    }

    md
}

/// Plain text rendition of the full report, free of ANSI colors
pub fn text_report(report: &ActivityReport, config: &TallyConfig) -> String {
    colored::control::set_override(false);

    let mut output = summary_view(report, config, false);
    output.push('\n');
    output.push_str(&dashboard_view(report, config));
    if !report.category_action_counts.is_empty() {
        output.push('\n');
        output.push_str(&category_action_table(&report.category_action_counts, false));
        output.push('\n');
    }
    output
}
