// TUI module - interactive activity dashboard
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::activity_log::ActivityLog;
use crate::aggregation::{label_or_unknown, take_top};
use crate::config::TallyConfig;
use crate::export;
use crate::importer::SAMPLE_DATA;
use crate::models::{ActivityRecord, ActivityReport, Counted};
use crate::render::{Badge, NO_DATA_MESSAGE, NO_RECORDS_MESSAGE};

const TAB_TITLES: [&str; 3] = ["[1] Summary", "[2] Dashboard", "[3] Data Table"];

const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

/// App state for the TUI
pub struct App {
    pub log: ActivityLog,
    pub report: ActivityReport,
    pub selected_tab: usize,
    pub selected_row: usize,
    pub status_message: String,
    pub top_n: usize,
    pub csv_path: PathBuf,
}

impl App {
    pub fn new(log: ActivityLog, config: &TallyConfig) -> Self {
        let report = log.report();
        Self {
            log,
            report,
            selected_tab: 0,
            selected_row: 0,
            status_message: "Press 's' to load sample data, 'q' to quit".to_string(),
            top_n: config.top_n,
            csv_path: config.csv_path(),
        }
    }

    fn refresh(&mut self) {
        self.report = self.log.report();
        if self.selected_row >= self.log.len() {
            self.selected_row = self.log.len().saturating_sub(1);
        }
    }

    pub fn load_sample(&mut self) {
        match self.log.import_text(SAMPLE_DATA) {
            Ok(added) => self.status_message = format!("Imported {} records", added),
            Err(e) => self.status_message = e.to_string(),
        }
        self.refresh();
    }

    pub fn clear(&mut self) {
        match self.log.clear() {
            Ok(_) => self.status_message = "All data has been cleared".to_string(),
            Err(e) => self.status_message = e.to_string(),
        }
        self.refresh();
    }

    pub fn export_csv(&mut self) {
        self.status_message = match export::write_csv(self.log.records(), &self.csv_path) {
            Ok(()) => format!("CSV file written to {}", self.csv_path.display()),
            Err(e) => e.to_string(),
        };
    }

    pub fn next_tab(&mut self) {
        self.selected_tab = (self.selected_tab + 1) % TAB_TITLES.len();
    }

    pub fn prev_tab(&mut self) {
        self.selected_tab = if self.selected_tab == 0 {
            TAB_TITLES.len() - 1
        } else {
            self.selected_tab - 1
        };
    }

    pub fn next_row(&mut self) {
        let max_rows = self.log.len();
        if max_rows > 0 {
            self.selected_row = (self.selected_row + 1) % max_rows;
        }
    }

    pub fn prev_row(&mut self) {
        let max_rows = self.log.len();
        if max_rows > 0 {
            self.selected_row = if self.selected_row == 0 {
                max_rows - 1
            } else {
                self.selected_row - 1
            };
        }
    }

    /// Apply one key press; returns false when the app should exit
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Tab => self.next_tab(),
            KeyCode::BackTab => self.prev_tab(),
            KeyCode::Down | KeyCode::Char('j') => self.next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.prev_row(),
            KeyCode::Char('s') => self.load_sample(),
            KeyCode::Char('c') => self.clear(),
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('1') => self.selected_tab = 0,
            KeyCode::Char('2') => self.selected_tab = 1,
            KeyCode::Char('3') => self.selected_tab = 2,
            _ => {}
        }
        true
    }
}

/// Run the TUI application
pub fn run_tui(log: ActivityLog, config: &TallyConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(log, config);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    debug!("Leaving TUI with {} records", app.log.len());
                    return Ok(());
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title + tabs
            Constraint::Length(3), // Status
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let tabs = Tabs::new(TAB_TITLES.to_vec())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Account Activity Tracker "),
        )
        .select(app.selected_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let status = Paragraph::new(format!(
        "{} | {} records",
        app.status_message, app.report.total_records
    ))
    .block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(status, chunks[1]);

    match app.selected_tab {
        0 => render_summary(f, app, chunks[2]),
        1 => render_dashboard(f, app, chunks[2]),
        2 => render_records(f, app, chunks[2]),
        _ => {}
    }

    let footer_text =
        " q:Quit | Tab:Switch | j/k:Scroll | s:Sample data | c:Clear | e:Export CSV | 1-3:Jump to tab ";
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[3]);
}

fn placeholder(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let widget = Paragraph::new(message.to_string())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(widget, area);
}

fn share_bar(count: usize, total: usize, width: usize) -> String {
    let filled = if total > 0 {
        ((count as f64 / total as f64) * width as f64) as usize
    } else {
        0
    }
    .min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

fn top_rows<T: Counted + Clone>(items: &[T], top_n: usize, total: usize) -> Vec<Row<'static>> {
    take_top(items, top_n)
        .iter()
        .map(|item| {
            Row::new(vec![
                item.label(),
                item.count().to_string(),
                share_bar(item.count(), total, 20),
            ])
        })
        .collect()
}

fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let rows: Vec<Row> = app
        .report
        .counters
        .iter()
        .map(|(counter, count)| Row::new(vec![counter.label().to_string(), count.to_string()]))
        .collect();

    let counters = Table::new(rows, [Constraint::Min(38), Constraint::Length(8)])
        .header(
            Row::new(vec!["Activity Type", "Count"])
                .style(Style::default().add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Activity Summary "),
        );
    f.render_widget(counters, columns[0]);

    let cards = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    let total = app.report.total_records;
    let widths = [
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(22),
    ];

    let by_category = Table::new(
        top_rows(&app.report.category_counts, app.top_n, total),
        widths,
    )
    .style(Style::default().fg(Color::Cyan))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Activity by Category "),
    );
    f.render_widget(by_category, cards[0]);

    let by_action = Table::new(top_rows(&app.report.action_counts, app.top_n, total), widths)
        .style(Style::default().fg(Color::Magenta))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Activity by Action "),
        );
    f.render_widget(by_action, cards[1]);
}

fn count_bars<T: Counted>(items: &[T], color: Color) -> Vec<Bar<'static>> {
    items
        .iter()
        .map(|item| {
            Bar::default()
                .value(item.count() as u64)
                .label(Line::from(truncate(&item.label(), 10)))
                .style(Style::default().fg(color))
        })
        .collect()
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    if app.report.is_empty() {
        placeholder(f, area, " Dashboard ", NO_DATA_MESSAGE);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let category_bars = count_bars(&app.report.category_counts, Color::Cyan);
    let categories = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Distribution by Category "),
        )
        .data(BarGroup::default().bars(&category_bars))
        .bar_width(10)
        .bar_gap(1);
    f.render_widget(categories, top[0]);

    let action_bars = count_bars(&app.report.action_counts, Color::Magenta);
    let actions = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Distribution by Action "),
        )
        .data(BarGroup::default().bars(&action_bars))
        .bar_width(10)
        .bar_gap(1);
    f.render_widget(actions, top[1]);

    render_breakdown(f, app, rows[1]);
}

fn render_breakdown(f: &mut Frame, app: &App, area: Rect) {
    let tab = &app.report.cross_tab;
    let max_total = tab.rows.iter().map(|r| r.total()).max().unwrap_or(1).max(1);
    let label_width = tab
        .categories
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(8);
    let bar_width = (area.width as usize).saturating_sub(label_width + 12).max(10);

    let mut lines: Vec<Line> = tab
        .rows
        .iter()
        .map(|row| {
            let mut spans = vec![Span::raw(format!("{:width$} ", row.category, width = label_width))];
            for (i, action) in tab.actions.iter().enumerate() {
                let value = row.get(action);
                if value == 0 {
                    continue;
                }
                let cells = ((value as f64 / max_total as f64) * bar_width as f64) as usize;
                spans.push(Span::styled(
                    "█".repeat(cells.max(1)),
                    Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]),
                ));
            }
            spans.push(Span::raw(format!(" {}", row.total())));
            Line::from(spans)
        })
        .collect();

    lines.push(Line::from(""));
    let legend: Vec<Span> = tab
        .actions
        .iter()
        .enumerate()
        .flat_map(|(i, action)| {
            vec![
                Span::styled("■ ", Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()])),
                Span::raw(format!("{}   ", action)),
            ]
        })
        .collect();
    lines.push(Line::from(legend));

    let breakdown = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Category by Action Breakdown "),
    );
    f.render_widget(breakdown, area);
}

fn record_row(index: usize, record: &ActivityRecord) -> Row<'static> {
    let color = match Badge::for_category(&record.category) {
        Badge::Account => Color::Blue,
        Badge::Ob => Color::Magenta,
        Badge::Ib => Color::Green,
        Badge::Team => Color::Yellow,
        Badge::Other => Color::Gray,
    };

    Row::new(vec![
        Line::from((index + 1).to_string()),
        Line::from(Span::styled(
            label_or_unknown(&record.category).to_string(),
            Style::default().fg(color),
        )),
        Line::from(label_or_unknown(&record.action).to_string()),
    ])
}

fn render_records(f: &mut Frame, app: &App, area: Rect) {
    let records = app.log.records();
    if records.is_empty() {
        placeholder(f, area, " Activity Records ", NO_RECORDS_MESSAGE);
        return;
    }

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, r)| record_row(i, r))
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(33),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec!["#", "Category", "Action"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Activity Records ({} total) ", records.len())),
    );

    let mut state = TableState::default().with_selected(Some(app.selected_row));
    f.render_stateful_widget(table, area, &mut state);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 1).collect();
        format!("{}…", head)
    }
}
