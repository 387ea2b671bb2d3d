use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod activity_log;
mod aggregation;
mod ascii_charts;
mod charts_png;
mod classifier;
mod cli_output;
mod config;
mod crosstab;
mod error;
mod export;
mod importer;
mod models;
mod render;
mod tui;

use activity_log::ActivityLog;
use aggregation::take_top;
use charts_png::ChartRenderer;
use cli_output::{OutputMode, OutputWriter};
use config::TallyConfig;
use error::TallyError;
use importer::SAMPLE_DATA;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Count and chart account activity logs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tab-separated input file (category<TAB>action per line), `-` for stdin
    #[arg(short, long, global = true)]
    input: Vec<PathBuf>,

    /// Append the built-in sample data
    #[arg(long, global = true)]
    sample: bool,

    /// Config file (default: <config dir>/activity-tally/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the activity counters and the top categories/actions
    Summary,

    /// Show distribution charts and the category x action breakdown
    Dashboard,

    /// List every imported record
    Table,

    /// Produce a full report
    Report {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the records as CSV
    Export {
        /// Output file path, `-` for stdout (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render PNG charts
    Charts {
        /// Output directory (default: from config)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },

    /// Launch the interactive dashboard
    Tui,

    /// Print the built-in sample data
    Sample,

    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Markdown,
}

fn init_logging(verbose: bool) -> Result<()> {
    // RUST_LOG wins over --verbose when it is set
    if std::env::var("RUST_LOG").is_ok() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(());
    }

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return io::read_to_string(io::stdin()).context("Failed to read stdin");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Import every input in order, then the sample if requested
fn load_log(inputs: &[PathBuf], sample: bool) -> Result<ActivityLog> {
    let mut log = ActivityLog::new();

    for path in inputs {
        let text = read_input(path)?;
        let added = log
            .import_text(&text)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        debug!("{}: {} records", path.display(), added);
    }

    if sample {
        log.import_text(SAMPLE_DATA)?;
    }

    Ok(log)
}

fn require_records(log: &ActivityLog) -> Result<()> {
    if log.is_empty() {
        return Err(TallyError::EmptyInput.into());
    }
    Ok(())
}

fn write_or_print(out: &OutputWriter, content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            out.success(&format!("Report saved to: {}", path.display()));
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let out = OutputWriter::new(OutputMode::resolve(cli.json));
    if !out.is_human() {
        colored::control::set_override(false);
    }

    let config = TallyConfig::load(cli.config.as_deref())?;
    let log = load_log(&cli.input, cli.sample)?;

    match cli.command {
        Commands::Summary => {
            require_records(&log)?;
            let report = log.report();
            if out.is_json() {
                out.json(&serde_json::json!({
                    "totalRecords": report.total_records,
                    "counters": report.counters,
                    "topCategories": take_top(&report.category_counts, config.top_n),
                    "topActions": take_top(&report.action_counts, config.top_n),
                }))?;
            } else {
                out.section("Activity Summary");
                out.block(&render::summary_view(&report, &config, out.is_human()));
            }
        }

        Commands::Dashboard => {
            require_records(&log)?;
            let report = log.report();
            if out.is_json() {
                out.json(&serde_json::json!({
                    "categoryCounts": report.category_counts,
                    "actionCounts": report.action_counts,
                    "crossTab": report.cross_tab.rows,
                }))?;
            } else {
                out.section("Dashboard");
                out.block(&render::dashboard_view(&report, &config));
            }
        }

        Commands::Table => {
            require_records(&log)?;
            if out.is_json() {
                out.json(&log.records())?;
            } else {
                out.block(&render::records_table(log.records(), out.is_human()));
            }
        }

        Commands::Report { format, output } => {
            require_records(&log)?;
            info!("Building {:?} report for {} records", format, log.len());
            let report = log.report();

            let content = match format {
                ReportFormat::Text => render::text_report(&report, &config),
                ReportFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
                ReportFormat::Markdown => render::markdown_report(&report),
            };
            write_or_print(&out, &content, output.as_deref())?;
        }

        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| config.csv_path());
            if path.as_os_str() == "-" {
                println!("{}", export::to_csv(log.records())?);
            } else {
                export::write_csv(log.records(), &path)?;
                out.success(&format!(
                    "Exported {} records to {}",
                    log.len(),
                    path.display()
                ));
            }
        }

        Commands::Charts { output_dir } => {
            let mut renderer = ChartRenderer::new(&config);
            if let Some(dir) = output_dir {
                renderer = renderer.with_output_dir(dir);
            }

            let paths = renderer
                .render_all(&log.report())
                .map_err(|e| TallyError::Chart(e.to_string()))?;
            if out.is_json() {
                out.json(&paths)?;
            } else if paths.is_empty() {
                out.warning(render::NO_DATA_MESSAGE);
            } else {
                out.section("Charts");
                for path in &paths {
                    out.success(&format!("Generated {}", path.display()));
                }
            }
        }

        Commands::Tui => {
            info!("Starting interactive dashboard...");
            tui::run_tui(log, &config)?;
        }

        Commands::Sample => {
            println!("{}", SAMPLE_DATA);
        }

        Commands::Config { save } => {
            if save {
                let path = cli
                    .config
                    .clone()
                    .or_else(TallyConfig::config_file_path)
                    .context("Could not determine a config file location")?;
                config.save_to(&path)?;
                out.success(&format!("Config saved to: {}", path.display()));
            }

            if out.is_json() {
                out.json(&config)?;
            } else {
                out.section("Configuration");
                match cli.config.clone().or_else(TallyConfig::config_file_path) {
                    Some(path) if path.exists() => {
                        out.info(&format!("Config file: {}", path.display()))
                    }
                    _ => out.info("No config file found, using defaults"),
                }
                out.block(&serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
