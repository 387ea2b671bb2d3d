// Mode-aware CLI output: colors for people, plain text for pipes, JSON for scripts
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, IsTerminal};

/// Environment variable that forces JSON output
pub const JSON_ENV_VAR: &str = "TALLY_JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colors and box drawing
    Human,
    /// Machine-readable JSON
    Json,
    /// Plain text without colors (for pipes/logs)
    Plain,
}

impl OutputMode {
    /// Auto-detect output mode based on environment
    pub fn auto() -> Self {
        if std::env::var(JSON_ENV_VAR).is_ok() {
            Self::Json
        } else if !io::stdout().is_terminal() {
            Self::Plain
        } else {
            Self::Human
        }
    }

    pub fn resolve(force_json: bool) -> Self {
        if force_json {
            Self::Json
        } else {
            Self::auto()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Success,
    Info,
    Warning,
}

/// One status line in JSON mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub level: MessageLevel,
    pub message: String,
}

pub struct OutputWriter {
    mode: OutputMode,
}

impl OutputWriter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn section(&self, title: &str) {
        match self.mode {
            OutputMode::Human => {
                println!();
                println!("{}", title.cyan().bold());
                println!("{}", "═".repeat(title.chars().count()).cyan());
            }
            OutputMode::Plain => {
                println!();
                println!("{}", title);
                println!("{}", "=".repeat(title.chars().count()));
            }
            OutputMode::Json => {}
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "✓".green(), message),
            OutputMode::Plain => println!("  [OK] {}", message),
            OutputMode::Json => self.emit_status(MessageLevel::Success, message),
        }
    }

    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Plain => println!("  {}", message),
            OutputMode::Json => self.emit_status(MessageLevel::Info, message),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "⚠".yellow(), message),
            OutputMode::Plain => println!("  [WARN] {}", message),
            OutputMode::Json => self.emit_status(MessageLevel::Warning, message),
        }
    }

    /// Print a pre-rendered block (tables, charts); skipped in JSON mode
    pub fn block(&self, text: &str) {
        if !matches!(self.mode, OutputMode::Json) {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
    }

    /// Print a value as pretty JSON regardless of mode
    pub fn json<T: Serialize>(&self, value: &T) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn emit_status(&self, level: MessageLevel, message: &str) {
        let status = StatusMessage {
            level,
            message: message.to_string(),
        };
        if let Ok(json) = serde_json::to_string(&status) {
            // Status lines go to stderr so stdout stays a single JSON document
            eprintln!("{}", json);
        }
    }

    /// Colors and glyphs only make sense on a terminal
    pub fn is_human(&self) -> bool {
        matches!(self.mode, OutputMode::Human)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }
}
