//! Script-friendly rendering of command results.
//!
//! Every command reports what it did as a stream of [`OutputEvent`]s.  The
//! global `--output` flag picks how they are written: `key=value` text, one
//! JSON object per line, or TSV/CSV with a single header row.

use crate::window::{Window, WindowId};
use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

/// Column order shared by every format.
pub const OUTPUT_HEADERS: [&str; 8] = [
    "command",
    "action",
    "window_id",
    "app_name",
    "workspace",
    "target_workspace",
    "result",
    "message",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Tsv,
    Csv,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported output format: {0}")]
pub struct UnsupportedFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

/// Outcome of one step of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputEvent {
    pub command: String,
    pub action: String,
    pub window_id: WindowId,
    pub app_name: String,
    pub workspace: String,
    pub target_workspace: String,
    /// `ok`, `error`, `skipped` or `none`.
    pub result: String,
    pub message: String,
}

impl OutputEvent {
    pub fn new(command: &str, action: &str) -> Self {
        Self {
            command: command.to_string(),
            action: action.to_string(),
            ..Default::default()
        }
    }

    /// Fill in the window columns.
    pub fn window(mut self, window: &Window) -> Self {
        self.window_id = window.id;
        self.app_name = window.app_name.clone();
        self.workspace = window.workspace.clone();
        self
    }

    pub fn target(mut self, workspace: &str) -> Self {
        self.target_workspace = workspace.to_string();
        self
    }

    pub fn ok(mut self) -> Self {
        self.result = "ok".into();
        self
    }

    pub fn failed(mut self, message: impl ToString) -> Self {
        self.result = "error".into();
        self.message = message.to_string();
        self
    }

    pub fn result(mut self, result: &str, message: impl ToString) -> Self {
        self.result = result.to_string();
        self.message = message.to_string();
        self
    }

    pub fn is_error(&self) -> bool {
        self.result == "error"
    }

    fn row(&self) -> [String; 8] {
        [
            self.command.clone(),
            self.action.clone(),
            self.window_id.to_string(),
            self.app_name.clone(),
            self.workspace.clone(),
            self.target_workspace.clone(),
            self.result.clone(),
            self.message.clone(),
        ]
    }
}

/// Something that accepts events.  Lets the orchestrator stay agnostic of
/// where events end up.
pub trait EventSink {
    fn emit(&mut self, event: OutputEvent) -> io::Result<()>;
}

impl EventSink for Vec<OutputEvent> {
    fn emit(&mut self, event: OutputEvent) -> io::Result<()> {
        self.push(event);
        Ok(())
    }
}

/// Writes events to `W` in the chosen [`OutputFormat`].
pub struct OutputFormatter<W: Write> {
    format: OutputFormat,
    out: W,
    header_written: bool,
}

impl<W: Write> OutputFormatter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            format,
            out,
            header_written: false,
        }
    }

    pub fn print(&mut self, event: &OutputEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.print_text(event),
            OutputFormat::Json => {
                let line = serde_json::to_string(event)?;
                writeln!(self.out, "{}", line)
            }
            OutputFormat::Tsv => self.print_separated(event, '\t'),
            OutputFormat::Csv => self.print_separated(event, ','),
        }
    }

    fn print_text(&mut self, event: &OutputEvent) -> io::Result<()> {
        let line = OUTPUT_HEADERS
            .iter()
            .zip(event.row())
            .map(|(key, value)| format!("{}={}", key, quote_if_needed(&value)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.out, "{}", line)
    }

    fn print_separated(&mut self, event: &OutputEvent, sep: char) -> io::Result<()> {
        if !self.header_written {
            let header = OUTPUT_HEADERS
                .iter()
                .map(|h| separated_field(h, sep))
                .collect::<Vec<_>>()
                .join(&sep.to_string());
            writeln!(self.out, "{}", header)?;
            self.header_written = true;
        }
        let row = event
            .row()
            .iter()
            .map(|v| separated_field(v, sep))
            .collect::<Vec<_>>()
            .join(&sep.to_string());
        writeln!(self.out, "{}", row)
    }
}

impl<W: Write> EventSink for OutputFormatter<W> {
    fn emit(&mut self, event: OutputEvent) -> io::Result<()> {
        self.print(&event)
    }
}

/// Text values: empty becomes `""`; whitespace or quotes force quoting with
/// inner quotes escaped.
fn quote_if_needed(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if value.contains([' ', '\t', '"']) {
        return format!("\"{}\"", value.replace('"', "\\\""));
    }
    value.to_string()
}

/// Delimited values are quoted when they contain the separator, a quote, a
/// line break, or start with a space; inner quotes are doubled.
fn separated_field(value: &str, sep: char) -> String {
    let needs_quotes = value.contains([sep, '"', '\r', '\n']) || value.starts_with(' ');
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
