//! Styled terminal output.
//!
//! Every line the shell shows goes through a [`Console`]. Status lines carry
//! a tag (`[INFO]`, `[WARN]`, `[ERR!]`, `[DONE]`) and a local timestamp;
//! colors are applied only when the console was created with color enabled.

use std::io::{self, IsTerminal, Write};

use chrono::Local;
use colored::{ColoredString, Colorize};
use labelist_core::{CommandSpec, ROOT};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const CLEAR_SCREEN: &str = "\x1b[H\x1b[J";

#[derive(Debug, Clone, Copy)]
enum Status {
    Info,
    Warn,
    Error,
    Done,
}

impl Status {
    fn tag(self) -> &'static str {
        match self {
            Self::Info => "[INFO]",
            Self::Warn => "[WARN]",
            Self::Error => "[ERR!]",
            Self::Done => "[DONE]",
        }
    }

    fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Info => text.truecolor(0x00, 0xAA, 0xAA),
            Self::Warn => text.truecolor(0xEE, 0xAA, 0x55),
            Self::Error => text.truecolor(0xEE, 0x33, 0x00),
            Self::Done => text.truecolor(0x00, 0xEE, 0x99),
        }
    }
}

/// Output sink for the shell.
pub struct Console {
    out: Box<dyn Write>,
    color: bool,
    timestamps: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("color", &self.color)
            .field("timestamps", &self.timestamps)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Writes to `out`.
    pub fn new(out: Box<dyn Write>, color: bool) -> Self {
        Self {
            out,
            color,
            timestamps: true,
        }
    }

    /// Writes to standard output, colored when it is a terminal.
    pub fn stdout() -> Self {
        let color = io::stdout().is_terminal();
        Self::new(Box::new(io::stdout()), color)
    }

    /// Drops the timestamp from status lines.
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    fn style(&self, text: &str, paint: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %err, "console write failed");
        }
    }

    fn status(&mut self, status: Status, message: &str) {
        let prefix = if self.timestamps {
            format!("{} [{}]", status.tag(), Local::now().format(TIMESTAMP_FORMAT))
        } else {
            status.tag().to_string()
        };
        let prefix = self.style(&prefix, |t| status.paint(t));
        self.emit(&format!("{prefix} {message}"));
    }

    /// Informational line.
    pub fn info(&mut self, message: &str) {
        self.status(Status::Info, message);
    }

    /// Warning line.
    pub fn warn(&mut self, message: &str) {
        self.status(Status::Warn, message);
    }

    /// Error line.
    pub fn error(&mut self, message: &str) {
        self.status(Status::Error, message);
    }

    /// Completion line.
    pub fn done(&mut self, message: &str) {
        self.status(Status::Done, message);
    }

    /// Plain text, followed by a newline.
    pub fn print(&mut self, text: &str) {
        self.emit(text);
    }

    /// A bold `label` followed by `value`.
    pub fn field(&mut self, label: &str, value: &str) {
        let label = self.style(label, |t| t.bold());
        self.emit(&format!("{label} {value}"));
    }

    /// Clears the terminal.
    pub fn clear(&mut self) {
        if let Err(err) = write!(self.out, "{CLEAR_SCREEN}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %err, "console write failed");
        }
    }

    /// Renders rows under headers with every column padded to its widest
    /// cell.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        let header = pad_row(headers.iter().copied(), &widths);
        let header = self.style(&header, |t| t.bold().cyan());
        self.emit(&header);
        let rule = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");
        self.emit(&rule);
        for row in rows {
            self.emit(&pad_row(row.iter().map(String::as_str), &widths));
        }
    }

    /// Renders help for one command from its lexicon entry.
    pub fn help(&mut self, name: &str, spec: &CommandSpec) {
        let title = self.style("Command:", |t| t.bold().cyan());
        self.emit(&format!("{title} {name}\n"));

        if let Some(docs) = &spec.docs {
            let description = self.style(&docs.description, |t| t.truecolor(0x00, 0xAA, 0xAA));
            self.emit(&format!("{description}\n"));
        }

        let heading = self.style("Flags:", |t| t.bold().yellow());
        self.emit(&heading);
        for flag in spec.flags.flags() {
            let names = if flag.is_root() {
                format!("  <{ROOT}>")
            } else if flag.short.is_empty() {
                format!("  --{}", flag.long)
            } else {
                format!("  -{}/--{}", flag.short, flag.long)
            };
            let names = self.style(&names, |t| t.bold().white());
            let text = spec
                .docs
                .as_ref()
                .and_then(|docs| docs.flag_help(flag))
                .unwrap_or("No description available");
            let text = self.style(text, |t| t.truecolor(0x00, 0xAA, 0xAA));
            self.emit(&format!("{names} {text}"));
        }

        if let Some(examples) = spec.docs.as_ref().and_then(|d| d.examples.as_deref()) {
            let heading = self.style("Examples:", |t| t.bold().yellow());
            self.emit(&format!("\n{heading}"));
            let examples = self.style(examples.trim_end(), |t| t.truecolor(0x00, 0xAA, 0xAA));
            self.emit(&examples);
        }
    }
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Capture;
    use labelist_core::{CommandDocs, FlagDoc, FlagSchema};

    fn plain() -> (Console, Capture) {
        let capture = Capture::default();
        let console = Console::new(Box::new(capture.clone()), false).without_timestamps();
        (console, capture)
    }

    #[test]
    fn test_status_tags() {
        let (mut console, capture) = plain();
        console.info("loading");
        console.warn("careful");
        console.error("broken");
        console.done("finished");
        assert_eq!(
            capture.contents(),
            "[INFO] loading\n[WARN] careful\n[ERR!] broken\n[DONE] finished\n"
        );
    }

    #[test]
    fn test_timestamps_follow_tag() {
        let capture = Capture::default();
        let mut console = Console::new(Box::new(capture.clone()), false);
        console.info("hello");
        let line = capture.contents();
        assert!(line.starts_with("[INFO] ["));
        assert!(line.trim_end().ends_with("] hello"));
    }

    #[test]
    fn test_table_aligns_columns() {
        let (mut console, capture) = plain();
        console.table(
            &["Table", "Rows"],
            &[
                vec!["main".into(), "12".into()],
                vec!["archive_2025".into(), "3".into()],
            ],
        );
        let out = capture.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Table         Rows");
        assert_eq!(lines[2], "main          12");
        assert_eq!(lines[3], "archive_2025  3");
    }

    #[test]
    fn test_help_lists_flags_and_examples() {
        let (mut console, capture) = plain();
        let spec = CommandSpec::new(
            FlagSchema::default()
                .with_flag("", "ROOT")
                .with_flag("a", "all")
                .with_flag("h", "help"),
        )
        .with_docs(CommandDocs {
            description: "Lists things.".into(),
            additions: vec![FlagDoc {
                flag: "a".into(),
                add: "Everything.".into(),
            }],
            examples: Some("ls --all\n".into()),
        });

        console.help("ls", &spec);
        let out = capture.contents();
        assert!(out.starts_with("Command: ls\n"));
        assert!(out.contains("Lists things."));
        assert!(out.contains("  <ROOT> No description available"));
        assert!(out.contains("  -a/--all Everything."));
        assert!(out.contains("  -h/--help No description available"));
        assert!(out.ends_with("Examples:\nls --all\n"));
    }

    #[test]
    fn test_plain_console_has_no_escape_codes() {
        let (mut console, capture) = plain();
        console.field("KEY", "tablename");
        assert_eq!(capture.contents(), "KEY tablename\n");
    }
}
