//! Terminal display sink
//!
//! Rows are printed as soon as they are committed: committed rows always form
//! a prefix of the list, so only the rows past the last printed one are new.
//! A progress bar tracks the rows still loading.

use crate::domain::{SuggestionOption, SuggestionSet};
use crate::progress::Progress;
use crate::suggest::{DisplayRow, DisplaySink};
use colored::Colorize;
use std::io::Write;
use tracing::warn;

/// Minimum width of the name column
const NAME_WIDTH: usize = 28;

/// Format one numbered row
pub fn format_row(number: usize, set: &SuggestionSet, color: bool) -> String {
    let slot = |option: &SuggestionOption| {
        if option.has_label() {
            option.label.clone()
        } else if color {
            "-".dimmed().to_string()
        } else {
            "-".to_string()
        }
    };

    let name = format!("{:width$}", set.candidate.name, width = NAME_WIDTH);
    let number = format!("{:>3}", number);
    let (number, name, current) = if color {
        (
            number.bold().to_string(),
            name.bright_white().to_string(),
            set.current().label.dimmed().to_string(),
        )
    } else {
        (number, name, set.current().label.clone())
    };

    format!(
        "{} {} {:12} c: {:14} l: {}",
        number,
        name,
        current,
        slot(set.compatible()),
        slot(set.latest())
    )
}

/// Prints committed rows to a writer, with a progress bar for pending rows
pub struct TerminalSink<W: Write + Send> {
    writer: W,
    progress: Progress,
    printed: usize,
    color: bool,
}

impl<W: Write + Send> TerminalSink<W> {
    /// Create a sink; the progress bar is only shown when `show_progress`
    pub fn new(writer: W, show_progress: bool, color: bool) -> Self {
        Self {
            writer,
            progress: Progress::new(show_progress),
            printed: 0,
            color,
        }
    }

    /// Number of rows printed so far
    pub fn printed(&self) -> usize {
        self.printed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn print_new_rows(&mut self, rows: &[DisplayRow]) {
        let filled = rows.iter().take_while(|row| !row.is_loading()).count();
        if filled <= self.printed {
            return;
        }

        let lines: Vec<String> = rows[self.printed..filled]
            .iter()
            .filter_map(DisplayRow::as_set)
            .enumerate()
            .map(|(offset, set)| format_row(self.printed + offset + 1, set, self.color))
            .collect();

        let writer = &mut self.writer;
        let result = self.progress.suspend(|| -> std::io::Result<()> {
            for line in &lines {
                writeln!(writer, "{}", line)?;
            }
            writer.flush()
        });
        if let Err(e) = result {
            warn!(error = %e, "failed to write rows");
        }
        self.printed = filled;
    }
}

impl<W: Write + Send> DisplaySink for TerminalSink<W> {
    fn render(&mut self, rows: &[DisplayRow]) {
        if !self.progress.is_active() && self.printed == 0 {
            self.progress.start(rows.len() as u64, "Resolving upgrades");
        }
        self.print_new_rows(rows);
        self.progress.update(self.printed as u64, rows.len() as u64);
    }

    fn finish(&mut self, rows: &[DisplayRow]) {
        self.print_new_rows(rows);
        self.progress.finish_and_clear();
    }
}
