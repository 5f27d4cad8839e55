//! Terminal summary table.
//!
//! Renders the per-module file counts shown after a verbose run:
//!
//! ```text
//!   ┌──────────────────────────┬───────┐
//!   │ Module                   │ Files │
//!   ├──────────────────────────┼───────┤
//!   │ github.com/gogo/protobuf │    12 │
//!   └──────────────────────────┴───────┘
//! ```
//!
//! The first column shrinks (with `...`) when the terminal is too narrow.

use colored::*;
use console::{measure_text_width, truncate_str};

const INDENT: &str = "  ";
const MIN_COL: usize = 8;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        let (_, term_width) = console::Term::stdout().size();
        print!("{}", self.render(term_width as usize));
    }

    /// Lay the table out for a terminal `max_width` columns wide. Cells after
    /// the first are right aligned.
    pub fn render(&self, max_width: usize) -> String {
        if self.headers.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| measure_text_width(h))
            .collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(measure_text_width(&flatten(cell)));
            }
        }

        let overhead = INDENT.len() + 1 + 3 * widths.len();
        let needed = overhead + widths.iter().sum::<usize>();
        if needed > max_width {
            let excess = needed - max_width;
            widths[0] = widths[0].saturating_sub(excess).max(MIN_COL);
        }

        let line = |left: &str, mid: &str, right: &str| -> String {
            let cells: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{INDENT}{left}{}{right}\n", cells.join(mid))
        };

        let mut out = line("┌", "┬", "┐");
        out.push_str(&self.render_row(&self.headers, &widths, true));
        out.push_str(&line("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&self.render_row(row, &widths, false));
        }
        out.push_str(&line("└", "┴", "┘"));
        out
    }

    fn render_row(&self, cells: &[String], widths: &[usize], header: bool) -> String {
        let mut out = format!("{INDENT}│");
        for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
            let text = flatten(cell);
            let text = truncate_str(&text, width, "...");
            let pad = " ".repeat(width.saturating_sub(measure_text_width(&text)));
            let shown = if header {
                text.bold().to_string()
            } else {
                text.to_string()
            };
            if i == 0 || header {
                out.push_str(&format!(" {shown}{pad} │"));
            } else {
                out.push_str(&format!(" {pad}{shown} │"));
            }
        }
        out.push('\n');
        out
    }
}

fn flatten(s: &str) -> String {
    s.replace(['\n', '\r', '\t'], " ")
}
