//! Text rendering of retained estimates.

use std::fmt;

use crate::cost::CostRecord;

/// Width of the algorithm name column
pub const DEFAULT_NAME_WIDTH: usize = 20;

/// One `name :: record` line per reported algorithm.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// Names longer than `width` are cut, shorter ones padded.
    pub fn render(entries: &[(&str, &CostRecord)], width: usize) -> Self {
        let lines = entries
            .iter()
            .map(|(name, record)| format!("{:<width$.width$} :: {}", name, record, width = width))
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Name column of every line, trimmed.
    pub fn names(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.split(" :: ").next())
            .map(str::trim_end)
            .collect()
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
