use anyhow::{Context, Result};
use serde::Serialize;

/// Text or JSON rendering, chosen once by `--json`
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Render `value` as pretty JSON, or fall back to `text`
    pub fn render<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> Result<String> {
        if self.json {
            serde_json::to_string_pretty(value).context("Failed to serialize output")
        } else {
            Ok(text())
        }
    }
}

/// Left-align `rows` into columns separated by two spaces
pub fn table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(col, cell)| format!("{:<width$}", cell, width = widths[col]))
                .collect();
            line.join("  ").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
