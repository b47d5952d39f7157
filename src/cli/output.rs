//! Styled terminal output. Every shell message goes through [`print`].

use std::fmt;
use std::sync::{OnceLock, RwLock};

use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// No colours or icons; labels only. Used by scripts and screen readers.
    pub plain: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "INFO",
        MessageKind::Success => "SUCCESS",
        MessageKind::Warning => "WARNING",
        MessageKind::Error => "ERROR",
        MessageKind::Hint => "HINT",
        MessageKind::Section => "",
    }
}

pub(crate) fn apply_style(
    kind: MessageKind,
    message: impl fmt::Display,
    prefs: &OutputPreferences,
) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => format!("{}: {}", label(kind), text),
    };

    if prefs.plain {
        return formatted;
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message, &preferences());
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Prints an unlabelled line, e.g. a table row.
pub fn line(text: impl fmt::Display) {
    println!("{text}");
}

/// Left-aligned columns sized to the widest cell; the header is bolded unless plain.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    for text in render_table(headers, rows, &preferences()) {
        println!("{text}");
    }
}

pub(crate) fn render_table(
    headers: &[&str],
    rows: &[Vec<String>],
    prefs: &OutputPreferences,
) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let join = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header = join(headers.iter().map(|h| h.to_string()).collect());
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(if prefs.plain {
        header
    } else {
        header.bold().to_string()
    });
    lines.extend(rows.iter().map(|row| join(row.clone())));
    lines
}

/// Two-column `label: value` listing with aligned values.
pub fn pairs(rows: &[(&str, String)]) {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in rows {
        println!("  {:<width$}  {}", format!("{label}:"), value, width = width + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: OutputPreferences = OutputPreferences { plain: true };

    #[test]
    fn plain_messages_carry_labels_only() {
        assert_eq!(apply_style(MessageKind::Error, "boom", &PLAIN), "ERROR: boom");
        assert_eq!(apply_style(MessageKind::Section, " Goals ", &PLAIN), "=== Goals ===");
    }

    #[test]
    fn table_pads_columns() {
        let rows = vec![
            vec!["1".to_string(), "transport".to_string()],
            vec!["12".to_string(), "food".to_string()],
        ];
        let lines = render_table(&["ID", "Type"], &rows, &PLAIN);
        assert_eq!(lines[0], "ID  Type");
        assert_eq!(lines[1], "1   transport");
        assert_eq!(lines[2], "12  food");
    }
}
