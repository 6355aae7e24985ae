use std::fmt;

use colored::Colorize;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Header,
    Success,
    Warning,
}

/// Console formatter for command output. Plain mode drops colors and icons.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    plain: bool,
}

impl Formatter {
    pub fn new(plain: bool) -> Self {
        Self {
            plain: plain || std::env::var_os("NO_COLOR").is_some(),
        }
    }

    pub fn print_header(&self, title: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Header, title));
    }

    pub fn print_success(&self, message: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Success, message));
    }

    pub fn print_warning(&self, message: impl fmt::Display) {
        println!("{}", self.apply_style(Style::Warning, message));
    }

    pub fn print_two_column(&self, entries: &[(&str, String)]) {
        let label_width = entries
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        for (label, value) in entries {
            println!("  {:<width$}  {}", label, value, width = label_width + 2);
        }
    }

    fn apply_style(&self, style: Style, message: impl fmt::Display) -> String {
        match style {
            Style::Header => {
                let text = format!("=== {} ===", message);
                if self.plain {
                    text
                } else {
                    text.bold().to_string()
                }
            }
            Style::Success => self.decorate("✔", "OK:", message, style),
            Style::Warning => self.decorate("⚠", "WARNING:", message, style),
        }
    }

    fn decorate(
        &self,
        icon: &str,
        plain_label: &str,
        message: impl fmt::Display,
        style: Style,
    ) -> String {
        if self.plain {
            return format!("{plain_label} {message}");
        }
        let text = format!("{icon} {message}");
        match style {
            Style::Warning => text.yellow().to_string(),
            _ => text.green().to_string(),
        }
    }
}
