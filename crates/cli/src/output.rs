//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use std::path::Path;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Plain text, one line per item
    #[default]
    Plain,
    /// Human-readable table format
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Whether the format is meant for machines rather than people
    pub fn is_structured(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Print a table of items
pub fn print_table<T: TableDisplay>(items: &[T]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }

    println!("{table}");
}

/// Print a value in a structured format (JSON or YAML)
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value).unwrap_or_default());
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
        }
    }
}

/// Path relative to the working-tree root, for display
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✅".green(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{}  {}", "⚠️".yellow(), message.yellow());
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{}  {}", "ℹ️".blue(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_path_strips_root() {
        let root = PathBuf::from("/work/app");
        assert_eq!(
            display_path(&root, &root.join("src/index.css")),
            "src/index.css"
        );
        assert_eq!(
            display_path(&root, Path::new("/elsewhere/a.css")),
            "/elsewhere/a.css"
        );
    }

    #[test]
    fn test_default_format_is_plain() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
        assert!(OutputFormat::Json.is_structured());
        assert!(!OutputFormat::Table.is_structured());
    }
}
