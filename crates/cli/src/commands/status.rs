//! Status Command

use anyhow::Result;
use bugswap_common::{BugStatus, FileState, FixtureSwitcher};
use colored::Colorize;

use crate::output::{display_path, print_structured, print_table, OutputFormat, TableDisplay};

/// Table row summarising one bug
struct StatusRow<'a> {
    status: &'a BugStatus,
}

impl TableDisplay for StatusRow<'_> {
    fn headers() -> Vec<&'static str> {
        vec!["Bug", "State", "Injected", "Backups"]
    }

    fn row(&self) -> Vec<String> {
        let total = self.status.files.len();
        let injected = self
            .status
            .files
            .iter()
            .filter(|f| f.state == FileState::Injected)
            .count();
        let backups = self.status.files.iter().filter(|f| f.has_backup).count();

        vec![
            self.status.name.clone(),
            self.status.state.to_string(),
            format!("{}/{}", injected, total),
            format!("{}/{}", backups, total),
        ]
    }
}

pub fn execute(switcher: &FixtureSwitcher, format: OutputFormat) -> Result<()> {
    let statuses = switcher.status()?;

    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(&statuses, format),
        OutputFormat::Table => {
            let rows: Vec<StatusRow> = statuses.iter().map(|status| StatusRow { status }).collect();
            print_table(&rows);
        }
        OutputFormat::Plain => {
            for status in &statuses {
                println!("{}: {}", status.name.bold(), status.state);
                for file in &status.files {
                    let backup = if file.has_backup { ", backup" } else { "" };
                    println!(
                        "  {} ({}{})",
                        display_path(switcher.root(), &file.target),
                        file.state,
                        backup
                    );
                }
            }
        }
    }

    Ok(())
}
