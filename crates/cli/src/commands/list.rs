//! List Command

use anyhow::Result;
use bugswap_common::{BugSummary, FixtureSwitcher};

use crate::output::{print_info, print_structured, print_table, OutputFormat, TableDisplay};

impl TableDisplay for BugSummary {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Description", "Files"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.files.to_string(),
        ]
    }
}

pub fn execute(switcher: &FixtureSwitcher, format: OutputFormat) -> Result<()> {
    print_catalog(switcher, format);
    Ok(())
}

/// Print every bug in the active catalog.
///
/// Also used after an unknown bug name so the caller can pick a valid one.
pub fn print_catalog(switcher: &FixtureSwitcher, format: OutputFormat) {
    let bugs = switcher.list();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(&bugs, format),
        OutputFormat::Table => {
            if bugs.is_empty() {
                print_info("Catalog is empty.");
            } else {
                print_table(&bugs);
            }
        }
        OutputFormat::Plain => {
            for bug in &bugs {
                println!("{}: {}", bug.name, bug.description);
            }
        }
    }
}
