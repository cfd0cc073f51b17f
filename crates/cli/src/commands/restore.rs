//! Restore Command

use anyhow::{bail, Result};
use clap::Args;
use bugswap_common::{FixtureSwitcher, RestoreReport};

use crate::output::{
    display_path, print_error, print_info, print_structured, print_success, print_warning,
    OutputFormat,
};

#[derive(Args)]
pub struct RestoreArgs {
    /// Bug to restore; restores every bug in the catalog when omitted
    pub bug: Option<String>,
}

pub fn execute(args: RestoreArgs, switcher: &FixtureSwitcher, format: OutputFormat) -> Result<()> {
    let report = match &args.bug {
        Some(name) => switcher.restore(name)?,
        None => switcher.restore_all()?,
    };

    if format.is_structured() {
        print_structured(&report, format);
        return check_failures(&report);
    }

    for target in &report.restored {
        println!("  restored {}", display_path(switcher.root(), target));
    }

    match &args.bug {
        Some(name) => {
            for missing in &report.missing {
                print_warning(&format!(
                    "No backup found for {}",
                    display_path(switcher.root(), &missing.target)
                ));
            }
            print_success(&format!(
                "Restored bug '{}' ({} file(s))",
                name,
                report.restored.len()
            ));
        }
        None if report.restored.is_empty() && report.failed.is_empty() => {
            print_info("No backups found; nothing to restore.");
        }
        None => {
            print_success(&format!("Restored {} file(s)", report.restored.len()));
        }
    }

    for failure in &report.failed {
        print_error(&format!("Could not restore '{}': {}", failure.bug, failure.error));
    }
    check_failures(&report)
}

/// A bulk restore that left any bug unfinished still fails the command
fn check_failures(report: &RestoreReport) -> Result<()> {
    if report.failed.is_empty() {
        Ok(())
    } else {
        bail!("{} bug(s) could not be fully restored", report.failed.len())
    }
}
