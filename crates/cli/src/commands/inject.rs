//! Inject Command

use anyhow::Result;
use clap::Args;
use bugswap_common::FixtureSwitcher;

use crate::output::{display_path, print_structured, print_success, OutputFormat};

#[derive(Args)]
pub struct InjectArgs {
    /// Name of the bug to inject (see `bugswap list`)
    pub bug: String,
}

pub fn execute(args: InjectArgs, switcher: &FixtureSwitcher, format: OutputFormat) -> Result<()> {
    let report = switcher.inject(&args.bug)?;

    if format.is_structured() {
        print_structured(&report, format);
        return Ok(());
    }

    for target in &report.replaced {
        println!("  replaced {}", display_path(switcher.root(), target));
    }
    print_success(&format!(
        "Injected bug '{}' ({} file(s))",
        report.bug,
        report.replaced.len()
    ));

    Ok(())
}
