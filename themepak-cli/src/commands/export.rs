//! Export command - snapshot the live device into a new theme package.

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the export command.
pub fn run(args: &GlobalArgs, name: Option<&str>) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("export");

    let report = runner.manager().export_theme(name)?;
    println!("{}", report);
    println!("  {}", report.path.display());
    Ok(())
}
