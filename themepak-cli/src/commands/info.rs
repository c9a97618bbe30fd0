//! Info command - show a package's manifest.

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the info command.
pub fn run(args: &GlobalArgs, name: &str) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("info");
    let info = runner.manager().package_info(name)?;
    println!("{}", info);
    Ok(())
}
