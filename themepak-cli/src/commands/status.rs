//! Status command - show what is applied and what the store holds.

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the status command.
pub fn run(args: &GlobalArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("status");

    let status = runner.manager().status()?;
    println!("SD card:        {}", runner.config().device.sdcard_root.display());
    println!("{}", status);
    Ok(())
}
