//! Apply command - install a full theme onto the device.

use super::common::print_success;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the apply command.
pub fn run(args: &GlobalArgs, theme: &str) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("apply");

    let state = runner.load_state()?;
    let (report, state) = runner.manager().apply_theme(theme, state)?;
    runner.save_state(&state)?;

    println!("{}", report);
    print_success("Theme applied. Restart the launcher to see it.");
    Ok(())
}
