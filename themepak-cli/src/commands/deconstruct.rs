//! Deconstruct command - split a theme into components.

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the deconstruct command.
pub fn run(args: &GlobalArgs, theme: &str) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("deconstruct");

    let report = runner.manager().deconstruct_theme(theme)?;
    println!("{}", report);
    Ok(())
}
