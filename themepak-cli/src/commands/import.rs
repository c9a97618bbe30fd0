//! Import command - apply one component over the live theme.

use super::common::print_success;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the import command.
pub fn run(args: &GlobalArgs, component: &str) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("import");

    let state = runner.load_state()?;
    let (report, state) = runner.manager().import_component(component, state)?;
    runner.save_state(&state)?;

    println!("{}", report);
    print_success("Component imported.");
    Ok(())
}
