//! Remove command - delete a package from the store.

use super::common::{confirm, print_success};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the remove command.
pub fn run(args: &GlobalArgs, package: &str, force: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("remove");
    let manager = runner.manager();

    let info = manager.package_info(package)?;
    println!("{}", info);
    println!();

    if !force && !confirm(&format!("Delete {}?", package))? {
        println!("Cancelled.");
        return Ok(());
    }

    let report = manager.remove_package(package)?;
    print_success(&report.to_string());
    Ok(())
}
