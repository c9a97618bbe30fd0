//! Extract command - install a package from a ZIP archive.

use std::path::Path;

use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the extract command.
pub fn run(args: &GlobalArgs, archive: &Path, name: Option<&str>) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("extract");

    let report = runner.manager().install_archive(archive, name)?;
    println!("{}", report);
    if let Some(root) = &report.summary.stripped_root {
        println!("  Stripped wrapping folder '{}'", root);
    }
    if report.summary.ignored > 0 {
        println!("  Ignored {} hidden entries", report.summary.ignored);
    }
    Ok(())
}
