//! List command - show installed packages, exports and backups.

use super::common::{print_entries, ListKind};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the list command.
pub fn run(args: &GlobalArgs, kind: Option<ListKind>) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("list");
    let manager = runner.manager();
    let store = manager.store();

    let kinds: Vec<ListKind> = match kind {
        Some(kind) => vec![kind],
        None => ListKind::ALL.to_vec(),
    };
    for (index, kind) in kinds.iter().enumerate() {
        if index > 0 {
            println!();
        }
        let entries = match kind {
            ListKind::Exports => store.list_exports(),
            ListKind::Backups => manager.list_backups(),
            other => match other.package_type() {
                Some(package_type) => store.list_packages(package_type),
                None => Vec::new(),
            },
        };
        print_entries(kind.heading(), &entries);
    }
    Ok(())
}
