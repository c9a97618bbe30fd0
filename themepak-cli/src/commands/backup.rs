//! Backup CLI commands.
//!
//! Provides `backup create`, `backup list`, `backup restore` and
//! `backup prune`.

use clap::Subcommand;

use super::common::{print_entries, print_success};
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Backup subcommands.
#[derive(Debug, Subcommand)]
pub enum BackupCommands {
    /// Back up the live theme
    Create {
        /// Backup name (defaults to a timestamp)
        name: Option<String>,
    },

    /// List backups, newest first
    List,

    /// Put a backup back onto the device
    Restore {
        /// Backup name
        name: String,
    },

    /// Delete the oldest backups beyond backups.max_backups
    Prune,
}

/// Run a backup subcommand.
pub fn run(args: &GlobalArgs, command: BackupCommands) -> Result<(), CliError> {
    let runner = CliRunner::new(args)?;
    runner.log_startup("backup");

    match command {
        BackupCommands::Create { name } => run_create(&runner, name.as_deref()),
        BackupCommands::List => run_list(&runner),
        BackupCommands::Restore { name } => run_restore(&runner, &name),
        BackupCommands::Prune => run_prune(&runner),
    }
}

fn run_create(runner: &CliRunner, name: Option<&str>) -> Result<(), CliError> {
    let report = runner.manager().create_backup(name)?;
    println!("{}", report);
    Ok(())
}

fn run_list(runner: &CliRunner) -> Result<(), CliError> {
    let backups = runner.manager().list_backups();
    print_entries("Backups", &backups);
    Ok(())
}

fn run_restore(runner: &CliRunner, name: &str) -> Result<(), CliError> {
    let state = runner.load_state()?;
    let (report, state) = runner.manager().restore_backup(name, state)?;
    runner.save_state(&state)?;
    println!("{}", report);
    print_success("Backup restored.");
    Ok(())
}

fn run_prune(runner: &CliRunner) -> Result<(), CliError> {
    let max = runner.config().backups.max_backups;
    if max == 0 {
        println!("Rotation is disabled (backups.max_backups = 0).");
        return Ok(());
    }
    let report = runner.manager().rotate_backups()?;
    println!("{}", report);
    for name in &report.deleted {
        println!("  - {}", name);
    }
    Ok(())
}
