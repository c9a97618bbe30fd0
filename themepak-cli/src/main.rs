//! themepak CLI - manage theme packages on a handheld's SD card.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::backup::BackupCommands;
use commands::common::ListKind;
use commands::config::ConfigCommands;
use runner::GlobalArgs;

#[derive(Debug, Parser)]
#[command(name = "themepak")]
#[command(version, about = "Theme package manager for handheld launcher skins", long_about = None)]
struct Cli {
    /// SD card root (overrides device.sdcard_root)
    #[arg(long, global = true, value_name = "DIR")]
    sdcard_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the config file and the package store directories
    Init,

    /// List installed packages
    List {
        /// Only list this kind of package
        #[arg(value_enum)]
        kind: Option<ListKind>,
    },

    /// Show a package's manifest
    Info {
        /// Package name, with or without extension
        name: String,
    },

    /// Apply a full theme to the device
    Apply {
        /// Theme name (installed themes first, then exports)
        theme: String,
    },

    /// Export the live device theme as a new package
    Export {
        /// Package name (defaults to theme_N)
        name: Option<String>,
    },

    /// Split a theme into component packages
    Deconstruct {
        /// Theme name
        theme: String,
    },

    /// Apply a single component over the live theme
    Import {
        /// Component name, e.g. Neon.icon
        component: String,
    },

    /// Create, list, restore and prune backups
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },

    /// Install a package from a ZIP archive
    Extract {
        /// Path to the archive
        archive: PathBuf,

        /// Package name including extension (defaults to the archive name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a package from the store
    Remove {
        /// Package name
        package: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show the applied theme and store contents
    Status,

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        sdcard_root: cli.sdcard_root,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Init => commands::init::run(&global),
        Commands::List { kind } => commands::list::run(&global, kind),
        Commands::Info { name } => commands::info::run(&global, &name),
        Commands::Apply { theme } => commands::apply::run(&global, &theme),
        Commands::Export { name } => commands::export::run(&global, name.as_deref()),
        Commands::Deconstruct { theme } => commands::deconstruct::run(&global, &theme),
        Commands::Import { component } => commands::import::run(&global, &component),
        Commands::Backup { command } => commands::backup::run(&global, command),
        Commands::Extract { archive, name } => {
            commands::extract::run(&global, &archive, name.as_deref())
        }
        Commands::Remove { package, force } => commands::remove::run(&global, &package, force),
        Commands::Status => commands::status::run(&global),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
