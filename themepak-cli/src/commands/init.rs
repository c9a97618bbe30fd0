//! Init command - create the config file and the package store.

use themepak::config::{config_file_path, ConfigFile};

use super::common::print_success;
use crate::error::CliError;
use crate::runner::{CliRunner, GlobalArgs};

/// Run the init command.
pub fn run(args: &GlobalArgs) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() {
        println!("Configuration file: {}", path.display());
    } else {
        let mut config = ConfigFile::default();
        if let Some(root) = &args.sdcard_root {
            config.device.sdcard_root = root.clone();
        }
        config.save()?;
        print_success(&format!("Created {}", path.display()));
    }

    let runner = CliRunner::new(args)?;
    runner.log_startup("init");
    let data_dir = runner.manager().init_store()?;
    print_success(&format!("Package store ready at {}", data_dir.display()));
    println!();
    println!("Edit the configuration file to customize themepak settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
