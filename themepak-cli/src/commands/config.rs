//! `themepak config`: read and edit `~/.themepak/config.ini`.
//!
//! Every subcommand works on the file as written. A file that does not
//! parse is reported and never rewritten.

use std::path::Path;

use clap::Subcommand;
use themepak::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

const UNSET: &str = "(not set)";

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// Dotted key, e.g. backups.max_backups
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Dotted key, e.g. export.author
        key: String,

        /// New value; empty clears optional paths
        value: String,
    },

    /// Print every setting grouped by section
    List,

    /// Print where the config file lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    let path = config_file_path();
    match command {
        ConfigCommands::Get { key } => {
            let key = lookup(&key)?;
            let config = ConfigFile::load_from(&path)?;
            println!("{}", shown(&key.get(&config)));
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup(&key)?;
            let config = key.update_file(&path, &value)?;
            println!("{} = {}", key, shown(&key.get(&config)));
        }
        ConfigCommands::List => print_all(&path)?,
        ConfigCommands::Path => println!("{}", path.display()),
    }
    Ok(())
}

fn lookup(name: &str) -> Result<ConfigKey, CliError> {
    name.parse::<ConfigKey>().map_err(|_| {
        let known: Vec<&str> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!(
            "'{}' is not a setting (known: {})",
            name,
            known.join(", ")
        ))
    })
}

fn shown(value: &str) -> &str {
    if value.is_empty() {
        UNSET
    } else {
        value
    }
}

fn print_all(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;
    println!("# {}", path.display());

    let mut section = None;
    for key in ConfigKey::all() {
        if section != Some(key.section()) {
            section = Some(key.section());
            println!();
            println!("[{}]", key.section());
        }
        println!("{:<12} = {}", key.key_name(), shown(&key.get(&config)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_lists_known_keys_on_typo() {
        assert_eq!(lookup("export.author").unwrap(), ConfigKey::ExportAuthor);

        let err = lookup("export.auther").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let message = err.to_string();
        assert!(message.contains("'export.auther'"));
        assert!(message.contains("backups.max_backups"));
    }

    #[test]
    fn test_empty_values_show_as_unset() {
        assert_eq!(shown(""), UNSET);
        assert_eq!(shown("info"), "info");
    }
}
