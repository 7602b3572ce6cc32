//! `wayframe config` - inspect and edit `config.ini` from the shell.
//!
//! Keys are addressed as `section.key` and validated by clap before any
//! file is touched, so a typo never rewrites the file.

use clap::Subcommand;
use console::style;
use wayframe::config::{config_file_path, ConfigError, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// Setting as section.key (e.g. routing.base_url)
        #[arg(value_parser = parse_key)]
        key: ConfigKey,
    },

    /// Change one setting and save the file
    Set {
        /// Setting as section.key (e.g. playback.follow)
        #[arg(value_parser = parse_key)]
        key: ConfigKey,

        /// New value
        value: String,
    },

    /// Print every setting, grouped by section
    List,

    /// Print where the config file lives
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let config = ConfigFile::load()?;
            println!("{}", shown(&key.get(&config)).unwrap_or("(not set)"));
        }
        ConfigCommands::Set { key, value } => {
            let mut config = ConfigFile::load()?;
            key.set(&mut config, &value)?;
            config.save()?;
            println!("{} {} = {}", style("Saved").green(), key, key.get(&config));
        }
        ConfigCommands::List => print_listing(&listing(&ConfigFile::load()?)),
        ConfigCommands::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}

fn parse_key(raw: &str) -> Result<ConfigKey, String> {
    raw.parse().map_err(|e: ConfigError| {
        format!("{} (run 'wayframe config list' for the known keys)", e)
    })
}

/// Non-empty value, or `None` for an unset one.
fn shown(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Settings of one INI section, in file order.
#[derive(Debug, PartialEq)]
struct Section {
    name: &'static str,
    entries: Vec<(&'static str, String)>,
}

fn listing(config: &ConfigFile) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for key in ConfigKey::all() {
        let entry = (key.key_name(), key.get(config));
        match sections.last_mut() {
            Some(section) if section.name == key.section() => section.entries.push(entry),
            _ => sections.push(Section {
                name: key.section(),
                entries: vec![entry],
            }),
        }
    }
    sections
}

fn print_listing(sections: &[Section]) {
    println!("{}", style(config_file_path().display()).bold());
    for section in sections {
        println!();
        println!("{}", style(format!("[{}]", section.name)).cyan());
        for (name, value) in &section.entries {
            match shown(value) {
                Some(value) => println!("  {} = {}", name, value),
                None => println!("  {} = {}", name, style("(not set)").dim()),
            }
        }
    }
}
