//! `ems config` command - show or change console settings

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_config;
use crate::cli::output::print_json;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,

    /// Print the config file location
    Path,

    /// Print one setting
    Get {
        /// Setting name (api_url, timeout_secs, confirm_delete)
        key: String,
    },

    /// Change one setting in the config file
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = load_config(global)?;
            if global.output == OutputFormat::Json {
                print_json(&config)
            } else {
                print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
                Ok(())
            }
        }
        ConfigCommands::Path => {
            let path = config_path()?;
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_config(global)?;
            println!("{}", config.get(&key).into_diagnostic()?);
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let path = config_path()?;
            // Only the file layer is written; env and flags stay out of it
            let mut config = Config::load_file(&path).into_diagnostic()?;
            config.set(&key, &value).into_diagnostic()?;
            config.save(&path).into_diagnostic()?;
            eprintln!(
                "{} {} = {} ({})",
                style("✓").green(),
                key,
                style(config.get(&key).into_diagnostic()?).cyan(),
                style(path.display()).dim()
            );
            Ok(())
        }
    }
}

fn config_path() -> Result<std::path::PathBuf> {
    Config::default_path().ok_or_else(|| miette::miette!("could not determine a config directory"))
}
