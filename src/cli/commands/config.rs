use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::{ConfigFormat, ConfigLoader};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&str>) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => {
            let loader = ConfigLoader::load_with(custom_config, None)?;
            // Fails on values that cannot be extracted into the typed config
            loader.settings()?;
            println!("{}", loader.export_config_highlighted(format)?);
        }
    }

    Ok(())
}
