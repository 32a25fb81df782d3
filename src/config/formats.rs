use anyhow::Result;

use super::core::ConfigLoader;
use crate::reports::highlight::highlight_for_terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

impl ConfigLoader {
    /// Export configuration in specified format
    pub fn export_config(&self, format: ConfigFormat) -> Result<String> {
        let config: serde_json::Value = self.get_full_config()?;

        let output = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
            ConfigFormat::Toml => toml::to_string_pretty(&config)?,
            ConfigFormat::Yaml => serde_yml::to_string(&config)?,
        };

        Ok(output)
    }

    /// Export configuration with syntax highlighting when stdout is a terminal
    pub fn export_config_highlighted(&self, format: ConfigFormat) -> Result<String> {
        let output = self.export_config(format)?;
        highlight_for_terminal(&output, format.extension())
    }
}
