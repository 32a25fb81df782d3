use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};

use super::ViewerConfig;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Layered configuration source
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    pub fn load() -> Result<Self> {
        Self::load_with(None, None)
    }

    /// Build the configuration chain.
    ///
    /// Priority, lowest first: embedded defaults, user config, repository
    /// config (or only `custom_config` when given), `EVALVIEW_` environment
    /// variables, CLI overrides.
    pub fn load_with(
        custom_config: Option<&str>,
        cli_overrides: Option<serde_json::Value>,
    ) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !std::path::Path::new(custom_path).exists() {
                tracing::warn!("Config file {} not found, using defaults", custom_path);
            }
            figment = match config_format(custom_path) {
                "json" => figment.merge(Json::file(custom_path)),
                "yaml" => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user_base = Self::user_config_base_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(format!("{user_base}.toml")))
                .merge(Json::file(format!("{user_base}.json")))
                .merge(Yaml::file(format!("{user_base}.yaml")))
                .merge(Yaml::file(format!("{user_base}.yml")))
                // Repository config - support multiple formats
                .merge(Toml::file("evalview.toml"))
                .merge(Json::file("evalview.json"))
                .merge(Yaml::file("evalview.yaml"))
                .merge(Yaml::file("evalview.yml"));
        }

        // Environment variables always beat files
        figment = figment.merge(Env::prefixed("EVALVIEW_").split("__"));

        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(ConfigLoader { figment })
    }

    /// Extract the typed configuration
    pub fn settings(&self) -> Result<ViewerConfig> {
        let config: ViewerConfig = self
            .figment
            .extract()
            .context("Failed to extract configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn user_config_base_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/evalview/config", home),
            Err(_) => "~/.config/evalview/config".to_string(),
        }
    }
}

fn config_format(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => "json",
        "yaml" | "yml" => "yaml",
        _ => "toml",
    }
}

/// Build a CLI override object holding only the values that were given.
///
/// `entries` are `(section, key, value)`; `None` values are left out so
/// they never mask lower-priority layers.
pub fn cli_overrides(entries: &[(&str, &str, Option<serde_json::Value>)]) -> Option<serde_json::Value> {
    let mut root = serde_json::Map::new();

    for (section, key, value) in entries {
        let Some(value) = value else {
            continue;
        };
        let section_map = root
            .entry(section.to_string())
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        if let serde_json::Value::Object(map) = section_map {
            map.insert(key.to_string(), value.clone());
        }
    }

    (!root.is_empty()).then_some(serde_json::Value::Object(root))
}
