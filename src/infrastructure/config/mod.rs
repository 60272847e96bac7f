//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub session: SessionConfig,
    pub downloads: DownloadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionConfig {
    /// Which session adapter `run` wires up. Only the loopback dry-run
    /// adapter ships with this crate; a real transport is plugged in
    /// behind the same trait.
    pub adapter: String,
    /// Prefix stamped on generated message IDs
    pub message_id_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DownloadConfig {
    pub directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "spoofcraft".to_string(),
            },
            session: SessionConfig {
                adapter: "loopback".to_string(),
                message_id_prefix: "3EB0".to_string(),
            },
            downloads: DownloadConfig {
                directory: PathBuf::from("./downloads"),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.into(), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.bot.name, "spoofcraft");
        assert_eq!(parsed.session.adapter, "loopback");
        assert_eq!(parsed.downloads.directory, PathBuf::from("./downloads"));
    }

    #[test]
    fn kebab_case_keys_are_accepted() {
        let yaml = "bot:\n  name: test\nsession:\n  adapter: loopback\n  message-id-prefix: 3EB0\ndownloads:\n  directory: /tmp/dl\n";
        let parsed: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.session.message_id_prefix, "3EB0");
    }
}
