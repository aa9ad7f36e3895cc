use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
///
/// Loaded from the config file, then overridden by environment variables.
/// No config at all is a supported setup: the app runs with an empty shelf
/// rather than refusing to start.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?
        } else {
            // No config file? Use defaults
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Environment wins over the file for backend credentials
    pub fn apply_env(&mut self) {
        let url = std::env::var("SHELFSCOUT_BACKEND_URL").ok();
        let key = std::env::var("SHELFSCOUT_BACKEND_KEY").ok();

        match (url, key) {
            (Some(url), Some(key)) => {
                self.backend = Some(BackendConfig { url, anon_key: key });
            }
            (Some(url), None) => {
                if let Some(backend) = &mut self.backend {
                    backend.url = url;
                }
            }
            (None, Some(key)) => {
                if let Some(backend) = &mut self.backend {
                    backend.anon_key = key;
                }
            }
            (None, None) => {}
        }
    }

    /// Get the config file path
    /// Uses XDG on Linux/macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("shelfscout");

        Ok(config_dir.join("config.toml"))
    }
}

/// Where the hosted books collection lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. https://xyzcompany.supabase.co
    pub url: String,

    /// The project's anon API key
    pub anon_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Enable mouse support in TUI
    #[serde(default = "default_mouse")]
    pub mouse_enabled: bool,
}

fn default_mouse() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mouse_enabled: default_mouse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_backend() {
        let config = Config::default();
        assert!(config.backend.is_none());
        assert!(config.ui.mouse_enabled);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            backend: Some(BackendConfig {
                url: "https://example.supabase.co".into(),
                anon_key: "anon".into(),
            }),
            ui: UiConfig::default(),
        };
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("anon_key"));

        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(
            parsed.backend.unwrap().url,
            "https://example.supabase.co"
        );
    }

    #[test]
    fn test_missing_ui_section_gets_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert!(parsed.ui.mouse_enabled);
    }
}
