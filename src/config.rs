// src/config.rs
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use toml;

const CONFIG_FILE_NAME: &str = "salon_config.toml";
const FALLBACK_DATA_DIR: &str = "salon-data";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the key-value records live. Platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    pub default_service: String,
    /// Price charged by the `pay` flow when none is given.
    pub default_price: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            default_service: "Hair wash".to_string(),
            default_price: "R$42,50".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "SalonBooking", "SalonBooking")
}

fn get_config_path() -> Option<PathBuf> {
    project_dirs().map(|proj_dirs| proj_dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl Config {
    /// Data directory to open: the configured one, else the platform data
    /// dir, else `./salon-data`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match project_dirs() {
            Some(proj_dirs) => proj_dirs.data_dir().to_path_buf(),
            None => {
                warn!("Could not determine data directory, using ./{}", FALLBACK_DATA_DIR);
                PathBuf::from(FALLBACK_DATA_DIR)
            }
        }
    }
}

fn save_default_config(config_path: &Path, config: &Config) -> Result<(), String> {
    info!("Attempting to save default config to {:?}", config_path);
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)
                .map_err(|e| format!("Failed to create config directory {:?}: {}", parent_dir, e))?;
            info!("Created config directory: {:?}", parent_dir);
        }
    }

    let toml_string = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize default config to TOML: {}", e))?;

    let mut file = fs::File::create(config_path)
        .map_err(|e| format!("Failed to create default config file {:?}: {}", config_path, e))?;

    file.write_all(toml_string.as_bytes())
        .map_err(|e| format!("Failed to write default config to {:?}: {}", config_path, e))?;

    info!("Saved default configuration to {:?}", config_path);
    Ok(())
}

/// Loads the config at `config_path`, writing a default one if there is none.
/// Never fails: unreadable or invalid files fall back to defaults.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(
            "Config file not found at {:?}. Creating and using default configuration.",
            config_path
        );
        let default_config = Config::default();
        if let Err(e) = save_default_config(config_path, &default_config) {
            warn!("Failed to save default configuration: {}", e);
        }
        return default_config;
    }

    info!("Loading configuration from {:?}", config_path);
    match fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(loaded_config) => {
                info!("Configuration loaded successfully.");
                loaded_config
            }
            Err(e) => {
                warn!(
                    "Failed to parse config file at {:?}: {}. Using default configuration.",
                    config_path, e
                );
                Config::default()
            }
        },
        Err(e) => {
            warn!(
                "Failed to read config file at {:?}: {}. Using default configuration.",
                config_path, e
            );
            Config::default()
        }
    }
}

pub fn load_config() -> Config {
    match get_config_path() {
        Some(config_path) => load_config_from(&config_path),
        None => {
            warn!("Could not determine config directory. Using default configuration.");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.default_service, "Hair wash");
        assert_eq!(config.default_price, "R$42,50");
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = load_config_from(&config_path);
        assert_eq!(config, Config::default());
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        let reparsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(reparsed, Config::default());
    }

    #[test]
    fn test_load_existing_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            r#"
data_dir = "/tmp/salon"
default_service = "Haircut"
default_price = "R$35,00"
"#,
        )
        .unwrap();

        let config = load_config_from(&config_path);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/salon")));
        assert_eq!(config.default_service, "Haircut");
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/tmp/salon"));
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "default_service = \"Manicure\"\n").unwrap();

        let config = load_config_from(&config_path);
        assert_eq!(config.default_service, "Manicure");
        assert_eq!(config.default_price, Config::default().default_price);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "this is not valid toml content = definitely_broken").unwrap();

        assert_eq!(load_config_from(&config_path), Config::default());
    }
}
