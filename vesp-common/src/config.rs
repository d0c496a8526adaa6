//! Configuration loading and root folder resolution
//!
//! The root folder holds the SQLite database and any future on-disk state.
//! Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`VESP_ROOT_FOLDER`)
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable consulted when no CLI argument is given
pub const ROOT_FOLDER_ENV: &str = "VESP_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "vesp.db";

/// Resolve the root folder following the 4-tier priority order
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    info!("Root folder from config file {}", config_path.display());
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder directory if it does not exist
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        info!("Created root folder: {}", root.display());
    }
    Ok(())
}

/// Path of the SQLite database inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/vesp/config.toml first, then /etc/vesp/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("vesp").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/vesp/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("vesp").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("vesp"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/vesp"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("vesp"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/vesp"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("vesp"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\vesp"))
    } else {
        PathBuf::from("./vesp_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/vesp-test-root"));
        assert_eq!(root, PathBuf::from("/tmp/vesp-test-root"));
    }

    #[test]
    fn database_path_appends_file_name() {
        let root = PathBuf::from("/data/vesp");
        assert_eq!(database_path(&root), PathBuf::from("/data/vesp/vesp.db"));
    }
}
