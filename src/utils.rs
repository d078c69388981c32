//! Directory helpers following the XDG Base Directory specification
//!
//! - Config: `~/.config/ironwall/config.json`
//!
//! `IRONWALL_CONFIG` overrides the config file location.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable that overrides the config file path
pub const CONFIG_ENV_VAR: &str = "IRONWALL_CONFIG";

pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "ironwall", "ironwall").map(|pd| pd.config_dir().to_path_buf())
}

pub fn get_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    get_config_dir().map(|mut dir| {
        dir.push("config.json");
        dir
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_ends_with_file_name() {
        // Only meaningful when the override is not set in the test environment
        if std::env::var_os(CONFIG_ENV_VAR).is_none()
            && let Some(path) = get_config_path()
        {
            assert!(path.ends_with("config.json"));
        }
    }
}
