//! Guard Configuration
//!
//! Loads the guard's configuration from `~/.commguard/config.json`,
//! merges missing fields with defaults, and applies environment
//! overrides. The config file is optional; the defaults plus
//! `ANTHROPIC_API_KEY` are enough to run.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Config file name within the guard directory.
const CONFIG_FILENAME: &str = "config.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub prompts_dir: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            prompts_dir: "prompts".to_string(),
        }
    }
}

/// Returns the guard's config directory: `~/.commguard`.
pub fn get_guard_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/root"))
        .join(".commguard")
}

/// Returns the full path to the config file: `~/.commguard/config.json`.
pub fn get_config_path() -> PathBuf {
    get_guard_dir().join(CONFIG_FILENAME)
}

/// Load the guard config.
///
/// Reads `~/.commguard/config.json` when present, merges unset fields
/// with defaults, then applies environment overrides:
/// `ANTHROPIC_API_KEY`, `COMMGUARD_API_URL`, `COMMGUARD_MODEL`, and
/// `COMMGUARD_PROMPTS_DIR`. An unreadable or unparseable file is
/// treated as absent.
pub fn load_config() -> GuardConfig {
    let mut config = read_config_file(&get_config_path()).unwrap_or_default();

    // Merge defaults for unset fields
    let defaults = GuardConfig::default();

    if config.api_url.is_empty() {
        config.api_url = defaults.api_url;
    }
    if config.model.is_empty() {
        config.model = defaults.model;
    }
    if config.prompts_dir.is_empty() {
        config.prompts_dir = defaults.prompts_dir;
    }

    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            config.api_key = key;
        }
    }
    if let Ok(url) = std::env::var("COMMGUARD_API_URL") {
        if !url.is_empty() {
            config.api_url = url;
        }
    }
    if let Ok(model) = std::env::var("COMMGUARD_MODEL") {
        if !model.is_empty() {
            config.model = model;
        }
    }
    if let Ok(dir) = std::env::var("COMMGUARD_PROMPTS_DIR") {
        if !dir.is_empty() {
            config.prompts_dir = dir;
        }
    }

    config
}

fn read_config_file(path: &PathBuf) -> Option<GuardConfig> {
    if !path.exists() {
        return None;
    }
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Resolve a path that may start with `~` to an absolute path.
///
/// If the path starts with `~`, the tilde is replaced with the user's
/// home directory. Otherwise the path is returned as-is.
pub fn resolve_path(p: &str) -> String {
    if let Some(rest) = p.strip_prefix('~') {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        home.join(rest).to_string_lossy().to_string()
    } else {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GuardConfig::default();
        assert_eq!(config.api_url, "https://api.anthropic.com");
        assert_eq!(config.prompts_dir, "prompts");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_partial_file_merges_defaults() {
        let parsed: GuardConfig =
            serde_json::from_str(r#"{ "model": "claude-3-5-haiku-latest" }"#).unwrap();
        assert_eq!(parsed.model, "claude-3-5-haiku-latest");
        // Unset fields come back empty from a partial file and are
        // filled in by load_config; the serde default covers them here.
        assert_eq!(parsed.api_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_resolve_path_plain() {
        assert_eq!(resolve_path("/tmp/prompts"), "/tmp/prompts");
        assert_eq!(resolve_path("prompts"), "prompts");
    }

    #[test]
    fn test_resolve_path_tilde() {
        let resolved = resolve_path("~/prompts");
        assert!(!resolved.starts_with('~'));
        assert!(resolved.ends_with("/prompts"));
    }
}
