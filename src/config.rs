//! User configuration for the zhv tool.
//!
//! Settings are resolved in three layers: built-in defaults, then the
//! per-user configuration file at `~/.zhv/setting.json`, then the
//! `ZHV_API_URL`, `ZHV_MODEL`, and `ZHV_KEY` environment variables.

use std::env;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default API base URL for an OpenAI-compatible endpoint.
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Default model name.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Directory under the user's home that holds the configuration file.
const CONFIG_DIR: &str = ".zhv";

/// File name of the configuration file.
const CONFIG_FILE: &str = "setting.json";

/// Resolved user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the OpenAI-compatible API, without the endpoint path.
    pub api_url: String,

    /// Model name sent with every request.
    pub model: String,

    /// Bearer token for the API.
    pub api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// A missing or unreadable configuration file is not an error; the
    /// defaults stand and environment variables are applied on top.
    pub fn load() -> Config {
        let mut config = Config::default();
        if let Ok(path) = Self::config_path() {
            if let Ok(file) = File::open(&path) {
                if let Ok(loaded) = serde_json::from_reader(BufReader::new(file)) {
                    config = loaded;
                }
            }
        }
        config.apply_env();
        config
    }

    /// Persists the configuration to `~/.zhv/setting.json`, creating the
    /// directory if necessary.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        io::Write::flush(&mut writer)?;
        Ok(())
    }

    /// Sets a configuration value by key name.
    ///
    /// Valid keys are `api_url`, `model`, and `api_key`. Setting `api_url`
    /// validates that the value parses as a URL.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                Url::parse(value)?;
                self.api_url = value.to_string();
            }
            "model" => self.model = value.to_string(),
            "api_key" => self.api_key = value.to_string(),
            _ => {
                return Err(Error::validation(
                    format!("unknown configuration key: {key}"),
                    Some(key.to_string()),
                ));
            }
        }
        Ok(())
    }

    /// Returns true if all three settings are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.api_url.is_empty() && !self.model.is_empty() && !self.api_key.is_empty()
    }

    /// Returns the API key with the middle masked for display.
    ///
    /// Keys of eight characters or fewer are fully masked; longer keys keep
    /// their first and last four characters.
    pub fn masked_api_key(&self) -> String {
        let count = self.api_key.chars().count();
        if count <= 8 {
            return "*".repeat(count);
        }
        let head: String = self.api_key.chars().take(4).collect();
        let tail: String = self.api_key.chars().skip(count - 4).collect();
        format!("{head}{}{tail}", "*".repeat(count - 8))
    }

    /// Applies environment variable overrides on top of the current values.
    ///
    /// Unset or empty variables leave the corresponding field untouched.
    pub(crate) fn apply_env(&mut self) {
        if let Ok(api_url) = env::var("ZHV_API_URL") {
            if !api_url.is_empty() {
                self.api_url = api_url;
            }
        }
        if let Ok(model) = env::var("ZHV_MODEL") {
            if !model.is_empty() {
                self.model = model;
            }
        }
        if let Ok(api_key) = env::var("ZHV_KEY") {
            if !api_key.is_empty() {
                self.api_key = api_key;
            }
        }
    }

    /// Path of the configuration file under the user's home directory.
    fn config_path() -> io::Result<PathBuf> {
        let home = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "home directory not set"))?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.api_key.is_empty());
        assert!(!config.is_valid());
    }

    #[test]
    fn validity_requires_all_fields() {
        let mut config = Config::default();
        config.api_key = "sk-test".to_string();
        assert!(config.is_valid());

        config.model.clear();
        assert!(!config.is_valid());

        config.model = "gpt-4".to_string();
        config.api_url.clear();
        assert!(!config.is_valid());
    }

    #[test]
    fn set_known_keys() {
        let mut config = Config::default();
        config.set("api_url", "https://example.com/v1").unwrap();
        config.set("model", "qwen-max").unwrap();
        config.set("api_key", "sk-abcdef").unwrap();
        assert_eq!(config.api_url, "https://example.com/v1");
        assert_eq!(config.model, "qwen-max");
        assert_eq!(config.api_key, "sk-abcdef");
    }

    #[test]
    fn set_unknown_key_fails() {
        let mut config = Config::default();
        let err = config.set("endpoint", "x").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn set_invalid_api_url_fails() {
        let mut config = Config::default();
        assert!(config.set("api_url", "not a url").is_err());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn mask_short_key() {
        let mut config = Config::default();
        config.api_key = "sk-12345".to_string();
        assert_eq!(config.masked_api_key(), "********");
    }

    #[test]
    fn mask_long_key() {
        let mut config = Config::default();
        config.api_key = "sk-abcdefghijkl".to_string();
        assert_eq!(config.masked_api_key(), "sk-a*******ijkl");
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = Config::default();
        unsafe {
            env::set_var("ZHV_API_URL", "https://env.example.com/v1");
            env::set_var("ZHV_MODEL", "");
            env::set_var("ZHV_KEY", "sk-from-env");
        }
        config.apply_env();
        unsafe {
            env::remove_var("ZHV_API_URL");
            env::remove_var("ZHV_MODEL");
            env::remove_var("ZHV_KEY");
        }
        assert_eq!(config.api_url, "https://env.example.com/v1");
        // An empty variable does not override the file/default value.
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key, "sk-from-env");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"model": "deepseek-chat"}"#).unwrap();
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_empty());
    }
}
