use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::llm::GenerationConfig;

const DEFAULT_CONFIG_PATHS: &[&str] = &["conf.yaml", "conf.yml", "conf.json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub system_config: SystemConfig,
    pub model_config: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub host: String,
    pub port: u16,
    /// HTML page served at `/`
    pub index_page: String,
    /// Directory served under `/static`
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            index_page: "templates/index.html".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let generation = GenerationConfig::default();
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: generation.temperature,
            top_p: generation.top_p,
            top_k: generation.top_k,
            max_output_tokens: generation.max_output_tokens,
        }
    }
}

impl ModelConfig {
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl Config {
    /// Load configuration
    ///
    /// 1. `CONFIG_PATH` or the first of `conf.yaml`, `conf.yml`, `conf.json` that exists;
    ///    defaults when there is none
    /// 2. environment overrides
    /// 3. validation
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").ok().or_else(|| {
            DEFAULT_CONFIG_PATHS
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|p| p.to_string())
        });

        let mut config = match path {
            Some(path) => {
                let config = Self::from_file(&path)?;
                tracing::info!("Loaded configuration from: {}", path);
                config
            }
            None => {
                tracing::warn!("Configuration file not found, using defaults");
                Config::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML or JSON config file (chosen by extension), substituting
    /// `${VAR}` placeholders from the environment.
    pub fn from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = fs::read_to_string(path)?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        let content = substitute_env_vars(content, |name| std::env::var(name).ok())?;

        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Apply environment variable overrides
    ///
    /// - HOST, PORT
    /// - GEMINI_API_KEY, GEMINI_MODEL, GEMINI_BASE_URL
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("HOST") {
            self.system_config.host = host;
            tracing::info!("Override host from env: {}", self.system_config.host);
        }

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => {
                    self.system_config.port = port;
                    tracing::info!("Override port from env: {}", self.system_config.port);
                }
                Err(e) => tracing::warn!(
                    "Invalid PORT '{}': {} (keep {})",
                    port,
                    e,
                    self.system_config.port
                ),
            }
        }

        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.model_config.api_key = Some(key);
        }

        if let Some(model) = lookup("GEMINI_MODEL") {
            self.model_config.model = model;
            tracing::info!("Override model from env: {}", self.model_config.model);
        }

        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            self.model_config.base_url = base_url;
            tracing::info!("Override base_url from env: {}", self.model_config.base_url);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.system_config.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        let model = &self.model_config;
        if model.model.trim().is_empty() {
            anyhow::bail!("model_config.model cannot be empty");
        }
        if !(0.0..=2.0).contains(&model.temperature) {
            anyhow::bail!("model_config.temperature must be within 0..=2");
        }
        if !(0.0..=1.0).contains(&model.top_p) {
            anyhow::bail!("model_config.top_p must be within 0..=1");
        }
        if model.top_k == 0 {
            anyhow::bail!("model_config.top_k must be > 0");
        }
        if model.max_output_tokens == 0 {
            anyhow::bail!("model_config.max_output_tokens must be > 0");
        }

        // Not fatal: the key is only needed once the first question reaches the model.
        if model.api_key().is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; /ask and /translate will fail until it is");
        }
        Ok(())
    }
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are left as-is.
fn substitute_env_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.system_config.port, 5000);
        assert_eq!(config.model_config.model, "gemini-1.5-flash");
        assert_eq!(config.model_config.generation_config(), GenerationConfig::default());
        assert!(config.model_config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("PORT", "8081"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
        ]));
        assert_eq!(config.system_config.port, 8081);
        assert_eq!(config.model_config.api_key(), Some("secret"));
        assert_eq!(config.model_config.model, "gemini-1.5-pro");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("PORT", "not-a-port")]));
        assert_eq!(config.system_config.port, 5000);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut config = Config::default();
        config.model_config.api_key = Some("   ".into());
        assert!(config.model_config.api_key().is_none());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = Config::default();
        config.system_config.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model_config.top_p = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model_config.max_output_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn substitutes_placeholders() {
        let out = substitute_env_vars(
            "api_key: ${KRISHI_TEST_KEY}\nmodel: ${UNSET_VAR}",
            env(&[("KRISHI_TEST_KEY", "abc")]),
        )
        .unwrap();
        assert_eq!(out, "api_key: abc\nmodel: ${UNSET_VAR}");
    }

    #[test]
    fn loads_partial_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "system_config:\n  port: 9000\nmodel_config:\n  top_k: 20").unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.system_config.port, 9000);
        assert_eq!(config.system_config.host, "127.0.0.1");
        assert_eq!(config.model_config.top_k, 20);
        assert_eq!(config.model_config.max_output_tokens, 1200);
    }

    #[test]
    fn loads_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"model_config": {{"model": "gemini-2.0-flash"}}}}"#).unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.model_config.model, "gemini-2.0-flash");
        assert_eq!(config.system_config.port, 5000);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_file("/nonexistent/conf.yaml").is_err());
    }
}
