//! Server configuration from environment variables.

use deck_docs::DEFAULT_OCR_LANG;
use deck_ppt::{LegacyPolicy, DEFAULT_CONVERTER_JAR};
use std::path::PathBuf;
use thiserror::Error;

/// Default upload limit: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Invalid configuration value.
#[derive(Error, Debug)]
#[error("Invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub java: PathBuf,
    pub converter_jar: PathBuf,
    pub legacy_policy: LegacyPolicy,
    pub ocr_lang: String,
    pub pdftoppm: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            java: PathBuf::from("java"),
            converter_jar: PathBuf::from(DEFAULT_CONVERTER_JAR),
            legacy_policy: LegacyPolicy::Lenient,
            ocr_lang: DEFAULT_OCR_LANG.to_string(),
            pdftoppm: PathBuf::from("pdftoppm"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read `DECK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from a variable lookup, using defaults for
    /// anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("DECK_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("DECK_PORT") {
            config.port = parse_number("DECK_PORT", port)?;
        }
        if let Some(java) = lookup("DECK_JAVA") {
            config.java = PathBuf::from(java);
        }
        if let Some(jar) = lookup("DECK_CONVERTER_JAR") {
            config.converter_jar = PathBuf::from(jar);
        }
        if let Some(strict) = lookup("DECK_STRICT_LEGACY") {
            config.legacy_policy = if parse_flag("DECK_STRICT_LEGACY", strict)? {
                LegacyPolicy::Strict
            } else {
                LegacyPolicy::Lenient
            };
        }
        if let Some(lang) = lookup("DECK_OCR_LANG") {
            config.ocr_lang = lang;
        }
        if let Some(pdftoppm) = lookup("DECK_PDFTOPPM") {
            config.pdftoppm = PathBuf::from(pdftoppm);
        }
        if let Some(limit) = lookup("DECK_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_number("DECK_MAX_UPLOAD_BYTES", limit)?;
        }

        Ok(config)
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError { name, value })
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.legacy_policy, LegacyPolicy::Lenient);
        assert_eq!(config.max_upload_bytes, 52_428_800);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DECK_HOST", "127.0.0.1"),
            ("DECK_PORT", "9000"),
            ("DECK_JAVA", "/opt/java/bin/java"),
            ("DECK_CONVERTER_JAR", "converter.jar"),
            ("DECK_STRICT_LEGACY", "true"),
            ("DECK_OCR_LANG", "deu"),
            ("DECK_MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.java, PathBuf::from("/opt/java/bin/java"));
        assert_eq!(config.converter_jar, PathBuf::from("converter.jar"));
        assert_eq!(config.legacy_policy, LegacyPolicy::Strict);
        assert_eq!(config.ocr_lang, "deu");
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = config_from(&[("DECK_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.name, "DECK_PORT");
        assert!(config_from(&[("DECK_PORT", "70000")]).is_err());
        assert!(config_from(&[("DECK_MAX_UPLOAD_BYTES", "-1")]).is_err());
    }

    #[test]
    fn test_strict_flag_values() {
        let policy = |v: &str| config_from(&[("DECK_STRICT_LEGACY", v)]).unwrap().legacy_policy;
        assert_eq!(policy("1"), LegacyPolicy::Strict);
        assert_eq!(policy("off"), LegacyPolicy::Lenient);
        assert!(config_from(&[("DECK_STRICT_LEGACY", "maybe")]).is_err());
    }
}
