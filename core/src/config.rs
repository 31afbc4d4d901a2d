#![deny(missing_docs)]

//! # Configuration
//!
//! Settings shared by every documented operation: where snippets are written, which
//! markup they are rendered in, which snippets every operation gets by default, and the
//! scheme/host/port that relative test URIs are resolved against.
//!
//! Values come from (lowest to highest precedence) built-in defaults, an optional YAML
//! file, and `RESTDOCS_*` environment variables (a `.env` file is honoured).

use crate::error::{AppError, AppResult};
use crate::templates::TemplateFormatKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable overriding [`RestDocsConfig::output_dir`].
pub const OUTPUT_DIR_ENV: &str = "RESTDOCS_OUTPUT_DIR";

/// Environment variable overriding [`RestDocsConfig::template_format`].
pub const TEMPLATE_FORMAT_ENV: &str = "RESTDOCS_TEMPLATE_FORMAT";

/// Defaults applied to request URIs that omit scheme, host, or port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UriConfig {
    /// URI scheme.
    pub scheme: String,
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
}

impl Default for UriConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8080,
        }
    }
}

impl UriConfig {
    /// The base URL relative request URIs are joined onto.
    pub fn base_url(&self) -> AppResult<Url> {
        let raw = format!("{}://{}:{}/", self.scheme, self.host, self.port);
        Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid base URI '{}': {}", raw, e)))
    }
}

/// Global documentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestDocsConfig {
    /// Root directory snippets are written under.
    pub output_dir: PathBuf,
    /// Markup dialect of the generated snippets.
    pub template_format: TemplateFormatKind,
    /// Snippets rendered for every documented operation, by name.
    pub default_snippets: Vec<String>,
    /// Defaults for relative request URIs.
    pub uri: UriConfig,
    /// Whether descriptors without a description fail rendering.
    pub require_descriptions: bool,
}

impl Default for RestDocsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("target/generated-snippets"),
            template_format: TemplateFormatKind::Asciidoctor,
            default_snippets: vec![
                "curl-request".to_string(),
                "http-request".to_string(),
                "http-response".to_string(),
            ],
            uri: UriConfig::default(),
            require_descriptions: false,
        }
    }
}

impl RestDocsConfig {
    /// Parses a YAML document; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads a YAML configuration file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;
        Self::from_yaml(&content)
    }

    /// Defaults plus environment overrides (loading `.env` when present).
    pub fn from_env() -> AppResult<Self> {
        if let Some(e) = dotenv_problem(dotenvy::dotenv()) {
            log::warn!("Ignoring unreadable .env file: {}", e);
        }
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `RESTDOCS_*` overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(format) = lookup(TEMPLATE_FORMAT_ENV) {
            self.template_format = format.parse()?;
        }
        Ok(self)
    }

    /// Builder-style override of the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder-style override of the template format.
    pub fn template_format(mut self, format: TemplateFormatKind) -> Self {
        self.template_format = format;
        self
    }

    /// Builder-style override of the description policy.
    pub fn require_descriptions(mut self, required: bool) -> Self {
        self.require_descriptions = required;
        self
    }
}

/// Separates a missing `.env` file, which is normal, from one that could not be loaded.
fn dotenv_problem<T>(result: Result<T, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => {
            log::debug!("No .env file found, using process environment only");
            None
        }
        Err(e) => Some(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RestDocsConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("target/generated-snippets"));
        assert_eq!(config.template_format, TemplateFormatKind::Asciidoctor);
        assert_eq!(config.default_snippets.len(), 3);
        assert_eq!(
            config.uri.base_url().unwrap().as_str(),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
template_format: markdown
uri:
  host: api.example.com
  port: 443
  scheme: https
"#;
        let config = RestDocsConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.template_format, TemplateFormatKind::Markdown);
        assert_eq!(config.output_dir, PathBuf::from("target/generated-snippets"));
        assert_eq!(
            config.uri.base_url().unwrap().as_str(),
            "https://api.example.com/"
        );
    }

    #[test]
    fn test_unknown_format_in_yaml_fails() {
        let result = RestDocsConfig::from_yaml("template_format: latex\n");
        assert!(matches!(result, Err(AppError::Yaml(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (OUTPUT_DIR_ENV, "build/snippets"),
            (TEMPLATE_FORMAT_ENV, "Markdown"),
        ]
        .into_iter()
        .collect();

        let config = RestDocsConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("build/snippets"));
        assert_eq!(config.template_format, TemplateFormatKind::Markdown);
    }

    #[test]
    fn test_invalid_override_fails() {
        let result = RestDocsConfig::default().with_overrides(|k| {
            (k == TEMPLATE_FORMAT_ENV).then(|| "rst".to_string())
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = RestDocsConfig::from_file(&dir.path().join("restdocs.yaml"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_env_file_is_not_a_problem() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join("missing.env"));
        assert!(dotenv_problem(result).is_none());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.env");
        std::fs::write(&path, "RESTDOCS_TEMPLATE_FORMAT markdown\n").unwrap();
        let problem = dotenv_problem(dotenvy::from_path(&path));
        assert!(matches!(problem, Some(dotenvy::Error::LineParse(..))));
    }
}
