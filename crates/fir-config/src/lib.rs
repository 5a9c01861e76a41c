//! Configuration management for Fir.
//!
//! Parses `fir.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `templates.source`
//! - `render.id_prefix`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the template source file.
    pub template_source: Option<PathBuf>,
    /// Override the directive error policy.
    pub error_policy: Option<ErrorPolicy>,
    /// Override skipping of hidden subtrees.
    pub skip_hidden: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "fir.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template loading configuration (paths are relative strings from TOML).
    templates: TemplatesConfigRaw,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Resolved templates configuration (set after loading).
    #[serde(skip)]
    pub templates_resolved: TemplatesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw templates configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplatesConfigRaw {
    source: Option<String>,
    class: Option<String>,
}

/// Resolved template loading configuration.
#[derive(Debug, Default)]
pub struct TemplatesConfig {
    /// HTML file holding the template library.
    pub source: PathBuf,
    /// Class marking an element as a template.
    pub class: String,
}

/// How directive failures inside one render pass are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Process every element, report all failures after the pass.
    #[default]
    Collect,
    /// Stop the pass at the first failure.
    FailFast,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix for element ids assigned from the identity field.
    pub id_prefix: String,
    /// Record field holding a document identity.
    pub identity_field: String,
    /// Directive failure reporting.
    pub error_policy: ErrorPolicy,
    /// Skip directive evaluation inside subtrees hidden earlier in the pass.
    pub skip_hidden: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            id_prefix: "fir-".to_owned(),
            identity_field: ".id".to_owned(),
            error_policy: ErrorPolicy::Collect,
            skip_hidden: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`templates.source`").
        field: String,
        /// Error message (e.g., "${`FIR_HOME`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `fir.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source) = &settings.template_source {
            self.templates_resolved.source.clone_from(source);
        }
        if let Some(policy) = settings.error_policy {
            self.render.error_policy = policy;
        }
        if let Some(skip_hidden) = settings.skip_hidden {
            self.render.skip_hidden = skip_hidden;
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            templates: TemplatesConfigRaw::default(),
            render: RenderConfig::default(),
            templates_resolved: TemplatesConfig {
                source: base.join("index.html"),
                class: "template".to_owned(),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.templates_resolved.class, "templates.class")?;
        require_non_empty(&self.render.identity_field, "render.identity_field")?;

        // Ids are looked up by selector, which cannot start with a digit.
        if self
            .render
            .id_prefix
            .starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(ConfigError::Validation(
                "render.id_prefix cannot start with a digit".to_owned(),
            ));
        }
        if self.render.id_prefix.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "render.id_prefix cannot contain whitespace".to_owned(),
            ));
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source) = self.templates.source {
            self.templates.source = Some(expand::expand_env(source, "templates.source")?);
        }
        self.render.id_prefix = expand::expand_env(&self.render.id_prefix, "render.id_prefix")?;
        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        self.templates_resolved = TemplatesConfig {
            source: config_dir.join(self.templates.source.as_deref().unwrap_or("index.html")),
            class: self
                .templates
                .class
                .clone()
                .unwrap_or_else(|| "template".to_owned()),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/app"));
        assert_eq!(
            config.templates_resolved.source,
            PathBuf::from("/app/index.html")
        );
        assert_eq!(config.templates_resolved.class, "template");
        assert_eq!(config.render.id_prefix, "fir-");
        assert_eq!(config.render.identity_field, ".id");
        assert_eq!(config.render.error_policy, ErrorPolicy::Collect);
        assert!(!config.render.skip_hidden);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.id_prefix, "fir-");
        assert_eq!(config.render.error_policy, ErrorPolicy::Collect);
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
id_prefix = "restaurant-"
identity_field = "_id"
error_policy = "fail-fast"
skip_hidden = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.id_prefix, "restaurant-");
        assert_eq!(config.render.identity_field, "_id");
        assert_eq!(config.render.error_policy, ErrorPolicy::FailFast);
        assert!(config.render.skip_hidden);
    }

    #[test]
    fn test_parse_unknown_policy_fails() {
        let toml = r#"
[render]
error_policy = "ignore"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[templates]
source = "public/index.html"
class = "fir-template"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.templates_resolved.source,
            PathBuf::from("/project/public/index.html")
        );
        assert_eq!(config.templates_resolved.class, "fir-template");
    }

    #[test]
    fn test_validate_rejects_digit_prefix() {
        let mut config = Config::default_with_base(Path::new("/app"));
        config.render.id_prefix = "1-".to_owned();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("id_prefix"));
    }

    #[test]
    fn test_validate_rejects_empty_identity_field() {
        let mut config = Config::default_with_base(Path::new("/app"));
        config.render.identity_field = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.identity_field"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/app"));
        let overrides = CliSettings {
            template_source: Some(PathBuf::from("/other/templates.html")),
            error_policy: Some(ErrorPolicy::FailFast),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.templates_resolved.source,
            PathBuf::from("/other/templates.html")
        );
        assert_eq!(config.render.error_policy, ErrorPolicy::FailFast);
        assert!(!config.render.skip_hidden);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fir.toml");
        std::fs::write(
            &path,
            "[templates]\nsource = \"web/index.html\"\n\n[render]\nskip_hidden = true\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.templates_resolved.source,
            dir.path().join("web/index.html")
        );
        assert!(config.render.skip_hidden);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/fir.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
