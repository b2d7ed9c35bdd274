//! Configuration: `sitesmith.toml`, environment variables and CLI overrides.
//!
//! Precedence is CLI flags, then environment, then the config file, then
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use sitesmith_ai::GeneratorConfig;
use sitesmith_static::{BuildConfig, FixPolicy};

/// Prompt used when neither the CLI nor the config file supplies one.
pub const DEFAULT_PROMPT: &str = "I want a K-pop model showcase website";

/// Environment variables searched, in order, for the API key.
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Environment variable overriding the light model.
pub const LIGHT_MODEL_VAR: &str = "FLASH_MODEL";

/// Environment variable overriding the API base URL.
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("GOOGLE_API_KEY or GEMINI_API_KEY not found in environment")]
    MissingApiKey,
}

/// Configuration file structure (sitesmith.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    models: ModelsConfig,
    #[serde(default)]
    timeouts: TimeoutsConfig,
    #[serde(default)]
    render: RenderConfig,
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize, Default)]
struct SiteConfig {
    prompt: Option<String>,
    output: Option<String>,
    templates: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelsConfig {
    primary: Option<String>,
    light: Option<String>,
}

/// Per-call timeouts in seconds.
#[derive(Debug, Deserialize, Default)]
struct TimeoutsConfig {
    plan: Option<u64>,
    design_doc: Option<u64>,
    template: Option<u64>,
    css: Option<u64>,
    fix: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RenderConfig {
    #[serde(default = "default_max_fix_attempts")]
    max_fix_attempts: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_fix_attempts: default_max_fix_attempts(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct BuildSettings {
    #[serde(default)]
    minify_css: bool,
}

fn default_max_fix_attempts() -> usize {
    FixPolicy::default().max_fix_attempts
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub prompt: Option<String>,
    pub output: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub prompt: String,
    pub api_base: Option<String>,
    pub generator: GeneratorConfig,
    pub build: BuildConfig,
}

/// Load configuration from `path` if it exists.
///
/// A missing file yields defaults; a file that exists but is malformed is an error.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let config = toml::from_str(&content).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// First non-empty API key among [`API_KEY_VARS`].
pub fn api_key(env: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| env(*name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingApiKey)
}

/// Merge file, environment and CLI values into run settings.
pub fn resolve(
    file: ConfigFile,
    overrides: Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let defaults = GeneratorConfig::default();
    let seconds = |value: Option<u64>, fallback: Duration| {
        value.map(Duration::from_secs).unwrap_or(fallback)
    };

    let generator = GeneratorConfig {
        primary_model: file.models.primary.unwrap_or(defaults.primary_model),
        light_model: env(LIGHT_MODEL_VAR)
            .filter(|m| !m.trim().is_empty())
            .or(file.models.light)
            .unwrap_or(defaults.light_model),
        plan_timeout: seconds(file.timeouts.plan, defaults.plan_timeout),
        design_doc_timeout: seconds(file.timeouts.design_doc, defaults.design_doc_timeout),
        template_timeout: seconds(file.timeouts.template, defaults.template_timeout),
        css_timeout: seconds(file.timeouts.css, defaults.css_timeout),
        fix_timeout: seconds(file.timeouts.fix, defaults.fix_timeout),
    };

    let build_defaults = BuildConfig::default();
    let build = BuildConfig {
        output_dir: overrides
            .output
            .or(file.site.output.map(PathBuf::from))
            .unwrap_or(build_defaults.output_dir),
        templates_dir: file.site.templates.map(PathBuf::from),
        fix_policy: FixPolicy {
            max_fix_attempts: file.render.max_fix_attempts,
        },
        minify_css: file.build.minify_css,
    };

    Settings {
        prompt: overrides
            .prompt
            .or(file.site.prompt)
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        api_base: env(API_BASE_VAR).filter(|b| !b.trim().is_empty()),
        generator,
        build,
    }
}
