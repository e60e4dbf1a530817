// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "SLATE_REVIEW";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "TrackingConfig::default")]
    pub tracking: TrackingConfig,
    #[serde(default = "RendererConfig::default")]
    pub renderer: RendererConfig,
    #[serde(default = "ReviewConfig::default")]
    pub review: ReviewConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub api_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RendererConfig {
    pub executable: PathBuf,
    pub plugin_path: Option<PathBuf>,
    pub slate_node_class: String,
    pub ocio_config: String,
    pub script_dir: Option<PathBuf>,
    pub keep_script: bool,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFailurePolicy {
    /// Log the failure and still create and upload the Version.
    Continue,
    /// Stop before any tracking write.
    Abort,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub status: String,
    pub color_management: String,
    pub date_format: String,
    pub upload_field: String,
    pub on_render_failure: RenderFailurePolicy,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            api_path: "api/v1".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("nuke"),
            plugin_path: None,
            slate_node_class: "nfaSlate".to_string(),
            ocio_config: "aces_1.2".to_string(),
            script_dir: None,
            keep_script: false,
            extra_args: vec![],
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            status: "rev".to_string(),
            color_management: "OCIO".to_string(),
            date_format: crate::models::slate::DEFAULT_DATE_FORMAT.to_string(),
            upload_field: "sg_uploaded_movie".to_string(),
            on_render_failure: RenderFailurePolicy::Continue,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();
        Self::from_sources(path, Path::new(DEFAULT_CONFIG_PATH), None)
    }

    /// An explicit `path` must exist; the default file is optional so
    /// environment overrides still apply without it. `env` replaces the
    /// process environment when given.
    fn from_sources(
        path: Option<&Path>,
        default_path: &Path,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path),
            None => config::File::from(default_path).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            renderer: RendererConfig::default(),
            review: ReviewConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tracking.timeout_secs == 0 {
            return Err(PipelineError::Config(
                "tracking.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.renderer.executable.as_os_str().is_empty() {
            return Err(PipelineError::Config(
                "renderer.executable must not be empty".to_string(),
            ));
        }

        if self.renderer.slate_node_class.trim().is_empty() {
            return Err(PipelineError::Config(
                "renderer.slate_node_class must not be empty".to_string(),
            ));
        }

        if self.review.status.trim().is_empty() {
            return Err(PipelineError::Config(
                "review.status must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
