//! Engine configuration.
//!
//! # Responsibility
//! - Hold every tunable constant of the engine in one serde-readable struct.
//! - Provide defaults matching product behavior so callers can pass partial JSON.
//!
//! # Invariants
//! - `history_capacity` is at least 1.
//! - `min_zoom <= max_zoom`, both positive.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
pub const DEFAULT_MAX_NODES: usize = 5;
pub const DEFAULT_MAX_MEDIA_NODES: usize = 3;
pub const DEFAULT_TIMELINE_FALLBACK_DAYS: i64 = 30;

/// Plan-tier limits applied by the quota gate to restricted plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuotaLimits {
    pub max_nodes: usize,
    pub max_media_nodes: usize,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_media_nodes: DEFAULT_MAX_MEDIA_NODES,
        }
    }
}

/// Export pipeline settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Virtual resolution the canvas viewport is rasterized at.
    pub canvas_width_px: u32,
    pub canvas_height_px: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fractional padding added around node bounds before fitting.
    pub bounds_padding: f64,
    /// Size assumed for nodes the renderer never measured.
    pub default_node_width: f64,
    pub default_node_height: f64,
    pub background: String,
    /// Character width board descriptions wrap at.
    pub board_wrap_chars: usize,
    /// Characters per line of notebook body text on a portrait page.
    pub notebook_wrap_chars: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            canvas_width_px: 1920,
            canvas_height_px: 1080,
            min_zoom: 0.5,
            max_zoom: 2.0,
            bounds_padding: 0.1,
            default_node_width: 256.0,
            default_node_height: 128.0,
            background: "#0F1115".to_string(),
            board_wrap_chars: 67,
            notebook_wrap_chars: 85,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub history_capacity: usize,
    pub quota: QuotaLimits,
    pub timeline_fallback_days: i64,
    pub export: ExportConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            quota: QuotaLimits::default(),
            timeline_fallback_days: DEFAULT_TIMELINE_FALLBACK_DAYS,
            export: ExportConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a (possibly partial) JSON config and validates it.
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed JSON or wrongly typed values.
    /// - `ConfigError::Invalid` when a value breaks a config invariant.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be >= 1"));
        }
        if self.timeline_fallback_days <= 0 {
            return Err(ConfigError::Invalid("timeline_fallback_days must be >= 1"));
        }
        let export = &self.export;
        if export.min_zoom <= 0.0 || export.min_zoom > export.max_zoom {
            return Err(ConfigError::Invalid(
                "export zoom range must satisfy 0 < min_zoom <= max_zoom",
            ));
        }
        if export.canvas_width_px == 0 || export.canvas_height_px == 0 {
            return Err(ConfigError::Invalid("canvas resolution must be non-zero"));
        }
        if export.board_wrap_chars == 0 || export.notebook_wrap_chars == 0 {
            return Err(ConfigError::Invalid("wrap widths must be >= 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(details) => write!(f, "failed to parse engine config: {details}"),
            Self::Invalid(details) => write!(f, "invalid engine config: {details}"),
        }
    }
}

impl Error for ConfigError {}
