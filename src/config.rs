use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::assignment::DEFAULT_RANDOM_SEED;
use crate::core::calibration::{AnomalyDetector, CalibrationConfig, DEFAULT_CEILING};
use crate::models::{CalibrationReport, MatchingWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingWeights,
    #[serde(default)]
    pub calibration: CalibrationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Largest accepted JSON body in bytes
    pub max_payload_bytes: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            max_payload_bytes: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CalibrationSettings {
    #[serde(default = "default_percentile")]
    pub percentile: f64,
    #[serde(default = "default_stddev_multiplier")]
    pub stddev_multiplier: f64,
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
    #[serde(default = "default_mad_multiplier")]
    pub mad_multiplier: f64,
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
    /// Fixed threshold used when no artifact is configured
    pub threshold: Option<f64>,
    /// Path of a calibration artifact (JSON) to load at startup
    pub artifact_path: Option<String>,
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            percentile: default_percentile(),
            stddev_multiplier: default_stddev_multiplier(),
            iqr_multiplier: default_iqr_multiplier(),
            mad_multiplier: default_mad_multiplier(),
            ceiling: default_ceiling(),
            threshold: None,
            artifact_path: None,
            random_seed: default_random_seed(),
        }
    }
}

fn default_percentile() -> f64 { 5.0 }
fn default_stddev_multiplier() -> f64 { 2.0 }
fn default_iqr_multiplier() -> f64 { 1.5 }
fn default_mad_multiplier() -> f64 { 3.0 }
fn default_ceiling() -> f64 { DEFAULT_CEILING }
fn default_random_seed() -> u64 { DEFAULT_RANDOM_SEED }

impl CalibrationSettings {
    /// Estimator parameters for the calibrator
    pub fn estimator_config(&self) -> CalibrationConfig {
        CalibrationConfig {
            percentile: self.percentile,
            stddev_multiplier: self.stddev_multiplier,
            iqr_multiplier: self.iqr_multiplier,
            mad_multiplier: self.mad_multiplier,
            ceiling: self.ceiling,
        }
    }

    /// Detector for run-time classification
    ///
    /// Threshold source, first match wins:
    /// 1. The calibration artifact at `artifact_path`
    /// 2. The configured `threshold`
    /// 3. The ceiling
    pub fn detector(&self) -> AnomalyDetector {
        if let Some(path) = &self.artifact_path {
            match CalibrationReport::load(path) {
                Ok(report) => {
                    tracing::info!(
                        "Loaded calibration artifact v{} from {} (threshold {:.3})",
                        report.version,
                        path,
                        report.threshold
                    );
                    return AnomalyDetector::from_report(&report);
                }
                Err(e) => {
                    tracing::warn!("Failed to load calibration artifact {}: {}, falling back", path, e);
                }
            }
        }

        AnomalyDetector::new(self.threshold.unwrap_or(self.ceiling))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load `config/default`, then `config/local`, then `PERSONA_MATCH__*`
    /// environment variables; later sources override earlier ones and
    /// anything left unset keeps its struct default
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load a single configuration file plus environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

// e.g. PERSONA_MATCH__SERVER__PORT -> server.port
fn environment() -> Environment {
    Environment::with_prefix("PERSONA_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
