//! Geometry configuration - validation tolerances and limits as TOML values
//!
//! The override-merge and continuity tolerances are inherited business
//! thresholds whose exact values were never formally specified, so every
//! one of them is a named, operator-tunable field rather than a constant
//! buried in the rule engine. Each struct implements `Default` with the
//! inherited values, so behavior is unchanged when no config file exists.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the geometry engine.
///
/// Load with `GeometryConfig::load()` which searches:
/// 1. `$WELLGEOM_CONFIG` env var
/// 2. `./geometry_config.toml`
/// 3. Built-in defaults
///
/// The loaded value is plain data passed explicitly into `WellboreModel`;
/// there is no process-wide config singleton.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeometryConfig {
    /// Matching tolerances for continuity and override detection
    #[serde(default)]
    pub tolerances: ToleranceConfig,

    /// Physical sanity limits for diameters, volumes and washout
    #[serde(default)]
    pub limits: LimitConfig,

    /// Survey import/calculation bounds
    #[serde(default)]
    pub survey: SurveyConfig,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            tolerances: ToleranceConfig::default(),
            limits: LimitConfig::default(),
            survey: SurveyConfig::default(),
        }
    }
}

// ============================================================================
// Tolerances
// ============================================================================

/// Depth/diameter matching tolerances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToleranceConfig {
    /// OD match window for the casing override-merge heuristic (in)
    pub override_od_tolerance_in: f64,
    /// Top-depth match window for the override-merge heuristic (ft)
    pub override_top_tolerance_ft: f64,
    /// Gap above a section larger than this is reported (ft)
    pub gap_warning_ft: f64,
    /// Equality window for depth comparisons, e.g. last bottom vs total MD (ft)
    pub depth_match_tolerance_ft: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            override_od_tolerance_in: 0.001,
            override_top_tolerance_ft: 0.01,
            gap_warning_ft: 0.01,
            depth_match_tolerance_ft: 0.001,
        }
    }
}

// ============================================================================
// Limits
// ============================================================================

/// Physical sanity limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitConfig {
    /// Smallest plausible tubular/hole OD (in)
    pub od_min_in: f64,
    /// Largest plausible tubular/hole OD (in); conductor pipe tops out well below this
    pub od_max_in: f64,
    /// OD above this triggers the "value looks like thousandths" hint
    pub od_millimeter_hint_threshold: f64,
    /// Section volume above this is suspicious (bbl)
    pub volume_warning_bbl: f64,
    /// Section volume above this is impossible (bbl)
    pub volume_error_bbl: f64,
    /// Washout above this draws a warning (%)
    pub washout_warning_percent: f64,
    /// Washout above this draws a stronger warning (%)
    pub washout_severe_percent: f64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            od_min_in: 2.0,
            od_max_in: 60.0,
            od_millimeter_hint_threshold: 1000.0,
            volume_warning_bbl: 10_000.0,
            volume_error_bbl: 100_000.0,
            washout_warning_percent: 30.0,
            washout_severe_percent: 50.0,
        }
    }
}

// ============================================================================
// Survey
// ============================================================================

/// Survey station bounds used by the importer and trajectory checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurveyConfig {
    /// Maximum accepted hole inclination (deg)
    pub max_hole_angle_deg: f64,
    /// Maximum accepted azimuth (deg)
    pub max_azimuth_deg: f64,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            max_hole_angle_deg: 93.0,
            max_azimuth_deg: 360.0,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration loading/validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}

// ============================================================================
// Loading
// ============================================================================

impl GeometryConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELLGEOM_CONFIG` environment variable
    /// 2. `./geometry_config.toml` in the current working directory
    /// 3. Built-in defaults (inherited threshold values)
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("WELLGEOM_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded geometry config from WELLGEOM_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from WELLGEOM_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "WELLGEOM_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("geometry_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded geometry config from ./geometry_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./geometry_config.toml, using defaults");
                }
            }
        }

        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Two-pass parse: unknown keys are reported as warnings first (typos
    /// never break an existing config), then serde deserializes and the
    /// physical ranges are checked.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(())
    }

    /// Check internal consistency and physical plausibility. Errors here
    /// mean the engine cannot run meaningfully with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_physical_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GeometryConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_tolerances_match_inherited_values() {
        let t = ToleranceConfig::default();
        assert_eq!(t.override_od_tolerance_in, 0.001);
        assert_eq!(t.override_top_tolerance_ft, 0.01);
        assert_eq!(t.gap_warning_ft, 0.01);
        assert_eq!(t.depth_match_tolerance_ft, 0.001);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeometryConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: GeometryConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GeometryConfig = toml::from_str(
            r#"
[limits]
volume_warning_bbl = 5000.0
"#,
        )
        .unwrap();
        assert_eq!(config.limits.volume_warning_bbl, 5000.0);
        assert_eq!(config.limits.od_max_in, 60.0);
        assert_eq!(config.tolerances.override_od_tolerance_in, 0.001);
    }
}
