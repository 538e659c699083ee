//! Geometry Engine Configuration
//!
//! Validation tolerances and physical limits loaded from TOML files. The
//! override-merge windows, gap tolerance and volume/washout thresholds are
//! inherited business values, so they are operator-tunable rather than
//! hardcoded in the rule engine.
//!
//! ## Loading Order
//!
//! 1. `WELLGEOM_CONFIG` environment variable (path to TOML file)
//! 2. `geometry_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded `GeometryConfig` is an explicit value handed to
//! `WellboreModel::new()`; there is no global config state.

mod geometry_config;
pub mod validation;

pub use geometry_config::*;
pub use validation::ConfigWarning;
