//! wellgeom: Wellbore Geometry Engine
//!
//! Geometric model of a wellbore and drill string with cascading
//! volumetric recalculation, multi-category validation, and a
//! minimum-curvature survey trajectory calculator.
//!
//! ## Architecture
//!
//! - **WellboreModel**: owns the ordered section list; every edit runs a
//!   synchronous cascade (recompute, auto-link, override-merge, validate)
//! - **DrillString**: ordered component list with derived volumes
//! - **SurveyLog**: minimum-curvature trajectory with forward recomputation
//! - **GeometryValidator**: full-sweep diagnostics, errors and warnings
//! - **GeometryConfig**: operator-tunable tolerances and limits (TOML)

pub mod cascade;
pub mod config;
pub mod import;
pub mod survey;
pub mod types;
pub mod validation;
pub mod volumes;

// Re-export configuration
pub use config::{ConfigError, GeometryConfig};

// Re-export the model types
pub use types::{
    ComponentKind, Diagnostic, DiagnosticCategory, DrillStringComponent, JetSet, SectionType,
    Severity, SurveyPoint, ValidationReport, WellboreSection,
};

// Re-export the coordinators
pub use cascade::{ComponentEdit, DrillString, EditError, EditOutcome, SectionEdit, WellboreModel};

// Re-export the trajectory calculator
pub use survey::{SurveyField, SurveyLog};

// Re-export import contracts
pub use import::{DrillStringRecord, ImportError, ImportSummary, RowError, SurveyRecord};
