//! Diagnostic types: Severity, DiagnosticCategory, Diagnostic, ValidationReport

use serde::{Deserialize, Serialize};

// ============================================================================
// Severity
// ============================================================================

/// Severity of a validation finding.
///
/// Errors block a save-equivalent operation until resolved; warnings never
/// block but require confirmation by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

// ============================================================================
// Category
// ============================================================================

/// What aspect of the geometry a diagnostic concerns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// OD/ID sanity and telescoping fit
    Diameter,
    /// Top/bottom ordering, overlap, gaps, total-depth bounds
    Depth,
    /// Casing program semantics: regression, overrides, washout
    SectionOrder,
    /// Computed volume sanity
    Volume,
    /// List-level structure: IDs, ordering, boundary sections
    Structure,
    /// Survey-station sanity (tvd vs md, station ordering)
    Survey,
}

// ============================================================================
// Diagnostic
// ============================================================================

/// One validation finding, tagged with the section it concerns.
///
/// `section_id` is `None` for list-level findings (empty list, duplicate
/// IDs). All physical quantities in `message` use fixed 2-3 decimal
/// formatting so reports are stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub section_id: Option<u32>,
    /// Name of the section/component the finding concerns ("" for global)
    pub component_name: String,
    pub category: DiagnosticCategory,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(
        section_id: Option<u32>,
        component_name: impl Into<String>,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            section_id,
            component_name: component_name.into(),
            category,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(
        section_id: Option<u32>,
        component_name: impl Into<String>,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            section_id,
            component_name: component_name.into(),
            category,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.section_id {
            Some(id) => write!(f, "[{}] #{} {}: {}", self.severity, id, self.component_name, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

// ============================================================================
// Validation Report
// ============================================================================

/// Aggregated outcome of one full validation sweep.
///
/// The validator never throws; every category is evaluated on every call
/// and all findings land here, so a caller can present every issue at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// True when no Error-severity finding is present. Warnings do not
    /// affect validity.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }
}
