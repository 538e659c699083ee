//! Wellbore section types: SectionType, WellboreSection

use serde::{Deserialize, Serialize};

// ============================================================================
// Section Type
// ============================================================================

/// Kind of wellbore section in the telescoping casing program
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub enum SectionType {
    /// Uncased hole below the last shoe; diameter is the bit/hole diameter
    #[default]
    OpenHole,
    /// Casing string run from surface
    Casing,
    /// Liner hung off inside the previous casing
    Liner,
}

impl SectionType {
    /// Whether this section is a cased tubular (Casing or Liner)
    pub fn is_cased(&self) -> bool {
        matches!(self, SectionType::Casing | SectionType::Liner)
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionType::OpenHole => write!(f, "Open Hole"),
            SectionType::Casing => write!(f, "Casing"),
            SectionType::Liner => write!(f, "Liner"),
        }
    }
}

// ============================================================================
// Wellbore Section
// ============================================================================

/// One section of the wellbore geometry, ordered by top measured depth.
///
/// Depth and diameter fields are `Option` until the operator (or an import)
/// fills them in; an unset value must never leak into volume math as 0.
/// `volume_bbl` is derived but stored, because the annular volume of a
/// section depends on the inner diameter of the section above it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellboreSection {
    /// Dense 1..N identifier, reassigned on renumbering
    pub id: u32,
    /// Display name, e.g. "9 5/8\" Casing"
    pub name: String,
    pub section_type: SectionType,
    /// Top measured depth (ft)
    pub top_md: Option<f64>,
    /// Bottom measured depth (ft)
    pub bottom_md: Option<f64>,
    /// Outer diameter (in); for OpenHole this is the hole diameter
    pub od: Option<f64>,
    /// Inner diameter (in); exactly 0 for OpenHole
    pub id_in: Option<f64>,
    /// Over-gauge hole enlargement (%); only meaningful for OpenHole
    pub washout_percent: Option<f64>,
    /// Derived section volume (bbl), recomputed by the cascade
    pub volume_bbl: Option<f64>,
}

impl WellboreSection {
    /// Create a section with no depths or diameters filled in yet.
    pub fn new(id: u32, name: impl Into<String>, section_type: SectionType) -> Self {
        let mut section = Self {
            id,
            name: name.into(),
            section_type,
            top_md: None,
            bottom_md: None,
            od: None,
            id_in: None,
            washout_percent: None,
            volume_bbl: None,
        };
        section.enforce_type_invariants();
        section
    }

    /// Section length (ft), when both depths are present and ordered.
    pub fn length_ft(&self) -> Option<f64> {
        match (self.top_md, self.bottom_md) {
            (Some(top), Some(bottom)) if bottom > top => Some(bottom - top),
            _ => None,
        }
    }

    /// Force the per-type field invariants: OpenHole always has ID 0,
    /// cased sections never carry a washout.
    pub fn enforce_type_invariants(&mut self) {
        match self.section_type {
            SectionType::OpenHole => {
                self.id_in = Some(0.0);
            }
            SectionType::Casing | SectionType::Liner => {
                self.washout_percent = None;
            }
        }
    }

    /// Effective inner bore (in) a deeper section must pass through:
    /// the ID for cased sections, the hole diameter for open hole.
    pub fn inner_bore(&self) -> Option<f64> {
        match self.section_type {
            SectionType::OpenHole => self.od,
            SectionType::Casing | SectionType::Liner => self.id_in,
        }
    }
}
