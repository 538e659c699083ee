//! Volumetric formulas for wellbore and drill-string geometry
//!
//! Pure, deterministic capacity math. All lengths in ft, diameters in
//! inches, volumes in bbl, using the standard oilfield capacity constant
//! 1029.4 (in^2-ft per bbl).
//!
//! Degenerate inputs (non-positive diameter or length, OD not larger than
//! ID) degrade to 0 rather than erroring: only structural invariant
//! violations surface as diagnostics, and those belong to the validator.

use crate::types::WellboreSection;

/// Oilfield capacity constant: d^2 (in^2) * L (ft) / 1029.4 = bbl
pub const CAPACITY_CONSTANT: f64 = 1029.4;

// ============================================================================
// Tubular Volumes
// ============================================================================

/// Internal (bore) capacity of a tubular (bbl)
///
/// Formula: V = (pi/4) * ID^2 * L / 1029.4
///
/// Where:
/// - ID = inner diameter (in)
/// - L = length (ft)
///
/// Returns 0 if any input is non-positive.
pub fn internal_volume(id_in: f64, length_ft: f64) -> f64 {
    if id_in <= 0.0 || length_ft <= 0.0 {
        return 0.0;
    }
    let volume = std::f64::consts::FRAC_PI_4 * id_in * id_in * length_ft / CAPACITY_CONSTANT;
    volume.max(0.0)
}

/// Steel displacement of a tubular (bbl)
///
/// Formula: V = (pi/4) * (OD^2 - ID^2) * L / 1029.4
///
/// Returns 0 if OD <= ID or length is non-positive.
pub fn displacement_volume(od_in: f64, id_in: f64, length_ft: f64) -> f64 {
    if od_in <= id_in || length_ft <= 0.0 {
        return 0.0;
    }
    let annulus = od_in * od_in - id_in * id_in;
    let volume = std::f64::consts::FRAC_PI_4 * annulus * length_ft / CAPACITY_CONSTANT;
    volume.max(0.0)
}

/// Open-hole capacity including washout enlargement (bbl)
///
/// Formula: V = (D^2 / 1029.4) * L * (1 + washout/100)
///
/// Where:
/// - D = hole (bit) diameter (in)
/// - washout = over-gauge enlargement (%)
///
/// Returns 0 if diameter or length is non-positive; negative washout is
/// treated as 0 (a hole cannot be under-gauge from washout).
pub fn open_hole_volume(hole_diameter_in: f64, length_ft: f64, washout_percent: f64) -> f64 {
    if hole_diameter_in <= 0.0 || length_ft <= 0.0 {
        return 0.0;
    }
    let washout_factor = 1.0 + washout_percent.max(0.0) / 100.0;
    let volume =
        (hole_diameter_in * hole_diameter_in / CAPACITY_CONSTANT) * length_ft * washout_factor;
    volume.max(0.0)
}

/// Annular volume between the previous section's bore and the current
/// section's body (bbl)
///
/// Formula: V = (pi/4) * (prevID^2 - curOD^2) * L / 1029.4
///
/// With no previous section (surface string) the annulus degenerates to
/// the internal capacity of the current section: ID^2 / 1029.4 * L.
///
/// Clamped to >= 0: an invalid telescoping pair (current OD larger than
/// the previous bore) yields 0, and the validator reports the violation.
pub fn annular_volume(
    previous_inner_diameter_in: Option<f64>,
    current_od_in: f64,
    current_id_in: f64,
    length_ft: f64,
) -> f64 {
    if length_ft <= 0.0 {
        return 0.0;
    }
    match previous_inner_diameter_in {
        Some(prev_id) if prev_id > 0.0 => {
            let annulus = prev_id * prev_id - current_od_in * current_od_in;
            let volume = std::f64::consts::FRAC_PI_4 * annulus * length_ft / CAPACITY_CONSTANT;
            volume.max(0.0)
        }
        _ => {
            if current_id_in <= 0.0 {
                return 0.0;
            }
            (current_id_in * current_id_in / CAPACITY_CONSTANT * length_ft).max(0.0)
        }
    }
}

// ============================================================================
// Section Volume (Option-aware)
// ============================================================================

/// Compute a wellbore section's stored volume, using the section above it
/// as annular context.
///
/// Returns `None` while any required input is still unset; an unfilled
/// form row must not report a volume of 0 bbl as if it were measured.
pub fn section_volume(
    section: &WellboreSection,
    previous: Option<&WellboreSection>,
) -> Option<f64> {
    let length = section.length_ft()?;
    match section.section_type {
        crate::types::SectionType::OpenHole => {
            let hole = section.od?;
            let washout = section.washout_percent?;
            Some(open_hole_volume(hole, length, washout))
        }
        crate::types::SectionType::Casing | crate::types::SectionType::Liner => {
            let od = section.od?;
            let id = section.id_in?;
            let prev_bore = previous.and_then(|p| p.inner_bore()).filter(|&b| b > 0.0);
            Some(annular_volume(prev_bore, od, id, length))
        }
    }
}

/// Compute a drill-string component's internal and displacement volumes.
///
/// Returns `(None, None)` while any dimension is unset.
pub fn component_volumes(
    length_ft: Option<f64>,
    od_in: Option<f64>,
    id_in: Option<f64>,
) -> (Option<f64>, Option<f64>) {
    match (length_ft, od_in, id_in) {
        (Some(length), Some(od), Some(id)) => (
            Some(internal_volume(id, length)),
            Some(displacement_volume(od, id, length)),
        ),
        _ => (None, None),
    }
}
