//! Geometry validation rule engine
//!
//! Full-sweep validation of the ordered wellbore section list plus survey
//! sanity checks. The validator never fails and never short-circuits: every
//! category is evaluated on every call and all findings are returned in one
//! report, so a caller can present every issue at once instead of
//! one-at-a-time. Running it twice on an unchanged list yields an identical
//! report.
//!
//! Categories:
//! - Diameter: OD/ID sanity, physical range, telescoping fit
//! - Depth: top/bottom ordering, overlap, gaps, total-depth bounds
//! - SectionOrder: casing regression, override patterns, washout
//! - Volume: computed-volume sanity
//! - Structure: list-level checks (IDs, first/last boundaries)
//! - Survey: station ordering and TVD-vs-MD impossibility

use std::collections::HashSet;

use crate::config::GeometryConfig;
use crate::types::{
    Diagnostic, DiagnosticCategory, SectionType, SurveyPoint, ValidationReport, WellboreSection,
};

// ============================================================================
// Section List Validation (entry point)
// ============================================================================

/// Validate the full wellbore section list against the target total MD.
///
/// `sections` may arrive in any order; validation works over the list
/// sorted by top MD (unset tops last, ties broken by id) exactly as the
/// cascade resolves adjacency.
pub fn validate_sections(
    sections: &[WellboreSection],
    total_md: f64,
    config: &GeometryConfig,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_structure(sections, total_md, config, &mut report);

    let order = sorted_order(sections);
    for (pos, &idx) in order.iter().enumerate() {
        let section = &sections[idx];
        let previous = if pos > 0 { Some(&sections[order[pos - 1]]) } else { None };

        check_diameters(section, previous, config, &mut report);
        check_depths(section, previous, total_md, config, &mut report);
        check_section_semantics(section, previous, config, &mut report);
        check_volume(section, config, &mut report);
    }

    report
}

/// Indices of `sections` sorted by top MD ascending, unset tops last,
/// ties broken by id so the order (and the report) is deterministic.
pub fn sorted_order(sections: &[WellboreSection]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sections.len()).collect();
    order.sort_by(|&a, &b| {
        let key = |s: &WellboreSection| (s.top_md.unwrap_or(f64::MAX), s.id);
        key(&sections[a])
            .partial_cmp(&key(&sections[b]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

// ============================================================================
// Structure (list-level)
// ============================================================================

fn check_structure(
    sections: &[WellboreSection],
    total_md: f64,
    config: &GeometryConfig,
    report: &mut ValidationReport,
) {
    if sections.is_empty() {
        report.push(Diagnostic::error(
            None,
            "",
            DiagnosticCategory::Structure,
            "Wellbore geometry contains no sections",
        ));
        return;
    }

    // Duplicate IDs: one error per duplicate occurrence
    let mut seen = HashSet::new();
    for section in sections {
        if !seen.insert(section.id) {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Structure,
                format!("Duplicate section id {}", section.id),
            ));
        }
    }

    // Dense sequential ids 1..N in sorted order
    let order = sorted_order(sections);
    let sequential = order
        .iter()
        .enumerate()
        .all(|(pos, &idx)| sections[idx].id == (pos as u32) + 1);
    if !sequential {
        report.push(Diagnostic::warning(
            None,
            "",
            DiagnosticCategory::Structure,
            "Section ids are not sequential from 1; renumbering is recommended",
        ));
    }

    // First section must start at surface
    let first = &sections[order[0]];
    match first.top_md {
        Some(top) if top.abs() > config.tolerances.depth_match_tolerance_ft => {
            report.push(Diagnostic::warning(
                Some(first.id),
                first.name.clone(),
                DiagnosticCategory::Structure,
                format!("First section starts at {top:.2} ft instead of surface (0.00 ft)"),
            ));
        }
        _ => {}
    }

    // Last section should reach the target total depth
    let Some(&last_idx) = order.last() else {
        return;
    };
    let last = &sections[last_idx];
    if let Some(bottom) = last.bottom_md {
        if (bottom - total_md).abs() > config.tolerances.depth_match_tolerance_ft {
            report.push(Diagnostic::warning(
                Some(last.id),
                last.name.clone(),
                DiagnosticCategory::Structure,
                format!(
                    "Last section bottoms at {bottom:.2} ft but total depth is {total_md:.2} ft"
                ),
            ));
        }
    }
}

// ============================================================================
// Diameters
// ============================================================================

fn check_diameters(
    section: &WellboreSection,
    previous: Option<&WellboreSection>,
    config: &GeometryConfig,
    report: &mut ValidationReport,
) {
    let limits = &config.limits;

    match section.od {
        None => {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Diameter,
                "OD is required and has not been entered",
            ));
        }
        Some(od) if od <= 0.0 => {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Diameter,
                format!("OD must be > 0 (got {od:.3})"),
            ));
        }
        Some(od) if od < limits.od_min_in || od > limits.od_max_in => {
            let mut message = format!(
                "OD {od:.3} is outside the physical range ({:.1}-{:.1} in)",
                limits.od_min_in, limits.od_max_in
            );
            if od > limits.od_millimeter_hint_threshold {
                message.push_str(&format!("; value looks scaled, did you mean {:.3}?", od / 1000.0));
            }
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Diameter,
                message,
            ));
        }
        Some(_) => {}
    }

    match section.section_type {
        SectionType::OpenHole => {
            // Open hole has no tubular body; ID must be exactly 0
            if section.id_in != Some(0.0) {
                report.push(Diagnostic::error(
                    Some(section.id),
                    section.name.clone(),
                    DiagnosticCategory::Diameter,
                    "Open-hole section must have inner diameter exactly 0",
                ));
            }
        }
        SectionType::Casing | SectionType::Liner => {
            match section.id_in {
                None => {
                    report.push(Diagnostic::error(
                        Some(section.id),
                        section.name.clone(),
                        DiagnosticCategory::Diameter,
                        "ID is required and has not been entered",
                    ));
                }
                Some(id) if id <= 0.0 => {
                    report.push(Diagnostic::error(
                        Some(section.id),
                        section.name.clone(),
                        DiagnosticCategory::Diameter,
                        format!("ID must be > 0 (got {id:.3})"),
                    ));
                }
                Some(id) => {
                    if let Some(od) = section.od {
                        if id >= od {
                            report.push(Diagnostic::error(
                                Some(section.id),
                                section.name.clone(),
                                DiagnosticCategory::Diameter,
                                format!("ID {id:.3} must be smaller than OD {od:.3}"),
                            ));
                        }
                    }
                }
            }
        }
    }

    // Telescoping: this section's body must pass through the previous bore
    if let (Some(od), Some(prev)) = (section.od, previous) {
        if let Some(prev_bore) = prev.inner_bore() {
            if prev_bore > 0.0 && od >= prev_bore {
                report.push(Diagnostic::error(
                    Some(section.id),
                    section.name.clone(),
                    DiagnosticCategory::Diameter,
                    format!(
                        "OD {od:.3} cannot pass through the previous section's bore of {prev_bore:.3}"
                    ),
                ));
            }
        }
    }
}

// ============================================================================
// Depths
// ============================================================================

fn check_depths(
    section: &WellboreSection,
    previous: Option<&WellboreSection>,
    total_md: f64,
    config: &GeometryConfig,
    report: &mut ValidationReport,
) {
    let tol = config.tolerances.depth_match_tolerance_ft;

    if let (Some(top), Some(bottom)) = (section.top_md, section.bottom_md) {
        if bottom <= top {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Depth,
                format!("Bottom {bottom:.2} ft must be deeper than top {top:.2} ft"),
            ));
        }
    }

    if let Some(bottom) = section.bottom_md {
        if bottom > total_md + tol {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Depth,
                format!("Bottom {bottom:.2} ft exceeds the well total depth of {total_md:.2} ft"),
            ));
        }
    }

    let (Some(prev), Some(top)) = (previous, section.top_md) else {
        return;
    };
    let Some(prev_bottom) = prev.bottom_md else {
        return;
    };

    if top < prev_bottom - tol {
        // Full-interval overlay with a shared top reads as an intentional
        // override/replacement of the previous section, not a data error.
        let shares_top = prev
            .top_md
            .map(|pt| (top - pt).abs() <= config.tolerances.override_top_tolerance_ft)
            .unwrap_or(false);
        let reaches_prev_bottom = section
            .bottom_md
            .map(|b| b >= prev_bottom - tol)
            .unwrap_or(false);

        if shares_top && reaches_prev_bottom {
            report.push(Diagnostic::warning(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::SectionOrder,
                format!(
                    "Section overlays \"{}\" over its full interval (top {top:.2} ft); treated as an override/extension",
                    prev.name
                ),
            ));
        } else {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Depth,
                format!(
                    "Top {top:.2} ft overlaps the previous section's bottom at {prev_bottom:.2} ft"
                ),
            ));
        }
    } else if top - prev_bottom > config.tolerances.gap_warning_ft {
        report.push(Diagnostic::warning(
            Some(section.id),
            section.name.clone(),
            DiagnosticCategory::Depth,
            format!(
                "Gap of {:.2} ft between previous bottom {prev_bottom:.2} ft and top {top:.2} ft",
                top - prev_bottom
            ),
        ));
    }
}

// ============================================================================
// Section Semantics
// ============================================================================

fn check_section_semantics(
    section: &WellboreSection,
    previous: Option<&WellboreSection>,
    config: &GeometryConfig,
    report: &mut ValidationReport,
) {
    // Casing/Liner after Casing/Liner must not regress in bottom depth
    if section.section_type.is_cased() {
        if let Some(prev) = previous.filter(|p| p.section_type.is_cased()) {
            if let (Some(bottom), Some(prev_bottom)) = (section.bottom_md, prev.bottom_md) {
                if bottom < prev_bottom - config.tolerances.depth_match_tolerance_ft {
                    report.push(Diagnostic::error(
                        Some(section.id),
                        section.name.clone(),
                        DiagnosticCategory::SectionOrder,
                        format!(
                            "{} bottom {bottom:.2} ft regresses above the previous {} shoe at {prev_bottom:.2} ft",
                            section.section_type, prev.section_type
                        ),
                    ));
                }
            }
        }
    }

    // Open hole requires a washout figure within 0-100%
    if section.section_type == SectionType::OpenHole {
        match section.washout_percent {
            None => {
                report.push(Diagnostic::error(
                    Some(section.id),
                    section.name.clone(),
                    DiagnosticCategory::SectionOrder,
                    "Open-hole section requires a washout percentage",
                ));
            }
            Some(washout) if !(0.0..=100.0).contains(&washout) => {
                report.push(Diagnostic::error(
                    Some(section.id),
                    section.name.clone(),
                    DiagnosticCategory::SectionOrder,
                    format!("Washout {washout:.2}% must lie within 0-100%"),
                ));
            }
            Some(washout) if washout > config.limits.washout_severe_percent => {
                report.push(Diagnostic::warning(
                    Some(section.id),
                    section.name.clone(),
                    DiagnosticCategory::SectionOrder,
                    format!(
                        "Washout {washout:.2}% is severe (above {:.0}%); verify the caliper data",
                        config.limits.washout_severe_percent
                    ),
                ));
            }
            Some(washout) if washout > config.limits.washout_warning_percent => {
                report.push(Diagnostic::warning(
                    Some(section.id),
                    section.name.clone(),
                    DiagnosticCategory::SectionOrder,
                    format!(
                        "Washout {washout:.2}% is high (above {:.0}%)",
                        config.limits.washout_warning_percent
                    ),
                ));
            }
            Some(_) => {}
        }
    }
}

// ============================================================================
// Volume Sanity
// ============================================================================

fn check_volume(
    section: &WellboreSection,
    config: &GeometryConfig,
    report: &mut ValidationReport,
) {
    match section.volume_bbl {
        None => {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Volume,
                "Volume has not been computed (depth or diameter inputs missing)",
            ));
        }
        Some(volume) if volume <= 0.0 => {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Volume,
                format!("Computed volume {volume:.2} bbl must be > 0"),
            ));
        }
        Some(volume) if volume > config.limits.volume_error_bbl => {
            report.push(Diagnostic::error(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Volume,
                format!(
                    "Computed volume {volume:.2} bbl exceeds {:.0} bbl; check diameter units",
                    config.limits.volume_error_bbl
                ),
            ));
        }
        Some(volume) if volume > config.limits.volume_warning_bbl => {
            report.push(Diagnostic::warning(
                Some(section.id),
                section.name.clone(),
                DiagnosticCategory::Volume,
                format!(
                    "Computed volume {volume:.2} bbl is unusually large (above {:.0} bbl)",
                    config.limits.volume_warning_bbl
                ),
            ));
        }
        Some(_) => {}
    }
}

// ============================================================================
// Survey Validation
// ============================================================================

/// Sanity-check an ordered survey list: strictly increasing MD and the
/// structural impossibility TVD > MD. Findings are flagged, never
/// auto-corrected.
pub fn validate_survey(points: &[SurveyPoint]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (i, point) in points.iter().enumerate() {
        let station = format!("Station {}", i + 1);

        if i > 0 && point.md <= points[i - 1].md {
            report.push(Diagnostic::error(
                None,
                station.clone(),
                DiagnosticCategory::Survey,
                format!(
                    "MD {:.2} ft does not increase from the previous station at {:.2} ft",
                    point.md,
                    points[i - 1].md
                ),
            ));
        }

        if point.tvd > point.md + 1e-6 {
            report.push(Diagnostic::error(
                None,
                station,
                DiagnosticCategory::Survey,
                format!(
                    "TVD {:.2} ft exceeds MD {:.2} ft, which is structurally impossible",
                    point.tvd, point.md
                ),
            ));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeometryConfig {
        GeometryConfig::default()
    }

    fn open_hole(id: u32, top: f64, bottom: f64, od: f64, washout: f64) -> WellboreSection {
        let mut s = WellboreSection::new(id, format!("Open Hole {id}"), SectionType::OpenHole);
        s.top_md = Some(top);
        s.bottom_md = Some(bottom);
        s.od = Some(od);
        s.washout_percent = Some(washout);
        s.volume_bbl = crate::volumes::section_volume(&s, None);
        s
    }

    fn casing(id: u32, top: f64, bottom: f64, od: f64, inner: f64) -> WellboreSection {
        let mut s = WellboreSection::new(id, format!("Casing {id}"), SectionType::Casing);
        s.top_md = Some(top);
        s.bottom_md = Some(bottom);
        s.od = Some(od);
        s.id_in = Some(inner);
        s.volume_bbl = Some(crate::volumes::annular_volume(None, od, inner, bottom - top));
        s
    }

    #[test]
    fn test_empty_list_is_error() {
        let report = validate_sections(&[], 1000.0, &config());
        assert!(!report.is_valid());
    }

    #[test]
    fn test_clean_two_section_well() {
        let sections = vec![
            casing(1, 0.0, 3000.0, 9.625, 8.835),
            open_hole(2, 3000.0, 10000.0, 8.5, 10.0),
        ];
        let report = validate_sections(&sections, 10000.0, &config());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors().collect::<Vec<_>>());
        assert_eq!(report.warnings().count(), 0, "{:?}", report.diagnostics);
    }

    #[test]
    fn test_equal_diameter_telescoping_is_error() {
        // Previous bore 5.0, current OD 5.0: equal is NOT a fit
        let mut first = casing(1, 0.0, 2000.0, 7.0, 5.0);
        first.volume_bbl = Some(10.0);
        let second = casing(2, 2000.0, 4000.0, 5.0, 4.2);
        let report = validate_sections(&[first, second], 4000.0, &config());
        assert!(report
            .errors()
            .any(|d| d.category == DiagnosticCategory::Diameter
                && d.message.contains("cannot pass through")));
    }

    #[test]
    fn test_scaled_od_gets_hint() {
        let mut s = casing(1, 0.0, 1000.0, 9625.0, 8.835);
        s.volume_bbl = Some(10.0);
        let report = validate_sections(&[s], 1000.0, &config());
        let od_error = report
            .errors()
            .find(|d| d.category == DiagnosticCategory::Diameter)
            .expect("scaled OD must error");
        assert!(od_error.message.contains("did you mean 9.625?"), "{}", od_error.message);
    }

    #[test]
    fn test_gap_between_sections_is_warning_not_error() {
        let sections = vec![
            casing(1, 0.0, 3000.0, 9.625, 8.835),
            open_hole(2, 3000.5, 10000.0, 8.5, 10.0),
        ];
        let report = validate_sections(&sections, 10000.0, &config());
        assert!(report.is_valid());
        assert!(report
            .warnings()
            .any(|d| d.category == DiagnosticCategory::Depth && d.message.contains("Gap of 0.50 ft")));
    }

    #[test]
    fn test_overlap_without_shared_top_is_error() {
        let sections = vec![
            casing(1, 0.0, 3000.0, 9.625, 8.835),
            open_hole(2, 2500.0, 10000.0, 8.5, 10.0),
        ];
        let report = validate_sections(&sections, 10000.0, &config());
        assert!(report
            .errors()
            .any(|d| d.category == DiagnosticCategory::Depth && d.message.contains("overlaps")));
    }

    #[test]
    fn test_full_overlay_with_shared_top_is_override_warning() {
        // Casing laid over the open hole's full interval with the same
        // top reads as an override, not an error.
        let hole = open_hole(1, 0.0, 1000.0, 12.25, 10.0);
        let csg = casing(2, 0.0, 1000.0, 9.625, 8.835);
        let report = validate_sections(&[hole, csg], 1000.0, &config());
        assert!(report.is_valid(), "errors: {:?}", report.errors().collect::<Vec<_>>());
        assert!(report
            .warnings()
            .any(|d| d.category == DiagnosticCategory::SectionOrder
                && d.message.contains("override")));
    }

    #[test]
    fn test_casing_depth_regression_is_error() {
        let sections = vec![
            casing(1, 0.0, 5000.0, 13.375, 12.415),
            casing(2, 5000.0, 4000.0, 9.625, 8.835),
        ];
        let report = validate_sections(&sections, 5000.0, &config());
        assert!(report
            .errors()
            .any(|d| d.category == DiagnosticCategory::SectionOrder
                && d.message.contains("regresses")));
    }

    #[test]
    fn test_washout_warning_ladder() {
        let cfg = config();
        let moderate = open_hole(1, 0.0, 1000.0, 12.25, 35.0);
        let report = validate_sections(&[moderate], 1000.0, &cfg);
        assert!(report.warnings().any(|d| d.message.contains("high")));

        let severe = open_hole(1, 0.0, 1000.0, 12.25, 60.0);
        let report = validate_sections(&[severe], 1000.0, &cfg);
        assert!(report.warnings().any(|d| d.message.contains("severe")));

        let impossible = open_hole(1, 0.0, 1000.0, 12.25, 120.0);
        let report = validate_sections(&[impossible], 1000.0, &cfg);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_volume_ladder() {
        let cfg = config();
        let mut s = casing(1, 0.0, 1000.0, 9.625, 8.835);

        s.volume_bbl = Some(15_000.0);
        let report = validate_sections(std::slice::from_ref(&s), 1000.0, &cfg);
        assert!(report.is_valid());
        assert!(report.warnings().any(|d| d.category == DiagnosticCategory::Volume));

        s.volume_bbl = Some(150_000.0);
        let report = validate_sections(std::slice::from_ref(&s), 1000.0, &cfg);
        assert!(report.errors().any(|d| d.category == DiagnosticCategory::Volume));

        s.volume_bbl = None;
        let report = validate_sections(std::slice::from_ref(&s), 1000.0, &cfg);
        assert!(report.errors().any(|d| d.message.contains("not been computed")));
    }

    #[test]
    fn test_duplicate_ids_and_non_sequential_warning() {
        let a = casing(3, 0.0, 1000.0, 9.625, 8.835);
        let b = casing(3, 1000.0, 2000.0, 7.0, 6.184);
        let report = validate_sections(&[a, b], 2000.0, &config());
        assert!(report.errors().any(|d| d.message.contains("Duplicate section id 3")));
        assert!(report
            .warnings()
            .any(|d| d.message.contains("not sequential")));
    }

    #[test]
    fn test_validator_is_idempotent() {
        let sections = vec![
            casing(1, 0.0, 3000.0, 9.625, 8.835),
            open_hole(2, 3000.5, 10000.0, 8.5, 45.0),
        ];
        let first = validate_sections(&sections, 9800.0, &config());
        let second = validate_sections(&sections, 9800.0, &config());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_survey_tvd_exceeding_md_is_flagged() {
        let mut points = vec![SurveyPoint::new(0.0, 0.0, 0.0), SurveyPoint::new(100.0, 0.0, 0.0)];
        points[1].tvd = 150.0;
        let report = validate_survey(&points);
        assert!(report.errors().any(|d| d.message.contains("structurally impossible")));
        // Raw inputs untouched: flagged, not auto-corrected
        assert_eq!(points[1].tvd, 150.0);
    }

    #[test]
    fn test_survey_non_increasing_md_is_flagged() {
        let points = vec![SurveyPoint::new(100.0, 0.0, 0.0), SurveyPoint::new(100.0, 1.0, 0.0)];
        let report = validate_survey(&points);
        assert!(!report.is_valid());
    }
}
