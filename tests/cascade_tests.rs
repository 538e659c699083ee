//! Cascade coordinator integration tests
//!
//! Exercise the full edit pipeline end to end: field edit, volume
//! recompute with neighbor context, bottom-depth auto-linking, the
//! override-merge heuristic, renumbering, and batch replacement.

use wellgeom::{
    GeometryConfig, SectionEdit, SectionType, Severity, WellboreModel, WellboreSection,
};

fn model(total_md: f64) -> WellboreModel {
    WellboreModel::new(GeometryConfig::default(), total_md)
}

/// Build the common test well: surface casing over an open-hole section.
fn cased_and_open(total_md: f64) -> WellboreModel {
    let mut m = model(total_md);
    let casing = m.add_section("9 5/8\" Casing", SectionType::Casing).unwrap();
    m.apply_edit(casing, SectionEdit::TopMd(Some(0.0))).unwrap();
    m.apply_edit(casing, SectionEdit::BottomMd(Some(3000.0))).unwrap();
    m.apply_edit(casing, SectionEdit::Od(Some(9.625))).unwrap();
    m.apply_edit(casing, SectionEdit::InnerDiameter(Some(8.835))).unwrap();

    let hole = m.add_section("8 1/2\" Hole", SectionType::OpenHole).unwrap();
    m.apply_edit(hole, SectionEdit::Od(Some(8.5))).unwrap();
    m.apply_edit(hole, SectionEdit::BottomMd(Some(total_md))).unwrap();
    m.apply_edit(hole, SectionEdit::Washout(Some(10.0))).unwrap();
    m
}

#[test]
fn add_section_auto_links_top_to_previous_bottom() {
    let m = cased_and_open(10000.0);
    let sections = m.sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[1].top_md, Some(3000.0), "new section tops at the shoe");
}

#[test]
fn clean_well_validates_without_findings() {
    let m = cased_and_open(10000.0);
    let report = m.validate();
    assert!(report.is_valid(), "errors: {:?}", report.errors().collect::<Vec<_>>());
    assert_eq!(report.warnings().count(), 0, "{:?}", report.diagnostics);
}

#[test]
fn volumes_computed_with_neighbor_context() {
    let m = cased_and_open(10000.0);
    let sections = m.sections();

    // Surface casing with no previous section: internal capacity fallback
    let casing_volume = sections[0].volume_bbl.unwrap();
    let expected_casing = 8.835 * 8.835 / 1029.4 * 3000.0;
    assert!((casing_volume - expected_casing).abs() < 1e-6);

    // Open hole: d^2/1029.4 * L * washout factor
    let hole_volume = sections[1].volume_bbl.unwrap();
    let expected_hole = 8.5 * 8.5 / 1029.4 * 7000.0 * 1.10;
    assert!((hole_volume - expected_hole).abs() < 1e-6);
}

#[test]
fn bottom_edit_propagates_into_next_top_and_volume() {
    let mut m = cased_and_open(10000.0);
    let casing_id = m.sections()[0].id;
    let hole_id = m.sections()[1].id;
    let hole_volume_before = m.section(hole_id).unwrap().volume_bbl.unwrap();

    let outcome = m.apply_edit(casing_id, SectionEdit::BottomMd(Some(3500.0))).unwrap();
    assert!(outcome.merged_into.is_none());

    let hole = m.section(hole_id).unwrap();
    assert_eq!(hole.top_md, Some(3500.0), "auto-link moved the hole's top");
    let hole_volume_after = hole.volume_bbl.unwrap();
    assert!(
        hole_volume_after < hole_volume_before,
        "shorter open-hole interval must hold less volume"
    );
    assert!(outcome.report.is_valid());
}

#[test]
fn diameter_edit_recomputes_next_sections_annulus() {
    let mut m = model(5000.0);
    let outer = m.add_section("13 3/8\" Casing", SectionType::Casing).unwrap();
    m.apply_edit(outer, SectionEdit::TopMd(Some(0.0))).unwrap();
    m.apply_edit(outer, SectionEdit::BottomMd(Some(2000.0))).unwrap();
    m.apply_edit(outer, SectionEdit::Od(Some(13.375))).unwrap();
    m.apply_edit(outer, SectionEdit::InnerDiameter(Some(12.415))).unwrap();

    let inner = m.add_section("9 5/8\" Casing", SectionType::Casing).unwrap();
    m.apply_edit(inner, SectionEdit::BottomMd(Some(5000.0))).unwrap();
    m.apply_edit(inner, SectionEdit::Od(Some(9.625))).unwrap();
    m.apply_edit(inner, SectionEdit::InnerDiameter(Some(8.835))).unwrap();

    let annulus_before = m.section(inner).unwrap().volume_bbl.unwrap();

    // Shrink the outer casing's bore: the inner string's annulus shrinks
    // without any other field of the inner section changing.
    m.apply_edit(outer, SectionEdit::InnerDiameter(Some(12.259))).unwrap();
    let annulus_after = m.section(inner).unwrap().volume_bbl.unwrap();
    assert!(annulus_after < annulus_before);

    let inner_section = m.section(inner).unwrap();
    assert_eq!(inner_section.od, Some(9.625), "other fields untouched");
    assert_eq!(inner_section.bottom_md, Some(5000.0));
}

#[test]
fn switching_to_open_hole_zeroes_inner_diameter() {
    let mut m = model(1000.0);
    let id = m.add_section("Pilot", SectionType::Casing).unwrap();
    m.apply_edit(id, SectionEdit::InnerDiameter(Some(8.5))).unwrap();
    m.apply_edit(id, SectionEdit::SectionType(SectionType::OpenHole)).unwrap();
    assert_eq!(m.section(id).unwrap().id_in, Some(0.0));
}

#[test]
fn override_merge_extends_previous_casing() {
    let mut m = model(6000.0);
    let first = m.add_section("9 5/8\" Casing", SectionType::Casing).unwrap();
    m.apply_edit(first, SectionEdit::TopMd(Some(0.0))).unwrap();
    m.apply_edit(first, SectionEdit::BottomMd(Some(4000.0))).unwrap();
    m.apply_edit(first, SectionEdit::Od(Some(9.625))).unwrap();
    m.apply_edit(first, SectionEdit::InnerDiameter(Some(8.835))).unwrap();

    // Second casing entered with the same OD; editing its top to match the
    // first casing with a deeper bottom reads as "extend that string".
    let second = m.add_section("9 5/8\" Casing", SectionType::Casing).unwrap();
    m.apply_edit(second, SectionEdit::BottomMd(Some(6000.0))).unwrap();
    m.apply_edit(second, SectionEdit::Od(Some(9.625))).unwrap();
    m.apply_edit(second, SectionEdit::InnerDiameter(Some(8.835))).unwrap();
    let outcome = m.apply_edit(second, SectionEdit::TopMd(Some(0.0))).unwrap();

    let kept_id = outcome.merged_into.expect("override detector must fire");
    assert_eq!(m.len(), 1, "duplicate section removed");
    let kept = m.section(kept_id).unwrap();
    assert_eq!(kept.bottom_md, Some(6000.0), "previous casing extended");
    assert!(outcome
        .report
        .warnings()
        .any(|d| d.message.contains("Override extension")));
}

#[test]
fn override_requires_matching_od() {
    let mut m = model(6000.0);
    let first = m.add_section("9 5/8\" Casing", SectionType::Casing).unwrap();
    m.apply_edit(first, SectionEdit::TopMd(Some(0.0))).unwrap();
    m.apply_edit(first, SectionEdit::BottomMd(Some(4000.0))).unwrap();
    m.apply_edit(first, SectionEdit::Od(Some(9.625))).unwrap();
    m.apply_edit(first, SectionEdit::InnerDiameter(Some(8.835))).unwrap();

    let second = m.add_section("7\" Liner?", SectionType::Casing).unwrap();
    m.apply_edit(second, SectionEdit::BottomMd(Some(6000.0))).unwrap();
    m.apply_edit(second, SectionEdit::Od(Some(7.0))).unwrap();
    m.apply_edit(second, SectionEdit::InnerDiameter(Some(6.184))).unwrap();
    let outcome = m.apply_edit(second, SectionEdit::TopMd(Some(0.0))).unwrap();

    assert!(outcome.merged_into.is_none(), "different OD is not an override");
    assert_eq!(m.len(), 2);
}

#[test]
fn delete_section_renumbers_and_relinks() {
    let mut m = model(9000.0);
    for (name, top, bottom, od, id_in) in [
        ("13 3/8\"", 0.0, 2000.0, 13.375, 12.415),
        ("9 5/8\"", 2000.0, 5000.0, 9.625, 8.835),
        ("7\"", 5000.0, 9000.0, 7.0, 6.184),
    ] {
        let id = m.add_section(name, SectionType::Casing).unwrap();
        m.apply_edit(id, SectionEdit::TopMd(Some(top))).unwrap();
        m.apply_edit(id, SectionEdit::BottomMd(Some(bottom))).unwrap();
        m.apply_edit(id, SectionEdit::Od(Some(od))).unwrap();
        m.apply_edit(id, SectionEdit::InnerDiameter(Some(id_in))).unwrap();
    }

    let middle_id = m.sections()[1].id;
    m.delete_section(middle_id).unwrap();

    let sections = m.sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].id, 1);
    assert_eq!(sections[1].id, 2, "ids stay dense after deletion");
    assert_eq!(
        sections[1].top_md,
        Some(2000.0),
        "follower re-linked to the surviving previous bottom"
    );
}

#[test]
fn delete_unknown_section_errors() {
    let mut m = model(1000.0);
    assert!(m.delete_section(42).is_err());
}

#[test]
fn replace_all_is_one_batch_pass() {
    let mut m = model(10000.0);

    let mut casing = WellboreSection::new(7, "9 5/8\" Casing", SectionType::Casing);
    casing.top_md = Some(0.0);
    casing.bottom_md = Some(3000.0);
    casing.od = Some(9.625);
    casing.id_in = Some(8.835);

    let mut hole = WellboreSection::new(3, "8 1/2\" Hole", SectionType::OpenHole);
    hole.top_md = Some(3000.0);
    hole.bottom_md = Some(10000.0);
    hole.od = Some(8.5);
    hole.washout_percent = Some(10.0);

    let report = m.replace_all(vec![hole, casing]).unwrap();
    assert!(report.is_valid(), "errors: {:?}", report.errors().collect::<Vec<_>>());

    let sections = m.sections();
    assert_eq!(sections[0].id, 1, "batch renumbered densely");
    assert_eq!(sections[1].id, 2);
    assert_eq!(sections[0].section_type, SectionType::Casing, "sorted by top MD");
    assert!(sections[0].volume_bbl.unwrap() > 0.0, "volumes computed in the batch pass");
    assert!(sections[1].volume_bbl.unwrap() > 0.0);
}

#[test]
fn unknown_section_edit_errors() {
    let mut m = model(1000.0);
    let err = m.apply_edit(9, SectionEdit::Od(Some(9.625))).unwrap_err();
    assert!(err.to_string().contains("No section with id 9"));
}

#[test]
fn unfinished_section_reports_errors_but_never_panics() {
    let mut m = model(10000.0);
    let id = m.add_section("Mystery", SectionType::Casing).unwrap();
    let outcome = m.apply_edit(id, SectionEdit::BottomMd(Some(500.0))).unwrap();
    // Diameters missing: diagnostics, not panics
    assert!(!outcome.report.is_valid());
    assert!(outcome
        .report
        .errors()
        .any(|d| d.severity == Severity::Error && d.message.contains("not been entered")));
}
