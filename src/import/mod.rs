//! Import contracts for external collaborators (UI forms, CSV/Excel front
//! ends, test harnesses)
//!
//! Parsing mechanics live with the collaborator; this module consumes the
//! already-shaped row records, applies the per-row constraints, and builds
//! the owned collections in one batch. A malformed row is skipped and
//! recorded in the summary's detail list; the batch succeeds as long as at
//! least one row imported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cascade::{ComponentEdit, DrillString};
use crate::config::GeometryConfig;
use crate::survey::SurveyLog;
use crate::types::{ComponentKind, SurveyPoint};

// ============================================================================
// Row Records
// ============================================================================

/// One drill-string tally row as delivered by an importer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillStringRecord {
    pub component_type_label: String,
    pub length_ft: f64,
    pub id_in: f64,
    pub od_in: f64,
    pub weight_per_foot: Option<f64>,
}

/// One survey listing row as delivered by an importer.
///
/// `tvd` is the listing's own figure, used only for the md/tvd cross
/// check; the trajectory calculator derives its own TVD.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyRecord {
    pub md: f64,
    pub tvd: f64,
    pub hole_angle_deg: Option<f64>,
    pub azimuth_deg: Option<f64>,
    pub northing: Option<f64>,
}

// ============================================================================
// Summary & Errors
// ============================================================================

/// A skipped row and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowError {
    /// 1-based row number in the source listing
    pub row: usize,
    pub message: String,
}

/// Outcome of one import batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub row_errors: Vec<RowError>,
    pub completed_at: DateTime<Utc>,
}

/// Batch-level import failure. Row-level problems are not errors; they
/// travel in the summary.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No rows could be imported ({failed} rows failed)")]
    NoRowsImported { failed: usize },
}

// ============================================================================
// Drill String Import
// ============================================================================

/// Import a drill-string tally into `string`, one component per valid row.
pub fn import_drill_string(
    records: &[DrillStringRecord],
    string: &mut DrillString,
) -> Result<ImportSummary, ImportError> {
    let mut row_errors = Vec::new();
    let mut imported = 0usize;

    for (i, record) in records.iter().enumerate() {
        let row = i + 1;
        match import_component_row(record, string) {
            Ok(()) => imported += 1,
            Err(message) => {
                warn!(row, %message, "Skipped drill-string row");
                row_errors.push(RowError { row, message });
            }
        }
    }

    finish_batch("drill string", records.len(), imported, row_errors)
}

fn import_component_row(record: &DrillStringRecord, string: &mut DrillString) -> Result<(), String> {
    let Some(kind) = ComponentKind::from_label(&record.component_type_label) else {
        return Err(format!(
            "Unknown component type '{}'",
            record.component_type_label
        ));
    };
    if record.length_ft <= 0.0 {
        return Err(format!("Length {:.2} ft must be > 0", record.length_ft));
    }
    if record.od_in <= 0.0 {
        return Err(format!("OD {:.3} in must be > 0", record.od_in));
    }
    if record.id_in < 0.0 {
        return Err(format!("ID {:.3} in cannot be negative", record.id_in));
    }
    if record.id_in >= record.od_in {
        return Err(format!(
            "ID {:.3} in must be smaller than OD {:.3} in",
            record.id_in, record.od_in
        ));
    }

    let id = string
        .add_component(kind)
        .map_err(|e| e.to_string())?;
    // Component exists by construction; edits cannot fail past this point
    let _ = string.apply_edit(id, ComponentEdit::Length(Some(record.length_ft)));
    let _ = string.apply_edit(id, ComponentEdit::Od(Some(record.od_in)));
    let _ = string.apply_edit(id, ComponentEdit::InnerDiameter(Some(record.id_in)));
    let _ = string.apply_edit(id, ComponentEdit::WeightPerFoot(record.weight_per_foot));
    Ok(())
}

// ============================================================================
// Survey Import
// ============================================================================

/// Import a survey listing into a fresh `SurveyLog`.
///
/// All valid stations are collected first and the trajectory is computed
/// in exactly one pass at the end, not once per row.
pub fn import_survey(
    records: &[SurveyRecord],
    config: &GeometryConfig,
) -> Result<(SurveyLog, ImportSummary), ImportError> {
    let mut row_errors = Vec::new();
    let mut points = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let row = i + 1;
        match check_survey_row(record, config) {
            Ok(point) => points.push(point),
            Err(message) => {
                warn!(row, %message, "Skipped survey row");
                row_errors.push(RowError { row, message });
            }
        }
    }

    let imported = points.len();
    let summary = finish_batch("survey", records.len(), imported, row_errors)?;
    Ok((SurveyLog::from_points(points), summary))
}

fn check_survey_row(record: &SurveyRecord, config: &GeometryConfig) -> Result<SurveyPoint, String> {
    if record.md < 0.0 {
        return Err(format!("MD {:.2} ft cannot be negative", record.md));
    }
    if record.md < record.tvd {
        return Err(format!(
            "MD {:.2} ft is shallower than TVD {:.2} ft",
            record.md, record.tvd
        ));
    }
    let hole_angle = record.hole_angle_deg.unwrap_or(0.0);
    if !(0.0..=config.survey.max_hole_angle_deg).contains(&hole_angle) {
        return Err(format!(
            "Hole angle {hole_angle:.2} deg is outside 0-{:.1} deg",
            config.survey.max_hole_angle_deg
        ));
    }
    let azimuth = record.azimuth_deg.unwrap_or(0.0);
    if !(0.0..=config.survey.max_azimuth_deg).contains(&azimuth) {
        return Err(format!(
            "Azimuth {azimuth:.2} deg is outside 0-{:.1} deg",
            config.survey.max_azimuth_deg
        ));
    }
    Ok(SurveyPoint::new(record.md, hole_angle, azimuth))
}

// ============================================================================
// Batch Completion
// ============================================================================

fn finish_batch(
    what: &str,
    total: usize,
    imported: usize,
    row_errors: Vec<RowError>,
) -> Result<ImportSummary, ImportError> {
    if imported == 0 && total > 0 {
        return Err(ImportError::NoRowsImported { failed: row_errors.len() });
    }
    let skipped = row_errors.len();
    info!(what, imported, skipped, "Import batch complete");
    Ok(ImportSummary {
        imported,
        skipped,
        row_errors,
        completed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeometryConfig {
        GeometryConfig::default()
    }

    fn dp_row(length: f64) -> DrillStringRecord {
        DrillStringRecord {
            component_type_label: "Drill Pipe".to_string(),
            length_ft: length,
            id_in: 4.276,
            od_in: 5.0,
            weight_per_foot: Some(19.5),
        }
    }

    #[test]
    fn test_drill_string_import_happy_path() {
        let rows = vec![
            DrillStringRecord {
                component_type_label: "Bit".to_string(),
                length_ft: 1.2,
                id_in: 2.0,
                od_in: 8.5,
                weight_per_foot: None,
            },
            dp_row(9000.0),
            dp_row(300.0),
        ];
        let mut string = DrillString::new();
        let summary = import_drill_string(&rows, &mut string).unwrap();
        assert_eq!(summary.imported, 3);
        assert_eq!(summary.skipped, 0);
        assert_eq!(string.len(), 3);
        assert_eq!(string.components()[1].name, "Drill Pipe 1");
        assert_eq!(string.components()[2].name, "Drill Pipe 2");
        assert!(string.components()[1].internal_volume_bbl.unwrap() > 0.0);
    }

    #[test]
    fn test_bad_rows_skipped_batch_survives() {
        let rows = vec![
            dp_row(9000.0),
            DrillStringRecord {
                component_type_label: "Flux Capacitor".to_string(),
                ..dp_row(100.0)
            },
            DrillStringRecord {
                length_ft: -5.0,
                ..dp_row(100.0)
            },
        ];
        let mut string = DrillString::new();
        let summary = import_drill_string(&rows, &mut string).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.row_errors[0].row, 2);
        assert!(summary.row_errors[0].message.contains("Flux Capacitor"));
        assert_eq!(summary.row_errors[1].row, 3);
    }

    #[test]
    fn test_all_rows_bad_fails_batch() {
        let rows = vec![DrillStringRecord {
            od_in: 0.0,
            ..dp_row(100.0)
        }];
        let mut string = DrillString::new();
        let err = import_drill_string(&rows, &mut string).unwrap_err();
        assert!(matches!(err, ImportError::NoRowsImported { failed: 1 }));
    }

    #[test]
    fn test_second_bit_row_is_skipped_not_fatal() {
        let bit = DrillStringRecord {
            component_type_label: "Bit".to_string(),
            length_ft: 1.2,
            id_in: 2.0,
            od_in: 8.5,
            weight_per_foot: None,
        };
        let rows = vec![bit.clone(), bit];
        let mut string = DrillString::new();
        let summary = import_drill_string(&rows, &mut string).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.row_errors[0].message.contains("Bit"));
    }

    #[test]
    fn test_survey_import_constraints() {
        let rows = vec![
            SurveyRecord { md: 0.0, tvd: 0.0, hole_angle_deg: None, azimuth_deg: None, northing: None },
            // TVD deeper than MD: impossible
            SurveyRecord { md: 900.0, tvd: 1000.0, hole_angle_deg: Some(5.0), azimuth_deg: Some(10.0), northing: None },
            // Hole angle past the importer cap
            SurveyRecord { md: 1000.0, tvd: 990.0, hole_angle_deg: Some(95.0), azimuth_deg: Some(10.0), northing: None },
            // Azimuth past full circle
            SurveyRecord { md: 1100.0, tvd: 1080.0, hole_angle_deg: Some(10.0), azimuth_deg: Some(365.0), northing: None },
            SurveyRecord { md: 1200.0, tvd: 1180.0, hole_angle_deg: Some(10.0), azimuth_deg: Some(45.0), northing: None },
        ];
        let (log, summary) = import_survey(&rows, &config()).unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 3);
        assert_eq!(log.len(), 2);
        // Trajectory computed in the single batch pass
        assert!(log.points()[1].tvd > 0.0);
    }

    #[test]
    fn test_empty_batch_is_trivially_ok() {
        let (log, summary) = import_survey(&[], &config()).unwrap();
        assert_eq!(summary.imported, 0);
        assert!(log.is_empty());
    }
}
