//! Minimum-curvature survey trajectory calculator
//!
//! Industry-standard trajectory integration: consecutive stations are
//! joined by a constant-curvature arc, with the ratio factor smoothing the
//! chord/arc difference. Each station's position is cumulative, so editing
//! any raw input forces a strictly sequential forward recomputation from
//! that station to the end of the list.
//!
//! Degenerate cases degrade to defined values instead of erroring:
//! - dogleg below 1e-8 rad: ratio factor 1 (numerically straight, avoids 0/0)
//! - non-positive station spacing: previous position carried forward, rates zeroed
//! - azimuth turn rate: delta normalized into (-180, 180] before dividing

use tracing::debug;

use crate::types::{SurveyPoint, ValidationReport};

/// Dogleg angle below this (radians) is treated as a straight hole.
const STRAIGHT_DOGLEG_RAD: f64 = 1e-8;

// ============================================================================
// Station Math
// ============================================================================

/// Normalize an azimuth difference (deg) into (-180, 180].
///
/// A turn from 350 to 10 degrees is +20, not -340.
pub fn normalize_azimuth_delta(delta_deg: f64) -> f64 {
    let mut d = delta_deg % 360.0;
    if d <= -180.0 {
        d += 360.0;
    } else if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Compute the dogleg angle (radians) between two stations.
///
/// acos argument is clamped to [-1, 1]: floating-point drift on nearly
/// identical attitudes can push it fractionally outside.
pub fn dogleg_angle(inc1_rad: f64, inc2_rad: f64, az1_rad: f64, az2_rad: f64) -> f64 {
    let cos_dogleg = (inc2_rad - inc1_rad).cos()
        - inc1_rad.sin() * inc2_rad.sin() * (1.0 - (az2_rad - az1_rad).cos());
    cos_dogleg.clamp(-1.0, 1.0).acos()
}

/// Ratio factor for the minimum-curvature arc correction.
///
/// RF = (2 / dogleg) * tan(dogleg / 2); 1 for a numerically straight hole.
pub fn ratio_factor(dogleg_rad: f64) -> f64 {
    if dogleg_rad.abs() < STRAIGHT_DOGLEG_RAD {
        1.0
    } else {
        (2.0 / dogleg_rad) * (dogleg_rad / 2.0).tan()
    }
}

/// Compute one station's derived values from the previous station.
///
/// `previous` must already carry settled cumulative values. The raw fields
/// of `point` (md, hole angle, azimuth) are inputs; everything else is
/// overwritten.
pub fn compute_point(point: &mut SurveyPoint, previous: Option<&SurveyPoint>) {
    let Some(prev) = previous else {
        // Tie-in: all derived values zero
        point.clear_derived();
        return;
    };

    let delta_md = point.md - prev.md;
    if delta_md <= 0.0 {
        // Invalid spacing: carry the previous position forward, do not advance
        point.tvd = prev.tvd;
        point.northing = prev.northing;
        point.easting = prev.easting;
        point.vertical_section = prev.vertical_section;
        point.dogleg_severity = 0.0;
        point.build_rate = 0.0;
        point.turn_rate = 0.0;
        return;
    }

    let inc1 = prev.hole_angle_deg.to_radians();
    let inc2 = point.hole_angle_deg.to_radians();
    let az1 = prev.azimuth_deg.to_radians();
    let az2 = point.azimuth_deg.to_radians();

    let dogleg = dogleg_angle(inc1, inc2, az1, az2);
    let rf = ratio_factor(dogleg);

    let half_md = delta_md / 2.0;
    let delta_north = half_md * (inc1.sin() * az1.cos() + inc2.sin() * az2.cos()) * rf;
    let delta_east = half_md * (inc1.sin() * az1.sin() + inc2.sin() * az2.sin()) * rf;
    let delta_tvd = half_md * (inc1.cos() + inc2.cos()) * rf;

    point.tvd = prev.tvd + delta_tvd;
    point.northing = prev.northing + delta_north;
    point.easting = prev.easting + delta_east;
    point.vertical_section =
        (point.northing * point.northing + point.easting * point.easting).sqrt();

    point.dogleg_severity = dogleg.to_degrees() / delta_md * 100.0;
    point.build_rate = (point.hole_angle_deg - prev.hole_angle_deg) / delta_md * 100.0;
    point.turn_rate =
        normalize_azimuth_delta(point.azimuth_deg - prev.azimuth_deg) / delta_md * 100.0;
}

// ============================================================================
// Survey Log
// ============================================================================

/// Ordered survey station list with cascading forward recomputation.
///
/// Owns the stations exclusively; callers address them by list index.
/// Inserts keep the list sorted by MD, and every raw-input edit triggers a
/// sequential recomputation from the edited station down, because each
/// station's cumulative position depends on all of its predecessors.
#[derive(Debug, Clone, Default)]
pub struct SurveyLog {
    points: Vec<SurveyPoint>,
}

/// Which raw survey input an edit targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurveyField {
    Md(f64),
    HoleAngle(f64),
    Azimuth(f64),
}

impl SurveyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from raw stations, sorting by MD and computing the
    /// whole trajectory in one pass.
    pub fn from_points(mut points: Vec<SurveyPoint>) -> Self {
        points.sort_by(|a, b| a.md.partial_cmp(&b.md).unwrap_or(std::cmp::Ordering::Equal));
        let mut log = Self { points };
        log.recompute_from(0);
        log
    }

    pub fn points(&self) -> &[SurveyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert a raw station in MD order and recompute from its position.
    /// Returns the index the station landed at.
    pub fn insert(&mut self, point: SurveyPoint) -> usize {
        let index = self
            .points
            .iter()
            .position(|p| p.md > point.md)
            .unwrap_or(self.points.len());
        self.points.insert(index, point);
        self.recompute_from(index);
        index
    }

    /// Remove the station at `index` and recompute the tail.
    pub fn remove(&mut self, index: usize) -> Option<SurveyPoint> {
        if index >= self.points.len() {
            return None;
        }
        let removed = self.points.remove(index);
        self.recompute_from(index);
        Some(removed)
    }

    /// Edit one raw input of the station at `index`. An MD edit may move
    /// the station within the list; the returned index is its final
    /// position after re-sorting.
    pub fn apply_edit(&mut self, index: usize, field: SurveyField) -> Option<usize> {
        if index >= self.points.len() {
            return None;
        }
        match field {
            SurveyField::Md(md) => {
                let mut point = self.points.remove(index);
                point.md = md;
                let landed = self.insert(point);
                // A deeper MD bypasses the stations between the old and new
                // positions; their predecessor changed, so the forward pass
                // must start at the vacated slot, not the landing slot.
                if index < landed {
                    self.recompute_from(index);
                }
                Some(landed)
            }
            SurveyField::HoleAngle(angle) => {
                self.points[index].hole_angle_deg = angle;
                self.recompute_from(index);
                Some(index)
            }
            SurveyField::Azimuth(azimuth) => {
                self.points[index].azimuth_deg = azimuth;
                self.recompute_from(index);
                Some(index)
            }
        }
    }

    /// Recompute every station from `start` to the end of the list, in MD
    /// order. Strictly sequential: station i reads the settled values of
    /// station i-1.
    pub fn recompute_from(&mut self, start: usize) {
        let start = start.min(self.points.len());
        for i in start..self.points.len() {
            let previous = if i > 0 { Some(self.points[i - 1]) } else { None };
            compute_point(&mut self.points[i], previous.as_ref());
        }
        if start < self.points.len() {
            debug!(
                from = start,
                stations = self.points.len(),
                "Recomputed survey trajectory tail"
            );
        }
    }

    /// Run the survey sanity checks over the current list.
    pub fn validate(&self) -> ValidationReport {
        crate::validation::validate_survey(&self.points)
    }
}
