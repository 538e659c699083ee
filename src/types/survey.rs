//! Survey station type for the minimum-curvature trajectory

use serde::{Deserialize, Serialize};

/// One directional survey station, ordered by measured depth.
///
/// `md`, `hole_angle_deg` and `azimuth_deg` are the raw inputs; everything
/// else is derived and stored by the trajectory calculator. Derived values
/// are cumulative: each station's position depends on every station above
/// it, so edits force a forward recomputation from the edited station down.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SurveyPoint {
    /// Measured depth (ft), strictly increasing down the list
    pub md: f64,
    /// Hole inclination from vertical (deg)
    pub hole_angle_deg: f64,
    /// Azimuth from north (deg, 0-360)
    pub azimuth_deg: f64,
    /// True vertical depth (ft)
    pub tvd: f64,
    /// Cumulative northing (ft)
    pub northing: f64,
    /// Cumulative easting (ft)
    pub easting: f64,
    /// Horizontal departure from the wellhead (ft)
    pub vertical_section: f64,
    /// Dogleg severity (deg / 100 ft)
    pub dogleg_severity: f64,
    /// Inclination build rate (deg / 100 ft)
    pub build_rate: f64,
    /// Azimuth turn rate (deg / 100 ft)
    pub turn_rate: f64,
}

impl SurveyPoint {
    /// A raw station with derived values still zeroed.
    pub fn new(md: f64, hole_angle_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            md,
            hole_angle_deg,
            azimuth_deg,
            ..Self::default()
        }
    }

    /// Zero all derived fields, keeping the raw inputs. Used for the tie-in
    /// and before a forward recomputation pass.
    pub fn clear_derived(&mut self) {
        self.tvd = 0.0;
        self.northing = 0.0;
        self.easting = 0.0;
        self.vertical_section = 0.0;
        self.dogleg_severity = 0.0;
        self.build_rate = 0.0;
        self.turn_rate = 0.0;
    }
}
