//! Drill-string component types: ComponentKind, DrillStringComponent, JetSet

use serde::{Deserialize, Serialize};

// ============================================================================
// Component Kind
// ============================================================================

/// Kind of drill-string component, top-down through the string.
///
/// Unique kinds (bit, motor, survey tools) may appear at most once per
/// string; repeatable kinds are auto-numbered ("Drill Pipe 1", ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Bit,
    Motor,
    Mwd,
    Lwd,
    Pwd,
    Pwo,
    DrillPipe,
    Hwdp,
    DrillCollar,
    Jar,
    Accelerator,
    Stabilizer,
    NearBitStabilizer,
    BitSub,
    Crossover,
    Casing,
    Liner,
    SettingTool,
}

impl ComponentKind {
    /// Whether only one component of this kind may exist in a string.
    pub fn is_unique_per_string(&self) -> bool {
        matches!(
            self,
            ComponentKind::Bit
                | ComponentKind::Motor
                | ComponentKind::Mwd
                | ComponentKind::Lwd
                | ComponentKind::Pwd
                | ComponentKind::Pwo
        )
    }

    /// Display label, matching the import record labels.
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Bit => "Bit",
            ComponentKind::Motor => "Motor",
            ComponentKind::Mwd => "MWD",
            ComponentKind::Lwd => "LWD",
            ComponentKind::Pwd => "PWD",
            ComponentKind::Pwo => "PWO",
            ComponentKind::DrillPipe => "Drill Pipe",
            ComponentKind::Hwdp => "HWDP",
            ComponentKind::DrillCollar => "Drill Collar",
            ComponentKind::Jar => "Jar",
            ComponentKind::Accelerator => "Accelerator",
            ComponentKind::Stabilizer => "Stabilizer",
            ComponentKind::NearBitStabilizer => "Near Bit Stabilizer",
            ComponentKind::BitSub => "Bit Sub",
            ComponentKind::Crossover => "Crossover",
            ComponentKind::Casing => "Casing",
            ComponentKind::Liner => "Liner",
            ComponentKind::SettingTool => "Setting Tool",
        }
    }

    /// Parse an import label into a kind. Case-insensitive, accepts the
    /// common tally-sheet aliases ("DP", "DC", "XO", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "bit" | "pdc bit" | "tricone bit" => ComponentKind::Bit,
            "motor" | "mud motor" => ComponentKind::Motor,
            "mwd" => ComponentKind::Mwd,
            "lwd" => ComponentKind::Lwd,
            "pwd" => ComponentKind::Pwd,
            "pwo" => ComponentKind::Pwo,
            "drill pipe" | "drillpipe" | "dp" => ComponentKind::DrillPipe,
            "hwdp" | "heavy weight drill pipe" | "heavy weight" => ComponentKind::Hwdp,
            "drill collar" | "dc" => ComponentKind::DrillCollar,
            "jar" => ComponentKind::Jar,
            "accelerator" => ComponentKind::Accelerator,
            "stabilizer" | "stab" => ComponentKind::Stabilizer,
            "near bit stabilizer" | "near bit" | "nb stab" => ComponentKind::NearBitStabilizer,
            "bit sub" | "bitsub" => ComponentKind::BitSub,
            "crossover" | "cross over" | "xo" | "x-over" => ComponentKind::Crossover,
            "casing" | "csg" => ComponentKind::Casing,
            "liner" | "lnr" => ComponentKind::Liner,
            "setting tool" => ComponentKind::SettingTool,
            _ => return None,
        };
        Some(kind)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Drill String Component
// ============================================================================

/// One component of the drill string, ordered top-down by list position
/// (not by measured depth).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillStringComponent {
    pub id: u32,
    pub kind: ComponentKind,
    /// Display name; repeatable kinds carry an ordinal suffix
    pub name: String,
    /// Component length (ft)
    pub length_ft: Option<f64>,
    /// Outer diameter (in)
    pub od_in: Option<f64>,
    /// Inner diameter (in)
    pub id_in: Option<f64>,
    /// Weight per foot (lb/ft), informational only
    pub weight_per_foot: Option<f64>,
    /// Derived capacity of the bore (bbl)
    pub internal_volume_bbl: Option<f64>,
    /// Derived steel displacement (bbl)
    pub displacement_volume_bbl: Option<f64>,
}

impl DrillStringComponent {
    pub fn new(id: u32, kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            length_ft: None,
            od_in: None,
            id_in: None,
            weight_per_foot: None,
            internal_volume_bbl: None,
            displacement_volume_bbl: None,
        }
    }
}

// ============================================================================
// Bit Jets
// ============================================================================

/// Bit nozzle configuration with derived total flow area.
///
/// `tfa_sq_in` stays unset until BOTH inputs are present; a partially
/// entered jet set must not report a misleading zero area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct JetSet {
    pub number_of_jets: Option<u32>,
    /// Nozzle diameter in 32nds of an inch
    pub jet_diameter_32nds: Option<f64>,
    /// Derived total flow area (sq in)
    pub tfa_sq_in: Option<f64>,
}

impl JetSet {
    /// Recompute TFA from the raw inputs. `None` unless both are set.
    pub fn recompute_tfa(&mut self) {
        self.tfa_sq_in = match (self.number_of_jets, self.jet_diameter_32nds) {
            (Some(n), Some(d32)) if n > 0 && d32 > 0.0 => {
                let diameter_in = d32 / 32.0;
                Some(n as f64 * std::f64::consts::FRAC_PI_4 * diameter_in * diameter_in)
            }
            _ => None,
        };
    }
}
