//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for GeometryConfig.
///
/// This is maintained manually to match the struct hierarchy in
/// geometry_config.rs. Any new field added there must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [tolerances]
        "tolerances",
        "tolerances.override_od_tolerance_in",
        "tolerances.override_top_tolerance_ft",
        "tolerances.gap_warning_ft",
        "tolerances.depth_match_tolerance_ft",
        // [limits]
        "limits",
        "limits.od_min_in",
        "limits.od_max_in",
        "limits.od_millimeter_hint_threshold",
        "limits.volume_warning_bbl",
        "limits.volume_error_bbl",
        "limits.washout_warning_percent",
        "limits.washout_severe_percent",
        // [survey]
        "survey",
        "survey.max_hole_angle_deg",
        "survey.max_azimuth_deg",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 {
            if let Some((_, best_dist)) = best {
                if dist < best_dist {
                    best = Some((k, dist));
                }
            } else {
                best = Some((k, dist));
            }
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys. It only warns, so existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ConfigWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ConfigWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed GeometryConfig.
///
/// Returns (errors, warnings). Errors are values the rule engine cannot
/// run with; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::GeometryConfig,
) -> (Vec<String>, Vec<ConfigWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let t = &config.tolerances;
    let l = &config.limits;

    // Tolerances are comparison windows and must not be negative
    for (name, value) in [
        ("tolerances.override_od_tolerance_in", t.override_od_tolerance_in),
        ("tolerances.override_top_tolerance_ft", t.override_top_tolerance_ft),
        ("tolerances.gap_warning_ft", t.gap_warning_ft),
        ("tolerances.depth_match_tolerance_ft", t.depth_match_tolerance_ft),
    ] {
        if value < 0.0 {
            errors.push(format!("{name} = {value:.4} cannot be negative"));
        }
    }

    // OD window must be ordered and positive
    if l.od_min_in <= 0.0 {
        errors.push(format!(
            "limits.od_min_in = {:.2} must be > 0",
            l.od_min_in
        ));
    }
    if l.od_max_in <= l.od_min_in {
        errors.push(format!(
            "limits.od_max_in = {:.2} must be greater than od_min_in = {:.2}",
            l.od_max_in, l.od_min_in
        ));
    }

    // Volume ladder must escalate
    if l.volume_error_bbl <= l.volume_warning_bbl {
        errors.push(format!(
            "limits.volume_error_bbl = {:.0} must be greater than volume_warning_bbl = {:.0}",
            l.volume_error_bbl, l.volume_warning_bbl
        ));
    }

    // Washout ladder must escalate and stay within 0-100%
    if l.washout_severe_percent <= l.washout_warning_percent {
        errors.push(format!(
            "limits.washout_severe_percent = {:.1} must be greater than washout_warning_percent = {:.1}",
            l.washout_severe_percent, l.washout_warning_percent
        ));
    }
    if l.washout_warning_percent < 0.0 || l.washout_severe_percent > 100.0 {
        errors.push(format!(
            "washout thresholds ({:.1}, {:.1}) must lie within 0-100%",
            l.washout_warning_percent, l.washout_severe_percent
        ));
    }

    // Hole angle beyond ~120 deg is suspicious even for extended reach
    let s = &config.survey;
    if s.max_hole_angle_deg <= 0.0 || s.max_hole_angle_deg > 180.0 {
        errors.push(format!(
            "survey.max_hole_angle_deg = {:.1} must lie within (0, 180]",
            s.max_hole_angle_deg
        ));
    } else if s.max_hole_angle_deg > 120.0 {
        warnings.push(ConfigWarning {
            field: "survey.max_hole_angle_deg".to_string(),
            message: format!(
                "survey.max_hole_angle_deg = {:.1} is outside the typical range (60-120 deg)",
                s.max_hole_angle_deg
            ),
            suggestion: None,
        });
    }
    if s.max_azimuth_deg != 360.0 {
        warnings.push(ConfigWarning {
            field: "survey.max_azimuth_deg".to_string(),
            message: format!(
                "survey.max_azimuth_deg = {:.1} differs from the full compass (360.0)",
                s.max_azimuth_deg
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
