//! Cascade coordinator for the wellbore geometry model
//!
//! `WellboreModel` owns the ordered section list exclusively and is the
//! single entry point for mutations. Every edit synchronously runs its
//! full cascade before returning:
//!
//! 1. resolve the edited section's sorted position (adjacency is computed
//!    from sort order at call time, never cached)
//! 2. recompute the edited section's volume with the section above as
//!    annular context
//! 3. a bottom-depth change propagates into the next section's top depth
//!    (auto-link), which recomputes that section in turn
//! 4. an OD/ID change recomputes the next section's volume (its annulus
//!    reads this section's bore) without touching its other fields
//! 5. the override-merge heuristic runs on settled values and may extend
//!    the previous casing and drop the edited duplicate
//! 6. one full validation sweep produces the returned diagnostics
//!
//! Bulk loads go through `replace_all`, which applies every row first and
//! runs exactly one recompute+validate pass at the end.

mod drill_string;

pub use drill_string::{ComponentEdit, DrillString};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GeometryConfig;
use crate::types::{
    ComponentKind, Diagnostic, DiagnosticCategory, SectionType, ValidationReport, WellboreSection,
};
use crate::validation::sorted_order;
use crate::volumes;

// ============================================================================
// Edit Contracts
// ============================================================================

/// One field edit on a wellbore section. `None` clears an optional field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionEdit {
    TopMd(Option<f64>),
    BottomMd(Option<f64>),
    Od(Option<f64>),
    InnerDiameter(Option<f64>),
    SectionType(SectionType),
    Washout(Option<f64>),
}

/// Mutation errors. Validation findings are not errors; they travel in
/// the returned report.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("No section with id {0}")]
    UnknownSection(u32),

    #[error("No drill-string component with id {0}")]
    UnknownComponent(u32),

    #[error("The string already contains a {0} component")]
    DuplicateUniqueComponent(ComponentKind),

    #[error("A cascade pass is already in progress")]
    CascadeInProgress,
}

/// What an edit did, beyond the field assignment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOutcome {
    /// Full validation sweep over the post-cascade list
    pub report: ValidationReport,
    /// Set when the override detector merged the edited section into the
    /// previous casing (the edited section no longer exists)
    pub merged_into: Option<u32>,
}

// ============================================================================
// Wellbore Model
// ============================================================================

/// Owner of the ordered wellbore section list.
///
/// Single-threaded and synchronous: every mutation completes its cascade
/// before control returns. The `in_cascade` flag guards against re-entrant
/// mutation from within a cascade pass.
#[derive(Debug, Clone)]
pub struct WellboreModel {
    config: GeometryConfig,
    total_md: f64,
    sections: Vec<WellboreSection>,
    in_cascade: bool,
}

impl WellboreModel {
    pub fn new(config: GeometryConfig, total_md: f64) -> Self {
        Self {
            config,
            total_md,
            sections: Vec::new(),
            in_cascade: false,
        }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn total_md(&self) -> f64 {
        self.total_md
    }

    /// Sections in top-MD order (the order every cascade and validation
    /// pass uses).
    pub fn sections(&self) -> Vec<&WellboreSection> {
        sorted_order(&self.sections)
            .into_iter()
            .map(|i| &self.sections[i])
            .collect()
    }

    pub fn section(&self, id: u32) -> Option<&WellboreSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Change the well's target total depth and re-validate.
    pub fn set_total_md(&mut self, total_md: f64) -> ValidationReport {
        self.total_md = total_md;
        self.validate()
    }

    /// Full validation sweep without mutating anything.
    pub fn validate(&self) -> ValidationReport {
        crate::validation::validate_sections(&self.sections, self.total_md, &self.config)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Append a new section, auto-linking its top to the current deepest
    /// bottom (surface for the first section). Returns the new id.
    pub fn add_section(
        &mut self,
        name: impl Into<String>,
        section_type: SectionType,
    ) -> Result<u32, EditError> {
        self.enter_cascade()?;

        let link_top = self
            .sections()
            .last()
            .and_then(|s| s.bottom_md)
            .unwrap_or(0.0);
        let mut section =
            WellboreSection::new(self.sections.len() as u32 + 1, name, section_type);
        section.top_md = Some(link_top);
        self.sections.push(section);
        let new_idx = self.sections.len() - 1;
        self.renumber();

        // Renumbering may have moved the new section if its linked top
        // sorts ahead of an existing section; report the settled id.
        let id = self.sections[new_idx].id;
        info!(id, top_md = link_top, %section_type, "Added wellbore section");
        self.exit_cascade();
        Ok(id)
    }

    /// Delete a section, renumber the survivors densely and re-link the
    /// following section's top to the previous bottom.
    pub fn delete_section(&mut self, id: u32) -> Result<ValidationReport, EditError> {
        self.enter_cascade()?;

        let order = sorted_order(&self.sections);
        let Some(pos) = order.iter().position(|&i| self.sections[i].id == id) else {
            self.exit_cascade();
            return Err(EditError::UnknownSection(id));
        };

        let prev_bottom = if pos > 0 {
            self.sections[order[pos - 1]].bottom_md
        } else {
            Some(0.0)
        };

        self.sections.retain(|s| s.id != id);
        self.renumber();

        // Continuity re-link: the section that followed the deleted one
        // now sits at sorted position `pos`, on top of the previous bottom.
        if let Some(prev_bottom) = prev_bottom {
            let order = sorted_order(&self.sections);
            if let Some(&follower_idx) = order.get(pos) {
                self.sections[follower_idx].top_md = Some(prev_bottom);
            }
        }

        self.recompute_all_volumes();
        info!(id, remaining = self.sections.len(), "Deleted wellbore section");

        self.exit_cascade();
        Ok(self.validate())
    }

    /// Replace the entire list in one batch: renumber, recompute every
    /// volume once, validate once. Import paths must use this instead of
    /// per-row edits.
    pub fn replace_all(
        &mut self,
        sections: Vec<WellboreSection>,
    ) -> Result<ValidationReport, EditError> {
        self.enter_cascade()?;

        self.sections = sections;
        for section in &mut self.sections {
            section.enforce_type_invariants();
        }
        self.renumber();
        self.recompute_all_volumes();
        info!(sections = self.sections.len(), "Replaced wellbore geometry");

        self.exit_cascade();
        Ok(self.validate())
    }

    // ------------------------------------------------------------------
    // Field Edits
    // ------------------------------------------------------------------

    /// Apply one field edit and run the full cascade.
    pub fn apply_edit(&mut self, id: u32, edit: SectionEdit) -> Result<EditOutcome, EditError> {
        self.enter_cascade()?;

        let Some(idx) = self.sections.iter().position(|s| s.id == id) else {
            self.exit_cascade();
            return Err(EditError::UnknownSection(id));
        };

        let section = &mut self.sections[idx];
        let mut bottom_changed = false;
        let mut diameter_changed = false;
        match edit {
            SectionEdit::TopMd(v) => section.top_md = v,
            SectionEdit::BottomMd(v) => {
                bottom_changed = section.bottom_md != v;
                section.bottom_md = v;
            }
            SectionEdit::Od(v) => {
                diameter_changed = section.od != v;
                section.od = v;
            }
            SectionEdit::InnerDiameter(v) => {
                diameter_changed = section.id_in != v;
                section.id_in = v;
                section.enforce_type_invariants();
            }
            SectionEdit::SectionType(t) => {
                diameter_changed = section.section_type != t;
                section.section_type = t;
                section.enforce_type_invariants();
            }
            SectionEdit::Washout(v) => section.washout_percent = v,
        }
        debug!(id, ?edit, "Applied section edit");

        // Steps 1-4: recompute this section, then push effects downward
        self.recompute_at(idx);
        if bottom_changed {
            self.propagate_bottom(idx);
        } else if diameter_changed {
            self.recompute_next_of(idx);
        }

        // Step 5: override-merge on settled values (terminal when it fires)
        let merged_into = self.detect_override_merge(id);

        // Step 6: one full sweep
        let mut report = self.validate();
        if let Some(kept_id) = merged_into {
            report.push(Diagnostic::warning(
                Some(kept_id),
                self.section(kept_id).map(|s| s.name.clone()).unwrap_or_default(),
                DiagnosticCategory::SectionOrder,
                "Override extension applied: previous casing extended and the duplicate section removed",
            ));
        }

        self.exit_cascade();
        Ok(EditOutcome { report, merged_into })
    }

    // ------------------------------------------------------------------
    // Cascade internals
    // ------------------------------------------------------------------

    fn enter_cascade(&mut self) -> Result<(), EditError> {
        if self.in_cascade {
            warn!("Re-entrant cascade attempt rejected");
            return Err(EditError::CascadeInProgress);
        }
        self.in_cascade = true;
        Ok(())
    }

    fn exit_cascade(&mut self) {
        self.in_cascade = false;
    }

    /// Recompute one section's volume using its current sorted neighbor.
    fn recompute_at(&mut self, idx: usize) {
        let order = sorted_order(&self.sections);
        let Some(pos) = order.iter().position(|&i| i == idx) else {
            return;
        };
        let previous = if pos > 0 {
            Some(self.sections[order[pos - 1]].clone())
        } else {
            None
        };
        let volume = volumes::section_volume(&self.sections[idx], previous.as_ref());
        self.sections[idx].volume_bbl = volume;
    }

    /// Auto-link: copy this section's bottom into the next section's top,
    /// then recompute the next section. The next section's own bottom does
    /// not move, so the chain settles after one hop; validation reports a
    /// top that crossed its bottom rather than the cascade guessing a fix.
    fn propagate_bottom(&mut self, idx: usize) {
        let order = sorted_order(&self.sections);
        let Some(pos) = order.iter().position(|&i| i == idx) else {
            return;
        };
        let Some(&next_idx) = order.get(pos + 1) else {
            return;
        };
        let Some(bottom) = self.sections[idx].bottom_md else {
            return;
        };
        if self.sections[next_idx].top_md != Some(bottom) {
            debug!(
                from = self.sections[idx].id,
                to = self.sections[next_idx].id,
                boundary = bottom,
                "Auto-linked section boundary"
            );
            self.sections[next_idx].top_md = Some(bottom);
        }
        self.recompute_at(next_idx);
    }

    /// Recompute only the volume of the section after `idx` (annular math
    /// reads this section's bore).
    fn recompute_next_of(&mut self, idx: usize) {
        let order = sorted_order(&self.sections);
        let Some(pos) = order.iter().position(|&i| i == idx) else {
            return;
        };
        if let Some(&next_idx) = order.get(pos + 1) {
            self.recompute_at(next_idx);
        }
    }

    /// Casing override heuristic: an edited Casing/Liner that now shares
    /// the previous cased section's type, OD (within tolerance) and top
    /// (within tolerance) with a strictly deeper bottom is read as "extend
    /// the previous string". The previous section absorbs the new bottom
    /// and the edited duplicate is removed. Terminal: runs once per edit,
    /// after volumes have settled.
    fn detect_override_merge(&mut self, edited_id: u32) -> Option<u32> {
        let order = sorted_order(&self.sections);
        let pos = order
            .iter()
            .position(|&i| self.sections[i].id == edited_id)?;
        if pos == 0 {
            return None;
        }
        let cur = &self.sections[order[pos]];
        let prev = &self.sections[order[pos - 1]];

        if !cur.section_type.is_cased() || cur.section_type != prev.section_type {
            return None;
        }
        let t = &self.config.tolerances;
        let od_matches = match (cur.od, prev.od) {
            (Some(a), Some(b)) => (a - b).abs() <= t.override_od_tolerance_in,
            _ => false,
        };
        let top_matches = match (cur.top_md, prev.top_md) {
            (Some(a), Some(b)) => (a - b).abs() <= t.override_top_tolerance_ft,
            _ => false,
        };
        let (Some(cur_bottom), Some(prev_bottom)) = (cur.bottom_md, prev.bottom_md) else {
            return None;
        };
        if !(od_matches && top_matches && cur_bottom > prev_bottom) {
            return None;
        }

        let kept_idx = order[pos - 1];
        info!(
            kept = self.sections[kept_idx].id,
            removed = edited_id,
            new_bottom = cur_bottom,
            "Override extension: merging duplicate casing into previous section"
        );
        self.sections[kept_idx].bottom_md = Some(cur_bottom);
        self.sections.retain(|s| s.id != edited_id);
        self.renumber();

        // Sections above the removed one keep their sorted positions, so
        // after renumbering the kept section sits at position pos-1 with
        // id pos. Settle its volume and re-link whatever now follows it.
        let order = sorted_order(&self.sections);
        let kept_idx = order[pos - 1];
        let kept_id = self.sections[kept_idx].id;
        self.recompute_at(kept_idx);
        self.propagate_bottom(kept_idx);
        Some(kept_id)
    }

    /// Reassign dense 1..N ids in sorted order. Only reachable from entry
    /// points holding the cascade flag, so a renumber-triggered recompute
    /// can never start a second renumber pass.
    fn renumber(&mut self) {
        let order = sorted_order(&self.sections);
        for (pos, idx) in order.into_iter().enumerate() {
            self.sections[idx].id = pos as u32 + 1;
        }
    }

    /// One full volume pass in sorted order (batch path).
    fn recompute_all_volumes(&mut self) {
        let order = sorted_order(&self.sections);
        for pos in 0..order.len() {
            let previous = if pos > 0 {
                Some(self.sections[order[pos - 1]].clone())
            } else {
                None
            };
            let idx = order[pos];
            self.sections[idx].volume_bbl =
                volumes::section_volume(&self.sections[idx], previous.as_ref());
        }
    }
}
