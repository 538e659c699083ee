//! Drill-string collection: unique-kind enforcement, auto-numbered names,
//! derived-volume recomputation on edit.

use tracing::{debug, info};

use crate::types::{ComponentKind, DrillStringComponent, JetSet};
use crate::volumes;

use super::EditError;

/// One field edit on a drill-string component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentEdit {
    Length(Option<f64>),
    Od(Option<f64>),
    InnerDiameter(Option<f64>),
    WeightPerFoot(Option<f64>),
}

/// Ordered drill string, top-down by list position.
///
/// Owns its components exclusively. Bit, motor and the survey tools may
/// appear at most once; repeatable kinds are auto-numbered in the order
/// they were added ("Drill Pipe 1", "Drill Pipe 2", ...).
#[derive(Debug, Clone, Default)]
pub struct DrillString {
    components: Vec<DrillStringComponent>,
    /// Bit nozzle set; TFA recomputes whenever the jets change
    pub jets: JetSet,
    next_id: u32,
}

impl DrillString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn components(&self) -> &[DrillStringComponent] {
        &self.components
    }

    pub fn component(&self, id: u32) -> Option<&DrillStringComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Append a component of the given kind. Rejects a second Bit, Motor,
    /// MWD, LWD, PWD or PWO. Returns the new component's id.
    pub fn add_component(&mut self, kind: ComponentKind) -> Result<u32, EditError> {
        if kind.is_unique_per_string()
            && self.components.iter().any(|c| c.kind == kind)
        {
            return Err(EditError::DuplicateUniqueComponent(kind));
        }

        self.next_id += 1;
        let id = self.next_id;
        let name = self.numbered_name(kind);
        info!(id, kind = %kind, name = %name, "Added drill-string component");
        self.components.push(DrillStringComponent::new(id, kind, name));
        Ok(id)
    }

    /// Remove a component and renumber the names of its repeatable kind.
    pub fn remove_component(&mut self, id: u32) -> Result<(), EditError> {
        let Some(idx) = self.components.iter().position(|c| c.id == id) else {
            return Err(EditError::UnknownComponent(id));
        };
        let kind = self.components[idx].kind;
        self.components.remove(idx);
        self.renumber_kind(kind);
        Ok(())
    }

    /// Apply one field edit and recompute both derived volumes.
    pub fn apply_edit(&mut self, id: u32, edit: ComponentEdit) -> Result<(), EditError> {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return Err(EditError::UnknownComponent(id));
        };

        match edit {
            ComponentEdit::Length(v) => component.length_ft = v,
            ComponentEdit::Od(v) => component.od_in = v,
            ComponentEdit::InnerDiameter(v) => component.id_in = v,
            ComponentEdit::WeightPerFoot(v) => component.weight_per_foot = v,
        }

        let (internal, displacement) =
            volumes::component_volumes(component.length_ft, component.od_in, component.id_in);
        component.internal_volume_bbl = internal;
        component.displacement_volume_bbl = displacement;
        debug!(id, ?edit, "Applied drill-string edit");
        Ok(())
    }

    /// Edit the bit jets; TFA follows the null-propagation contract
    /// (unset unless both inputs are present).
    pub fn set_jets(&mut self, number_of_jets: Option<u32>, jet_diameter_32nds: Option<f64>) {
        self.jets.number_of_jets = number_of_jets;
        self.jets.jet_diameter_32nds = jet_diameter_32nds;
        self.jets.recompute_tfa();
    }

    /// Total string length (ft) over components with a length entered.
    pub fn total_length_ft(&self) -> f64 {
        self.components.iter().filter_map(|c| c.length_ft).sum()
    }

    /// Total bore capacity (bbl) over components with computed volumes.
    pub fn total_internal_volume_bbl(&self) -> f64 {
        self.components
            .iter()
            .filter_map(|c| c.internal_volume_bbl)
            .sum()
    }

    /// Total steel displacement (bbl) over components with computed volumes.
    pub fn total_displacement_volume_bbl(&self) -> f64 {
        self.components
            .iter()
            .filter_map(|c| c.displacement_volume_bbl)
            .sum()
    }

    /// Name for a newly added component: the bare label for unique kinds,
    /// "Label N" for repeatable ones.
    fn numbered_name(&self, kind: ComponentKind) -> String {
        if kind.is_unique_per_string() {
            kind.label().to_string()
        } else {
            let ordinal = self.components.iter().filter(|c| c.kind == kind).count() + 1;
            format!("{} {}", kind.label(), ordinal)
        }
    }

    /// Re-derive the ordinal names of one repeatable kind after a removal.
    fn renumber_kind(&mut self, kind: ComponentKind) {
        if kind.is_unique_per_string() {
            return;
        }
        let mut ordinal = 0;
        for component in self.components.iter_mut().filter(|c| c.kind == kind) {
            ordinal += 1;
            component.name = format!("{} {}", kind.label(), ordinal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_kind_rejected_on_second_add() {
        let mut string = DrillString::new();
        string.add_component(ComponentKind::Bit).unwrap();
        let err = string.add_component(ComponentKind::Bit).unwrap_err();
        assert!(matches!(err, EditError::DuplicateUniqueComponent(ComponentKind::Bit)));
    }

    #[test]
    fn test_repeatable_kinds_auto_number() {
        let mut string = DrillString::new();
        string.add_component(ComponentKind::DrillPipe).unwrap();
        string.add_component(ComponentKind::Hwdp).unwrap();
        string.add_component(ComponentKind::DrillPipe).unwrap();

        let names: Vec<&str> = string.components().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Drill Pipe 1", "HWDP 1", "Drill Pipe 2"]);
    }

    #[test]
    fn test_removal_renumbers_names() {
        let mut string = DrillString::new();
        let first = string.add_component(ComponentKind::DrillPipe).unwrap();
        string.add_component(ComponentKind::DrillPipe).unwrap();
        string.add_component(ComponentKind::DrillPipe).unwrap();

        string.remove_component(first).unwrap();
        let names: Vec<&str> = string.components().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Drill Pipe 1", "Drill Pipe 2"]);
    }

    #[test]
    fn test_edit_recomputes_volumes() {
        let mut string = DrillString::new();
        let id = string.add_component(ComponentKind::DrillPipe).unwrap();

        string.apply_edit(id, ComponentEdit::Length(Some(1000.0))).unwrap();
        // OD/ID still unset: volumes must stay unset, not zero
        let pipe = string.component(id).unwrap();
        assert_eq!(pipe.internal_volume_bbl, None);

        string.apply_edit(id, ComponentEdit::Od(Some(5.0))).unwrap();
        string.apply_edit(id, ComponentEdit::InnerDiameter(Some(4.276))).unwrap();
        let pipe = string.component(id).unwrap();
        let internal = pipe.internal_volume_bbl.unwrap();
        let displacement = pipe.displacement_volume_bbl.unwrap();
        assert!(internal > 0.0);
        assert!(displacement > 0.0);
        assert!(
            displacement < internal,
            "thin-wall pipe displaces less steel than it holds mud"
        );
    }

    #[test]
    fn test_unknown_component_edit_errors() {
        let mut string = DrillString::new();
        let err = string.apply_edit(99, ComponentEdit::Length(Some(30.0))).unwrap_err();
        assert!(matches!(err, EditError::UnknownComponent(99)));
    }

    #[test]
    fn test_totals_skip_unset_components() {
        let mut string = DrillString::new();
        let dp = string.add_component(ComponentKind::DrillPipe).unwrap();
        string.add_component(ComponentKind::Jar).unwrap(); // dimensions never entered
        string.apply_edit(dp, ComponentEdit::Length(Some(9000.0))).unwrap();
        string.apply_edit(dp, ComponentEdit::Od(Some(5.0))).unwrap();
        string.apply_edit(dp, ComponentEdit::InnerDiameter(Some(4.276))).unwrap();

        assert_eq!(string.total_length_ft(), 9000.0);
        assert!(string.total_internal_volume_bbl() > 0.0);
    }
}
