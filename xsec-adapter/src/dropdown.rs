//! Dropdown adapter
//!
//! Extends the component adapter with option lists shown on the component.
//! Unit lists change the display unit of every attribute of their kind;
//! other lists are handed to the Function. Selections persist as three
//! parallel lists and are restored without replaying selection events.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xsec_function::{DropdownOptions, DropdownSpec, Function, Selection};
use xsec_units::{parse_unit_of, Unit, UnitDefaults};
use crate::{AdapterError, ComponentAdapter, ComponentHost, Cycle};

/// Persisted dropdown selection, one entry per list in every field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownState {
    pub dropdown_items: Vec<Vec<String>>,
    pub selected_items: Vec<String>,
    pub spacer_descriptions: Vec<String>,
}

pub struct DropdownAdapter<F: Function + ?Sized> {
    component: ComponentAdapter<F>,
    defaults: UnitDefaults,
    specs: Vec<DropdownSpec>,
    state: DropdownState,
    initialised: bool,
}

impl<F: Function + ?Sized> DropdownAdapter<F> {
    pub fn new(function: Box<F>, defaults: &UnitDefaults) -> Self {
        Self {
            component: ComponentAdapter::new(function, defaults),
            defaults: *defaults,
            specs: Vec::new(),
            state: DropdownState::default(),
            initialised: false,
        }
    }

    pub fn component(&self) -> &ComponentAdapter<F> {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut ComponentAdapter<F> {
        &mut self.component
    }

    pub fn function(&self) -> &F {
        self.component.function()
    }

    pub fn dropdown_items(&self) -> &[Vec<String>] {
        &self.state.dropdown_items
    }

    pub fn selected_items(&self) -> &[String] {
        &self.state.selected_items
    }

    pub fn spacer_descriptions(&self) -> &[String] {
        &self.state.spacer_descriptions
    }

    /// Populate the lists from the Function, once
    pub fn initialise_dropdowns(&mut self) {
        if self.initialised {
            return;
        }
        self.specs = self.component.function().dropdowns();

        let mut state = DropdownState::default();
        for spec in &self.specs {
            let (items, selected) = match &spec.options {
                DropdownOptions::Units(kind) => {
                    let items: Vec<String> = Unit::all(*kind).iter().map(|u| u.abbreviation().to_string()).collect();
                    (items, self.defaults.unit_for(*kind).abbreviation().to_string())
                }
                DropdownOptions::Choices(choices) => {
                    let items: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
                    let first = items.first().cloned().unwrap_or_default();
                    (items, first)
                }
            };
            state.dropdown_items.push(items);
            state.selected_items.push(selected);
            state.spacer_descriptions.push(spec.label.clone());
        }
        self.state = state;
        self.initialised = true;
    }

    /// Register the component's slots and set up its dropdowns
    pub fn register(&mut self, host: &mut dyn ComponentHost) -> Result<(), AdapterError> {
        self.component.register(host)?;
        self.initialise_dropdowns();
        Ok(())
    }

    pub fn solve_instance(&mut self, host: &mut dyn ComponentHost) -> Result<Cycle, AdapterError> {
        self.component.solve_instance(host)
    }

    /// Select item `index` of list `list`, apply it and recompute
    pub fn set_selected(
        &mut self,
        host: &mut dyn ComponentHost,
        list: usize,
        index: usize,
    ) -> Result<Cycle, AdapterError> {
        self.initialise_dropdowns();
        let count = self.state.dropdown_items.len();
        let items = self
            .state
            .dropdown_items
            .get(list)
            .ok_or(AdapterError::DropdownOutOfRange { index: list, count })?;
        let item = items.get(index).cloned().ok_or(AdapterError::ChoiceOutOfRange {
            list,
            index,
            count: items.len(),
        })?;

        let selection = self.resolve(list, &item)?;

        info!(
            function = self.component.metadata().name,
            list,
            item = item.as_str(),
            "dropdown selection changed"
        );
        self.state.selected_items[list] = item;
        self.apply_selection(list, &selection)?;
        self.component.refresh_names(host);
        self.component.expire();
        self.component.solve_instance(host)
    }

    /// Select an item by its label
    pub fn set_selected_item(
        &mut self,
        host: &mut dyn ComponentHost,
        list: usize,
        item: &str,
    ) -> Result<Cycle, AdapterError> {
        self.initialise_dropdowns();
        let count = self.state.dropdown_items.len();
        let items = self
            .state
            .dropdown_items
            .get(list)
            .ok_or(AdapterError::DropdownOutOfRange { index: list, count })?;
        let index = items
            .iter()
            .position(|i| i == item)
            .ok_or_else(|| AdapterError::UnknownItem { list, item: item.to_string() })?;
        self.set_selected(host, list, index)
    }

    pub fn write_state(&self) -> DropdownState {
        self.state.clone()
    }

    /// Restore a saved selection: effects are applied silently, then exactly
    /// one forced recompute runs. A state that does not fit this Function is
    /// rejected before anything changes.
    pub fn read_state(&mut self, host: &mut dyn ComponentHost, state: DropdownState) -> Result<Cycle, AdapterError> {
        self.initialise_dropdowns();
        let expected = self.specs.len();
        let lengths = [
            state.dropdown_items.len(),
            state.selected_items.len(),
            state.spacer_descriptions.len(),
        ];
        if let Some(&found) = lengths.iter().find(|&&n| n != expected) {
            return Err(AdapterError::StateMismatch { expected, found });
        }

        let selections = state
            .selected_items
            .iter()
            .enumerate()
            .map(|(list, item)| self.resolve(list, item))
            .collect::<Result<Vec<_>, _>>()?;

        self.state = state;
        for (list, selection) in selections.iter().enumerate() {
            self.apply_selection(list, selection)?;
        }
        debug!(
            function = self.component.metadata().name,
            selected = ?self.state.selected_items,
            "restored dropdown state"
        );
        self.component.refresh_names(host);
        self.component.expire();
        self.component.solve_instance(host)
    }

    /// What picking `item` in list `list` means for this Function
    fn resolve(&self, list: usize, item: &str) -> Result<Selection, AdapterError> {
        let unknown = || AdapterError::UnknownItem { list, item: item.to_string() };
        match &self.specs.get(list).ok_or_else(unknown)?.options {
            DropdownOptions::Units(kind) => parse_unit_of(*kind, item).map(Selection::Unit).map_err(|_| unknown()),
            DropdownOptions::Choices(choices) => {
                let index = choices.iter().position(|c| *c == item).ok_or_else(unknown)?;
                Ok(Selection::Choice { index, label: choices[index] })
            }
        }
    }

    fn apply_selection(&mut self, list: usize, selection: &Selection) -> Result<(), AdapterError> {
        if let Selection::Unit(unit) = selection {
            self.apply_unit(*unit)?;
        }
        self.component.function_mut().on_selected(list, selection);
        Ok(())
    }

    fn apply_unit(&mut self, unit: Unit) -> Result<(), AdapterError> {
        let function = self.component.function_mut();
        for attr in function.input_attributes_mut() {
            if attr.quantity_kind() == Some(unit.kind()) {
                attr.set_unit(unit)?;
            }
        }
        for attr in function.output_attributes_mut() {
            if attr.quantity_kind() == Some(unit.kind()) {
                attr.set_unit(unit)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Echo, EchoMode};
    use crate::HeadlessComponent;
    use xsec_core::Value;
    use xsec_function::{Attribute, ComputeOutcome};
    use xsec_units::{Force, ForceUnit, Quantity};

    fn setup() -> (DropdownAdapter<Echo>, HeadlessComponent) {
        let mut adapter = DropdownAdapter::new(Box::new(Echo::new()), &UnitDefaults::default());
        let mut host = HeadlessComponent::new();
        adapter.register(&mut host).unwrap();
        for (i, v) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            host.connect(i, Quantity::new(v, ForceUnit::Kilonewton)).unwrap();
        }
        (adapter, host)
    }

    fn output_values(host: &HeadlessComponent) -> Vec<Option<f64>> {
        host.outputs()
            .into_iter()
            .map(|v| v.and_then(Value::as_quantity).map(|q| q.value))
            .collect()
    }

    #[test]
    fn test_initialise_dropdowns() {
        let (adapter, _) = setup();
        assert_eq!(adapter.dropdown_items()[0], ["N", "kN", "MN", "lbf", "kipf"]);
        assert_eq!(adapter.dropdown_items()[1], ["Copy", "Negate", "Fail"]);
        assert_eq!(adapter.selected_items(), ["kN", "Copy"]);
        assert_eq!(adapter.spacer_descriptions(), ["Force Unit", "Mode"]);
    }

    #[test]
    fn test_unit_selection_keeps_values() {
        let (mut adapter, mut host) = setup();
        adapter.solve_instance(&mut host).unwrap();
        assert_eq!(output_values(&host), [Some(1.0), Some(2.0), Some(3.0)]);

        let cycle = adapter.set_selected(&mut host, 0, 0).unwrap();
        assert_eq!(cycle, Cycle::Computed(ComputeOutcome::Done));
        assert_eq!(adapter.function().x.item(), Some(&Force::from_si(1000.0)));
        assert_eq!(output_values(&host), [Some(1000.0), Some(2000.0), Some(3000.0)]);
        assert_eq!(host.input_names(), ["X [N]", "Y [N]", "Z [N]"]);
        assert_eq!(host.output_names(), ["X [N]", "Y [N]", "Z [N]"]);
    }

    #[test]
    fn test_choice_selection_reaches_function() {
        let (mut adapter, mut host) = setup();
        adapter.solve_instance(&mut host).unwrap();
        adapter.set_selected_item(&mut host, 1, "Negate").unwrap();
        assert_eq!(adapter.function().mode, EchoMode::Negate);
        assert_eq!(output_values(&host), [Some(-1.0), Some(-2.0), Some(-3.0)]);
        assert_eq!(adapter.function().calls, 2);
    }

    #[test]
    fn test_selection_out_of_range() {
        let (mut adapter, mut host) = setup();
        assert!(matches!(
            adapter.set_selected(&mut host, 5, 0),
            Err(AdapterError::DropdownOutOfRange { index: 5, count: 2 })
        ));
        assert!(matches!(
            adapter.set_selected(&mut host, 1, 9),
            Err(AdapterError::ChoiceOutOfRange { list: 1, index: 9, count: 3 })
        ));
        assert!(matches!(
            adapter.set_selected_item(&mut host, 0, "furlong"),
            Err(AdapterError::UnknownItem { .. })
        ));
    }

    #[test]
    fn test_state_roundtrip_recomputes_once() {
        let (mut first, mut first_host) = setup();
        first.set_selected_item(&mut first_host, 0, "N").unwrap();
        first.set_selected_item(&mut first_host, 1, "Negate").unwrap();
        let json = serde_json::to_string(&first.write_state()).unwrap();

        let (mut second, mut host) = setup();
        let state: DropdownState = serde_json::from_str(&json).unwrap();
        let cycle = second.read_state(&mut host, state).unwrap();

        assert_eq!(cycle, Cycle::Computed(ComputeOutcome::Done));
        assert_eq!(second.function().calls, 1);
        assert_eq!(second.selected_items(), ["N", "Negate"]);
        assert_eq!(host.input_names(), ["X [N]", "Y [N]", "Z [N]"]);
        assert_eq!(output_values(&host), [Some(-1000.0), Some(-2000.0), Some(-3000.0)]);
    }

    #[test]
    fn test_bare_numbers_follow_unit_selection() {
        let mut adapter = DropdownAdapter::new(Box::new(Echo::new()), &UnitDefaults::default());
        let mut host = HeadlessComponent::new();
        adapter.register(&mut host).unwrap();
        for i in 0..3 {
            host.connect(i, 2.0).unwrap();
        }
        adapter.solve_instance(&mut host).unwrap();
        assert_eq!(adapter.function().x.item(), Some(&Force::from_si(2000.0)));

        // A plain number is read in whatever unit the slot currently shows
        adapter.set_selected_item(&mut host, 0, "N").unwrap();
        assert_eq!(adapter.function().x.item(), Some(&Force::from_si(2.0)));
        assert_eq!(output_values(&host), [Some(2.0), Some(2.0), Some(2.0)]);
    }

    #[test]
    fn test_invalid_state_changes_nothing() {
        let (mut adapter, mut host) = setup();
        adapter.solve_instance(&mut host).unwrap();
        let before = adapter.write_state();

        let state = DropdownState {
            dropdown_items: before.dropdown_items.clone(),
            selected_items: vec!["N".into(), "Bogus".into()],
            spacer_descriptions: before.spacer_descriptions.clone(),
        };
        assert_eq!(
            adapter.read_state(&mut host, state).unwrap_err(),
            AdapterError::UnknownItem { list: 1, item: "Bogus".into() }
        );
        assert_eq!(adapter.write_state(), before);
        assert_eq!(Attribute::unit(&adapter.function().x), Some(Unit::from(ForceUnit::Kilonewton)));
        assert_eq!(host.input_names(), ["X [kN]", "Y [kN]", "Z [kN]"]);
        assert_eq!(adapter.function().calls, 1);
    }

    #[test]
    fn test_state_without_spacers_rejected() {
        let (mut adapter, mut host) = setup();
        let mut state = adapter.write_state();
        state.selected_items[0] = "N".into();
        state.spacer_descriptions.clear();
        assert_eq!(
            adapter.read_state(&mut host, state).unwrap_err(),
            AdapterError::StateMismatch { expected: 2, found: 0 }
        );
        assert_eq!(adapter.selected_items(), ["kN", "Copy"]);
    }

    #[test]
    fn test_state_mismatch() {
        let (mut adapter, mut host) = setup();
        let state = DropdownState {
            dropdown_items: vec![vec!["N".into()]],
            selected_items: vec!["N".into()],
            spacer_descriptions: vec!["Force Unit".into()],
        };
        assert_eq!(
            adapter.read_state(&mut host, state).unwrap_err(),
            AdapterError::StateMismatch { expected: 2, found: 1 }
        );
    }
}
