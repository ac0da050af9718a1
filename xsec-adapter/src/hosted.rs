//! Registry-backed components and their saved documents
//!
//! A `HostedComponent` pairs a dropdown adapter around a registry Function
//! with an in-memory host. `ComponentDocument` is what gets saved: the
//! Function name, the dropdown state and the raw input values.

use serde::{Deserialize, Serialize};
use tracing::info;
use xsec_core::Value;
use xsec_function::{Function, FunctionRegistry};
use xsec_units::UnitDefaults;
use crate::{AdapterError, Cycle, DropdownAdapter, DropdownState, HeadlessComponent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDocument {
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdowns: Option<DropdownState>,
    #[serde(default)]
    pub inputs: Vec<Option<Value>>,
}

pub struct HostedComponent {
    adapter: DropdownAdapter<dyn Function>,
    host: HeadlessComponent,
}

impl HostedComponent {
    /// Build and register a fresh component for a registered Function
    pub fn create(registry: &FunctionRegistry, name: &str, defaults: &UnitDefaults) -> Result<Self, AdapterError> {
        let function = registry.create(name)?;
        let mut adapter = DropdownAdapter::new(function, defaults);
        let mut host = HeadlessComponent::new();
        adapter.register(&mut host)?;
        info!(function = adapter.component().metadata().name, "component created");
        Ok(Self { adapter, host })
    }

    /// Rebuild a saved component; runs exactly one compute cycle
    pub fn from_document(
        registry: &FunctionRegistry,
        document: &ComponentDocument,
        defaults: &UnitDefaults,
    ) -> Result<(Self, Cycle), AdapterError> {
        let mut component = Self::create(registry, &document.function, defaults)?;
        let count = component.host.input_count();
        if document.inputs.len() > count {
            return Err(AdapterError::SlotOutOfRange {
                side: "input",
                index: document.inputs.len() - 1,
                count,
            });
        }
        for (index, value) in document.inputs.iter().enumerate() {
            if let Some(value) = value {
                component.host.connect(index, value.clone())?;
            }
        }
        let cycle = match &document.dropdowns {
            Some(state) => component.adapter.read_state(&mut component.host, state.clone())?,
            None => component.adapter.solve_instance(&mut component.host)?,
        };
        Ok((component, cycle))
    }

    pub fn to_document(&self) -> ComponentDocument {
        let state = self.adapter.write_state();
        ComponentDocument {
            function: self.adapter.component().metadata().name.to_string(),
            dropdowns: (!state.selected_items.is_empty()).then_some(state),
            inputs: self.host.inputs(),
        }
    }

    pub fn adapter(&self) -> &DropdownAdapter<dyn Function> {
        &self.adapter
    }

    pub fn host(&self) -> &HeadlessComponent {
        &self.host
    }

    /// Index of an input slot, by nick name or by position
    pub fn input_slot(&self, slot: &str) -> Result<usize, AdapterError> {
        let count = self.host.input_count();
        let index = match self.host.input_index(slot) {
            Some(index) => index,
            None => slot.parse().map_err(|_| AdapterError::UnknownSlot(slot.to_string()))?,
        };
        if index >= count {
            return Err(AdapterError::SlotOutOfRange { side: "input", index, count });
        }
        Ok(index)
    }

    pub fn connect(&mut self, slot: &str, value: Value) -> Result<(), AdapterError> {
        let index = self.input_slot(slot)?;
        self.host.connect(index, value)
    }

    pub fn disconnect(&mut self, slot: &str) -> Result<(), AdapterError> {
        let index = self.input_slot(slot)?;
        self.host.disconnect(index)
    }

    pub fn solve(&mut self) -> Result<Cycle, AdapterError> {
        self.adapter.solve_instance(&mut self.host)
    }

    pub fn select(&mut self, list: usize, item: &str) -> Result<Cycle, AdapterError> {
        self.adapter.set_selected_item(&mut self.host, list, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Echo;
    use xsec_function::ComputeOutcome;
    use xsec_units::{ForceUnit, Quantity};

    fn registry() -> FunctionRegistry {
        FunctionRegistry::new().with_function(|| Box::new(Echo::new()))
    }

    #[test]
    fn test_create_and_solve() {
        let mut c = HostedComponent::create(&registry(), "echo", &UnitDefaults::default()).unwrap();
        c.connect("X", Value::Number(1.0)).unwrap();
        c.connect("YY", Value::Number(2.0)).unwrap();
        c.connect("2", Value::Number(3.0)).unwrap();
        assert_eq!(c.solve().unwrap(), Cycle::Computed(ComputeOutcome::Done));
        assert!(c.connect("W", Value::Number(1.0)).is_err());
        assert!(c.connect("7", Value::Number(1.0)).is_err());
    }

    #[test]
    fn test_unknown_function() {
        let err = HostedComponent::create(&registry(), "Ecko", &UnitDefaults::default()).err().unwrap();
        assert!(matches!(err, AdapterError::Xsec(ref e) if e.code == "UNKNOWN_FUNCTION"));
    }

    #[test]
    fn test_document_roundtrip() {
        let reg = registry();
        let mut c = HostedComponent::create(&reg, "Echo", &UnitDefaults::default()).unwrap();
        c.connect("X", Value::Quantity(Quantity::new(1.0, ForceUnit::Kilonewton))).unwrap();
        c.connect("YY", Value::Number(2.0)).unwrap();
        c.select(0, "N").unwrap();

        let json = serde_json::to_string(&c.to_document()).unwrap();
        let doc: ComponentDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.function, "Echo");
        assert_eq!(doc.inputs.len(), 3);
        assert!(doc.inputs[2].is_none());

        let (restored, cycle) = HostedComponent::from_document(&reg, &doc, &UnitDefaults::default()).unwrap();
        // ZZ is still unconnected
        assert_eq!(cycle, Cycle::Blocked);
        assert_eq!(restored.adapter().selected_items(), ["N", "Copy"]);
        assert_eq!(restored.host().messages().warnings, ["Input parameter ZZ failed to collect data"]);
        assert_eq!(restored.host().input_names()[0], "X [N]");
    }
}
