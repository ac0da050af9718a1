//! Host component surface
//!
//! `ComponentHost` is everything the adapter needs from the visual
//! programming host: slot registration, slot data, messages and slot
//! renaming. `HeadlessComponent` keeps all of it in memory.

use serde::{Deserialize, Serialize};
use xsec_core::{MessageLevel, Messages, Value};
use xsec_function::{Access, Attribute};
use crate::AdapterError;

/// Metadata of one host slot, supplied once at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub name: String,
    pub nick_name: String,
    pub description: String,
    pub access: Access,
    pub optional: bool,
}

impl SlotSpec {
    pub fn from_attribute(attr: &dyn Attribute) -> Self {
        let info = attr.info();
        Self {
            name: attr.display_name(),
            nick_name: info.nick_name().to_string(),
            description: info.description().to_string(),
            access: info.access(),
            optional: info.is_optional(),
        }
    }
}

pub trait ComponentHost {
    /// Add an input slot, returning its index
    fn register_input(&mut self, spec: SlotSpec) -> usize;

    /// Add an output slot, returning its index
    fn register_output(&mut self, spec: SlotSpec) -> usize;

    /// Value on an input slot; `None` when unconnected
    fn input(&self, index: usize) -> Option<&Value>;

    fn set_output(&mut self, index: usize, value: Option<Value>);

    fn clear_outputs(&mut self);

    fn add_message(&mut self, level: MessageLevel, message: &str);

    fn clear_messages(&mut self);

    fn rename_input(&mut self, index: usize, name: &str);

    fn rename_output(&mut self, index: usize, name: &str);
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    spec: SlotSpec,
    value: Option<Value>,
}

/// In-memory host component
#[derive(Debug, Clone, Default)]
pub struct HeadlessComponent {
    inputs: Vec<Slot>,
    outputs: Vec<Slot>,
    messages: Messages,
}

impl HeadlessComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a value on an input slot
    pub fn connect(&mut self, index: usize, value: impl Into<Value>) -> Result<(), AdapterError> {
        let count = self.inputs.len();
        let slot = self.inputs.get_mut(index).ok_or(AdapterError::SlotOutOfRange {
            side: "input",
            index,
            count,
        })?;
        slot.value = Some(value.into());
        Ok(())
    }

    pub fn disconnect(&mut self, index: usize) -> Result<(), AdapterError> {
        let count = self.inputs.len();
        let slot = self.inputs.get_mut(index).ok_or(AdapterError::SlotOutOfRange {
            side: "input",
            index,
            count,
        })?;
        slot.value = None;
        Ok(())
    }

    /// Find an input slot by nick name
    pub fn input_index(&self, nick_name: &str) -> Option<usize> {
        self.inputs.iter().position(|s| s.spec.nick_name == nick_name)
    }

    pub fn output(&self, index: usize) -> Option<&Value> {
        self.outputs.get(index).and_then(|s| s.value.as_ref())
    }

    pub fn outputs(&self) -> Vec<Option<&Value>> {
        self.outputs.iter().map(|s| s.value.as_ref()).collect()
    }

    /// Raw input values in slot order, as saved in documents
    pub fn inputs(&self) -> Vec<Option<Value>> {
        self.inputs.iter().map(|s| s.value.clone()).collect()
    }

    pub fn input_spec(&self, index: usize) -> Option<&SlotSpec> {
        self.inputs.get(index).map(|s| &s.spec)
    }

    pub fn output_spec(&self, index: usize) -> Option<&SlotSpec> {
        self.outputs.get(index).map(|s| &s.spec)
    }

    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|s| s.spec.name.as_str()).collect()
    }

    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|s| s.spec.name.as_str()).collect()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}

impl ComponentHost for HeadlessComponent {
    fn register_input(&mut self, spec: SlotSpec) -> usize {
        self.inputs.push(Slot { spec, value: None });
        self.inputs.len() - 1
    }

    fn register_output(&mut self, spec: SlotSpec) -> usize {
        self.outputs.push(Slot { spec, value: None });
        self.outputs.len() - 1
    }

    fn input(&self, index: usize) -> Option<&Value> {
        self.inputs.get(index).and_then(|s| s.value.as_ref())
    }

    fn set_output(&mut self, index: usize, value: Option<Value>) {
        if let Some(slot) = self.outputs.get_mut(index) {
            slot.value = value;
        }
    }

    fn clear_outputs(&mut self) {
        for slot in &mut self.outputs {
            slot.value = None;
        }
    }

    fn add_message(&mut self, level: MessageLevel, message: &str) {
        self.messages.push(level, message);
    }

    fn clear_messages(&mut self) {
        self.messages.clear();
    }

    fn rename_input(&mut self, index: usize, name: &str) {
        if let Some(slot) = self.inputs.get_mut(index) {
            slot.spec.name = name.to_string();
        }
    }

    fn rename_output(&mut self, index: usize, name: &str) {
        if let Some(slot) = self.outputs.get_mut(index) {
            slot.spec.name = name.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(nick: &str) -> SlotSpec {
        SlotSpec {
            name: nick.to_string(),
            nick_name: nick.to_string(),
            description: String::new(),
            access: Access::Item,
            optional: false,
        }
    }

    #[test]
    fn test_slots() {
        let mut host = HeadlessComponent::new();
        assert_eq!(host.register_input(spec("A")), 0);
        assert_eq!(host.register_input(spec("B")), 1);
        assert_eq!(host.register_output(spec("C")), 0);

        host.connect(1, 2.0).unwrap();
        assert!(host.input(0).is_none());
        assert_eq!(host.input(1), Some(&Value::Number(2.0)));
        assert_eq!(host.input_index("B"), Some(1));
        assert!(host.connect(5, 1.0).is_err());

        host.set_output(0, Some(Value::Bool(true)));
        host.rename_output(0, "C [kN]");
        assert_eq!(host.output_names(), ["C [kN]"]);
        host.clear_outputs();
        assert!(host.output(0).is_none());
    }

    #[test]
    fn test_messages() {
        let mut host = HeadlessComponent::new();
        host.add_message(MessageLevel::Warning, "careful");
        assert_eq!(host.messages().warnings, ["careful"]);
        host.clear_messages();
        assert!(host.messages().is_empty());
    }
}
