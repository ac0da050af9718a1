//! Function traits

use serde::{Deserialize, Serialize};
use xsec_core::{Messages, XsecError};
use xsec_units::{QuantityKind, Unit};
use crate::Attribute;

/// Metadata for a Function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub nick_name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub sub_category: &'static str,
}

/// What a dropdown list offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownOptions {
    /// Every unit of a quantity kind, in `Unit::all` order
    Units(QuantityKind),
    /// Fixed labels; the first is selected initially
    Choices(&'static [&'static str]),
}

/// One dropdown list a Function asks its host to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownSpec {
    /// Spacer description shown above the list
    pub label: String,
    pub options: DropdownOptions,
}

impl DropdownSpec {
    /// Unit list labelled after its kind ("Force Unit", ...)
    pub fn units(kind: QuantityKind) -> Self {
        Self { label: kind.unit_label().to_string(), options: DropdownOptions::Units(kind) }
    }

    pub fn choices(label: impl Into<String>, choices: &'static [&'static str]) -> Self {
        Self { label: label.into(), options: DropdownOptions::Choices(choices) }
    }
}

/// A resolved dropdown selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Unit(Unit),
    Choice { index: usize, label: &'static str },
}

/// Result of one compute cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeOutcome {
    /// Outputs written; warnings and remarks may be present
    Done,
    /// Error messages present; outputs were not written
    Failed,
}

/// A computation with ordered typed inputs and outputs
///
/// Implementors own their attributes and messages. Inputs are written by the
/// adapter before each cycle; `compute` reads them and writes outputs. On
/// `Err` the outputs must be left as they were.
pub trait Function {
    fn metadata(&self) -> FunctionMeta;

    /// Ordered inputs; position is the host slot index
    fn input_attributes(&self) -> Vec<&dyn Attribute>;
    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute>;

    /// Ordered outputs; position is the host slot index
    fn output_attributes(&self) -> Vec<&dyn Attribute>;
    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute>;

    fn messages(&self) -> &Messages;
    fn messages_mut(&mut self) -> &mut Messages;

    fn compute(&mut self) -> Result<(), XsecError>;

    /// Option lists this Function wants; empty unless overridden
    fn dropdowns(&self) -> Vec<DropdownSpec> {
        Vec::new()
    }

    /// Domain effect of a selection. Unit lists are applied by the adapter
    /// before this is called.
    fn on_selected(&mut self, _list: usize, _selection: &Selection) {}

    /// One full compute cycle: clear messages, validate required inputs,
    /// compute, and turn a returned error into an error message.
    fn solve(&mut self) -> ComputeOutcome {
        self.messages_mut().clear();

        let missing: Vec<&'static str> = self
            .input_attributes()
            .iter()
            .filter(|a| !a.info().is_optional() && !a.is_set())
            .map(|a| a.nick_name())
            .collect();
        if !missing.is_empty() {
            for nick_name in missing {
                self.messages_mut().push_error(&XsecError::missing_input(nick_name));
            }
            return ComputeOutcome::Failed;
        }

        match self.compute() {
            Ok(()) if self.messages().has_errors() => ComputeOutcome::Failed,
            Ok(()) => ComputeOutcome::Done,
            Err(e) => {
                self.messages_mut().push_error(&e);
                ComputeOutcome::Failed
            }
        }
    }
}

/// Build the `Vec<&dyn Attribute>` returned by `Function::input_attributes`
/// and `Function::output_attributes`.
#[macro_export]
macro_rules! attributes {
    ($($attr:expr),* $(,)?) => {
        vec![$(&$attr as &dyn $crate::Attribute),*]
    };
}

/// Mutable counterpart of `attributes!`
#[macro_export]
macro_rules! attributes_mut {
    ($($attr:expr),* $(,)?) => {
        vec![$(&mut $attr as &mut dyn $crate::Attribute),*]
    };
}
