//! Generic component adapter
//!
//! Binds one Function to one host component. Registration creates a host
//! slot per attribute in array order; each cycle then collects host values
//! into the input attributes, runs the Function and writes the output
//! attributes and messages back to the host.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};
use xsec_core::{MessageLevel, Messages};
use xsec_function::{Attribute, ComputeOutcome, Function, FunctionMeta};
use xsec_units::UnitDefaults;
use crate::{AdapterError, ComponentHost, SlotSpec};

/// What a solve cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Input collection failed; the Function was not run
    Blocked,
    /// The Function ran
    Computed(ComputeOutcome),
    /// Inputs were unchanged; the previous result was written again
    Reused(ComputeOutcome),
}

impl Cycle {
    pub fn outcome(&self) -> Option<ComputeOutcome> {
        match self {
            Cycle::Blocked => None,
            Cycle::Computed(o) | Cycle::Reused(o) => Some(*o),
        }
    }
}

pub struct ComponentAdapter<F: Function + ?Sized> {
    function: Box<F>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    registered: bool,
    expired: Rc<Cell<bool>>,
    last: Option<ComputeOutcome>,
    // Collection messages of the current cycle, re-emitted by compute_data
    collected: Messages,
}

impl<F: Function + ?Sized> ComponentAdapter<F> {
    /// Wrap a Function, putting every unit-bearing attribute in its default unit
    pub fn new(mut function: Box<F>, defaults: &UnitDefaults) -> Self {
        let expired = Rc::new(Cell::new(true));

        for attr in function.input_attributes_mut() {
            apply_default_unit(attr, defaults);
            let flag = expired.clone();
            attr.subscribe(Box::new(move || flag.set(true)));
        }
        for attr in function.output_attributes_mut() {
            apply_default_unit(attr, defaults);
        }

        Self {
            function,
            inputs: Vec::new(),
            outputs: Vec::new(),
            registered: false,
            expired,
            last: None,
            collected: Messages::new(),
        }
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    /// Mutable access to the Function. Input changes made here still expire
    /// the component.
    pub fn function_mut(&mut self) -> &mut F {
        &mut self.function
    }

    pub fn metadata(&self) -> FunctionMeta {
        self.function.metadata()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Force the next cycle to run the Function
    pub fn expire(&self) {
        self.expired.set(true);
    }

    pub fn register_input_params(&mut self, host: &mut dyn ComponentHost) -> Result<(), AdapterError> {
        let specs = self.slot_specs(self.function.input_attributes(), "input")?;
        self.inputs = specs.into_iter().map(|s| host.register_input(s)).collect();
        Ok(())
    }

    pub fn register_output_params(&mut self, host: &mut dyn ComponentHost) -> Result<(), AdapterError> {
        let specs = self.slot_specs(self.function.output_attributes(), "output")?;
        self.outputs = specs.into_iter().map(|s| host.register_output(s)).collect();
        Ok(())
    }

    /// Register inputs then outputs
    pub fn register(&mut self, host: &mut dyn ComponentHost) -> Result<(), AdapterError> {
        self.register_input_params(host)?;
        self.register_output_params(host)?;
        self.registered = true;
        debug!(
            function = self.function.metadata().name,
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            "registered component"
        );
        Ok(())
    }

    fn slot_specs(&self, attrs: Vec<&dyn Attribute>, side: &'static str) -> Result<Vec<SlotSpec>, AdapterError> {
        let mut seen = HashSet::new();
        let mut specs = Vec::with_capacity(attrs.len());
        for attr in attrs {
            if !seen.insert(attr.nick_name()) {
                return Err(AdapterError::DuplicateNickName {
                    function: self.function.metadata().name.to_string(),
                    side,
                    nick_name: attr.nick_name().to_string(),
                });
            }
            specs.push(SlotSpec::from_attribute(attr));
        }
        Ok(specs)
    }

    fn check_registration(&self) -> Result<(), AdapterError> {
        let function = || self.function.metadata().name.to_string();
        if !self.registered {
            return Err(AdapterError::NotRegistered { function: function() });
        }
        let inputs = self.function.input_attributes().len();
        if inputs != self.inputs.len() {
            return Err(AdapterError::AttributeCountChanged {
                function: function(),
                side: "input",
                expected: self.inputs.len(),
                found: inputs,
            });
        }
        let outputs = self.function.output_attributes().len();
        if outputs != self.outputs.len() {
            return Err(AdapterError::AttributeCountChanged {
                function: function(),
                side: "output",
                expected: self.outputs.len(),
                found: outputs,
            });
        }
        Ok(())
    }

    /// Start a cycle: clear the host, then write host values into the input
    /// attributes.
    ///
    /// Returns `false` when a required input is unconnected or a value could
    /// not be converted; the reason is already on the host.
    pub fn collect_data(&mut self, host: &mut dyn ComponentHost) -> Result<bool, AdapterError> {
        self.check_registration()?;
        host.clear_messages();
        host.clear_outputs();
        self.collected.clear();

        let mut ready = true;
        for (attr, &slot) in self.function.input_attributes_mut().into_iter().zip(&self.inputs) {
            let value = host.input(slot).filter(|v| !v.is_null()).cloned();
            match value {
                Some(value) => {
                    if let Err(e) = attr.assign(&value) {
                        debug!(parameter = attr.nick_name(), error = %e, "input conversion failed");
                        self.collected.push(MessageLevel::Error, e.message);
                        ready = false;
                    }
                }
                None if attr.info().is_optional() => attr.clear(),
                None => {
                    self.collected.push(
                        MessageLevel::Warning,
                        format!("Input parameter {} failed to collect data", attr.nick_name()),
                    );
                    ready = false;
                }
            }
        }
        for (level, message) in self.collected.iter() {
            host.add_message(level, message);
        }
        Ok(ready)
    }

    /// Run the Function (or reuse the last result when no input changed),
    /// then replace the host's messages and outputs with this cycle's.
    /// Calling it again without new input leaves the host unchanged.
    pub fn compute_data(&mut self, host: &mut dyn ComponentHost) -> Result<Cycle, AdapterError> {
        self.check_registration()?;
        let name = self.function.metadata().name;
        host.clear_messages();
        host.clear_outputs();
        for (level, message) in self.collected.iter() {
            host.add_message(level, message);
        }

        let cycle = match self.last {
            Some(outcome) if !self.expired.get() => {
                debug!(function = name, "inputs unchanged, reusing previous result");
                Cycle::Reused(outcome)
            }
            _ => {
                let outcome = self.function.solve();
                self.expired.set(false);
                self.last = Some(outcome);
                debug!(function = name, ?outcome, "computed");
                Cycle::Computed(outcome)
            }
        };

        for (level, message) in self.function.messages().iter() {
            host.add_message(level, message);
        }

        if cycle.outcome() == Some(ComputeOutcome::Done) {
            for (attr, &slot) in self.function.output_attributes().into_iter().zip(&self.outputs) {
                match attr.emit() {
                    Ok(value) => host.set_output(slot, value),
                    Err(e) => {
                        warn!(function = name, parameter = attr.nick_name(), error = %e, "output conversion failed");
                        host.add_message(MessageLevel::Error, &e.message);
                    }
                }
            }
        }
        Ok(cycle)
    }

    /// One full cycle: collect, then compute
    pub fn solve_instance(&mut self, host: &mut dyn ComponentHost) -> Result<Cycle, AdapterError> {
        if !self.collect_data(host)? {
            // Reconnecting the same values later must still run the Function
            self.expire();
            debug!(function = self.function.metadata().name, "collection blocked compute");
            return Ok(Cycle::Blocked);
        }
        self.compute_data(host)
    }

    /// Push current display names (with units) to the host slots
    pub fn refresh_names(&self, host: &mut dyn ComponentHost) {
        for (attr, &slot) in self.function.input_attributes().into_iter().zip(&self.inputs) {
            host.rename_input(slot, &attr.display_name());
        }
        for (attr, &slot) in self.function.output_attributes().into_iter().zip(&self.outputs) {
            host.rename_output(slot, &attr.display_name());
        }
    }
}

fn apply_default_unit(attr: &mut dyn Attribute, defaults: &UnitDefaults) {
    if let Some(kind) = attr.quantity_kind() {
        if let Err(e) = attr.set_unit(defaults.unit_for(kind)) {
            warn!(parameter = attr.nick_name(), error = %e, "default unit rejected");
        }
    }
}
