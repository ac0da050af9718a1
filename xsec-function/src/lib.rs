//! xsec Function System
//!
//! Provides the contract a computation implements to be hosted as a
//! component:
//! - Attributes (typed, unit-aware parameter slots)
//! - Functions (ordered inputs and outputs, compute cycle, messages)
//! - Registry (named Function factories)

mod attribute;
mod param;
mod traits;
mod registry;

pub use attribute::{Access, Attribute, AttributeInfo, Data, ParameterAttribute};
pub use param::ParamValue;
pub use traits::{
    Function, FunctionMeta,
    DropdownSpec, DropdownOptions, Selection,
    ComputeOutcome,
};
pub use registry::FunctionRegistry;

// Used by the exported macros
pub use xsec_core::{DomainObject, Value, XsecError};
pub use xsec_units::Unit;

/// Re-export core types for Function authors
pub mod prelude {
    pub use crate::{
        Access, Attribute, AttributeInfo, Data, ParameterAttribute, ParamValue,
        Function, FunctionMeta, DropdownSpec, DropdownOptions, Selection, ComputeOutcome,
        FunctionRegistry,
    };
    pub use crate::{attributes, attributes_mut, domain_value};
    pub use xsec_core::prelude::*;
}
