//! xsec Core - Fundamental types
//!
//! This crate provides the core types used throughout xsec:
//! - `Value`: Host-side slot values (numbers, quantities, objects, lists)
//! - `XsecError`: Structured errors surfaced as component messages
//! - `Messages`: Error/Warning/Remark collections

mod value;
mod error;
mod message;

pub use value::{Value, Point, DomainObject};
pub use error::{XsecError, Severity, codes};
pub use message::{Messages, MessageLevel};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, Point, DomainObject, XsecError, Severity, Messages, MessageLevel};
    pub use crate::error::codes;
    pub use xsec_units::{
        Quantity, QuantityKind, Unit, UnitDefaults,
        Length, Angle, Strain, Curvature, Pressure, Force, Moment,
        LengthUnit, AngleUnit, StrainUnit, CurvatureUnit, PressureUnit, ForceUnit, MomentUnit,
    };
}
