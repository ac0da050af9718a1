//! Unit enums with abbreviations and SI conversion factors
//!
//! Each quantity kind has a closed set of units. `Unit` is the tagged union
//! over all of them, so a selection can always be resolved back to its kind
//! without string lookups.

use std::f64::consts::PI;
use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::QuantityKind;

/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Units belong to different quantity kinds
    #[error("cannot convert {from} ({from_kind}) to {to} ({to_kind}): incompatible quantities")]
    IncompatibleKinds {
        from: String,
        to: String,
        from_kind: QuantityKind,
        to_kind: QuantityKind,
    },

    /// Unknown unit symbol
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// Numeric part of a quantity string did not parse
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

macro_rules! unit_enum {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($abbr:expr, $ascii:expr, $factor:expr) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every unit of this kind, in dropdown order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Display symbol
            pub fn abbreviation(&self) -> &'static str {
                match self { $($name::$variant => $abbr),+ }
            }

            /// Plain-ASCII spelling accepted by the parser
            pub fn ascii(&self) -> &'static str {
                match self { $($name::$variant => $ascii),+ }
            }

            /// Multiply by this to get the SI home unit
            pub fn to_si_factor(&self) -> f64 {
                match self { $($name::$variant => $factor),+ }
            }

            /// Enum variant name, used when persisting selections
            pub fn variant_name(&self) -> &'static str {
                match self { $($name::$variant => stringify!($variant)),+ }
            }
        }

        impl From<$name> for Unit {
            fn from(unit: $name) -> Self {
                Unit::$kind(unit)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.abbreviation())
            }
        }
    };
}

unit_enum! {
    /// Length units (home unit: metre)
    LengthUnit => Length {
        Millimeter => ("mm", "mm", 0.001),
        Centimeter => ("cm", "cm", 0.01),
        Meter => ("m", "m", 1.0),
        Inch => ("in", "in", 0.0254),
        Foot => ("ft", "ft", 0.3048),
    }
}

unit_enum! {
    /// Angle units (home unit: radian)
    AngleUnit => Angle {
        Radian => ("rad", "rad", 1.0),
        Degree => ("°", "deg", PI / 180.0),
    }
}

unit_enum! {
    /// Strain units (home unit: ratio)
    StrainUnit => Strain {
        Ratio => ("ε", "ratio", 1.0),
        Percent => ("%", "percent", 0.01),
        MilliStrain => ("mε", "me", 0.001),
        MicroStrain => ("µε", "ue", 0.000_001),
    }
}

unit_enum! {
    /// Curvature units (home unit: per metre)
    CurvatureUnit => Curvature {
        PerMillimeter => ("mm⁻¹", "1/mm", 1000.0),
        PerCentimeter => ("cm⁻¹", "1/cm", 100.0),
        PerMeter => ("m⁻¹", "1/m", 1.0),
        PerInch => ("in⁻¹", "1/in", 1.0 / 0.0254),
        PerFoot => ("ft⁻¹", "1/ft", 1.0 / 0.3048),
    }
}

unit_enum! {
    /// Pressure and stress units (home unit: pascal)
    PressureUnit => Pressure {
        Pascal => ("Pa", "Pa", 1.0),
        Kilopascal => ("kPa", "kPa", 1.0e3),
        Megapascal => ("MPa", "MPa", 1.0e6),
        Gigapascal => ("GPa", "GPa", 1.0e9),
        NewtonPerSquareMillimeter => ("N/mm²", "N/mm2", 1.0e6),
        PoundForcePerSquareInch => ("psi", "psi", 6_894.757_293_168_361),
        KilopoundForcePerSquareInch => ("ksi", "ksi", 6_894_757.293_168_361),
    }
}

unit_enum! {
    /// Force units (home unit: newton)
    ForceUnit => Force {
        Newton => ("N", "N", 1.0),
        Kilonewton => ("kN", "kN", 1.0e3),
        Meganewton => ("MN", "MN", 1.0e6),
        PoundForce => ("lbf", "lbf", 4.448_221_615_260_5),
        KilopoundForce => ("kipf", "kipf", 4_448.221_615_260_5),
    }
}

unit_enum! {
    /// Moment units (home unit: newton metre)
    MomentUnit => Moment {
        NewtonMeter => ("N·m", "N*m", 1.0),
        KilonewtonMeter => ("kN·m", "kN*m", 1.0e3),
        MeganewtonMeter => ("MN·m", "MN*m", 1.0e6),
        PoundForceInch => ("lbf·in", "lbf*in", 0.112_984_829_027_616_7),
        PoundForceFoot => ("lbf·ft", "lbf*ft", 1.355_817_948_331_400_4),
        KilopoundForceInch => ("kipf·in", "kipf*in", 112.984_829_027_616_7),
        KilopoundForceFoot => ("kipf·ft", "kipf*ft", 1_355.817_948_331_400_4),
    }
}

/// A unit of any supported kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "unit", rename_all = "lowercase")]
pub enum Unit {
    Length(LengthUnit),
    Angle(AngleUnit),
    Strain(StrainUnit),
    Curvature(CurvatureUnit),
    Pressure(PressureUnit),
    Force(ForceUnit),
    Moment(MomentUnit),
}

impl Unit {
    /// The quantity kind this unit measures
    pub fn kind(&self) -> QuantityKind {
        match self {
            Unit::Length(_) => QuantityKind::Length,
            Unit::Angle(_) => QuantityKind::Angle,
            Unit::Strain(_) => QuantityKind::Strain,
            Unit::Curvature(_) => QuantityKind::Curvature,
            Unit::Pressure(_) => QuantityKind::Pressure,
            Unit::Force(_) => QuantityKind::Force,
            Unit::Moment(_) => QuantityKind::Moment,
        }
    }

    /// Short display symbol, e.g. "kN" or "m⁻¹"
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Unit::Length(u) => u.abbreviation(),
            Unit::Angle(u) => u.abbreviation(),
            Unit::Strain(u) => u.abbreviation(),
            Unit::Curvature(u) => u.abbreviation(),
            Unit::Pressure(u) => u.abbreviation(),
            Unit::Force(u) => u.abbreviation(),
            Unit::Moment(u) => u.abbreviation(),
        }
    }

    /// ASCII spelling of the abbreviation
    pub fn ascii(&self) -> &'static str {
        match self {
            Unit::Length(u) => u.ascii(),
            Unit::Angle(u) => u.ascii(),
            Unit::Strain(u) => u.ascii(),
            Unit::Curvature(u) => u.ascii(),
            Unit::Pressure(u) => u.ascii(),
            Unit::Force(u) => u.ascii(),
            Unit::Moment(u) => u.ascii(),
        }
    }

    /// Enum variant name, e.g. "Kilonewton"
    pub fn variant_name(&self) -> &'static str {
        match self {
            Unit::Length(u) => u.variant_name(),
            Unit::Angle(u) => u.variant_name(),
            Unit::Strain(u) => u.variant_name(),
            Unit::Curvature(u) => u.variant_name(),
            Unit::Pressure(u) => u.variant_name(),
            Unit::Force(u) => u.variant_name(),
            Unit::Moment(u) => u.variant_name(),
        }
    }

    /// Factor to the SI home unit of the kind (value_si = value * factor)
    pub fn to_si_factor(&self) -> f64 {
        match self {
            Unit::Length(u) => u.to_si_factor(),
            Unit::Angle(u) => u.to_si_factor(),
            Unit::Strain(u) => u.to_si_factor(),
            Unit::Curvature(u) => u.to_si_factor(),
            Unit::Pressure(u) => u.to_si_factor(),
            Unit::Force(u) => u.to_si_factor(),
            Unit::Moment(u) => u.to_si_factor(),
        }
    }

    /// Selectable units of a kind, in dropdown order
    pub fn all(kind: QuantityKind) -> Vec<Unit> {
        match kind {
            QuantityKind::Length => LengthUnit::ALL.iter().map(|&u| u.into()).collect(),
            QuantityKind::Angle => AngleUnit::ALL.iter().map(|&u| u.into()).collect(),
            QuantityKind::Strain => StrainUnit::ALL.iter().map(|&u| u.into()).collect(),
            QuantityKind::Curvature => CurvatureUnit::ALL.iter().map(|&u| u.into()).collect(),
            QuantityKind::Pressure => PressureUnit::ALL.iter().map(|&u| u.into()).collect(),
            QuantityKind::Force => ForceUnit::ALL.iter().map(|&u| u.into()).collect(),
            QuantityKind::Moment => MomentUnit::ALL.iter().map(|&u| u.into()).collect(),
        }
    }

    /// The SI home unit of a kind
    pub fn si(kind: QuantityKind) -> Unit {
        match kind {
            QuantityKind::Length => LengthUnit::Meter.into(),
            QuantityKind::Angle => AngleUnit::Radian.into(),
            QuantityKind::Strain => StrainUnit::Ratio.into(),
            QuantityKind::Curvature => CurvatureUnit::PerMeter.into(),
            QuantityKind::Pressure => PressureUnit::Pascal.into(),
            QuantityKind::Force => ForceUnit::Newton.into(),
            QuantityKind::Moment => MomentUnit::NewtonMeter.into(),
        }
    }

    /// Check if this is the SI home unit of its kind
    pub fn is_si(&self) -> bool {
        *self == Unit::si(self.kind())
    }

    /// Check if two units measure the same kind (can be converted)
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.kind() == other.kind()
    }

    /// Convert a value from this unit to the SI home unit
    pub fn to_si(&self, value: f64) -> f64 {
        value * self.to_si_factor()
    }

    /// Convert a value from the SI home unit to this unit
    pub fn from_si(&self, value_si: f64) -> f64 {
        value_si / self.to_si_factor()
    }

    /// Convert a value from this unit to another unit of the same kind
    pub fn convert_to(&self, value: f64, target: &Unit) -> Result<f64, ConversionError> {
        if !self.is_compatible(target) {
            return Err(ConversionError::IncompatibleKinds {
                from: self.abbreviation().to_string(),
                to: target.abbreviation().to_string(),
                from_kind: self.kind(),
                to_kind: target.kind(),
            });
        }
        Ok(target.from_si(self.to_si(value)))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}
