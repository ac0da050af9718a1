//! Quantity types
//!
//! `Quantity` is a value expressed in an explicit unit, the form quantities
//! take at the host boundary. The typed newtypes (`Length`, `Force`, ...)
//! hold a value normalized to the SI home unit of their kind and are what
//! Functions compute with.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};
use crate::{QuantityKind, Unit};
use crate::unit::{
    AngleUnit, ConversionError, CurvatureUnit, ForceUnit, LengthUnit, MomentUnit, PressureUnit,
    StrainUnit,
};

/// A physical quantity: a numeric value with an associated unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quantity {
    /// The numeric value, expressed in `unit`
    pub value: f64,
    /// The unit of measurement
    pub unit: Unit,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(value: f64, unit: impl Into<Unit>) -> Self {
        Quantity { value, unit: unit.into() }
    }

    /// Create a quantity from a value already in SI home units
    pub fn from_si(value_si: f64, unit: impl Into<Unit>) -> Self {
        let unit = unit.into();
        Quantity { value: unit.from_si(value_si), unit }
    }

    /// Get the kind of this quantity
    pub fn kind(&self) -> QuantityKind {
        self.unit.kind()
    }

    /// Check if two quantities have compatible kinds
    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.unit.is_compatible(&other.unit)
    }

    /// Get the value in the SI home unit
    pub fn si_value(&self) -> f64 {
        self.unit.to_si(self.value)
    }

    /// Convert to the SI home unit of the kind
    pub fn to_si(&self) -> Quantity {
        Quantity::new(self.si_value(), Unit::si(self.kind()))
    }

    /// Convert to another unit
    pub fn convert_to(&self, target: impl Into<Unit>) -> Result<Quantity, ConversionError> {
        let target = target.into();
        let value = self.unit.convert_to(self.value, &target)?;
        Ok(Quantity::new(value, target))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Angle(AngleUnit::Degree) | Unit::Strain(StrainUnit::Percent) => {
                write!(f, "{}{}", self.value, self.unit)
            }
            _ => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        // Compare SI values for equality
        if !self.is_compatible(other) {
            return false;
        }
        self.si_value() == other.si_value()
    }
}

// ============================================================================
// Typed quantities (SI-normalized newtypes)
// ============================================================================

macro_rules! typed_quantity {
    ($(#[$meta:meta])* $name:ident, $unit:ty, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// The quantity kind of this type
            pub const KIND: QuantityKind = QuantityKind::$kind;

            /// Create from a value expressed in `unit`
            pub fn new(value: f64, unit: $unit) -> Self {
                Self(Unit::from(unit).to_si(value))
            }

            /// Create from a value already in SI home units
            pub fn from_si(value_si: f64) -> Self {
                Self(value_si)
            }

            /// Get the raw SI value
            pub fn si(self) -> f64 {
                self.0
            }

            /// Get the value expressed in `unit`
            pub fn as_unit(self, unit: $unit) -> f64 {
                Unit::from(unit).from_si(self.0)
            }

            /// Express as a host-side quantity in `unit`
            pub fn to_quantity(self, unit: $unit) -> Quantity {
                Quantity::from_si(self.0, unit)
            }

            /// Normalize a host-side quantity, rejecting other kinds
            pub fn from_quantity(quantity: &Quantity) -> Result<Self, ConversionError> {
                if quantity.kind() != Self::KIND {
                    let si = Unit::si(Self::KIND);
                    return Err(ConversionError::IncompatibleKinds {
                        from: quantity.unit.abbreviation().to_string(),
                        to: si.abbreviation().to_string(),
                        from_kind: quantity.kind(),
                        to_kind: Self::KIND,
                    });
                }
                Ok(Self(quantity.si_value()))
            }

            /// Absolute value
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }
    };
}

typed_quantity!(
    /// Length in metres
    Length, LengthUnit, Length
);
typed_quantity!(
    /// Angle in radians
    Angle, AngleUnit, Angle
);
typed_quantity!(
    /// Strain as a ratio
    Strain, StrainUnit, Strain
);
typed_quantity!(
    /// Curvature in per-metre
    Curvature, CurvatureUnit, Curvature
);
typed_quantity!(
    /// Pressure or stress in pascals
    Pressure, PressureUnit, Pressure
);
typed_quantity!(
    /// Force in newtons
    Force, ForceUnit, Force
);
typed_quantity!(
    /// Moment in newton metres
    Moment, MomentUnit, Moment
);

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_quantity_creation() {
        let q = Quantity::new(5.0, ForceUnit::Kilonewton);
        assert_eq!(q.value, 5.0);
        assert_eq!(q.kind(), QuantityKind::Force);
        assert_eq!(q.si_value(), 5000.0);
    }

    #[test]
    fn test_convert_to() {
        let q = Quantity::new(2500.0, LengthUnit::Millimeter);
        let converted = q.convert_to(LengthUnit::Meter).unwrap();
        assert!(close(converted.value, 2.5));
        assert!(q.convert_to(ForceUnit::Newton).is_err());
    }

    #[test]
    fn test_equality() {
        let q1 = Quantity::new(1.0, ForceUnit::Kilonewton);
        let q2 = Quantity::new(1000.0, ForceUnit::Newton);
        assert_eq!(q1, q2);
        assert_ne!(q1, Quantity::new(1000.0, MomentUnit::NewtonMeter));
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::new(5.0, ForceUnit::Kilonewton).to_string(), "5 kN");
        assert_eq!(Quantity::new(45.0, AngleUnit::Degree).to_string(), "45°");
    }

    #[test]
    fn test_typed_roundtrip() {
        let f = Force::new(1.0, ForceUnit::Kilonewton);
        assert_eq!(f.si(), 1000.0);
        assert!(close(f.as_unit(ForceUnit::Meganewton), 0.001));

        let q = f.to_quantity(ForceUnit::Newton);
        assert_eq!(q.value, 1000.0);
        assert_eq!(Force::from_quantity(&q).unwrap(), f);
    }

    #[test]
    fn test_typed_rejects_other_kind() {
        let moment = Quantity::new(1.0, MomentUnit::KilonewtonMeter);
        assert!(Force::from_quantity(&moment).is_err());
        assert!(Moment::from_quantity(&moment).is_ok());
    }

    #[test]
    fn test_arithmetic() {
        let a = Length::new(10.0, LengthUnit::Meter);
        let b = Length::new(500.0, LengthUnit::Millimeter);
        assert!(close((a + b).si(), 10.5));
        assert!(close((a - b).si(), 9.5));
        assert_eq!((a * 2.0).si(), 20.0);
        assert_eq!((a / 2.0).si(), 5.0);
        assert_eq!((-a).abs(), a);
    }

    #[test]
    fn test_serialization() {
        let s = Strain::from_si(0.0035);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "0.0035");
    }
}
