//! Parameter value types
//!
//! `ParamValue` is the conversion between one host `Value` and one typed
//! payload element. Quantities are normalized to SI on the way in and
//! expressed in the attribute's display unit on the way out.

use std::fmt;
use xsec_core::{Point, Value, XsecError};
use xsec_units::{
    parse_quantity_of, Angle, Curvature, Force, Length, Moment, Pressure, Quantity, QuantityKind,
    Strain, Unit,
};

/// A type that can sit inside a `ParameterAttribute`
pub trait ParamValue: Clone + PartialEq + fmt::Debug + 'static {
    /// Name used in messages and listings
    const TYPE_NAME: &'static str;

    /// Quantity kind; `None` for unitless types
    const KIND: Option<QuantityKind> = None;

    /// Convert a host value; `unit` is the attribute's display unit
    fn from_value(value: &Value, unit: Option<Unit>) -> Result<Self, XsecError>;

    /// Convert to a host value in `unit`
    fn to_value(&self, unit: Option<Unit>) -> Result<Value, XsecError>;
}

// ============================================================================
// Quantities
// ============================================================================

macro_rules! quantity_param {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl ParamValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                const KIND: Option<QuantityKind> = Some($ty::KIND);

                fn from_value(value: &Value, unit: Option<Unit>) -> Result<Self, XsecError> {
                    let unit = unit.unwrap_or(Unit::si($ty::KIND));
                    match value {
                        // Tagged quantities carry their own unit
                        Value::Quantity(q) => Ok($ty::from_quantity(q)?),
                        Value::Text(s) => {
                            let q = parse_quantity_of($ty::KIND, s, unit)?;
                            Ok($ty::from_quantity(&q)?)
                        }
                        other => match other.as_number() {
                            Some(n) => Ok($ty::from_si(unit.to_si(n))),
                            None => Err(XsecError::type_error($ty::KIND.name(), &other.type_name())),
                        },
                    }
                }

                fn to_value(&self, unit: Option<Unit>) -> Result<Value, XsecError> {
                    let unit = unit.unwrap_or(Unit::si($ty::KIND));
                    Ok(Value::Quantity(Quantity::from_si(self.si(), unit)))
                }
            }
        )+
    };
}

quantity_param!(Length, Angle, Strain, Curvature, Pressure, Force, Moment);

// ============================================================================
// Plain values
// ============================================================================

impl ParamValue for f64 {
    const TYPE_NAME: &'static str = "Number";

    fn from_value(value: &Value, _unit: Option<Unit>) -> Result<Self, XsecError> {
        match value {
            Value::Text(s) => s.trim().parse().map_err(|_| XsecError::type_error("Number", &format!("'{}'", s))),
            other => other.as_number().ok_or_else(|| XsecError::type_error("Number", &other.type_name())),
        }
    }

    fn to_value(&self, _unit: Option<Unit>) -> Result<Value, XsecError> {
        Ok(Value::Number(*self))
    }
}

impl ParamValue for i64 {
    const TYPE_NAME: &'static str = "Integer";

    fn from_value(value: &Value, _unit: Option<Unit>) -> Result<Self, XsecError> {
        match value {
            Value::Text(s) => s.trim().parse().map_err(|_| XsecError::type_error("Integer", &format!("'{}'", s))),
            other => other.as_integer().ok_or_else(|| XsecError::type_error("Integer", &other.type_name())),
        }
    }

    fn to_value(&self, _unit: Option<Unit>) -> Result<Value, XsecError> {
        Ok(Value::Integer(*self))
    }
}

impl ParamValue for bool {
    const TYPE_NAME: &'static str = "Bool";

    fn from_value(value: &Value, _unit: Option<Unit>) -> Result<Self, XsecError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(XsecError::type_error("Bool", &other.type_name())),
        }
    }

    fn to_value(&self, _unit: Option<Unit>) -> Result<Value, XsecError> {
        Ok(Value::Bool(*self))
    }
}

impl ParamValue for String {
    const TYPE_NAME: &'static str = "Text";

    fn from_value(value: &Value, _unit: Option<Unit>) -> Result<Self, XsecError> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Number(_) | Value::Integer(_) | Value::Bool(_) | Value::Quantity(_) => Ok(value.to_string()),
            other => Err(XsecError::type_error("Text", &other.type_name())),
        }
    }

    fn to_value(&self, _unit: Option<Unit>) -> Result<Value, XsecError> {
        Ok(Value::Text(self.clone()))
    }
}

impl ParamValue for Point {
    const TYPE_NAME: &'static str = "Point";

    fn from_value(value: &Value, _unit: Option<Unit>) -> Result<Self, XsecError> {
        value.as_point().copied().ok_or_else(|| XsecError::type_error("Point", &value.type_name()))
    }

    fn to_value(&self, _unit: Option<Unit>) -> Result<Value, XsecError> {
        Ok(Value::Point(*self))
    }
}

// ============================================================================
// Domain objects
// ============================================================================

/// Implement `ParamValue` for a serde domain type carried as a `Value::Object`
#[macro_export]
macro_rules! domain_value {
    ($ty:ty, $name:expr) => {
        impl $crate::ParamValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_value(
                value: &$crate::Value,
                _unit: ::std::option::Option<$crate::Unit>,
            ) -> ::std::result::Result<Self, $crate::XsecError> {
                match value {
                    $crate::Value::Object(obj) => obj.unwrap_as($name),
                    other => Err($crate::XsecError::type_error($name, &other.type_name())),
                }
            }

            fn to_value(
                &self,
                _unit: ::std::option::Option<$crate::Unit>,
            ) -> ::std::result::Result<$crate::Value, $crate::XsecError> {
                $crate::DomainObject::wrap($name, self).map($crate::Value::Object)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use xsec_units::{ForceUnit, StrainUnit};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        depth: f64,
    }

    domain_value!(Sample, "Sample");

    #[test]
    fn test_quantity_from_number() {
        let f = Force::from_value(&Value::Number(5.0), Some(Unit::Force(ForceUnit::Kilonewton))).unwrap();
        assert_eq!(f.si(), 5000.0);
        let f = Force::from_value(&Value::Integer(5), None).unwrap();
        assert_eq!(f.si(), 5.0);
    }

    #[test]
    fn test_quantity_rejects_other_kind() {
        let q = Value::Quantity(Quantity::new(1.0, StrainUnit::Percent));
        let err = Force::from_value(&q, None).unwrap_err();
        assert_eq!(err.message, "Expected force, got strain");
        assert!(Force::from_value(&Value::Bool(true), None).is_err());
    }

    #[test]
    fn test_quantity_to_value_in_unit() {
        let s = Strain::from_si(0.0035);
        let v = s.to_value(Some(Unit::Strain(StrainUnit::Percent))).unwrap();
        let q = v.as_quantity().copied().unwrap();
        assert_eq!(q.unit, Unit::Strain(StrainUnit::Percent));
        assert!((q.value - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_plain_values() {
        assert_eq!(f64::from_value(&Value::from(" 2.5 "), None).unwrap(), 2.5);
        assert_eq!(i64::from_value(&Value::Number(3.0), None).unwrap(), 3);
        assert!(i64::from_value(&Value::Number(3.5), None).is_err());
        assert!(bool::from_value(&Value::from("TRUE"), None).unwrap());
        assert_eq!(String::from_value(&Value::Integer(7), None).unwrap(), "7");
        let p = Point::new(1.0, 2.0, 0.0);
        assert_eq!(Point::from_value(&Value::Point(p), None).unwrap(), p);
    }

    #[test]
    fn test_domain_value() {
        let sample = Sample { depth: 0.4 };
        let v = sample.to_value(None).unwrap();
        assert_eq!(v.type_name(), "Sample");
        assert_eq!(Sample::from_value(&v, None).unwrap(), sample);
        assert!(Sample::from_value(&Value::Number(1.0), None).is_err());
    }
}
