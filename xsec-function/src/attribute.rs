//! Attribute model
//!
//! An attribute is one typed parameter slot of a Function: identity
//! (name, nick name, description), multiplicity, optionality, the current
//! payload and the listeners that observe it. Functions expose their
//! attributes as ordered arrays; the array position is the host slot index.

use std::fmt;
use serde::{Deserialize, Serialize};
use xsec_core::{codes, Value, XsecError};
use xsec_units::{name_with_units, QuantityKind, Unit};
use crate::ParamValue;

/// How many values a slot carries per compute cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Item,
    List,
    Tree,
}

/// Immutable identity of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeInfo {
    name: &'static str,
    nick_name: &'static str,
    description: &'static str,
    access: Access,
    optional: bool,
}

impl AttributeInfo {
    pub const fn item(name: &'static str, nick_name: &'static str, description: &'static str) -> Self {
        Self { name, nick_name, description, access: Access::Item, optional: false }
    }

    pub const fn list(name: &'static str, nick_name: &'static str, description: &'static str) -> Self {
        Self { name, nick_name, description, access: Access::List, optional: false }
    }

    pub const fn tree(name: &'static str, nick_name: &'static str, description: &'static str) -> Self {
        Self { name, nick_name, description, access: Access::Tree, optional: false }
    }

    /// Builder: the host may leave this slot unconnected
    pub const fn optional(self) -> Self {
        Self { optional: true, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn nick_name(&self) -> &'static str {
        self.nick_name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Typed payload of an attribute, shaped by its access
#[derive(Debug, Clone, PartialEq)]
pub enum Data<T> {
    Item(T),
    List(Vec<T>),
    Tree(Vec<Vec<T>>),
}

impl<T> Data<T> {
    pub fn access(&self) -> Access {
        match self {
            Data::Item(_) => Access::Item,
            Data::List(_) => Access::List,
            Data::Tree(_) => Access::Tree,
        }
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            Data::Item(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[T]> {
        match self {
            Data::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&[Vec<T>]> {
        match self {
            Data::Tree(v) => Some(v),
            _ => None,
        }
    }

    /// Total number of leaf values
    pub fn len(&self) -> usize {
        match self {
            Data::Item(_) => 1,
            Data::List(v) => v.len(),
            Data::Tree(v) => v.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Type-erased view of a parameter slot, used by the adapter
pub trait Attribute {
    fn info(&self) -> &AttributeInfo;

    /// Semantic type name ("Force", "Section", ...)
    fn type_name(&self) -> &'static str;

    /// Quantity kind for unit-bearing attributes
    fn quantity_kind(&self) -> Option<QuantityKind>;

    /// Active display unit; `None` for attributes without a unit
    fn unit(&self) -> Option<Unit>;

    /// Change the display unit. The stored value is unaffected.
    fn set_unit(&mut self, unit: Unit) -> Result<(), XsecError>;

    fn is_set(&self) -> bool;

    /// Drop the current value, notifying listeners if one was present
    fn clear(&mut self);

    /// Convert a host value and store it. Returns whether the stored value changed.
    fn assign(&mut self, value: &Value) -> Result<bool, XsecError>;

    /// Host value of the current payload, in the display unit
    fn emit(&self) -> Result<Option<Value>, XsecError>;

    /// Register a listener fired on every value change
    fn subscribe(&mut self, listener: Box<dyn FnMut()>);

    fn name(&self) -> &'static str {
        self.info().name()
    }

    fn nick_name(&self) -> &'static str {
        self.info().nick_name()
    }

    /// Name shown on the host slot, with the unit suffix when there is one
    fn display_name(&self) -> String {
        match self.unit() {
            Some(unit) => name_with_units(self.name(), unit),
            None => self.name().to_string(),
        }
    }
}

type Listener<T> = Box<dyn FnMut(Option<&Data<T>>)>;

/// A parameter slot holding values of type `T`
pub struct ParameterAttribute<T: ParamValue> {
    info: AttributeInfo,
    value: Option<Data<T>>,
    unit: Option<Unit>,
    listeners: Vec<Listener<T>>,
}

impl<T: ParamValue> ParameterAttribute<T> {
    /// New unset attribute. Quantities start in their SI home unit.
    pub fn new(info: AttributeInfo) -> Self {
        Self {
            info,
            value: None,
            unit: T::KIND.map(Unit::si),
            listeners: Vec::new(),
        }
    }

    /// Builder: initial display unit; units of another kind are ignored
    pub fn with_unit(mut self, unit: impl Into<Unit>) -> Self {
        let unit = unit.into();
        if T::KIND == Some(unit.kind()) {
            self.unit = Some(unit);
        }
        self
    }

    pub fn value(&self) -> Option<&Data<T>> {
        self.value.as_ref()
    }

    pub fn item(&self) -> Option<&T> {
        self.value.as_ref().and_then(Data::as_item)
    }

    pub fn list(&self) -> Option<&[T]> {
        self.value.as_ref().and_then(Data::as_list)
    }

    pub fn tree(&self) -> Option<&[Vec<T>]> {
        self.value.as_ref().and_then(Data::as_tree)
    }

    /// Replace the payload and fire every listener in registration order
    pub fn set_value(&mut self, data: Data<T>) {
        self.value = Some(data);
        self.notify();
    }

    pub fn set_item(&mut self, value: T) {
        self.set_value(Data::Item(value));
    }

    pub fn set_list(&mut self, values: Vec<T>) {
        self.set_value(Data::List(values));
    }

    pub fn set_tree(&mut self, branches: Vec<Vec<T>>) {
        self.set_value(Data::Tree(branches));
    }

    /// Register a typed listener
    pub fn on_change(&mut self, listener: impl FnMut(Option<&Data<T>>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        let value = self.value.as_ref();
        for listener in self.listeners.iter_mut() {
            listener(value);
        }
    }

    fn expected(&self) -> &'static str {
        match T::KIND {
            Some(kind) => kind.name(),
            None => T::TYPE_NAME,
        }
    }

    fn decode_one(&self, value: &Value) -> Result<T, XsecError> {
        T::from_value(value, self.unit).map_err(|e| {
            XsecError::input_parse(self.info.nick_name, self.expected(), &value.type_name())
                .with_note(e.message)
        })
    }

    fn decode_list(&self, items: &[Value]) -> Result<Vec<T>, XsecError> {
        items.iter().map(|v| self.decode_one(v)).collect()
    }

    fn decode(&self, value: &Value) -> Result<Data<T>, XsecError> {
        match self.info.access {
            Access::Item => match value {
                Value::List(items) if items.len() == 1 => Ok(Data::Item(self.decode_one(&items[0])?)),
                Value::List(items) => Err(XsecError::access_error(
                    self.info.nick_name,
                    format!("expects a single item, got a list of {}", items.len()),
                )),
                other => Ok(Data::Item(self.decode_one(other)?)),
            },
            Access::List => match value {
                Value::List(items) => Ok(Data::List(self.decode_list(items)?)),
                // A lone value is a one-element list
                other => Ok(Data::List(vec![self.decode_one(other)?])),
            },
            Access::Tree => match value {
                Value::List(branches) if branches.iter().all(Value::is_list) => {
                    let mut tree = Vec::with_capacity(branches.len());
                    for branch in branches {
                        tree.push(self.decode_list(branch.as_list().unwrap_or_default())?);
                    }
                    Ok(Data::Tree(tree))
                }
                Value::List(items) => Ok(Data::Tree(vec![self.decode_list(items)?])),
                other => Ok(Data::Tree(vec![vec![self.decode_one(other)?]])),
            },
        }
    }
}

impl<T: ParamValue> Attribute for ParameterAttribute<T> {
    fn info(&self) -> &AttributeInfo {
        &self.info
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn quantity_kind(&self) -> Option<QuantityKind> {
        T::KIND
    }

    fn unit(&self) -> Option<Unit> {
        self.unit
    }

    fn set_unit(&mut self, unit: Unit) -> Result<(), XsecError> {
        match T::KIND {
            Some(kind) if kind == unit.kind() => {
                self.unit = Some(unit);
                Ok(())
            }
            Some(kind) => Err(XsecError::unit_mismatch(kind, unit.kind()).for_parameter(self.info.nick_name)),
            None => Err(XsecError::new(
                codes::UNIT_ERROR,
                format!("Parameter {} does not carry a unit", self.info.nick_name),
            )
            .for_parameter(self.info.nick_name)),
        }
    }

    fn is_set(&self) -> bool {
        self.value.is_some()
    }

    fn clear(&mut self) {
        if self.value.take().is_some() {
            self.notify();
        }
    }

    fn assign(&mut self, value: &Value) -> Result<bool, XsecError> {
        let data = self.decode(value)?;
        if self.value.as_ref() == Some(&data) {
            return Ok(false);
        }
        self.set_value(data);
        Ok(true)
    }

    fn emit(&self) -> Result<Option<Value>, XsecError> {
        let Some(data) = &self.value else {
            return Ok(None);
        };
        let unit = self.unit;
        let encode_all = |items: &[T]| -> Result<Value, XsecError> {
            items.iter().map(|v| v.to_value(unit)).collect::<Result<Vec<_>, _>>().map(Value::List)
        };
        let value = match data {
            Data::Item(v) => v.to_value(unit)?,
            Data::List(items) => encode_all(items)?,
            Data::Tree(branches) => Value::List(
                branches.iter().map(|b| encode_all(b)).collect::<Result<Vec<_>, _>>()?,
            ),
        };
        Ok(Some(value))
    }

    fn subscribe(&mut self, mut listener: Box<dyn FnMut()>) {
        self.listeners.push(Box::new(move |_| listener()));
    }
}

impl<T: ParamValue> fmt::Debug for ParameterAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterAttribute")
            .field("info", &self.info)
            .field("value", &self.value)
            .field("unit", &self.unit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use xsec_units::{Force, ForceUnit, Length, LengthUnit, Moment, MomentUnit, Quantity};

    fn force() -> ParameterAttribute<Force> {
        ParameterAttribute::new(AttributeInfo::item("Axial Force", "Fx", "Axial force"))
    }

    #[test]
    fn test_starts_unset_in_si() {
        let attr = force();
        assert!(!attr.is_set());
        assert!(attr.item().is_none());
        assert_eq!(attr.unit(), Some(Unit::Force(ForceUnit::Newton)));
        assert_eq!(attr.display_name(), "Axial Force [N]");
    }

    #[test]
    fn test_listeners_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut attr = force();
        let first = log.clone();
        attr.on_change(move |v| first.borrow_mut().push(("first", v.is_some())));
        let second = log.clone();
        attr.on_change(move |v| second.borrow_mut().push(("second", v.is_some())));

        attr.set_item(Force::new(1.0, ForceUnit::Kilonewton));
        attr.clear();
        assert_eq!(
            *log.borrow(),
            [("first", true), ("second", true), ("first", false), ("second", false)]
        );
    }

    #[test]
    fn test_clear_unset_does_not_notify() {
        let count = Rc::new(RefCell::new(0));
        let mut attr = force();
        let c = count.clone();
        attr.subscribe(Box::new(move || *c.borrow_mut() += 1));
        attr.clear();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_number_uses_display_unit() {
        let mut attr = force().with_unit(ForceUnit::Kilonewton);
        assert!(attr.assign(&Value::Number(2.0)).unwrap());
        assert_eq!(attr.item(), Some(&Force::from_si(2000.0)));
        // Same value again is not a change
        assert!(!attr.assign(&Value::Number(2.0)).unwrap());
    }

    #[test]
    fn test_quantity_uses_its_own_unit() {
        let mut attr = force().with_unit(ForceUnit::Kilonewton);
        attr.assign(&Value::Quantity(Quantity::new(500.0, ForceUnit::Newton))).unwrap();
        assert_eq!(attr.item().map(|f| f.si()), Some(500.0));
    }

    #[test]
    fn test_wrong_kind_is_parse_error() {
        let mut attr = force();
        let err = attr
            .assign(&Value::Quantity(Quantity::new(1.0, MomentUnit::KilonewtonMeter)))
            .unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.message.starts_with("Could not parse the input Fx"));
        assert!(!attr.is_set());
    }

    #[test]
    fn test_text_input() {
        let mut attr = force().with_unit(ForceUnit::Kilonewton);
        attr.assign(&Value::from("3 MN")).unwrap();
        assert_eq!(attr.item().map(|f| f.si()), Some(3.0e6));
        attr.assign(&Value::from("4")).unwrap();
        assert_eq!(attr.item().map(|f| f.si()), Some(4000.0));
    }

    #[test]
    fn test_unit_switch_keeps_value() {
        let mut attr: ParameterAttribute<Length> =
            ParameterAttribute::new(AttributeInfo::item("Depth", "D", "Section depth"));
        attr.set_item(Length::new(500.0, LengthUnit::Millimeter));
        attr.set_unit(Unit::Length(LengthUnit::Meter)).unwrap();
        assert_eq!(attr.item(), Some(&Length::from_si(0.5)));
        assert_eq!(attr.display_name(), "Depth [m]");
        let emitted = attr.emit().unwrap().unwrap();
        assert_eq!(emitted, Value::Quantity(Quantity::new(0.5, LengthUnit::Meter)));
        assert_eq!(emitted.as_quantity().map(|q| q.value), Some(0.5));
    }

    #[test]
    fn test_set_unit_rejects_other_kind() {
        let mut attr = force();
        assert!(attr.set_unit(Unit::Moment(MomentUnit::NewtonMeter)).is_err());
        assert_eq!(attr.unit(), Some(Unit::Force(ForceUnit::Newton)));

        let mut plain: ParameterAttribute<f64> =
            ParameterAttribute::new(AttributeInfo::item("Factor", "k", "Scale factor"));
        assert!(plain.set_unit(Unit::Force(ForceUnit::Newton)).is_err());
        assert_eq!(plain.display_name(), "Factor");
    }

    #[test]
    fn test_list_access_wraps_single_value() {
        let mut attr: ParameterAttribute<Moment> =
            ParameterAttribute::new(AttributeInfo::list("Moments", "M", "Moments"));
        attr.assign(&Value::Number(1.0)).unwrap();
        assert_eq!(attr.list().map(<[_]>::len), Some(1));

        attr.assign(&Value::List(vec![Value::Number(1.0), Value::Number(2.0)])).unwrap();
        assert_eq!(attr.list(), Some(&[Moment::from_si(1.0), Moment::from_si(2.0)][..]));
    }

    #[test]
    fn test_item_access_rejects_long_list() {
        let mut attr = force();
        assert!(attr.assign(&Value::List(vec![Value::Number(1.0)])).is_ok());
        let err = attr
            .assign(&Value::List(vec![Value::Number(1.0), Value::Number(2.0)]))
            .unwrap_err();
        assert_eq!(err.code, codes::ACCESS_ERROR);
    }

    #[test]
    fn test_tree_access() {
        let mut attr: ParameterAttribute<f64> =
            ParameterAttribute::new(AttributeInfo::tree("Values", "V", "Nested values"));
        let nested = Value::List(vec![
            Value::List(vec![Value::Number(1.0), Value::Number(2.0)]),
            Value::List(vec![Value::Number(3.0)]),
        ]);
        attr.assign(&nested).unwrap();
        assert_eq!(attr.tree(), Some(&[vec![1.0, 2.0], vec![3.0]][..]));
        assert_eq!(attr.value().map(Data::len), Some(3));
        assert_eq!(attr.emit().unwrap(), Some(nested));

        attr.assign(&Value::List(vec![Value::Number(4.0)])).unwrap();
        assert_eq!(attr.tree(), Some(&[vec![4.0]][..]));
    }

    #[test]
    fn test_optional_info() {
        let info = AttributeInfo::item("Moment", "My", "Bending moment").optional();
        assert!(info.is_optional());
        assert_eq!(info.access(), Access::Item);
        assert_eq!(info.nick_name(), "My");
    }
}
