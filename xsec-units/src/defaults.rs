//! Default display units
//!
//! Passed explicitly into adapters so the unit a freshly created component
//! starts in never depends on ambient global state.

use serde::{Serialize, Deserialize};
use crate::{QuantityKind, Unit};
use crate::unit::{
    AngleUnit, ConversionError, CurvatureUnit, ForceUnit, LengthUnit, MomentUnit, PressureUnit,
    StrainUnit,
};

/// Default display unit per quantity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitDefaults {
    pub length: LengthUnit,
    pub angle: AngleUnit,
    pub strain: StrainUnit,
    pub curvature: CurvatureUnit,
    pub pressure: PressureUnit,
    pub force: ForceUnit,
    pub moment: MomentUnit,
}

impl UnitDefaults {
    /// Pure SI home units for every kind
    pub fn si() -> Self {
        Self {
            length: LengthUnit::Meter,
            angle: AngleUnit::Radian,
            strain: StrainUnit::Ratio,
            curvature: CurvatureUnit::PerMeter,
            pressure: PressureUnit::Pascal,
            force: ForceUnit::Newton,
            moment: MomentUnit::NewtonMeter,
        }
    }

    /// Default unit for a kind
    pub fn unit_for(&self, kind: QuantityKind) -> Unit {
        match kind {
            QuantityKind::Length => self.length.into(),
            QuantityKind::Angle => self.angle.into(),
            QuantityKind::Strain => self.strain.into(),
            QuantityKind::Curvature => self.curvature.into(),
            QuantityKind::Pressure => self.pressure.into(),
            QuantityKind::Force => self.force.into(),
            QuantityKind::Moment => self.moment.into(),
        }
    }

    /// Builder: replace the default for the unit's kind
    pub fn with_unit(mut self, unit: impl Into<Unit>) -> Self {
        match unit.into() {
            Unit::Length(u) => self.length = u,
            Unit::Angle(u) => self.angle = u,
            Unit::Strain(u) => self.strain = u,
            Unit::Curvature(u) => self.curvature = u,
            Unit::Pressure(u) => self.pressure = u,
            Unit::Force(u) => self.force = u,
            Unit::Moment(u) => self.moment = u,
        }
        self
    }

    /// Builder: replace the default for `kind` from a unit string
    pub fn with_unit_str(self, kind: QuantityKind, s: &str) -> Result<Self, ConversionError> {
        let unit = crate::parse_unit_of(kind, s)?;
        Ok(self.with_unit(unit))
    }
}

impl Default for UnitDefaults {
    fn default() -> Self {
        Self {
            length: LengthUnit::Millimeter,
            angle: AngleUnit::Radian,
            strain: StrainUnit::Ratio,
            curvature: CurvatureUnit::PerMillimeter,
            pressure: PressureUnit::Megapascal,
            force: ForceUnit::Kilonewton,
            moment: MomentUnit::KilonewtonMeter,
        }
    }
}
