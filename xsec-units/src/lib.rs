//! xsec Units - Quantity kinds, units and conversion
//!
//! Provides the closed set of units a section parameter can be displayed in,
//! SI-normalized quantity newtypes, and unit-aware display names.
//!
//! Kinds:
//! - Length (mm, cm, m, in, ft)
//! - Angle (rad, °)
//! - Strain (ε, %, mε, µε)
//! - Curvature (mm⁻¹, cm⁻¹, m⁻¹, in⁻¹, ft⁻¹)
//! - Pressure (Pa, kPa, MPa, GPa, N/mm², psi, ksi)
//! - Force (N, kN, MN, lbf, kipf)
//! - Moment (N·m, kN·m, MN·m, lbf·in, lbf·ft, kipf·in, kipf·ft)

mod kind;
mod unit;
mod quantity;
mod parse;
mod defaults;

pub use kind::QuantityKind;
pub use unit::{
    Unit, ConversionError,
    LengthUnit, AngleUnit, StrainUnit, CurvatureUnit, PressureUnit, ForceUnit, MomentUnit,
};
pub use quantity::{Quantity, Length, Angle, Strain, Curvature, Pressure, Force, Moment};
pub use parse::{parse_unit, parse_unit_of, parse_quantity, parse_quantity_of};
pub use defaults::UnitDefaults;

/// Format a parameter name with its unit, e.g. `"Fx [kN]"`
pub fn name_with_units(name: &str, unit: impl Into<Unit>) -> String {
    format!("{} [{}]", name, unit.into().abbreviation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_with_units() {
        assert_eq!(name_with_units("test", LengthUnit::Meter), "test [m]");
        assert_eq!(name_with_units("test", StrainUnit::Percent), "test [%]");
        assert_eq!(name_with_units("test", CurvatureUnit::PerMeter), "test [m⁻¹]");
        assert_eq!(name_with_units("test", PressureUnit::Pascal), "test [Pa]");
    }

    #[test]
    fn test_name_with_units_total() {
        for kind in QuantityKind::ALL {
            for unit in Unit::all(kind) {
                let name = name_with_units("x", unit);
                assert_eq!(name, format!("x [{}]", unit.abbreviation()));
                assert!(!unit.abbreviation().is_empty());
            }
        }
    }
}
