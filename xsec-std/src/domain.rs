//! Section domain objects
//!
//! All quantities are stored SI-normalized. Section coordinates are
//! centroidal: `y` runs across the width, `z` up the depth.

use serde::{Deserialize, Serialize};
use xsec_core::Point;
use xsec_function::domain_value;
use xsec_units::{Curvature, Force, Length, Moment, Pressure, Strain};

/// Linear-elastic material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub elastic_modulus: Pressure,
    /// Stress magnitude above which the engine warns
    pub strength: Pressure,
}

/// Solid rectangle of one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangularSection {
    pub width: Length,
    pub depth: Length,
    pub material: Material,
}

impl RectangularSection {
    /// Area in m²
    pub fn area(&self) -> f64 {
        self.width.si() * self.depth.si()
    }

    /// Second moment of area about y in m⁴
    pub fn second_moment_y(&self) -> f64 {
        self.width.si() * self.depth.si().powi(3) / 12.0
    }

    /// Second moment of area about z in m⁴
    pub fn second_moment_z(&self) -> f64 {
        self.depth.si() * self.width.si().powi(3) / 12.0
    }

    /// Corner (y, z) coordinates in metres, counter-clockwise from bottom left
    pub fn corners(&self) -> [(f64, f64); 4] {
        let y = self.width.si() / 2.0;
        let z = self.depth.si() / 2.0;
        [(-y, -z), (y, -z), (y, z), (-y, z)]
    }

    /// Corners as model points in the y-z plane
    pub fn corner_points(&self) -> Vec<Point> {
        self.corners().iter().map(|&(y, z)| Point::new(0.0, y, z)).collect()
    }
}

/// Section forces
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Load {
    pub fx: Force,
    pub my: Moment,
    pub mz: Moment,
}

impl Load {
    pub fn is_zero(&self) -> bool {
        self.fx.si() == 0.0 && self.my.si() == 0.0 && self.mz.si() == 0.0
    }
}

/// Plane-section strain state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Deformation {
    pub ex: Strain,
    pub ky: Curvature,
    pub kz: Curvature,
}

impl Deformation {
    /// Strain at a section point
    pub fn strain_at(&self, y: f64, z: f64) -> Strain {
        Strain::from_si(self.ex.si() - self.kz.si() * y + self.ky.si() * z)
    }

    pub fn is_zero(&self) -> bool {
        self.ex.si() == 0.0 && self.ky.si() == 0.0 && self.kz.si() == 0.0
    }
}

domain_value!(Material, "Material");
domain_value!(RectangularSection, "Section");
domain_value!(Load, "Load");
domain_value!(Deformation, "Deformation");

#[cfg(test)]
mod tests {
    use super::*;
    use xsec_function::ParamValue;
    use xsec_units::{CurvatureUnit, LengthUnit, PressureUnit};

    fn concrete() -> Material {
        Material {
            name: "C30".into(),
            elastic_modulus: Pressure::new(30.0, PressureUnit::Gigapascal),
            strength: Pressure::new(30.0, PressureUnit::Megapascal),
        }
    }

    fn section() -> RectangularSection {
        RectangularSection {
            width: Length::new(300.0, LengthUnit::Millimeter),
            depth: Length::new(500.0, LengthUnit::Millimeter),
            material: concrete(),
        }
    }

    #[test]
    fn test_section_properties() {
        let s = section();
        assert!((s.area() - 0.15).abs() < 1e-12);
        assert!((s.second_moment_y() - 0.003125).abs() < 1e-12);
        assert!((s.second_moment_z() - 0.001125).abs() < 1e-12);
        assert_eq!(s.corner_points().len(), 4);
    }

    #[test]
    fn test_strain_at() {
        let d = Deformation {
            ex: Strain::from_si(1e-4),
            ky: Curvature::new(1.0, CurvatureUnit::PerMillimeter) / 1.0e6,
            kz: Curvature::from_si(0.0),
        };
        let top = d.strain_at(0.0, 0.25);
        assert!((top.si() - 3.5e-4).abs() < 1e-12);
        let bottom_left = d.strain_at(-0.15, -0.25);
        assert!((bottom_left.si() + 1.5e-4).abs() < 1e-12);
    }

    #[test]
    fn test_domain_value_roundtrip() {
        let s = section();
        let v = s.to_value(None).unwrap();
        assert_eq!(v.type_name(), "Section");
        assert_eq!(RectangularSection::from_value(&v, None).unwrap(), s);
        assert!(Load::from_value(&v, None).is_err());
    }
}
