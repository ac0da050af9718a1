//! Quantity kinds
//!
//! Every unit-bearing parameter belongs to exactly one kind. Values of a kind
//! are stored in the kind's SI home unit; display units only matter at the
//! host boundary.

use std::fmt;
use serde::{Serialize, Deserialize};

/// The physical quantities a section parameter can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    /// Length [m]
    Length,
    /// Plane angle [rad]
    Angle,
    /// Strain [m/m]
    Strain,
    /// Curvature [m⁻¹]
    Curvature,
    /// Pressure and stress [Pa]
    Pressure,
    /// Force [N]
    Force,
    /// Moment [N·m]
    Moment,
}

impl QuantityKind {
    /// All supported kinds, in registration order
    pub const ALL: [QuantityKind; 7] = [
        QuantityKind::Length,
        QuantityKind::Angle,
        QuantityKind::Strain,
        QuantityKind::Curvature,
        QuantityKind::Pressure,
        QuantityKind::Force,
        QuantityKind::Moment,
    ];

    /// Lowercase name used in messages and documents
    pub fn name(&self) -> &'static str {
        match self {
            QuantityKind::Length => "length",
            QuantityKind::Angle => "angle",
            QuantityKind::Strain => "strain",
            QuantityKind::Curvature => "curvature",
            QuantityKind::Pressure => "pressure",
            QuantityKind::Force => "force",
            QuantityKind::Moment => "moment",
        }
    }

    /// Label shown next to a unit dropdown
    pub fn unit_label(&self) -> &'static str {
        match self {
            QuantityKind::Length => "Length Unit",
            QuantityKind::Angle => "Angle Unit",
            QuantityKind::Strain => "Strain Unit",
            QuantityKind::Curvature => "Curvature Unit",
            QuantityKind::Pressure => "Stress Unit",
            QuantityKind::Force => "Force Unit",
            QuantityKind::Moment => "Moment Unit",
        }
    }

    /// Parse a kind from its lowercase name
    pub fn from_name(s: &str) -> Option<QuantityKind> {
        let s = s.trim().to_lowercase();
        QuantityKind::ALL.into_iter().find(|k| k.name() == s)
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
