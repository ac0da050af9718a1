//! Section analysis engines
//!
//! Functions only talk to an engine through `SectionEngine`. Inputs are
//! already validated and SI-normalized; responses carry advisories that
//! end up as component warnings and remarks.

use std::sync::Arc;
use thiserror::Error;
use xsec_core::{MessageLevel, XsecError};
use xsec_units::{Curvature, Force, Moment, PressureUnit, Strain};
use crate::domain::{Deformation, Load, RectangularSection};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Material {0} has a non-positive elastic modulus")]
    InvalidMaterial(String),

    #[error("Section dimensions must be positive")]
    InvalidSection,

    #[error("Analysis did not converge: {0}")]
    NotConverged(String),
}

impl From<EngineError> for XsecError {
    fn from(err: EngineError) -> Self {
        XsecError::engine(err.to_string())
    }
}

/// Non-fatal note attached to an engine result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub level: MessageLevel,
    pub message: String,
}

impl Advisory {
    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: MessageLevel::Warning, message: message.into() }
    }

    pub fn remark(message: impl Into<String>) -> Self {
        Self { level: MessageLevel::Remark, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineResponse<T> {
    pub value: T,
    pub advisories: Vec<Advisory>,
}

pub trait SectionEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Deformation that equilibrates `load`
    fn strain_from_load(
        &self,
        section: &RectangularSection,
        load: &Load,
    ) -> Result<EngineResponse<Deformation>, EngineError>;

    /// Section forces produced by `deformation`
    fn load_from_deformation(
        &self,
        section: &RectangularSection,
        deformation: &Deformation,
    ) -> Result<EngineResponse<Load>, EngineError>;
}

pub type SharedEngine = Arc<dyn SectionEngine>;

/// Homogeneous linear-elastic rectangle
#[derive(Debug, Clone, Copy, Default)]
pub struct ElasticEngine;

impl ElasticEngine {
    pub fn shared() -> SharedEngine {
        Arc::new(ElasticEngine)
    }

    fn check(section: &RectangularSection) -> Result<f64, EngineError> {
        if section.width.si() <= 0.0 || section.depth.si() <= 0.0 {
            return Err(EngineError::InvalidSection);
        }
        let e = section.material.elastic_modulus.si();
        if e <= 0.0 {
            return Err(EngineError::InvalidMaterial(section.material.name.clone()));
        }
        Ok(e)
    }

    /// Warn when the largest corner stress exceeds the material strength
    fn stress_advisory(section: &RectangularSection, deformation: &Deformation, e: f64) -> Option<Advisory> {
        let peak = section
            .corners()
            .iter()
            .map(|&(y, z)| (e * deformation.strain_at(y, z).si()).abs())
            .fold(0.0, f64::max);
        let strength = section.material.strength.si();
        if strength > 0.0 && peak > strength {
            let mpa = PressureUnit::Megapascal;
            Some(Advisory::warning(format!(
                "Peak stress {:.2} MPa exceeds the strength of {} ({:.2} MPa)",
                peak / 1.0e6,
                section.material.name,
                section.material.strength.as_unit(mpa)
            )))
        } else {
            None
        }
    }
}

impl SectionEngine for ElasticEngine {
    fn name(&self) -> &str {
        "elastic"
    }

    fn strain_from_load(
        &self,
        section: &RectangularSection,
        load: &Load,
    ) -> Result<EngineResponse<Deformation>, EngineError> {
        let e = Self::check(section)?;
        let deformation = Deformation {
            ex: Strain::from_si(load.fx.si() / (e * section.area())),
            ky: Curvature::from_si(load.my.si() / (e * section.second_moment_y())),
            kz: Curvature::from_si(load.mz.si() / (e * section.second_moment_z())),
        };

        let mut advisories = Vec::new();
        if load.is_zero() {
            advisories.push(Advisory::remark("Section is unloaded"));
        }
        advisories.extend(Self::stress_advisory(section, &deformation, e));
        Ok(EngineResponse { value: deformation, advisories })
    }

    fn load_from_deformation(
        &self,
        section: &RectangularSection,
        deformation: &Deformation,
    ) -> Result<EngineResponse<Load>, EngineError> {
        let e = Self::check(section)?;
        let load = Load {
            fx: Force::from_si(e * section.area() * deformation.ex.si()),
            my: Moment::from_si(e * section.second_moment_y() * deformation.ky.si()),
            mz: Moment::from_si(e * section.second_moment_z() * deformation.kz.si()),
        };

        let mut advisories = Vec::new();
        if deformation.is_zero() {
            advisories.push(Advisory::remark("Section is undeformed"));
        }
        advisories.extend(Self::stress_advisory(section, deformation, e));
        Ok(EngineResponse { value: load, advisories })
    }
}
