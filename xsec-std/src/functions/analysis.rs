//! Section analysis Functions
//!
//! Both Functions delegate to the shared `SectionEngine`. Engine failures
//! leave the previous outputs in place; advisories become messages.

use tracing::debug;
use xsec_function::prelude::*;
use crate::domain::{Deformation, Load, RectangularSection};
use crate::engine::SharedEngine;
use super::report;

pub struct SolveLoad {
    engine: SharedEngine,
    section: ParameterAttribute<RectangularSection>,
    loads: ParameterAttribute<Load>,
    deformations: ParameterAttribute<Deformation>,
    ex: ParameterAttribute<Strain>,
    ky: ParameterAttribute<Curvature>,
    kz: ParameterAttribute<Curvature>,
    corner_strains: ParameterAttribute<Strain>,
    messages: Messages,
}

impl SolveLoad {
    pub fn new(engine: SharedEngine) -> Self {
        Self {
            engine,
            section: ParameterAttribute::new(AttributeInfo::item("Section", "S", "Section to analyse")),
            loads: ParameterAttribute::new(AttributeInfo::list("Loads", "L", "Loads to solve")),
            deformations: ParameterAttribute::new(AttributeInfo::list("Deformations", "D", "One deformation per load")),
            ex: ParameterAttribute::new(AttributeInfo::list("Axial Strain", "εx", "Centroid strain per load")),
            ky: ParameterAttribute::new(AttributeInfo::list("Curvature Y", "κy", "Curvature about y per load")),
            kz: ParameterAttribute::new(AttributeInfo::list("Curvature Z", "κz", "Curvature about z per load")),
            corner_strains: ParameterAttribute::new(AttributeInfo::tree(
                "Corner Strains",
                "εc",
                "Strain at each section corner, one branch per load",
            )),
            messages: Messages::new(),
        }
    }
}

impl Function for SolveLoad {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "SolveLoad",
            nick_name: "Strain",
            description: "Strain response of a section to a list of loads",
            category: "Section",
            sub_category: "Analysis",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.section, self.loads]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.section, self.loads]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.deformations, self.ex, self.ky, self.kz, self.corner_strains]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.deformations, self.ex, self.ky, self.kz, self.corner_strains]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        let section = self.section.item().cloned().ok_or_else(|| XsecError::missing_input("S"))?;
        let loads = self.loads.list().map(<[Load]>::to_vec).ok_or_else(|| XsecError::missing_input("L"))?;
        if loads.is_empty() {
            self.messages.warning("No loads to solve");
        }
        debug!(engine = self.engine.name(), loads = loads.len(), "solving section for loads");

        let mut deformations = Vec::with_capacity(loads.len());
        for (i, load) in loads.iter().enumerate() {
            let prefix = (loads.len() > 1).then(|| format!("Load {}", i));
            let response = self.engine.strain_from_load(&section, load).map_err(|e| {
                let err = XsecError::from(e);
                match &prefix {
                    Some(p) => err.with_note(p.clone()),
                    None => err,
                }
            })?;
            report(&mut self.messages, &response.advisories, prefix.as_deref());
            deformations.push(response.value);
        }

        let corners = section.corners();
        let tree: Vec<Vec<Strain>> = deformations
            .iter()
            .map(|d| corners.iter().map(|&(y, z)| d.strain_at(y, z)).collect())
            .collect();

        self.ex.set_list(deformations.iter().map(|d| d.ex).collect());
        self.ky.set_list(deformations.iter().map(|d| d.ky).collect());
        self.kz.set_list(deformations.iter().map(|d| d.kz).collect());
        self.corner_strains.set_tree(tree);
        self.deformations.set_list(deformations);
        Ok(())
    }

    fn dropdowns(&self) -> Vec<DropdownSpec> {
        vec![DropdownSpec::units(QuantityKind::Strain), DropdownSpec::units(QuantityKind::Curvature)]
    }
}

pub struct SolveDeformation {
    engine: SharedEngine,
    section: ParameterAttribute<RectangularSection>,
    deformation: ParameterAttribute<Deformation>,
    load: ParameterAttribute<Load>,
    fx: ParameterAttribute<Force>,
    my: ParameterAttribute<Moment>,
    mz: ParameterAttribute<Moment>,
    messages: Messages,
}

impl SolveDeformation {
    pub fn new(engine: SharedEngine) -> Self {
        Self {
            engine,
            section: ParameterAttribute::new(AttributeInfo::item("Section", "S", "Section to analyse")),
            deformation: ParameterAttribute::new(AttributeInfo::item("Deformation", "D", "Imposed deformation")),
            load: ParameterAttribute::new(AttributeInfo::item("Load", "L", "Section forces")),
            fx: ParameterAttribute::new(AttributeInfo::item("Axial Force", "Fx", "Axial force")),
            my: ParameterAttribute::new(AttributeInfo::item("Moment Y", "My", "Bending moment about y")),
            mz: ParameterAttribute::new(AttributeInfo::item("Moment Z", "Mz", "Bending moment about z")),
            messages: Messages::new(),
        }
    }
}

impl Function for SolveDeformation {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "SolveDeformation",
            nick_name: "Forces",
            description: "Section forces produced by an imposed deformation",
            category: "Section",
            sub_category: "Analysis",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.section, self.deformation]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.section, self.deformation]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.load, self.fx, self.my, self.mz]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.load, self.fx, self.my, self.mz]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        let section = self.section.item().ok_or_else(|| XsecError::missing_input("S"))?;
        let deformation = self.deformation.item().ok_or_else(|| XsecError::missing_input("D"))?;
        debug!(engine = self.engine.name(), "solving section for deformation");

        let response = self.engine.load_from_deformation(section, deformation)?;
        report(&mut self.messages, &response.advisories, None);

        let load = response.value;
        self.fx.set_item(load.fx);
        self.my.set_item(load.my);
        self.mz.set_item(load.mz);
        self.load.set_item(load);
        Ok(())
    }

    fn dropdowns(&self) -> Vec<DropdownSpec> {
        vec![DropdownSpec::units(QuantityKind::Force), DropdownSpec::units(QuantityKind::Moment)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use crate::domain::Material;
    use crate::engine::{ElasticEngine, EngineError, EngineResponse, SectionEngine};

    /// Elastic until told to fail
    #[derive(Default)]
    struct FlakyEngine {
        fail: AtomicBool,
    }

    impl SectionEngine for FlakyEngine {
        fn name(&self) -> &str {
            "flaky"
        }

        fn strain_from_load(
            &self,
            section: &RectangularSection,
            load: &Load,
        ) -> Result<EngineResponse<Deformation>, EngineError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(EngineError::NotConverged("iteration limit reached".into()));
            }
            ElasticEngine.strain_from_load(section, load)
        }

        fn load_from_deformation(
            &self,
            section: &RectangularSection,
            deformation: &Deformation,
        ) -> Result<EngineResponse<Load>, EngineError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(EngineError::NotConverged("iteration limit reached".into()));
            }
            ElasticEngine.load_from_deformation(section, deformation)
        }
    }

    fn section() -> RectangularSection {
        RectangularSection {
            width: Length::new(300.0, LengthUnit::Millimeter),
            depth: Length::new(500.0, LengthUnit::Millimeter),
            material: Material {
                name: "C30".into(),
                elastic_modulus: Pressure::new(30.0, PressureUnit::Gigapascal),
                strength: Pressure::new(30.0, PressureUnit::Megapascal),
            },
        }
    }

    fn axial(kn: f64) -> Load {
        Load { fx: Force::new(kn, ForceUnit::Kilonewton), ..Load::default() }
    }

    #[test]
    fn test_solve_load_list() {
        let mut f = SolveLoad::new(ElasticEngine::shared());
        f.section.set_item(section());
        f.loads.set_list(vec![axial(450.0), axial(0.0)]);
        assert_eq!(f.solve(), ComputeOutcome::Done);

        let ex = f.ex.list().unwrap();
        assert_eq!(ex.len(), 2);
        assert!((ex[0].si() - 1.0e-4).abs() < 1e-15);
        assert_eq!(f.messages().remarks, ["Load 1: Section is unloaded"]);

        let tree = f.corner_strains.tree().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].len(), 4);
    }

    #[test]
    fn test_engine_failure_keeps_outputs() {
        let engine = Arc::new(FlakyEngine::default());
        let mut f = SolveLoad::new(engine.clone());
        f.section.set_item(section());
        f.loads.set_list(vec![axial(450.0)]);
        assert_eq!(f.solve(), ComputeOutcome::Done);
        let before = f.deformations.value().cloned();

        engine.fail.store(true, Ordering::SeqCst);
        f.loads.set_list(vec![axial(900.0)]);
        assert_eq!(f.solve(), ComputeOutcome::Failed);
        assert_eq!(f.messages().errors, ["Analysis did not converge: iteration limit reached"]);
        assert_eq!(f.deformations.value().cloned(), before);

        f.loads.set_list(vec![axial(100.0), axial(200.0)]);
        assert_eq!(f.solve(), ComputeOutcome::Failed);
        assert_eq!(f.messages().errors, ["Analysis did not converge: iteration limit reached (Load 0)"]);
    }

    #[test]
    fn test_empty_load_list_warns() {
        let mut f = SolveLoad::new(ElasticEngine::shared());
        f.section.set_item(section());
        f.loads.set_list(Vec::new());
        assert_eq!(f.solve(), ComputeOutcome::Done);
        assert_eq!(f.messages().warnings, ["No loads to solve"]);
        assert_eq!(f.deformations.list().map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_solve_deformation() {
        let mut f = SolveDeformation::new(ElasticEngine::shared());
        f.section.set_item(section());
        f.deformation.set_item(Deformation {
            ex: Strain::from_si(1.0e-4),
            ky: Curvature::from_si(0.0),
            kz: Curvature::from_si(0.0),
        });
        assert_eq!(f.solve(), ComputeOutcome::Done);
        let fx = f.fx.item().unwrap();
        assert!((fx.si() - 4.5e5).abs() < 1e-6);
        assert_eq!(f.load.item().map(|l| l.fx), Some(*fx));
    }
}
