//! Load and deformation construction

use xsec_function::prelude::*;
use crate::domain::{Deformation, Load};

pub struct CreateLoad {
    fx: ParameterAttribute<Force>,
    my: ParameterAttribute<Moment>,
    mz: ParameterAttribute<Moment>,
    load: ParameterAttribute<Load>,
    messages: Messages,
}

impl CreateLoad {
    pub fn new() -> Self {
        Self {
            fx: ParameterAttribute::new(AttributeInfo::item("Axial Force", "Fx", "Axial force, tension positive")),
            my: ParameterAttribute::new(
                AttributeInfo::item("Moment Y", "My", "Bending moment about y, zero when unset").optional(),
            ),
            mz: ParameterAttribute::new(
                AttributeInfo::item("Moment Z", "Mz", "Bending moment about z, zero when unset").optional(),
            ),
            load: ParameterAttribute::new(AttributeInfo::item("Load", "L", "Section load")),
            messages: Messages::new(),
        }
    }
}

impl Default for CreateLoad {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for CreateLoad {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "CreateLoad",
            nick_name: "Load",
            description: "Create a section load from an axial force and two moments",
            category: "Section",
            sub_category: "Actions",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.fx, self.my, self.mz]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.fx, self.my, self.mz]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.load]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.load]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        let fx = *self.fx.item().ok_or_else(|| XsecError::missing_input("Fx"))?;
        let my = self.my.item().copied().unwrap_or_default();
        let mz = self.mz.item().copied().unwrap_or_default();
        self.load.set_item(Load { fx, my, mz });
        Ok(())
    }

    fn dropdowns(&self) -> Vec<DropdownSpec> {
        vec![DropdownSpec::units(QuantityKind::Force), DropdownSpec::units(QuantityKind::Moment)]
    }
}

pub struct CreateDeformation {
    ex: ParameterAttribute<Strain>,
    ky: ParameterAttribute<Curvature>,
    kz: ParameterAttribute<Curvature>,
    deformation: ParameterAttribute<Deformation>,
    messages: Messages,
}

impl CreateDeformation {
    pub fn new() -> Self {
        Self {
            ex: ParameterAttribute::new(AttributeInfo::item("Axial Strain", "εx", "Strain at the centroid")),
            ky: ParameterAttribute::new(
                AttributeInfo::item("Curvature Y", "κy", "Curvature about y, zero when unset").optional(),
            ),
            kz: ParameterAttribute::new(
                AttributeInfo::item("Curvature Z", "κz", "Curvature about z, zero when unset").optional(),
            ),
            deformation: ParameterAttribute::new(AttributeInfo::item("Deformation", "D", "Section deformation")),
            messages: Messages::new(),
        }
    }
}

impl Default for CreateDeformation {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for CreateDeformation {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "CreateDeformation",
            nick_name: "Def",
            description: "Create a plane-section deformation from a strain and two curvatures",
            category: "Section",
            sub_category: "Actions",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.ex, self.ky, self.kz]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.ex, self.ky, self.kz]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.deformation]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.deformation]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        let ex = *self.ex.item().ok_or_else(|| XsecError::missing_input("εx"))?;
        let ky = self.ky.item().copied().unwrap_or_default();
        let kz = self.kz.item().copied().unwrap_or_default();
        if ex.si().abs() > 0.1 {
            self.messages.remark("Axial strain above 10%; small-strain results may not apply");
        }
        self.deformation.set_item(Deformation { ex, ky, kz });
        Ok(())
    }

    fn dropdowns(&self) -> Vec<DropdownSpec> {
        vec![DropdownSpec::units(QuantityKind::Strain), DropdownSpec::units(QuantityKind::Curvature)]
    }
}
