//! Rectangular section construction and geometry

use xsec_function::prelude::*;
use crate::domain::{Material, RectangularSection};

pub struct CreateRectangularSection {
    width: ParameterAttribute<Length>,
    depth: ParameterAttribute<Length>,
    material: ParameterAttribute<Material>,
    section: ParameterAttribute<RectangularSection>,
    messages: Messages,
}

impl CreateRectangularSection {
    pub fn new() -> Self {
        Self {
            width: ParameterAttribute::new(AttributeInfo::item("Width", "B", "Section width along y")),
            depth: ParameterAttribute::new(AttributeInfo::item("Depth", "H", "Section depth along z")),
            material: ParameterAttribute::new(AttributeInfo::item("Material", "M", "Section material")),
            section: ParameterAttribute::new(AttributeInfo::item("Section", "S", "Rectangular section")),
            messages: Messages::new(),
        }
    }
}

impl Default for CreateRectangularSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for CreateRectangularSection {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "CreateRectangularSection",
            nick_name: "Rect",
            description: "Create a solid rectangular section",
            category: "Section",
            sub_category: "Geometry",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.width, self.depth, self.material]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.width, self.depth, self.material]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.section]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.section]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        let width = *self.width.item().ok_or_else(|| XsecError::missing_input("B"))?;
        let depth = *self.depth.item().ok_or_else(|| XsecError::missing_input("H"))?;
        let material = self.material.item().cloned().ok_or_else(|| XsecError::missing_input("M"))?;

        for (value, nick) in [(width, "B"), (depth, "H")] {
            if value.si() <= 0.0 {
                return Err(XsecError::domain_error(format!("Input {} must be a positive length", nick))
                    .for_parameter(nick));
            }
        }
        if depth.si() > 10.0 * width.si() || width.si() > 10.0 * depth.si() {
            self.messages.warning("Aspect ratio above 10; the section behaves like a plate");
        }

        self.section.set_item(RectangularSection { width, depth, material });
        Ok(())
    }

    fn dropdowns(&self) -> Vec<DropdownSpec> {
        vec![DropdownSpec::units(QuantityKind::Length)]
    }
}

/// Corner points of a section, in metres
pub struct SectionCorners {
    section: ParameterAttribute<RectangularSection>,
    corners: ParameterAttribute<Point>,
    messages: Messages,
}

impl SectionCorners {
    pub fn new() -> Self {
        Self {
            section: ParameterAttribute::new(AttributeInfo::item("Section", "S", "Rectangular section")),
            corners: ParameterAttribute::new(AttributeInfo::list(
                "Corners",
                "C",
                "Corner points in the y-z plane, counter-clockwise from bottom left",
            )),
            messages: Messages::new(),
        }
    }
}

impl Default for SectionCorners {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for SectionCorners {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "SectionCorners",
            nick_name: "Corners",
            description: "Corner points of a rectangular section",
            category: "Section",
            sub_category: "Geometry",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.section]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.section]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.corners]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.corners]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        let section = self.section.item().ok_or_else(|| XsecError::missing_input("S"))?;
        let points = section.corner_points();
        self.corners.set_list(points);
        Ok(())
    }
}
