//! Material construction

use xsec_function::prelude::*;
use crate::domain::Material;

pub struct CreateMaterial {
    name: ParameterAttribute<String>,
    elastic_modulus: ParameterAttribute<Pressure>,
    strength: ParameterAttribute<Pressure>,
    material: ParameterAttribute<Material>,
    messages: Messages,
}

impl CreateMaterial {
    pub fn new() -> Self {
        Self {
            name: ParameterAttribute::new(AttributeInfo::item("Name", "N", "Material name").optional()),
            elastic_modulus: ParameterAttribute::new(AttributeInfo::item("Elastic Modulus", "E", "Young's modulus")),
            strength: ParameterAttribute::new(AttributeInfo::item(
                "Strength",
                "f",
                "Stress magnitude above which analyses warn",
            )),
            material: ParameterAttribute::new(AttributeInfo::item("Material", "M", "Linear-elastic material")),
            messages: Messages::new(),
        }
    }
}

impl Default for CreateMaterial {
    fn default() -> Self {
        Self::new()
    }
}

impl Function for CreateMaterial {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "CreateMaterial",
            nick_name: "Mat",
            description: "Create a linear-elastic material",
            category: "Section",
            sub_category: "Materials",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.name, self.elastic_modulus, self.strength]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.name, self.elastic_modulus, self.strength]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.material]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.material]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        let e = *self.elastic_modulus.item().ok_or_else(|| XsecError::missing_input("E"))?;
        let f = *self.strength.item().ok_or_else(|| XsecError::missing_input("f"))?;
        if e.si() <= 0.0 {
            return Err(XsecError::domain_error("Elastic modulus must be positive").for_parameter("E"));
        }
        if f.si() <= 0.0 {
            return Err(XsecError::domain_error("Strength must be positive").for_parameter("f"));
        }
        let name = self.name.item().cloned().unwrap_or_else(|| "Material".to_string());

        self.material.set_item(Material { name, elastic_modulus: e, strength: f });
        Ok(())
    }

    fn dropdowns(&self) -> Vec<DropdownSpec> {
        vec![DropdownSpec::units(QuantityKind::Pressure)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_material() {
        let mut f = CreateMaterial::new();
        f.elastic_modulus.set_item(Pressure::new(200.0, PressureUnit::Gigapascal));
        f.strength.set_item(Pressure::new(355.0, PressureUnit::Megapascal));
        assert_eq!(f.solve(), ComputeOutcome::Done);
        let m = f.material.item().unwrap();
        assert_eq!(m.name, "Material");
        assert_eq!(m.elastic_modulus.si(), 2.0e11);
    }

    #[test]
    fn test_rejects_non_positive_modulus() {
        let mut f = CreateMaterial::new();
        f.elastic_modulus.set_item(Pressure::from_si(-1.0));
        f.strength.set_item(Pressure::from_si(1.0));
        assert_eq!(f.solve(), ComputeOutcome::Failed);
        assert_eq!(f.messages().errors, ["Elastic modulus must be positive"]);
        assert!(!f.material.is_set());
    }
}
