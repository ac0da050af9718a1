//! Test Functions shared by the adapter tests

use xsec_function::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoMode {
    Copy,
    Negate,
    Fail,
}

/// Copies three forces to three outputs and counts its compute calls
pub struct Echo {
    pub x: ParameterAttribute<Force>,
    pub y: ParameterAttribute<Force>,
    pub z: ParameterAttribute<Force>,
    pub out_x: ParameterAttribute<Force>,
    pub out_y: ParameterAttribute<Force>,
    pub out_z: ParameterAttribute<Force>,
    pub mode: EchoMode,
    pub calls: usize,
    messages: Messages,
}

const MODES: &[&str] = &["Copy", "Negate", "Fail"];

impl Echo {
    pub fn new() -> Self {
        Self {
            x: ParameterAttribute::new(AttributeInfo::item("X", "X", "First force")),
            y: ParameterAttribute::new(AttributeInfo::item("Y", "YY", "Second force")),
            z: ParameterAttribute::new(AttributeInfo::item("Z", "ZZ", "Third force")),
            out_x: ParameterAttribute::new(AttributeInfo::item("X", "X", "First force")),
            out_y: ParameterAttribute::new(AttributeInfo::item("Y", "Y", "Second force")),
            out_z: ParameterAttribute::new(AttributeInfo::item("Z", "Z", "Third force")),
            mode: EchoMode::Copy,
            calls: 0,
            messages: Messages::new(),
        }
    }
}

impl Function for Echo {
    fn metadata(&self) -> FunctionMeta {
        FunctionMeta {
            name: "Echo",
            nick_name: "Echo",
            description: "Copies its inputs to its outputs",
            category: "Test",
            sub_category: "Util",
        }
    }

    fn input_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.x, self.y, self.z]
    }

    fn input_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.x, self.y, self.z]
    }

    fn output_attributes(&self) -> Vec<&dyn Attribute> {
        attributes![self.out_x, self.out_y, self.out_z]
    }

    fn output_attributes_mut(&mut self) -> Vec<&mut dyn Attribute> {
        attributes_mut![self.out_x, self.out_y, self.out_z]
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Messages {
        &mut self.messages
    }

    fn compute(&mut self) -> Result<(), XsecError> {
        self.calls += 1;
        if self.mode == EchoMode::Fail {
            return Err(XsecError::engine("Echo refused to run"));
        }
        let read = |attr: &ParameterAttribute<Force>| {
            attr.item().copied().ok_or_else(|| XsecError::missing_input(attr.nick_name()))
        };
        let mut values = [read(&self.x)?, read(&self.y)?, read(&self.z)?];
        if values.iter().any(|f| f.si() < 0.0) {
            self.messages.remark("Negative input");
        }
        if self.mode == EchoMode::Negate {
            values = values.map(|f| -f);
        }
        self.out_x.set_item(values[0]);
        self.out_y.set_item(values[1]);
        self.out_z.set_item(values[2]);
        Ok(())
    }

    fn dropdowns(&self) -> Vec<DropdownSpec> {
        vec![DropdownSpec::units(QuantityKind::Force), DropdownSpec::choices("Mode", MODES)]
    }

    fn on_selected(&mut self, _list: usize, selection: &Selection) {
        if let Selection::Choice { index, .. } = selection {
            self.mode = match index {
                1 => EchoMode::Negate,
                2 => EchoMode::Fail,
                _ => EchoMode::Copy,
            };
        }
    }
}
