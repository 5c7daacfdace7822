use crate::runner::ds::object::{JsObjectType, ObjectBase, OrdinaryObject};
use crate::runner::ds::value::{JsNumberType, JsValue};

pub struct NumberObject {
    base: ObjectBase,
    number_data: JsNumberType,
}
impl NumberObject {
    pub fn new(value: JsNumberType, proto: Option<JsObjectType>) -> Self {
        NumberObject {
            base: ObjectBase::new(proto),
            number_data: value,
        }
    }
}
impl OrdinaryObject for NumberObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn class_name(&self) -> &str {
        "Number"
    }

    fn primitive_value(&self) -> Option<JsValue> {
        Some(JsValue::Number(self.number_data.clone()))
    }
}

pub struct BooleanObject {
    base: ObjectBase,
    boolean_data: bool,
}
impl BooleanObject {
    pub fn new(value: bool, proto: Option<JsObjectType>) -> Self {
        BooleanObject {
            base: ObjectBase::new(proto),
            boolean_data: value,
        }
    }
}
impl OrdinaryObject for BooleanObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn class_name(&self) -> &str {
        "Boolean"
    }

    fn primitive_value(&self) -> Option<JsValue> {
        Some(JsValue::Boolean(self.boolean_data))
    }
}
