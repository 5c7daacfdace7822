use crate::runner::ds::object::{JsObjectType, ObjectBase, OrdinaryObject};
use crate::runner::ds::object_property::{PropertyData, PropertyKey};
use crate::runner::ds::value::JsValue;

lazy_static! {
    pub(crate) static ref STRING_LENGTH_PROP: PropertyKey = PropertyKey::Str("length".to_string());
}

/// Boxed `String`: exposes `length` and one read-only property per character.
pub struct StringObject {
    base: ObjectBase,
    string_data: String,
}
impl StringObject {
    pub fn new(value: String, proto: Option<JsObjectType>) -> Self {
        let obj = StringObject {
            base: ObjectBase::new(proto),
            string_data: value,
        };
        string_create(&obj);
        obj
    }

    fn char_len(&self) -> usize {
        self.string_data.chars().count()
    }
}
impl OrdinaryObject for StringObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn class_name(&self) -> &str {
        "String"
    }

    fn get_exotic_property(&self, property: &PropertyKey) -> Option<PropertyData> {
        match property {
            PropertyKey::Int(idx) => self
                .string_data
                .chars()
                .nth(*idx as usize)
                .map(|c| PropertyData {
                    value: JsValue::String(c.to_string()),
                    writable: false,
                    enumerable: true,
                    configurable: false,
                }),
            PropertyKey::Str(_) => None,
        }
    }

    fn exotic_property_keys(&self) -> Vec<PropertyKey> {
        (0..self.char_len() as u32).map(PropertyKey::Int).collect()
    }

    fn primitive_value(&self) -> Option<JsValue> {
        Some(JsValue::String(self.string_data.clone()))
    }
}

fn string_create(string_obj: &StringObject) {
    string_obj.base.define(
        STRING_LENGTH_PROP.clone(),
        PropertyData::read_only(JsValue::from(string_obj.char_len() as i64)),
    );
}
