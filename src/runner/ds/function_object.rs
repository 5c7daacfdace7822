use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{ObjectBase, OrdinaryObject, JsObjectType};
use crate::runner::ds::object_property::{PropertyData, PropertyKey};
use crate::runner::ds::value::JsValue;

/// Function signature for built-in methods.
/// Native functions receive the evaluation context, `this` value, and arguments.
pub type NativeFn =
    fn(ctx: &mut EvalContext, this: JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType>;

pub struct NativeFunctionObject {
    base: ObjectBase,
    function: NativeFn,
}
impl NativeFunctionObject {
    pub fn new(name: &str, arity: i64, function: NativeFn, proto: Option<JsObjectType>) -> Self {
        let base = ObjectBase::new(proto);
        base.define(
            PropertyKey::from("name"),
            PropertyData::read_only(JsValue::from(name)),
        );
        base.define(
            PropertyKey::from("length"),
            PropertyData::read_only(JsValue::from(arity)),
        );
        NativeFunctionObject { base, function }
    }
}
impl OrdinaryObject for NativeFunctionObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn class_name(&self) -> &str {
        "Function"
    }

    fn native_function(&self) -> Option<NativeFn> {
        Some(self.function)
    }
}
