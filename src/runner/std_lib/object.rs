//! Object built-in.
//!
//! Provides Object constructor and prototype methods.

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::type_conversion::{to_object, to_string};
use crate::runner::ds::realm::{Realm, WellKnownIntrinsics};
use crate::runner::ds::value::JsValue;

/// Register the Object built-in with the realm.
pub fn register(realm: &Realm) {
    realm.define_constructor(
        "Object",
        1,
        object_constructor,
        WellKnownIntrinsics::ObjectPrototype,
    );
    let proto = WellKnownIntrinsics::ObjectPrototype;
    realm.define_method(proto, "toString", 0, object_to_string);
    realm.define_method(proto, "valueOf", 0, object_value_of);
    realm.define_method(proto, "hasOwnProperty", 1, object_has_own_property);
}

/// Object constructor.
fn object_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    match args.first() {
        None | Some(JsValue::Null) | Some(JsValue::Undefined) => {
            Ok(JsValue::Object(ctx.realm().create_object()))
        }
        Some(arg) => Ok(JsValue::Object(to_object(ctx, arg)?)),
    }
}

/// Object.prototype.toString
fn object_to_string(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let tag = match &this {
        JsValue::Undefined => "Undefined".to_string(),
        JsValue::Null => "Null".to_string(),
        _ => to_object(ctx, &this)?.get_class_name(ctx)?,
    };
    Ok(JsValue::String(format!("[object {}]", tag)))
}

/// Object.prototype.valueOf
fn object_value_of(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Object(to_object(ctx, &this)?))
}

/// Object.prototype.hasOwnProperty
fn object_has_own_property(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let name = to_string(ctx, args.first().unwrap_or(&JsValue::Undefined))?;
    let o = to_object(ctx, &this)?;
    let result = o.has(ctx, &PropertyKey::from_name(&name), &o)?;
    Ok(JsValue::Boolean(result))
}
