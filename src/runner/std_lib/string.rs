//! String built-in.
//!
//! Provides String constructor and prototype methods.

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::type_conversion::{to_integer, to_string, PreferredType};
use crate::runner::ds::realm::{Realm, WellKnownIntrinsics};
use crate::runner::ds::value::JsValue;

/// Register the String built-in with the realm.
pub fn register(realm: &Realm) {
    realm.define_constructor(
        "String",
        1,
        string_constructor,
        WellKnownIntrinsics::StringPrototype,
    );
    let proto = WellKnownIntrinsics::StringPrototype;
    realm.define_method(proto, "toString", 0, string_to_string);
    realm.define_method(proto, "valueOf", 0, string_to_string);
    realm.define_method(proto, "charAt", 1, string_char_at);
    realm.define_method(proto, "toUpperCase", 0, string_to_upper_case);
    realm.define_method(proto, "toLowerCase", 0, string_to_lower_case);
}

/// thisStringValue: a string primitive, or any object reporting class
/// `String` whose default value is one.
fn this_string_value(ctx: &mut EvalContext, this: &JsValue) -> Result<String, JErrorType> {
    match this {
        JsValue::String(s) => Ok(s.clone()),
        JsValue::Object(o) if o.get_class_name(ctx)? == "String" => {
            match o.get_default_value(ctx, PreferredType::String)? {
                JsValue::String(s) => Ok(s),
                _ => Err(JErrorType::TypeError(
                    "String.prototype.toString requires that 'this' be a String".to_string(),
                )),
            }
        }
        _ => Err(JErrorType::TypeError(
            "String.prototype.toString requires that 'this' be a String".to_string(),
        )),
    }
}

/// String constructor.
fn string_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    match args.first() {
        None => Ok(JsValue::String(String::new())),
        Some(arg) => Ok(JsValue::String(to_string(ctx, arg)?)),
    }
}

/// String.prototype.toString and String.prototype.valueOf
fn string_to_string(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::String(this_string_value(ctx, &this)?))
}

/// String.prototype.charAt
fn string_char_at(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let s = to_string(ctx, &this)?;
    let index = match args.first() {
        None => 0,
        Some(arg) => to_integer(ctx, arg)?,
    };

    if index < 0 || index as usize >= s.chars().count() {
        return Ok(JsValue::String(String::new()));
    }
    Ok(JsValue::String(
        s.chars()
            .nth(index as usize)
            .map(|c| c.to_string())
            .unwrap_or_default(),
    ))
}

/// String.prototype.toUpperCase
fn string_to_upper_case(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::String(to_string(ctx, &this)?.to_uppercase()))
}

/// String.prototype.toLowerCase
fn string_to_lower_case(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::String(to_string(ctx, &this)?.to_lowercase()))
}
