use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::object::get_property;
use crate::runner::ds::value::{JsNumberType, JsValue};

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";

pub fn get_type(ctx: &mut EvalContext, a: &JsValue) -> Result<&'static str, JErrorType> {
    Ok(match a {
        JsValue::Undefined => TYPE_STR_UNDEFINED,
        JsValue::Null => TYPE_STR_OBJECT,
        JsValue::Boolean(_) => TYPE_STR_BOOLEAN,
        JsValue::String(_) => TYPE_STR_STRING,
        JsValue::Number(_) => TYPE_STR_NUMBER,
        JsValue::Object(o) => {
            if o.is_callable(ctx)? {
                TYPE_STR_FUNCTION
            } else {
                TYPE_STR_OBJECT
            }
        }
    })
}

/// Hint passed to default-value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    Default,
    String,
    Number,
}

pub fn to_primitive(
    ctx: &mut EvalContext,
    v: &JsValue,
    preferred_type: PreferredType,
) -> Result<JsValue, JErrorType> {
    match v {
        JsValue::Object(o) => {
            let pv = o.get_default_value(ctx, preferred_type)?;
            match &pv {
                // A stand-in may answer with the object it stands for.
                JsValue::Object(inner) if !Rc::ptr_eq(inner, o) => {
                    to_primitive(ctx, &pv, preferred_type)
                }
                JsValue::Object(_) => Err(JErrorType::TypeError(
                    "Cannot convert object to primitive value".to_string(),
                )),
                _ => Ok(pv),
            }
        }
        _ => Ok(v.clone()),
    }
}

/// Tries `toString`/`valueOf` (or the reverse for numeric hints) and keeps the
/// first primitive answer.
pub fn ordinary_to_primitive(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    hint: PreferredType,
) -> Result<JsValue, JErrorType> {
    let method_names = match hint {
        PreferredType::String => ["toString", "valueOf"],
        PreferredType::Number | PreferredType::Default => ["valueOf", "toString"],
    };
    for name in method_names {
        if let Some(JsValue::Object(f)) = get_property(ctx, o, &PropertyKey::from(name))? {
            if f.is_callable(ctx)? {
                let result = f.call(ctx, JsValue::Object(o.clone()), vec![])?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
    }
    Err(JErrorType::TypeError(
        "Cannot convert object to primitive value".to_string(),
    ))
}

pub fn to_object(ctx: &mut EvalContext, v: &JsValue) -> Result<JsObjectType, JErrorType> {
    ctx.to_object(v)
}

pub fn to_boolean(v: &JsValue) -> bool {
    match v {
        JsValue::Undefined | JsValue::Null => false,
        JsValue::Boolean(b) => *b,
        JsValue::String(s) => !s.is_empty(),
        JsValue::Number(n) => match n {
            JsNumberType::Integer(i) => *i != 0,
            JsNumberType::Float(f) => *f != 0.0,
            JsNumberType::NaN => false,
            JsNumberType::PositiveInfinity | JsNumberType::NegativeInfinity => true,
        },
        JsValue::Object(_) => true,
    }
}

pub fn to_number(ctx: &mut EvalContext, v: &JsValue) -> Result<JsNumberType, JErrorType> {
    match v {
        JsValue::Undefined => Ok(JsNumberType::NaN),
        JsValue::Null => Ok(JsNumberType::Integer(0)),
        JsValue::Boolean(b) => Ok(JsNumberType::Integer(if *b { 1 } else { 0 })),
        JsValue::String(s) => Ok(string_to_number(s)),
        JsValue::Number(n) => Ok(n.clone()),
        JsValue::Object(_) => {
            let pv = to_primitive(ctx, v, PreferredType::Number)?;
            to_number(ctx, &pv)
        }
    }
}

/// StringToNumber: whitespace-trimmed decimal, hex or `Infinity` literals;
/// anything else is NaN.
pub fn string_to_number(s: &str) -> JsNumberType {
    let s = s.trim();
    if s.is_empty() {
        return JsNumberType::Integer(0);
    }
    match s {
        "Infinity" | "+Infinity" => return JsNumberType::PositiveInfinity,
        "-Infinity" => return JsNumberType::NegativeInfinity,
        _ => {}
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return match i64::from_str_radix(hex, 16) {
            Ok(i) => JsNumberType::Integer(i),
            Err(_) => JsNumberType::NaN,
        };
    }
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return JsNumberType::NaN;
    }
    if let Ok(i) = s.parse::<i64>() {
        return JsNumberType::Integer(i);
    }
    match s.parse::<f64>() {
        Ok(f) => JsNumberType::from_f64(f),
        Err(_) => JsNumberType::NaN,
    }
}

pub fn to_string(ctx: &mut EvalContext, v: &JsValue) -> Result<String, JErrorType> {
    match v {
        JsValue::Undefined => Ok(TYPE_STR_UNDEFINED.to_string()),
        JsValue::Null => Ok(TYPE_STR_NULL.to_string()),
        JsValue::Boolean(b) => Ok(b.to_string()),
        JsValue::String(s) => Ok(s.clone()),
        JsValue::Number(n) => Ok(number_to_string(n)),
        JsValue::Object(_) => {
            let pv = to_primitive(ctx, v, PreferredType::String)?;
            to_string(ctx, &pv)
        }
    }
}

pub fn number_to_string(n: &JsNumberType) -> String {
    match n {
        JsNumberType::Integer(i) => i.to_string(),
        JsNumberType::Float(f) => {
            let f = *f;
            if f == 0.0 {
                "0".to_string()
            } else if f.abs() >= 1e21 || f.abs() < 1e-6 {
                let s = format!("{:e}", f);
                match s.split_once('e') {
                    Some((m, e)) if !e.starts_with('-') => format!("{}e+{}", m, e),
                    _ => s,
                }
            } else {
                f.to_string()
            }
        }
        JsNumberType::NaN => "NaN".to_string(),
        JsNumberType::PositiveInfinity => "Infinity".to_string(),
        JsNumberType::NegativeInfinity => "-Infinity".to_string(),
    }
}

pub fn to_integer(ctx: &mut EvalContext, v: &JsValue) -> Result<i64, JErrorType> {
    Ok(match to_number(ctx, v)? {
        JsNumberType::Integer(i) => i,
        JsNumberType::Float(f) => f.trunc() as i64,
        JsNumberType::NaN => 0,
        JsNumberType::PositiveInfinity => i64::MAX,
        JsNumberType::NegativeInfinity => i64::MIN,
    })
}
