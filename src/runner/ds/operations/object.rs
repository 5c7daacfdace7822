use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::JsObjectType;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::type_conversion::to_object;
use crate::runner::ds::value::JsValue;

/// Looks `p` up on `o` and then along its prototype chain. The lookup always
/// starts at `o`.
pub fn get_property(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: &PropertyKey,
) -> Result<Option<JsValue>, JErrorType> {
    let mut current = Some(o.clone());
    while let Some(obj) = current {
        if let Some(v) = obj.get(ctx, p, o)? {
            return Ok(Some(v));
        }
        current = obj.get_prototype(ctx)?;
    }
    Ok(None)
}

pub fn has_property(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: &PropertyKey,
) -> Result<bool, JErrorType> {
    let mut current = Some(o.clone());
    while let Some(obj) = current {
        if obj.has(ctx, p, o)? {
            return Ok(true);
        }
        current = obj.get_prototype(ctx)?;
    }
    Ok(false)
}

/// Assigns through the object in the chain that already holds `p`, falling
/// back to `o` itself.
pub fn put_property(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: PropertyKey,
    value: JsValue,
) -> Result<(), JErrorType> {
    let mut current = Some(o.clone());
    while let Some(obj) = current {
        if obj.has(ctx, &p, o)? {
            return obj.put(ctx, p, o, value);
        }
        current = obj.get_prototype(ctx)?;
    }
    o.put(ctx, p, o, value)
}

pub fn get(ctx: &mut EvalContext, o: &JsObjectType, p: &PropertyKey) -> Result<JsValue, JErrorType> {
    Ok(get_property(ctx, o, p)?.unwrap_or(JsValue::Undefined))
}

pub fn get_v(ctx: &mut EvalContext, v: &JsValue, p: &PropertyKey) -> Result<JsValue, JErrorType> {
    let o = to_object(ctx, v)?;
    get(ctx, &o, p)
}

pub fn get_method(
    ctx: &mut EvalContext,
    v: &JsValue,
    p: &PropertyKey,
) -> Result<Option<JsObjectType>, JErrorType> {
    let f = get_v(ctx, v, p)?;
    match &f {
        JsValue::Undefined | JsValue::Null => Ok(None),
        JsValue::Object(o) => {
            if o.is_callable(ctx)? {
                Ok(Some(o.clone()))
            } else {
                Err(JErrorType::TypeError(format!("'{}' is not a function", p)))
            }
        }
        _ => Err(JErrorType::TypeError(format!("'{}' is not a function", p))),
    }
}

/// `v[name](...args)` with `this` bound to `v`.
pub fn invoke(
    ctx: &mut EvalContext,
    v: &JsValue,
    name: &str,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let p = PropertyKey::from_name(name);
    match get_method(ctx, v, &p)? {
        Some(f) => f.call(ctx, v.clone(), args),
        None => Err(JErrorType::TypeError(format!("'{}' is not a function", p))),
    }
}

/// `v instanceof target`.
pub fn instance_of(
    ctx: &mut EvalContext,
    v: &JsValue,
    target: &JsValue,
) -> Result<bool, JErrorType> {
    let target = match target {
        JsValue::Object(o) => o,
        _ => {
            return Err(JErrorType::TypeError(format!(
                "Right-hand side of 'instanceof' is not an object: {}",
                target
            )))
        }
    };
    match v {
        JsValue::Object(o) => target.has_instance(ctx, o),
        _ => Ok(false),
    }
}

/// Whether `target` appears on the prototype chain of `instance`.
pub fn delegates_to(
    ctx: &mut EvalContext,
    instance: &JsObjectType,
    target: &JsObjectType,
) -> Result<bool, JErrorType> {
    let mut proto = instance.get_prototype(ctx)?;
    while let Some(p) = proto {
        if Rc::ptr_eq(&p, target) {
            return Ok(true);
        }
        proto = p.get_prototype(ctx)?;
    }
    Ok(false)
}
