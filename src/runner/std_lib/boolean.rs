//! Boolean built-in.

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::type_conversion::{to_boolean, PreferredType};
use crate::runner::ds::realm::{Realm, WellKnownIntrinsics};
use crate::runner::ds::value::JsValue;

/// Register the Boolean built-in with the realm.
pub fn register(realm: &Realm) {
    realm.define_constructor(
        "Boolean",
        1,
        boolean_constructor,
        WellKnownIntrinsics::BooleanPrototype,
    );
    let proto = WellKnownIntrinsics::BooleanPrototype;
    realm.define_method(proto, "toString", 0, boolean_to_string);
    realm.define_method(proto, "valueOf", 0, boolean_value_of);
}

fn this_boolean_value(ctx: &mut EvalContext, this: &JsValue) -> Result<bool, JErrorType> {
    match this {
        JsValue::Boolean(b) => Ok(*b),
        JsValue::Object(o) if o.get_class_name(ctx)? == "Boolean" => {
            match o.get_default_value(ctx, PreferredType::Default)? {
                JsValue::Boolean(b) => Ok(b),
                _ => Err(JErrorType::TypeError(
                    "Boolean.prototype.valueOf requires that 'this' be a Boolean".to_string(),
                )),
            }
        }
        _ => Err(JErrorType::TypeError(
            "Boolean.prototype.valueOf requires that 'this' be a Boolean".to_string(),
        )),
    }
}

fn boolean_constructor(
    _ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Boolean(
        args.first().map(to_boolean).unwrap_or(false),
    ))
}

fn boolean_to_string(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::String(this_boolean_value(ctx, &this)?.to_string()))
}

fn boolean_value_of(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Boolean(this_boolean_value(ctx, &this)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::operations::object::invoke;

    #[test]
    fn test_boolean_methods() {
        let mut ctx = EvalContext::new();
        assert_eq!(
            invoke(&mut ctx, &JsValue::from(true), "toString", vec![]).unwrap(),
            JsValue::from("true")
        );
        let boxed = JsValue::Object(ctx.to_object(&JsValue::from(false)).unwrap());
        assert_eq!(
            invoke(&mut ctx, &boxed, "valueOf", vec![]).unwrap(),
            JsValue::Boolean(false)
        );
        assert!(boolean_value_of(&mut ctx, JsValue::from("true"), vec![]).is_err());
    }

    #[test]
    fn test_constructor_coerces() {
        let mut ctx = EvalContext::new();
        assert_eq!(
            boolean_constructor(&mut ctx, JsValue::Undefined, vec![JsValue::from("x")]).unwrap(),
            JsValue::Boolean(true)
        );
        assert_eq!(
            boolean_constructor(&mut ctx, JsValue::Undefined, vec![]).unwrap(),
            JsValue::Boolean(false)
        );
    }
}
