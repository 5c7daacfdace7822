//! Number built-in.
//!
//! Provides Number constructor, constants and prototype methods.

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::OrdinaryObject;
use crate::runner::ds::object_property::{PropertyData, PropertyKey};
use crate::runner::ds::operations::type_conversion::{
    number_to_string, to_integer, to_number, PreferredType,
};
use crate::runner::ds::realm::{Realm, WellKnownIntrinsics};
use crate::runner::ds::value::{JsNumberType, JsValue};

/// Register the Number built-in with the realm.
pub fn register(realm: &Realm) {
    let ctor = realm.define_constructor(
        "Number",
        1,
        number_constructor,
        WellKnownIntrinsics::NumberPrototype,
    );
    let base = ctor.get_object_base();
    for (name, value) in [
        ("MAX_VALUE", JsNumberType::Float(f64::MAX)),
        ("MIN_VALUE", JsNumberType::Float(f64::MIN_POSITIVE)),
        ("POSITIVE_INFINITY", JsNumberType::PositiveInfinity),
        ("NEGATIVE_INFINITY", JsNumberType::NegativeInfinity),
        ("NaN", JsNumberType::NaN),
    ] {
        base.define(
            PropertyKey::from(name),
            PropertyData::read_only(JsValue::Number(value)),
        );
    }

    let proto = WellKnownIntrinsics::NumberPrototype;
    realm.define_method(proto, "toString", 1, number_to_string_method);
    realm.define_method(proto, "valueOf", 0, number_value_of);
    realm.define_method(proto, "toFixed", 1, number_to_fixed);
}

/// thisNumberValue: a number primitive, or any object reporting class
/// `Number` whose default value is one.
fn this_number_value(ctx: &mut EvalContext, this: &JsValue) -> Result<JsNumberType, JErrorType> {
    match this {
        JsValue::Number(n) => Ok(n.clone()),
        JsValue::Object(o) if o.get_class_name(ctx)? == "Number" => {
            match o.get_default_value(ctx, PreferredType::Number)? {
                JsValue::Number(n) => Ok(n),
                _ => Err(JErrorType::TypeError(
                    "Number.prototype.valueOf requires that 'this' be a Number".to_string(),
                )),
            }
        }
        _ => Err(JErrorType::TypeError(
            "Number.prototype.valueOf requires that 'this' be a Number".to_string(),
        )),
    }
}

/// Number constructor.
fn number_constructor(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    match args.first() {
        None => Ok(JsValue::Number(JsNumberType::Integer(0))),
        Some(arg) => Ok(JsValue::Number(to_number(ctx, arg)?)),
    }
}

/// Number.prototype.toString
fn number_to_string_method(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let n = this_number_value(ctx, &this)?;
    let radix = match args.first() {
        None | Some(JsValue::Undefined) => 10,
        Some(arg) => to_integer(ctx, arg)?,
    };

    if !(2..=36).contains(&radix) {
        return Err(JErrorType::RangeError(
            "radix must be between 2 and 36".to_string(),
        ));
    }

    let result = match n {
        JsNumberType::Integer(i) if radix != 10 => format_radix(i as i128, radix as u32),
        // Fractional digits are dropped for non-decimal radixes.
        JsNumberType::Float(f) if radix != 10 && f.abs() < I128_LIMIT => {
            format_radix(f.trunc() as i128, radix as u32)
        }
        other => number_to_string(&other),
    };

    Ok(JsValue::String(result))
}

/// Number.prototype.valueOf
fn number_value_of(
    ctx: &mut EvalContext,
    this: JsValue,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Number(this_number_value(ctx, &this)?))
}

/// Number.prototype.toFixed
fn number_to_fixed(
    ctx: &mut EvalContext,
    this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let n = this_number_value(ctx, &this)?;
    let digits = match args.first() {
        None => 0,
        Some(arg) => to_integer(ctx, arg)?,
    };

    if !(0..=100).contains(&digits) {
        return Err(JErrorType::RangeError(
            "toFixed() digits argument must be between 0 and 100".to_string(),
        ));
    }
    let digits = digits as usize;

    let result = match n {
        JsNumberType::Integer(i) => format!("{:.1$}", i as f64, digits),
        JsNumberType::Float(f) => format!("{:.1$}", f, digits),
        other => number_to_string(&other),
    };

    Ok(JsValue::String(result))
}

/// Floats at or beyond this magnitude do not fit `i128` and are printed in
/// decimal form.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Format a number in a given radix.
fn format_radix(n: i128, radix: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let negative = n < 0;
    let mut magnitude = n.unsigned_abs();
    let radix = radix as u128;

    let mut result = String::new();
    while magnitude > 0 {
        result.push(DIGITS[(magnitude % radix) as usize] as char);
        magnitude /= radix;
    }

    if negative {
        result.push('-');
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::operations::object::invoke;

    #[test]
    fn test_to_string_radix() {
        let mut ctx = EvalContext::new();
        let n = JsValue::from(255);
        assert_eq!(
            invoke(&mut ctx, &n, "toString", vec![JsValue::from(16)]).unwrap(),
            JsValue::from("ff")
        );
        assert_eq!(
            invoke(&mut ctx, &JsValue::from(-5), "toString", vec![JsValue::from(2)]).unwrap(),
            JsValue::from("-101")
        );
        assert!(invoke(&mut ctx, &n, "toString", vec![JsValue::from(1)]).is_err());
    }

    #[test]
    fn test_to_string_radix_extremes() {
        let mut ctx = EvalContext::new();
        let binary = |ctx: &mut EvalContext, v: JsValue| {
            invoke(ctx, &v, "toString", vec![JsValue::from(2)]).unwrap()
        };
        assert_eq!(
            binary(&mut ctx, JsValue::from(-f64::MAX)),
            JsValue::String(number_to_string(&JsNumberType::Float(-f64::MAX)))
        );
        assert_eq!(
            binary(&mut ctx, JsValue::from(-(2f64.powi(100)))),
            JsValue::String(format!("-1{}", "0".repeat(100)))
        );
        assert_eq!(
            binary(&mut ctx, JsValue::from(i64::MIN)),
            JsValue::String(format!("-1{}", "0".repeat(63)))
        );
    }

    #[test]
    fn test_to_fixed() {
        let mut ctx = EvalContext::new();
        assert_eq!(
            invoke(&mut ctx, &JsValue::from(1.23), "toFixed", vec![JsValue::from(1)]).unwrap(),
            JsValue::from("1.2")
        );
        assert_eq!(
            invoke(&mut ctx, &JsValue::from(3), "toFixed", vec![JsValue::from(2)]).unwrap(),
            JsValue::from("3.00")
        );
    }

    #[test]
    fn test_value_of_requires_number() {
        let mut ctx = EvalContext::new();
        assert!(number_value_of(&mut ctx, JsValue::from("1"), vec![]).is_err());
        let boxed = JsValue::Object(ctx.to_object(&JsValue::from(7)).unwrap());
        assert_eq!(
            number_value_of(&mut ctx, boxed, vec![]).unwrap(),
            JsValue::from(7)
        );
    }

    #[test]
    fn test_constants() {
        let mut ctx = EvalContext::new();
        let number = ctx.get_global("Number").unwrap();
        let nan = crate::runner::ds::operations::object::get_v(
            &mut ctx,
            &number,
            &PropertyKey::from("NaN"),
        )
        .unwrap();
        assert_eq!(nan, JsValue::Number(JsNumberType::NaN));
    }
}
