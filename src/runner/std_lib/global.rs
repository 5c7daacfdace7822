//! Global functions: parseInt, parseFloat and isNaN.

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::NativeFn;
use crate::runner::ds::operations::type_conversion::{to_integer, to_number, to_string};
use crate::runner::ds::realm::Realm;
use crate::runner::ds::value::{JsNumberType, JsValue};

/// Register the global functions with the realm.
pub fn register(realm: &Realm) {
    for (name, arity, f) in [
        ("parseInt", 2, global_parse_int as NativeFn),
        ("parseFloat", 1, global_parse_float as NativeFn),
        ("isNaN", 1, global_is_nan as NativeFn),
    ] {
        realm.define_global(name, JsValue::Object(realm.create_function(name, arity, f)));
    }
    realm.define_global("NaN", JsValue::Number(JsNumberType::NaN));
    realm.define_global("Infinity", JsValue::Number(JsNumberType::PositiveInfinity));
    realm.define_global("undefined", JsValue::Undefined);
}

/// parseInt - Parse the longest integer prefix of the argument's string form.
fn global_parse_int(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let input = to_string(ctx, args.first().unwrap_or(&JsValue::Undefined))?;
    let mut s = input.trim_start();

    let negative = s.starts_with('-');
    if negative || s.starts_with('+') {
        s = &s[1..];
    }

    let mut radix = match args.get(1) {
        None | Some(JsValue::Undefined) => 0,
        Some(r) => to_integer(ctx, r)?,
    };
    if radix != 0 && !(2..=36).contains(&radix) {
        return Ok(JsValue::Number(JsNumberType::NaN));
    }
    if radix == 0 || radix == 16 {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            s = rest;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }

    let digits: String = s
        .chars()
        .take_while(|c| c.is_digit(radix as u32))
        .collect();
    if digits.is_empty() {
        return Ok(JsValue::Number(JsNumberType::NaN));
    }

    let value = match i64::from_str_radix(&digits, radix as u32) {
        Ok(i) => JsNumberType::Integer(if negative { -i } else { i }),
        Err(_) => {
            // Too wide for i64; accumulate as a float.
            let f = digits.chars().fold(0.0f64, |acc, c| {
                acc * radix as f64 + c.to_digit(radix as u32).unwrap_or(0) as f64
            });
            JsNumberType::from_f64(if negative { -f } else { f })
        }
    };
    Ok(JsValue::Number(value))
}

/// parseFloat - Parse the longest decimal literal prefix of the argument's
/// string form.
fn global_parse_float(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let input = to_string(ctx, args.first().unwrap_or(&JsValue::Undefined))?;
    let s = input.trim_start();

    for (literal, value) in [
        ("Infinity", JsNumberType::PositiveInfinity),
        ("+Infinity", JsNumberType::PositiveInfinity),
        ("-Infinity", JsNumberType::NegativeInfinity),
    ] {
        if s.starts_with(literal) {
            return Ok(JsValue::Number(value));
        }
    }

    let end = float_prefix_len(s);
    match s[..end].parse::<f64>() {
        Ok(f) => Ok(JsValue::Number(JsNumberType::from_f64(f))),
        Err(_) => Ok(JsValue::Number(JsNumberType::NaN)),
    }
}

/// Byte length of the longest `[+-]digits[.digits][e[+-]digits]` prefix.
fn float_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        if mantissa_digits > 0 {
            i = j;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// isNaN - Coerces its argument before testing.
fn global_is_nan(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let n = to_number(ctx, args.first().unwrap_or(&JsValue::Undefined))?;
    Ok(JsValue::Boolean(matches!(n, JsNumberType::NaN)))
}
