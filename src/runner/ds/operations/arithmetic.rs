use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::operations::type_conversion::{
    to_number, to_primitive, to_string, PreferredType,
};
use crate::runner::ds::value::{JsNumberType, JsValue};

type ValueResult = Result<JsValue, JErrorType>;

/// The `+` operator: concatenation as soon as either primitive is a string,
/// numeric addition otherwise.
pub fn add_values(ctx: &mut EvalContext, left: &JsValue, right: &JsValue) -> ValueResult {
    let lprim = to_primitive(ctx, left, PreferredType::Default)?;
    let rprim = to_primitive(ctx, right, PreferredType::Default)?;
    if matches!(lprim, JsValue::String(_)) || matches!(rprim, JsValue::String(_)) {
        let l = to_string(ctx, &lprim)?;
        let r = to_string(ctx, &rprim)?;
        return Ok(JsValue::String(l + &r));
    }
    apply_numeric_op(ctx, &lprim, &rprim, i64::checked_add, |a, b| a + b)
}

fn apply_numeric_op<F, G>(
    ctx: &mut EvalContext,
    left: &JsValue,
    right: &JsValue,
    int_op: F,
    float_op: G,
) -> ValueResult
where
    F: Fn(i64, i64) -> Option<i64>,
    G: Fn(f64, f64) -> f64,
{
    let l = to_number(ctx, left)?;
    let r = to_number(ctx, right)?;
    if let (JsNumberType::Integer(a), JsNumberType::Integer(b)) = (&l, &r) {
        if let Some(result) = int_op(*a, *b) {
            return Ok(JsValue::Number(JsNumberType::Integer(result)));
        }
    }
    Ok(JsValue::Number(JsNumberType::from_f64(float_op(
        l.as_f64(),
        r.as_f64(),
    ))))
}
