//! JSON built-in object.
//!
//! Provides JSON.stringify. Objects are walked through the object protocol
//! only (`get_ids` then property reads), so any implementor serializes the
//! same way an ordinary object does.

use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{JsObjectType, OrdinaryObject};
use crate::runner::ds::operations::object::get;
use crate::runner::ds::operations::type_conversion::{
    number_to_string, to_integer, to_number, to_primitive, to_string, PreferredType,
};
use crate::runner::ds::realm::Realm;
use crate::runner::ds::value::{JsNumberType, JsValue};

const MAX_GAP: usize = 10;

/// Register the JSON object with the realm.
pub fn register(realm: &Realm) {
    let json = realm.create_object();
    realm.define_method_on(json.get_object_base(), "stringify", 3, json_stringify);
    realm.define_global("JSON", JsValue::Object(json));
}

/// JSON.stringify - Convert a value to its JSON text, or `undefined` when the
/// value has no JSON form.
fn json_stringify(
    ctx: &mut EvalContext,
    _this: JsValue,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    let value = match args.first() {
        Some(v) => v.clone(),
        None => return Ok(JsValue::Undefined),
    };
    let gap = match args.get(2) {
        Some(JsValue::Number(_)) => {
            let n = to_integer(ctx, &args[2])?.clamp(0, MAX_GAP as i64);
            " ".repeat(n as usize)
        }
        Some(JsValue::String(s)) => s.chars().take(MAX_GAP).collect(),
        _ => " ".repeat(ctx.config().json.indent.min(MAX_GAP)),
    };

    let mut serializer = Serializer {
        gap,
        indent: String::new(),
        stack: vec![],
    };
    Ok(match serializer.serialize(ctx, &value)? {
        Some(text) => JsValue::String(text),
        None => JsValue::Undefined,
    })
}

struct Serializer {
    gap: String,
    indent: String,
    stack: Vec<JsObjectType>,
}

impl Serializer {
    /// `None` means the value is skipped (undefined or a function).
    fn serialize(&mut self, ctx: &mut EvalContext, value: &JsValue) -> Result<Option<String>, JErrorType> {
        let value = match value {
            JsValue::Object(o) => match o.get_class_name(ctx)?.as_str() {
                "Number" => JsValue::Number(to_number(ctx, value)?),
                "String" => JsValue::String(to_string(ctx, value)?),
                "Boolean" => to_primitive(ctx, value, PreferredType::Default)?,
                _ => value.clone(),
            },
            _ => value.clone(),
        };

        Ok(match &value {
            JsValue::Undefined => None,
            JsValue::Null => Some("null".to_string()),
            JsValue::Boolean(b) => Some(b.to_string()),
            JsValue::Number(n) => Some(match n {
                JsNumberType::NaN
                | JsNumberType::PositiveInfinity
                | JsNumberType::NegativeInfinity => "null".to_string(),
                _ => number_to_string(n),
            }),
            JsValue::String(s) => Some(stringify_string(s)),
            JsValue::Object(o) => {
                if o.is_callable(ctx)? {
                    None
                } else {
                    Some(self.serialize_object(ctx, o)?)
                }
            }
        })
    }

    fn serialize_object(&mut self, ctx: &mut EvalContext, o: &JsObjectType) -> Result<String, JErrorType> {
        if self
            .stack
            .iter()
            .any(|seen| std::ptr::addr_eq(Rc::as_ptr(seen), Rc::as_ptr(o)))
        {
            return Err(JErrorType::TypeError(
                "Converting circular structure to JSON".to_string(),
            ));
        }
        self.stack.push(o.clone());
        let stepback = self.indent.clone();
        self.indent.push_str(&self.gap);

        let mut members = vec![];
        for key in o.get_ids(ctx)? {
            let value = get(ctx, o, &key)?;
            if let Some(text) = self.serialize(ctx, &value)? {
                let separator = if self.gap.is_empty() { ":" } else { ": " };
                members.push(format!(
                    "{}{}{}",
                    stringify_string(&key.to_string()),
                    separator,
                    text
                ));
            }
        }

        let result = if members.is_empty() {
            "{}".to_string()
        } else if self.gap.is_empty() {
            format!("{{{}}}", members.join(","))
        } else {
            let separator = format!(",\n{}", self.indent);
            format!(
                "{{\n{}{}\n{}}}",
                self.indent,
                members.join(&separator),
                stepback
            )
        };

        self.stack.pop();
        self.indent = stepback;
        Ok(result)
    }
}

/// Stringify a string with proper escaping.
fn stringify_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');

    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{0008}' => result.push_str("\\b"),
            '\u{000C}' => result.push_str("\\f"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }

    result.push('"');
    result
}
