use std::fmt;
use std::fmt::{Display, Formatter};

use crate::runner::ds::value::JsValue;

/// Key of a keyed protocol operation. Rhino-style runtimes keep string and
/// integer lookups apart; `Int` is used for canonical array indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Str(String),
    Int(u32),
}
impl PropertyKey {
    /// Builds a key from a source-level property name, turning canonical
    /// index strings ("0", "17", but not "017" or "-1") into `Int`.
    pub fn from_name(name: &str) -> Self {
        match canonical_index(name) {
            Some(idx) => PropertyKey::Int(idx),
            None => PropertyKey::Str(name.to_string()),
        }
    }
}
impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Str(s) => write!(f, "{}", s),
            PropertyKey::Int(i) => write!(f, "{}", i),
        }
    }
}
impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::from_name(s)
    }
}
impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        PropertyKey::Int(i)
    }
}

fn canonical_index(name: &str) -> Option<u32> {
    if name.is_empty() || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    if !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse::<u32>().ok().filter(|i| *i != u32::MAX)
}

/// A data property slot. Accessor properties are not modelled.
#[derive(Debug, Clone)]
pub struct PropertyData {
    pub value: JsValue,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}
impl PropertyData {
    pub fn new(value: JsValue) -> Self {
        PropertyData {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Non-enumerable but otherwise open, used for built-in methods.
    pub fn hidden(value: JsValue) -> Self {
        PropertyData {
            value,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    pub fn read_only(value: JsValue) -> Self {
        PropertyData {
            value,
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }
}
