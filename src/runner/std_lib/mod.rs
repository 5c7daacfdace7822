//! Standard library built-in objects.
//!
//! This module contains the built-ins a host needs to observe wrapped values:
//! the Object, String, Number and Boolean prototypes, a handful of global
//! functions and JSON serialization.

pub mod boolean;
pub mod core;
pub mod global;
pub mod json;
pub mod number;
pub mod object;
pub mod string;

pub use self::core::register_core_builtins;
