//! Core built-ins registration.
//!
//! This module provides the function to install all core built-in objects
//! into a freshly created realm.

use crate::runner::ds::realm::Realm;

use super::boolean;
use super::global;
use super::json;
use super::number;
use super::object;
use super::string;

/// Register all core built-in objects with the realm.
pub fn register_core_builtins(realm: &Realm) {
    // Register in order (some may depend on Object)
    object::register(realm);
    string::register(realm);
    number::register(realm);
    boolean::register(realm);
    global::register(realm);
    json::register(realm);
}
