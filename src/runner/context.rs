//! Evaluation context handed to every protocol operation and native function.

use std::rc::Rc;

use tracing::trace;

use crate::runner::config::RuntimeConfig;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::number_object::{BooleanObject, NumberObject};
use crate::runner::ds::object::{allocate, JsObjectType};
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::object::{get, put_property};
use crate::runner::ds::realm::{Realm, WellKnownIntrinsics};
use crate::runner::ds::string_object::StringObject;
use crate::runner::ds::value::JsValue;

/// Converts an arbitrary value into an object implementing the protocol.
///
/// Embedders swap this to change how host values are boxed, for example to
/// hand back their own protocol implementors for certain values.
pub trait ObjectCoercion {
    fn to_object(&self, ctx: &mut EvalContext, value: &JsValue) -> Result<JsObjectType, JErrorType>;
}

/// ToObject: primitives are boxed with the realm's prototypes, objects pass
/// through unchanged.
pub struct StandardCoercion;

impl ObjectCoercion for StandardCoercion {
    fn to_object(&self, ctx: &mut EvalContext, value: &JsValue) -> Result<JsObjectType, JErrorType> {
        let realm = ctx.realm();
        match value {
            JsValue::Undefined | JsValue::Null => Err(JErrorType::TypeError(format!(
                "'{}' cannot be converted to object",
                value
            ))),
            JsValue::Boolean(b) => Ok(allocate(BooleanObject::new(
                *b,
                Some(realm.intrinsic(WellKnownIntrinsics::BooleanPrototype)),
            ))),
            JsValue::String(s) => Ok(allocate(StringObject::new(
                s.clone(),
                Some(realm.intrinsic(WellKnownIntrinsics::StringPrototype)),
            ))),
            JsValue::Number(n) => Ok(allocate(NumberObject::new(
                n.clone(),
                Some(realm.intrinsic(WellKnownIntrinsics::NumberPrototype)),
            ))),
            JsValue::Object(o) => Ok(o.clone()),
        }
    }
}

pub struct EvalContext {
    realm: Rc<Realm>,
    config: RuntimeConfig,
    coercion: Rc<dyn ObjectCoercion>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        EvalContext {
            realm: Rc::new(Realm::new()),
            config,
            coercion: Rc::new(StandardCoercion),
        }
    }

    pub fn with_coercion(mut self, coercion: Rc<dyn ObjectCoercion>) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn realm(&self) -> Rc<Realm> {
        self.realm.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn global_object(&self) -> JsObjectType {
        self.realm.global_object()
    }

    pub fn to_object(&mut self, value: &JsValue) -> Result<JsObjectType, JErrorType> {
        trace!(value = %value, "coercing value to object");
        let coercion = self.coercion.clone();
        coercion.to_object(self, value)
    }

    /// Reads a property of the global object; `undefined` when absent.
    pub fn get_global(&mut self, name: &str) -> Result<JsValue, JErrorType> {
        let global = self.global_object();
        get(self, &global, &PropertyKey::from_name(name))
    }

    pub fn set_global(&mut self, name: &str, value: JsValue) -> Result<(), JErrorType> {
        let global = self.global_object();
        put_property(self, &global, PropertyKey::from_name(name), value)
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
