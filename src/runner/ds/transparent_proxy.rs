//! Transparent proxy around a lazily loaded value.
//!
//! A [`TransparentProxy`] can be handed to script code in place of a value
//! that is expensive or side-effecting to produce. Nothing is loaded until the
//! first protocol operation reaches the proxy; at that point the
//! [`ProxyLoader`] is invoked, its result is coerced to an object through
//! [`EvalContext::to_object`], and both are kept for the rest of the proxy's
//! life. Every later operation is forwarded to that object.
//!
//! Default-value coercion is the one operation that is not forwarded: it
//! answers with the loaded value itself, so a proxied `1.23` adds, compares
//! and prints like the number rather than like a boxed `Number`.
//!
//! ```
//! use just_proxy::runner::context::EvalContext;
//! use just_proxy::runner::ds::operations::arithmetic::add_values;
//! use just_proxy::runner::ds::transparent_proxy::TransparentProxy;
//! use just_proxy::runner::ds::value::JsValue;
//!
//! let mut ctx = EvalContext::new();
//! let proxy = TransparentProxy::new(|_| Ok(JsValue::from("string")));
//! let value = JsValue::from(proxy);
//!
//! let result = add_values(&mut ctx, &value, &JsValue::from(5)).unwrap();
//! assert_eq!(result, JsValue::from("string5"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::config::LoadFailurePolicy;
use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{JsObject, JsObjectType};
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::operations::type_conversion::PreferredType;
use crate::runner::ds::value::JsValue;

/// Produces the value standing behind a proxy.
///
/// Called at most once per proxy when it succeeds. A failing load is retried
/// on the next access unless the context is configured with
/// [`LoadFailurePolicy::Cache`].
pub trait ProxyLoader {
    fn load(&self, ctx: &mut EvalContext) -> Result<JsValue, JErrorType>;
}

impl<F> ProxyLoader for F
where
    F: Fn(&mut EvalContext) -> Result<JsValue, JErrorType>,
{
    fn load(&self, ctx: &mut EvalContext) -> Result<JsValue, JErrorType> {
        self(ctx)
    }
}

enum ProxyState {
    Unmaterialized,
    /// The loader or the coercion is running; guards against re-entry.
    Loading,
    Materialized {
        value: JsValue,
        scriptable: JsObjectType,
    },
    Failed(JErrorType),
}

pub struct TransparentProxy {
    loader: Box<dyn ProxyLoader>,
    state: RefCell<ProxyState>,
}
impl TransparentProxy {
    pub fn new<F>(load: F) -> Self
    where
        F: Fn(&mut EvalContext) -> Result<JsValue, JErrorType> + 'static,
    {
        Self::with_loader(load)
    }

    pub fn with_loader<L: ProxyLoader + 'static>(loader: L) -> Self {
        TransparentProxy {
            loader: Box::new(loader),
            state: RefCell::new(ProxyState::Unmaterialized),
        }
    }

    pub fn into_object(self) -> JsObjectType {
        Rc::new(self)
    }

    pub fn is_materialized(&self) -> bool {
        matches!(*self.state.borrow(), ProxyState::Materialized { .. })
    }

    /// The object all operations are forwarded to, loading it if needed.
    pub fn proxied_object(&self, ctx: &mut EvalContext) -> Result<JsObjectType, JErrorType> {
        self.load_if_unset(ctx)
    }

    /// The value returned by the loader, before coercion.
    pub fn proxied_value(&self, ctx: &mut EvalContext) -> Result<JsValue, JErrorType> {
        self.load_if_unset(ctx)?;
        match &*self.state.borrow() {
            ProxyState::Materialized { value, .. } => Ok(value.clone()),
            _ => Err(JErrorType::TypeError(
                "transparent proxy has no loaded value".to_string(),
            )),
        }
    }

    fn load_if_unset(&self, ctx: &mut EvalContext) -> Result<JsObjectType, JErrorType> {
        match &*self.state.borrow() {
            ProxyState::Materialized { scriptable, .. } => return Ok(scriptable.clone()),
            ProxyState::Loading => {
                return Err(JErrorType::TypeError(
                    "transparent proxy accessed while its value is being loaded".to_string(),
                ))
            }
            ProxyState::Failed(e) => return Err(e.clone()),
            ProxyState::Unmaterialized => {}
        }

        *self.state.borrow_mut() = ProxyState::Loading;
        let loaded = self.loader.load(ctx).and_then(|value| {
            let scriptable = ctx.to_object(&value)?;
            if std::ptr::addr_eq(Rc::as_ptr(&scriptable), self as *const Self) {
                return Err(JErrorType::TypeError(
                    "transparent proxy cannot load itself".to_string(),
                ));
            }
            // A proxy chain is resolved while this one is still `Loading`, so
            // a chain leading back here fails instead of recursing forever.
            if let Some(inner) = scriptable.as_transparent_proxy() {
                inner.load_if_unset(ctx)?;
            }
            Ok((value, scriptable))
        });

        let mut state = self.state.borrow_mut();
        match loaded {
            Ok((value, scriptable)) => {
                *state = ProxyState::Materialized {
                    value,
                    scriptable: scriptable.clone(),
                };
                Ok(scriptable)
            }
            Err(e) => {
                *state = match ctx.config().proxy.on_load_failure {
                    LoadFailurePolicy::Retry => ProxyState::Unmaterialized,
                    LoadFailurePolicy::Cache => ProxyState::Failed(e.clone()),
                };
                Err(e)
            }
        }
    }

    /// Lookups that start at the proxy start at the proxied object instead.
    fn resolve_start<'a>(
        &self,
        start: &'a JsObjectType,
        scriptable: &'a JsObjectType,
    ) -> &'a JsObjectType {
        if std::ptr::addr_eq(Rc::as_ptr(start), self as *const Self) {
            scriptable
        } else {
            start
        }
    }
}

impl From<TransparentProxy> for JsValue {
    fn from(proxy: TransparentProxy) -> Self {
        JsValue::Object(proxy.into_object())
    }
}

impl JsObject for TransparentProxy {
    fn get_class_name(&self, ctx: &mut EvalContext) -> Result<String, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.get_class_name(ctx)
    }

    fn get(
        &self,
        ctx: &mut EvalContext,
        property: &PropertyKey,
        start: &JsObjectType,
    ) -> Result<Option<JsValue>, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.get(ctx, property, self.resolve_start(start, &scriptable))
    }

    fn has(
        &self,
        ctx: &mut EvalContext,
        property: &PropertyKey,
        start: &JsObjectType,
    ) -> Result<bool, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.has(ctx, property, self.resolve_start(start, &scriptable))
    }

    fn put(
        &self,
        ctx: &mut EvalContext,
        property: PropertyKey,
        start: &JsObjectType,
        value: JsValue,
    ) -> Result<(), JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.put(ctx, property, self.resolve_start(start, &scriptable), value)
    }

    fn delete(&self, ctx: &mut EvalContext, property: &PropertyKey) -> Result<(), JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.delete(ctx, property)
    }

    fn get_prototype(&self, ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.get_prototype(ctx)
    }

    fn set_prototype(
        &self,
        ctx: &mut EvalContext,
        prototype: Option<JsObjectType>,
    ) -> Result<(), JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.set_prototype(ctx, prototype)
    }

    fn get_parent_scope(&self, ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.get_parent_scope(ctx)
    }

    fn set_parent_scope(
        &self,
        ctx: &mut EvalContext,
        parent: Option<JsObjectType>,
    ) -> Result<(), JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.set_parent_scope(ctx, parent)
    }

    fn get_ids(&self, ctx: &mut EvalContext) -> Result<Vec<PropertyKey>, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.get_ids(ctx)
    }

    fn get_default_value(
        &self,
        ctx: &mut EvalContext,
        _hint: PreferredType,
    ) -> Result<JsValue, JErrorType> {
        self.proxied_value(ctx)
    }

    fn has_instance(
        &self,
        ctx: &mut EvalContext,
        instance: &JsObjectType,
    ) -> Result<bool, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.has_instance(ctx, instance)
    }

    fn is_callable(&self, ctx: &mut EvalContext) -> Result<bool, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.is_callable(ctx)
    }

    fn call(
        &self,
        ctx: &mut EvalContext,
        this: JsValue,
        args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        let scriptable = self.load_if_unset(ctx)?;
        scriptable.call(ctx, this, args)
    }

    fn as_transparent_proxy(&self) -> Option<&TransparentProxy> {
        Some(self)
    }
}
