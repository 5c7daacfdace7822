//! # just-proxy - Transparent proxies for a JavaScript object model
//!
//! A small Rhino-style object model for embedding hosts:
//! - A dynamic-object protocol ([`runner::ds::object::JsObject`]) covering
//!   property access, prototype and parent-scope links, enumeration,
//!   default-value coercion and `instanceof`
//! - Ordinary objects, primitive wrappers and native functions built on it
//! - Transparent proxies that stand in for a lazily loaded value
//! - The few built-ins a host needs to observe wrapped values (Object, String,
//!   Number, Boolean, parseInt, parseFloat, isNaN, JSON.stringify)
//!
//! ## Quick Start
//!
//! ### Deferring an expensive value
//!
//! ```
//! use just_proxy::runner::context::EvalContext;
//! use just_proxy::runner::ds::object_property::PropertyKey;
//! use just_proxy::runner::ds::operations::object::get_v;
//! use just_proxy::runner::ds::transparent_proxy::TransparentProxy;
//! use just_proxy::runner::ds::value::JsValue;
//!
//! let mut ctx = EvalContext::new();
//! let proxy = TransparentProxy::new(|_| Ok(JsValue::from("string"))).into_object();
//! let value = JsValue::Object(proxy);
//!
//! // Nothing has been loaded yet; this read materializes the value.
//! let length = get_v(&mut ctx, &value, &PropertyKey::from("length")).unwrap();
//! assert_eq!(length, JsValue::from(6));
//! ```
//!
//! ### Calling built-ins on a proxy
//!
//! ```
//! use just_proxy::runner::context::EvalContext;
//! use just_proxy::runner::ds::operations::object::invoke;
//! use just_proxy::runner::ds::transparent_proxy::TransparentProxy;
//! use just_proxy::runner::ds::value::JsValue;
//!
//! let mut ctx = EvalContext::new();
//! let value = JsValue::from(TransparentProxy::new(|_| Ok(JsValue::from(1.23))));
//!
//! let text = invoke(&mut ctx, &value, "toString", vec![]).unwrap();
//! assert_eq!(text, JsValue::from("1.23"));
//!
//! let parse_int = ctx.get_global("parseInt").unwrap();
//! let parsed = parse_int
//!     .as_object()
//!     .unwrap()
//!     .call(&mut ctx, JsValue::Undefined, vec![value])
//!     .unwrap();
//! assert_eq!(parsed, JsValue::from(1));
//! ```
//!
//! ## Proxy Semantics
//!
//! 1. **Deferred**: the loader does not run when the proxy is created, only
//!    when the first protocol operation reaches it.
//!
//! 2. **Single load**: once a load succeeds, the value and the object it was
//!    coerced to are kept. The loader is never called again.
//!
//! 3. **Forwarding**: every protocol operation goes to the loaded object,
//!    except default-value coercion, which answers with the loaded value
//!    itself.
//!
//! 4. **Failures**: a failing loader surfaces its error to the caller. By
//!    default the next access retries; see
//!    [`runner::config::LoadFailurePolicy`].
//!
//! ## Architecture
//!
//! - **[`runner`]** - Object model and built-ins
//!   - **[`runner::ds`]** - Data structures (values, objects, proxies, realm)
//!   - **[`runner::ds::operations`]** - Abstract operations over the protocol
//!   - **[`runner::std_lib`]** - Built-in objects and functions
//!   - **[`runner::context`]** - Evaluation context and object coercion
//!   - **[`runner::config`]** - TOML runtime configuration

#[macro_use]
extern crate lazy_static;

pub mod runner;
