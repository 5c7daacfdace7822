//! Tests for transparent proxies.
//!
//! These tests drive proxies the way a host would: through the object
//! protocol, the abstract operations and the built-ins.

extern crate just_proxy;

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use just_proxy::runner::config::{LoadFailurePolicy, RuntimeConfig};
use just_proxy::runner::context::{EvalContext, ObjectCoercion};
use just_proxy::runner::ds::error::JErrorType;
use just_proxy::runner::ds::object::{allocate, CoreObject, JsObject, JsObjectType};
use just_proxy::runner::ds::object_property::PropertyKey;
use just_proxy::runner::ds::operations::arithmetic::add_values;
use just_proxy::runner::ds::operations::object::{get, get_v, instance_of, invoke, put_property};
use just_proxy::runner::ds::operations::type_conversion::{to_string, PreferredType};
use just_proxy::runner::ds::transparent_proxy::TransparentProxy;
use just_proxy::runner::ds::value::{JsNumberType, JsValue};

/// A proxy over `value` together with a count of loader invocations.
fn counted_proxy(value: JsValue) -> (Rc<TransparentProxy>, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let proxy = TransparentProxy::new(move |_: &mut EvalContext| {
        counter.set(counter.get() + 1);
        Ok(value.clone())
    });
    (Rc::new(proxy), calls)
}

fn as_value(proxy: &Rc<TransparentProxy>) -> JsValue {
    let obj: JsObjectType = proxy.clone();
    JsValue::Object(obj)
}

fn call_global(ctx: &mut EvalContext, name: &str, args: Vec<JsValue>) -> JsValue {
    let f = ctx.get_global(name).unwrap();
    f.as_object()
        .unwrap()
        .call(ctx, JsValue::Undefined, args)
        .unwrap()
}

fn stringify(ctx: &mut EvalContext, value: JsValue) -> JsValue {
    let json = ctx.get_global("JSON").unwrap();
    invoke(ctx, &json, "stringify", vec![value]).unwrap()
}

/// Counts reads of `i`; refuses every mutation.
struct TestScriptable {
    i: Cell<i64>,
}

impl TestScriptable {
    fn new() -> Self {
        TestScriptable { i: Cell::new(0) }
    }
}

fn unsupported<T>() -> Result<T, JErrorType> {
    Err(JErrorType::TypeError("unsupported operation".to_string()))
}

impl JsObject for TestScriptable {
    fn get_class_name(&self, _ctx: &mut EvalContext) -> Result<String, JErrorType> {
        Ok("TestScriptable".to_string())
    }

    fn get(
        &self,
        _ctx: &mut EvalContext,
        property: &PropertyKey,
        _start: &JsObjectType,
    ) -> Result<Option<JsValue>, JErrorType> {
        if property == &PropertyKey::from("i") {
            let i = self.i.get();
            self.i.set(i + 1);
            Ok(Some(JsValue::from(i)))
        } else {
            Ok(None)
        }
    }

    fn has(
        &self,
        _ctx: &mut EvalContext,
        property: &PropertyKey,
        _start: &JsObjectType,
    ) -> Result<bool, JErrorType> {
        Ok(property == &PropertyKey::from("i"))
    }

    fn put(
        &self,
        _ctx: &mut EvalContext,
        _property: PropertyKey,
        _start: &JsObjectType,
        _value: JsValue,
    ) -> Result<(), JErrorType> {
        unsupported()
    }

    fn delete(&self, _ctx: &mut EvalContext, _property: &PropertyKey) -> Result<(), JErrorType> {
        unsupported()
    }

    fn get_prototype(&self, _ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType> {
        Ok(None)
    }

    fn set_prototype(
        &self,
        _ctx: &mut EvalContext,
        _prototype: Option<JsObjectType>,
    ) -> Result<(), JErrorType> {
        unsupported()
    }

    fn get_parent_scope(&self, _ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType> {
        unsupported()
    }

    fn set_parent_scope(
        &self,
        _ctx: &mut EvalContext,
        _parent: Option<JsObjectType>,
    ) -> Result<(), JErrorType> {
        unsupported()
    }

    fn get_ids(&self, _ctx: &mut EvalContext) -> Result<Vec<PropertyKey>, JErrorType> {
        Ok(vec![PropertyKey::from("i")])
    }

    fn get_default_value(
        &self,
        _ctx: &mut EvalContext,
        _hint: PreferredType,
    ) -> Result<JsValue, JErrorType> {
        unsupported()
    }

    fn has_instance(
        &self,
        _ctx: &mut EvalContext,
        _instance: &JsObjectType,
    ) -> Result<bool, JErrorType> {
        unsupported()
    }
}

// ============================================================================
// Materialization
// ============================================================================

mod materialization_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loader_runs_once_across_operations() {
        let mut ctx = EvalContext::new();
        let (proxy, calls) = counted_proxy(JsValue::from("abc"));
        let value = as_value(&proxy);

        get_v(&mut ctx, &value, &PropertyKey::from("length")).unwrap();
        let obj: JsObjectType = proxy.clone();
        proxy.has(&mut ctx, &PropertyKey::from(0), &obj).unwrap();
        proxy.get_ids(&mut ctx).unwrap();
        proxy.get_class_name(&mut ctx).unwrap();
        proxy.get_prototype(&mut ctx).unwrap();
        add_values(&mut ctx, &value, &JsValue::from(1)).unwrap();
        invoke(&mut ctx, &value, "toUpperCase", vec![]).unwrap();
        stringify(&mut ctx, value.clone());

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_nothing_is_loaded_until_first_operation() {
        let mut ctx = EvalContext::new();
        let (proxy, calls) = counted_proxy(JsValue::from(1.23));

        ctx.set_global("test", as_value(&proxy)).unwrap();
        let read_back = ctx.get_global("test").unwrap();
        assert!(read_back.is_object());
        assert!(!proxy.is_materialized());
        assert_eq!(calls.get(), 0);

        get_v(&mut ctx, &read_back, &PropertyKey::from("anything")).unwrap();
        assert!(proxy.is_materialized());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let mut ctx = EvalContext::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let proxy = TransparentProxy::new(move |_: &mut EvalContext| {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                Err(JErrorType::ReferenceError("not ready".to_string()))
            } else {
                Ok(JsValue::from("ready"))
            }
        })
        .into_object();

        let err = proxy.get_class_name(&mut ctx).unwrap_err();
        assert_eq!(err, JErrorType::ReferenceError("not ready".to_string()));
        assert_eq!(proxy.get_class_name(&mut ctx).unwrap(), "String");
        assert_eq!(calls.get(), 2);

        proxy.get_ids(&mut ctx).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failed_load_is_cached_when_configured() {
        let mut config = RuntimeConfig::default();
        config.proxy.on_load_failure = LoadFailurePolicy::Cache;
        let mut ctx = EvalContext::with_config(config);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let proxy = TransparentProxy::new(move |_: &mut EvalContext| {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                Err(JErrorType::RangeError("boom".to_string()))
            } else {
                Ok(JsValue::from(1))
            }
        })
        .into_object();

        let first = proxy.get_class_name(&mut ctx).unwrap_err();
        let second = proxy.get_ids(&mut ctx).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_uncoercible_value_is_retried() {
        let mut ctx = EvalContext::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let proxy = TransparentProxy::new(move |_: &mut EvalContext| {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                Ok(JsValue::Undefined)
            } else {
                Ok(JsValue::from(5))
            }
        })
        .into_object();

        let err = proxy.get_class_name(&mut ctx).unwrap_err();
        assert!(matches!(err, JErrorType::TypeError(_)));
        assert_eq!(calls.get(), 1);

        assert_eq!(proxy.get_class_name(&mut ctx).unwrap(), "Number");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_proxied_object_is_the_coerced_delegate() {
        let mut ctx = EvalContext::new();
        let delegate: JsObjectType = ctx.realm().create_object();
        let (proxy, calls) = counted_proxy(JsValue::Object(delegate.clone()));

        let first = proxy.proxied_object(&mut ctx).unwrap();
        let second = proxy.proxied_object(&mut ctx).unwrap();
        assert!(Rc::ptr_eq(&first, &delegate));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);

        let (boxed, _) = counted_proxy(JsValue::from("abc"));
        let wrapper = boxed.proxied_object(&mut ctx).unwrap();
        assert_eq!(wrapper.get_class_name(&mut ctx).unwrap(), "String");
        assert_eq!(boxed.proxied_value(&mut ctx).unwrap(), JsValue::from("abc"));
    }

    #[test]
    fn test_loader_sees_the_calling_context() {
        let mut ctx = EvalContext::new();
        ctx.set_global("seed", JsValue::from(41)).unwrap();
        let proxy = TransparentProxy::new(|ctx: &mut EvalContext| {
            let seed = ctx.get_global("seed")?;
            add_values(ctx, &seed, &JsValue::from(1))
        });
        let value = JsValue::from(proxy);
        assert_eq!(
            add_values(&mut ctx, &value, &JsValue::from(0)).unwrap(),
            JsValue::from(42)
        );
    }
}

// ============================================================================
// Forwarding
// ============================================================================

mod forwarding_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_object(ctx: &mut EvalContext) -> JsObjectType {
        let o: JsObjectType = ctx.realm().create_object();
        put_property(ctx, &o, PropertyKey::from("a"), JsValue::from(1)).unwrap();
        put_property(ctx, &o, PropertyKey::from(2), JsValue::from("two")).unwrap();
        put_property(ctx, &o, PropertyKey::from("b"), JsValue::Null).unwrap();
        o
    }

    #[test]
    fn test_results_match_the_delegate() {
        let mut ctx = EvalContext::new();
        let direct = sample_object(&mut ctx);
        let wrapped = sample_object(&mut ctx);
        let (proxy, _) = counted_proxy(JsValue::Object(wrapped));
        let proxy: JsObjectType = proxy;

        let keys = [
            PropertyKey::from("a"),
            PropertyKey::from(2),
            PropertyKey::from("b"),
            PropertyKey::from("missing"),
        ];
        for key in &keys {
            assert_eq!(
                proxy.get(&mut ctx, key, &proxy).unwrap(),
                direct.get(&mut ctx, key, &direct).unwrap()
            );
            assert_eq!(
                proxy.has(&mut ctx, key, &proxy).unwrap(),
                direct.has(&mut ctx, key, &direct).unwrap()
            );
        }
        assert_eq!(proxy.get_ids(&mut ctx).unwrap(), direct.get_ids(&mut ctx).unwrap());
        assert_eq!(
            proxy.get_class_name(&mut ctx).unwrap(),
            direct.get_class_name(&mut ctx).unwrap()
        );

        proxy.delete(&mut ctx, &PropertyKey::from("a")).unwrap();
        direct.delete(&mut ctx, &PropertyKey::from("a")).unwrap();
        assert_eq!(proxy.get_ids(&mut ctx).unwrap(), direct.get_ids(&mut ctx).unwrap());
        assert_eq!(
            proxy.get(&mut ctx, &PropertyKey::from("a"), &proxy).unwrap(),
            None
        );
    }

    #[test]
    fn test_writes_land_on_the_delegate() {
        let mut ctx = EvalContext::new();
        let delegate: JsObjectType = ctx.realm().create_object();
        let (proxy, _) = counted_proxy(JsValue::Object(delegate.clone()));
        let proxy: JsObjectType = proxy;

        put_property(&mut ctx, &proxy, PropertyKey::from("x"), JsValue::from(7)).unwrap();
        assert_eq!(get(&mut ctx, &proxy, &PropertyKey::from("x")).unwrap(), JsValue::from(7));
        assert_eq!(
            delegate.get(&mut ctx, &PropertyKey::from("x"), &delegate).unwrap(),
            Some(JsValue::from(7))
        );

        put_property(&mut ctx, &proxy, PropertyKey::from("x"), JsValue::from(8)).unwrap();
        assert_eq!(get(&mut ctx, &delegate, &PropertyKey::from("x")).unwrap(), JsValue::from(8));
    }

    #[test]
    fn test_index_keys_write_and_delete_through_the_proxy() {
        let mut ctx = EvalContext::new();
        let delegate: JsObjectType = ctx.realm().create_object();
        let (proxy, _) = counted_proxy(JsValue::Object(delegate.clone()));
        let proxy: JsObjectType = proxy;

        proxy
            .put(&mut ctx, PropertyKey::from(0), &proxy, JsValue::from("zero"))
            .unwrap();
        assert_eq!(
            delegate.get(&mut ctx, &PropertyKey::from(0), &delegate).unwrap(),
            Some(JsValue::from("zero"))
        );
        assert_eq!(
            get(&mut ctx, &proxy, &PropertyKey::from("0")).unwrap(),
            JsValue::from("zero")
        );

        proxy.delete(&mut ctx, &PropertyKey::from(0)).unwrap();
        assert_eq!(
            delegate.get(&mut ctx, &PropertyKey::from(0), &delegate).unwrap(),
            None
        );
        assert!(!proxy.has(&mut ctx, &PropertyKey::from(0), &proxy).unwrap());
    }

    #[test]
    fn test_string_indices_are_read_only_through_the_proxy() {
        let mut ctx = EvalContext::new();
        let (proxy, _) = counted_proxy(JsValue::from("str"));
        let value = as_value(&proxy);
        let obj: JsObjectType = proxy.clone();

        assert_eq!(
            get_v(&mut ctx, &value, &PropertyKey::from("0")).unwrap(),
            JsValue::from("s")
        );
        put_property(&mut ctx, &obj, PropertyKey::from(0), JsValue::from("x")).unwrap();
        obj.delete(&mut ctx, &PropertyKey::from(0)).unwrap();
        assert_eq!(
            get_v(&mut ctx, &value, &PropertyKey::from(0)).unwrap(),
            JsValue::from("s")
        );
    }

    #[test]
    fn test_stateful_delegate_reads_and_serialization() {
        let mut ctx = EvalContext::new();
        let scriptable: JsObjectType = Rc::new(TestScriptable::new());
        let value = JsValue::from(TransparentProxy::new(move |_: &mut EvalContext| {
            Ok(JsValue::Object(scriptable.clone()))
        }));
        ctx.set_global("test", value).unwrap();

        for expected in 0..3 {
            let test = ctx.get_global("test").unwrap();
            assert_eq!(
                get_v(&mut ctx, &test, &PropertyKey::from("i")).unwrap(),
                JsValue::from(expected)
            );
        }

        let test = ctx.get_global("test").unwrap();
        assert_eq!(stringify(&mut ctx, test), JsValue::from("{\"i\":3}"));
    }

    #[test]
    fn test_delegate_errors_pass_through_unchanged() {
        let mut ctx = EvalContext::new();
        let proxy = TransparentProxy::new(|_: &mut EvalContext| {
            let scriptable: JsObjectType = Rc::new(TestScriptable::new());
            Ok(JsValue::Object(scriptable))
        })
        .into_object();

        let expected = JErrorType::TypeError("unsupported operation".to_string());
        assert_eq!(
            proxy
                .put(&mut ctx, PropertyKey::from("i"), &proxy, JsValue::from(1))
                .unwrap_err(),
            expected
        );
        assert_eq!(
            proxy.delete(&mut ctx, &PropertyKey::from("i")).unwrap_err(),
            expected
        );
        assert_eq!(proxy.get_parent_scope(&mut ctx).err(), Some(expected.clone()));
        assert_eq!(
            proxy.set_prototype(&mut ctx, None).unwrap_err(),
            expected
        );
    }

    #[test]
    fn test_prototype_and_parent_scope_are_forwarded() {
        let mut ctx = EvalContext::new();
        let delegate: JsObjectType = ctx.realm().create_object();
        let proxy = {
            let delegate = delegate.clone();
            TransparentProxy::new(move |_: &mut EvalContext| Ok(JsValue::Object(delegate.clone())))
                .into_object()
        };
        let proto: JsObjectType = ctx.realm().create_object();
        let scope = ctx.global_object();

        proxy.set_prototype(&mut ctx, Some(proto.clone())).unwrap();
        proxy.set_parent_scope(&mut ctx, Some(scope.clone())).unwrap();

        let seen_proto = delegate.get_prototype(&mut ctx).unwrap().unwrap();
        assert!(Rc::ptr_eq(&seen_proto, &proto));
        let seen_scope = proxy.get_parent_scope(&mut ctx).unwrap().unwrap();
        assert!(Rc::ptr_eq(&seen_scope, &scope));

        put_property(&mut ctx, &proto, PropertyKey::from("inherited"), JsValue::from(true)).unwrap();
        assert_eq!(
            get(&mut ctx, &proxy, &PropertyKey::from("inherited")).unwrap(),
            JsValue::from(true)
        );
    }

    #[test]
    fn test_instance_of_through_a_proxy() {
        let mut ctx = EvalContext::new();
        let string_ctor = ctx.get_global("String").unwrap();
        let object_ctor = ctx.get_global("Object").unwrap();
        let number_ctor = ctx.get_global("Number").unwrap();
        let value = JsValue::from(TransparentProxy::new(|_: &mut EvalContext| {
            Ok(JsValue::from("abc"))
        }));

        assert!(instance_of(&mut ctx, &value, &string_ctor).unwrap());
        assert!(instance_of(&mut ctx, &value, &object_ctor).unwrap());
        assert!(!instance_of(&mut ctx, &value, &number_ctor).unwrap());

        // The proxy may stand for the constructor as well.
        let ctor_proxy = {
            let ctor = string_ctor.clone();
            JsValue::from(TransparentProxy::new(move |_: &mut EvalContext| Ok(ctor.clone())))
        };
        let boxed = JsValue::Object(ctx.to_object(&JsValue::from("x")).unwrap());
        assert!(instance_of(&mut ctx, &boxed, &ctor_proxy).unwrap());
    }

    #[test]
    fn test_callable_delegate() {
        let mut ctx = EvalContext::new();
        let parse_int = ctx.get_global("parseInt").unwrap();
        let proxy = TransparentProxy::new(move |_: &mut EvalContext| Ok(parse_int.clone()))
            .into_object();

        assert!(proxy.is_callable(&mut ctx).unwrap());
        assert_eq!(
            proxy
                .call(&mut ctx, JsValue::Undefined, vec![JsValue::from("12px")])
                .unwrap(),
            JsValue::from(12)
        );
    }
}

// ============================================================================
// Coercion
// ============================================================================

mod coercion_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_number_default_value_is_the_raw_value() {
        let mut ctx = EvalContext::new();
        let (proxy, _) = counted_proxy(JsValue::from(1.23));

        assert_eq!(
            proxy.get_default_value(&mut ctx, PreferredType::Number).unwrap(),
            JsValue::from(1.23)
        );
        assert_eq!(to_string(&mut ctx, &as_value(&proxy)).unwrap(), "1.23");
    }

    #[test]
    fn test_number_scenario() {
        let mut ctx = EvalContext::new();
        let (proxy, _) = counted_proxy(JsValue::from(1.23));
        ctx.set_global("test", as_value(&proxy)).unwrap();
        let test = ctx.get_global("test").unwrap();

        assert_eq!(
            add_values(&mut ctx, &test, &JsValue::from(5)).unwrap(),
            JsValue::from(6.23)
        );
        assert_eq!(
            get_v(&mut ctx, &test, &PropertyKey::from("length")).unwrap(),
            JsValue::Undefined
        );
        assert_eq!(
            invoke(&mut ctx, &test, "toString", vec![]).unwrap(),
            JsValue::from("1.23")
        );
        assert_eq!(stringify(&mut ctx, test.clone()), JsValue::from("1.23"));
        assert_eq!(
            call_global(&mut ctx, "parseInt", vec![test.clone()]),
            JsValue::from(1)
        );

        let sum = add_values(&mut ctx, &test, &JsValue::from(10)).unwrap();
        ctx.set_global("test", sum).unwrap();
        assert_eq!(ctx.get_global("test").unwrap(), JsValue::from(11.23));
    }

    #[test]
    fn test_string_scenario() {
        let mut ctx = EvalContext::new();
        let (proxy, _) = counted_proxy(JsValue::from("string"));
        ctx.set_global("test", as_value(&proxy)).unwrap();
        let test = ctx.get_global("test").unwrap();

        assert_eq!(
            add_values(&mut ctx, &test, &JsValue::from(5)).unwrap(),
            JsValue::from("string5")
        );
        assert_eq!(
            get_v(&mut ctx, &test, &PropertyKey::from("length")).unwrap(),
            JsValue::from(6)
        );
        assert_eq!(
            invoke(&mut ctx, &test, "toString", vec![]).unwrap(),
            JsValue::from("string")
        );
        assert_eq!(stringify(&mut ctx, test.clone()), JsValue::from("\"string\""));
        assert_eq!(
            call_global(&mut ctx, "parseInt", vec![test.clone()]),
            JsValue::Number(JsNumberType::NaN)
        );

        let sum = add_values(&mut ctx, &test, &JsValue::from(10)).unwrap();
        ctx.set_global("test", sum).unwrap();
        assert_eq!(ctx.get_global("test").unwrap(), JsValue::from("string10"));
    }

    #[test]
    fn test_boolean_scenario() {
        let mut ctx = EvalContext::new();
        let (proxy, _) = counted_proxy(JsValue::from(true));
        let test = as_value(&proxy);

        assert_eq!(
            add_values(&mut ctx, &test, &JsValue::from(1)).unwrap(),
            JsValue::from(2)
        );
        assert_eq!(
            invoke(&mut ctx, &test, "toString", vec![]).unwrap(),
            JsValue::from("true")
        );
        assert_eq!(stringify(&mut ctx, test), JsValue::from("true"));
    }

    /// Boxes every primitive into a plain object holding it under `value`.
    struct RecordCoercion;

    impl ObjectCoercion for RecordCoercion {
        fn to_object(
            &self,
            ctx: &mut EvalContext,
            value: &JsValue,
        ) -> Result<JsObjectType, JErrorType> {
            if let JsValue::Object(o) = value {
                return Ok(o.clone());
            }
            let record = allocate(CoreObject::new(Some(ctx.realm().object_prototype())));
            put_property(ctx, &record, PropertyKey::from("value"), value.clone())?;
            Ok(record)
        }
    }

    #[test]
    fn test_host_coercion_builds_the_delegate() {
        let mut ctx = EvalContext::new().with_coercion(Rc::new(RecordCoercion));
        let (proxy, _) = counted_proxy(JsValue::from("abc"));
        let proxy: JsObjectType = proxy;

        assert_eq!(proxy.get_class_name(&mut ctx).unwrap(), "Object");
        assert_eq!(
            get(&mut ctx, &proxy, &PropertyKey::from("value")).unwrap(),
            JsValue::from("abc")
        );
        assert_eq!(
            get(&mut ctx, &proxy, &PropertyKey::from("length")).unwrap(),
            JsValue::Undefined
        );
    }
}
