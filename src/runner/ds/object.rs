use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::runner::context::EvalContext;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::NativeFn;
use crate::runner::ds::object_property::{PropertyData, PropertyKey};
use crate::runner::ds::operations::object::delegates_to;
use crate::runner::ds::operations::type_conversion::{ordinary_to_primitive, PreferredType};
use crate::runner::ds::transparent_proxy::TransparentProxy;
use crate::runner::ds::value::JsValue;

pub type JsObjectType = Rc<dyn JsObject>;

/// The dynamic-object protocol. Every value the runtime treats as an object
/// implements it, whether it is an ordinary object, a primitive wrapper, a
/// native function or a host-provided stand-in such as a transparent proxy.
///
/// `get` and `has` look at own properties only. Walking the prototype chain is
/// done by the caller (see `operations::object::get_property`), which lets a
/// prototype link point at any implementor, proxies included.
///
/// Methods take `&self`; implementors that carry state use interior
/// mutability. The running `EvalContext` is passed explicitly so that
/// implementors never need an ambient "current context".
pub trait JsObject {
    fn get_class_name(&self, ctx: &mut EvalContext) -> Result<String, JErrorType>;

    /// `Ok(None)` is the "not found" answer, distinct from a stored `undefined`.
    fn get(
        &self,
        ctx: &mut EvalContext,
        property: &PropertyKey,
        start: &JsObjectType,
    ) -> Result<Option<JsValue>, JErrorType>;

    fn has(
        &self,
        ctx: &mut EvalContext,
        property: &PropertyKey,
        start: &JsObjectType,
    ) -> Result<bool, JErrorType>;

    fn put(
        &self,
        ctx: &mut EvalContext,
        property: PropertyKey,
        start: &JsObjectType,
        value: JsValue,
    ) -> Result<(), JErrorType>;

    fn delete(&self, ctx: &mut EvalContext, property: &PropertyKey) -> Result<(), JErrorType>;

    fn get_prototype(&self, ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType>;

    fn set_prototype(
        &self,
        ctx: &mut EvalContext,
        prototype: Option<JsObjectType>,
    ) -> Result<(), JErrorType>;

    fn get_parent_scope(&self, ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType>;

    fn set_parent_scope(
        &self,
        ctx: &mut EvalContext,
        parent: Option<JsObjectType>,
    ) -> Result<(), JErrorType>;

    /// Enumerable own keys: integer keys ascending, then string keys in
    /// insertion order.
    fn get_ids(&self, ctx: &mut EvalContext) -> Result<Vec<PropertyKey>, JErrorType>;

    fn get_default_value(
        &self,
        ctx: &mut EvalContext,
        hint: PreferredType,
    ) -> Result<JsValue, JErrorType>;

    /// Answers `instance instanceof self`.
    fn has_instance(
        &self,
        ctx: &mut EvalContext,
        instance: &JsObjectType,
    ) -> Result<bool, JErrorType>;

    fn is_callable(&self, _ctx: &mut EvalContext) -> Result<bool, JErrorType> {
        Ok(false)
    }

    fn as_transparent_proxy(&self) -> Option<&TransparentProxy> {
        None
    }

    fn call(
        &self,
        ctx: &mut EvalContext,
        _this: JsValue,
        _args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        Err(JErrorType::TypeError(format!(
            "'{}' is not a function",
            self.get_class_name(ctx)?
        )))
    }
}

pub struct ObjectBase {
    properties: RefCell<IndexMap<PropertyKey, PropertyData>>,
    prototype: RefCell<Option<JsObjectType>>,
    parent_scope: RefCell<Option<JsObjectType>>,
    this: RefCell<Option<Weak<dyn JsObject>>>,
}
impl ObjectBase {
    pub fn new(prototype: Option<JsObjectType>) -> Self {
        ObjectBase {
            properties: RefCell::new(IndexMap::new()),
            prototype: RefCell::new(prototype),
            parent_scope: RefCell::new(None),
            this: RefCell::new(None),
        }
    }

    /// Installs or replaces an own property without any attribute checks.
    /// Used while building intrinsics.
    pub fn define(&self, property: PropertyKey, data: PropertyData) {
        self.properties.borrow_mut().insert(property, data);
    }

    pub fn get_own_property(&self, property: &PropertyKey) -> Option<PropertyData> {
        self.properties.borrow().get(property).cloned()
    }


    /// The shared handle of the object owning this base, once allocated.
    pub fn this(&self) -> Option<JsObjectType> {
        self.this.borrow().as_ref().and_then(|w| w.upgrade())
    }
}

/// Implementation side of ordinary objects: anything built on an
/// `ObjectBase` gets the full protocol through the blanket impl below and only
/// describes what makes it special.
pub trait OrdinaryObject {
    fn get_object_base(&self) -> &ObjectBase;

    fn class_name(&self) -> &str;

    /// Own properties computed on the fly rather than stored, such as string
    /// indices. They are read-only.
    fn get_exotic_property(&self, _property: &PropertyKey) -> Option<PropertyData> {
        None
    }

    fn exotic_property_keys(&self) -> Vec<PropertyKey> {
        vec![]
    }

    /// The wrapped primitive for boxed `String`, `Number` and `Boolean`.
    fn primitive_value(&self) -> Option<JsValue> {
        None
    }

    fn native_function(&self) -> Option<NativeFn> {
        None
    }

    fn get_own_property(&self, property: &PropertyKey) -> Option<PropertyData> {
        self.get_exotic_property(property)
            .or_else(|| self.get_object_base().get_own_property(property))
    }
}

/// Moves an ordinary object behind a shared handle and wires its self
/// reference.
pub fn allocate<T: OrdinaryObject + 'static>(obj: T) -> JsObjectType {
    let rc = Rc::new(obj);
    bind_self(&rc);
    rc
}

/// Same as `allocate` for callers that keep the concrete handle.
pub fn bind_self<T: OrdinaryObject + 'static>(rc: &Rc<T>) {
    let weak: Weak<dyn JsObject> = Rc::downgrade(rc) as Weak<dyn JsObject>;
    *rc.get_object_base().this.borrow_mut() = Some(weak);
}

pub struct CoreObject {
    base: ObjectBase,
}
impl CoreObject {
    pub fn new(prototype: Option<JsObjectType>) -> Self {
        CoreObject {
            base: ObjectBase::new(prototype),
        }
    }
}
impl OrdinaryObject for CoreObject {
    fn get_object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn class_name(&self) -> &str {
        "Object"
    }
}

fn is_same_object<T: ?Sized>(obj: &T, other: &JsObjectType) -> bool {
    std::ptr::addr_eq(obj as *const T, Rc::as_ptr(other))
}

fn check_prototype_chain<T: ?Sized>(
    obj: &T,
    ctx: &mut EvalContext,
    prototype: &Option<JsObjectType>,
) -> Result<(), JErrorType> {
    let mut p = prototype.clone();
    while let Some(some_p) = p {
        if is_same_object(obj, &some_p) {
            // To prevent circular chain
            return Err(JErrorType::TypeError("Cyclic prototype value".to_string()));
        }
        p = some_p.get_prototype(ctx)?;
    }
    Ok(())
}

impl<T: OrdinaryObject + 'static> JsObject for T {
    fn get_class_name(&self, _ctx: &mut EvalContext) -> Result<String, JErrorType> {
        Ok(self.class_name().to_string())
    }

    fn get(
        &self,
        _ctx: &mut EvalContext,
        property: &PropertyKey,
        _start: &JsObjectType,
    ) -> Result<Option<JsValue>, JErrorType> {
        Ok(OrdinaryObject::get_own_property(self, property).map(|p| p.value))
    }

    fn has(
        &self,
        _ctx: &mut EvalContext,
        property: &PropertyKey,
        _start: &JsObjectType,
    ) -> Result<bool, JErrorType> {
        Ok(OrdinaryObject::get_own_property(self, property).is_some())
    }

    fn put(
        &self,
        ctx: &mut EvalContext,
        property: PropertyKey,
        start: &JsObjectType,
        value: JsValue,
    ) -> Result<(), JErrorType> {
        if self.get_exotic_property(&property).is_some() {
            return Ok(());
        }
        let base = self.get_object_base();
        if !is_same_object(self, start) {
            // An inherited read-only slot blocks the write on the receiver too.
            if let Some(slot) = base.get_own_property(&property) {
                if !slot.writable {
                    return Ok(());
                }
            }
            return start.put(ctx, property, start, value);
        }
        {
            let mut properties = base.properties.borrow_mut();
            if let Some(slot) = properties.get_mut(&property) {
                if slot.writable {
                    slot.value = value;
                }
                return Ok(());
            }
        }
        base.define(property, PropertyData::new(value));
        Ok(())
    }

    fn delete(&self, _ctx: &mut EvalContext, property: &PropertyKey) -> Result<(), JErrorType> {
        let mut properties = self.get_object_base().properties.borrow_mut();
        let configurable = properties.get(property).map(|p| p.configurable);
        if configurable == Some(true) {
            properties.shift_remove(property);
        }
        Ok(())
    }

    fn get_prototype(&self, _ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType> {
        Ok(self.get_object_base().prototype.borrow().clone())
    }

    fn set_prototype(
        &self,
        ctx: &mut EvalContext,
        prototype: Option<JsObjectType>,
    ) -> Result<(), JErrorType> {
        check_prototype_chain(self, ctx, &prototype)?;
        *self.get_object_base().prototype.borrow_mut() = prototype;
        Ok(())
    }

    fn get_parent_scope(&self, _ctx: &mut EvalContext) -> Result<Option<JsObjectType>, JErrorType> {
        Ok(self.get_object_base().parent_scope.borrow().clone())
    }

    fn set_parent_scope(
        &self,
        _ctx: &mut EvalContext,
        parent: Option<JsObjectType>,
    ) -> Result<(), JErrorType> {
        *self.get_object_base().parent_scope.borrow_mut() = parent;
        Ok(())
    }

    fn get_ids(&self, _ctx: &mut EvalContext) -> Result<Vec<PropertyKey>, JErrorType> {
        let mut int_keys = vec![];
        let mut str_keys = vec![];
        for (key, data) in self.get_object_base().properties.borrow().iter() {
            if !data.enumerable {
                continue;
            }
            match key {
                PropertyKey::Int(i) => int_keys.push(*i),
                PropertyKey::Str(_) => str_keys.push(key.clone()),
            }
        }
        int_keys.sort();

        let mut result = self.exotic_property_keys();
        result.extend(int_keys.into_iter().map(PropertyKey::Int));
        result.extend(str_keys);
        Ok(result)
    }

    fn get_default_value(
        &self,
        ctx: &mut EvalContext,
        hint: PreferredType,
    ) -> Result<JsValue, JErrorType> {
        if let Some(primitive) = self.primitive_value() {
            return Ok(primitive);
        }
        match self.get_object_base().this() {
            Some(this) => ordinary_to_primitive(ctx, &this, hint),
            None => Err(JErrorType::TypeError(
                "Cannot convert unallocated object to primitive value".to_string(),
            )),
        }
    }

    fn has_instance(
        &self,
        ctx: &mut EvalContext,
        instance: &JsObjectType,
    ) -> Result<bool, JErrorType> {
        let target = if self.native_function().is_some() {
            match OrdinaryObject::get_own_property(self, &PropertyKey::from("prototype")) {
                Some(PropertyData {
                    value: JsValue::Object(o),
                    ..
                }) => o,
                _ => return Ok(false),
            }
        } else {
            match self.get_object_base().this() {
                Some(this) => this,
                None => return Ok(false),
            }
        };
        delegates_to(ctx, instance, &target)
    }

    fn is_callable(&self, _ctx: &mut EvalContext) -> Result<bool, JErrorType> {
        Ok(self.native_function().is_some())
    }

    fn call(
        &self,
        ctx: &mut EvalContext,
        this: JsValue,
        args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        match self.native_function() {
            Some(f) => f(ctx, this, args),
            None => Err(JErrorType::TypeError(format!(
                "'{}' is not a function",
                self.class_name()
            ))),
        }
    }
}
