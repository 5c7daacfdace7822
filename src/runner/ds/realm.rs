use std::rc::Rc;

use crate::runner::ds::function_object::{NativeFn, NativeFunctionObject};
use crate::runner::ds::number_object::{BooleanObject, NumberObject};
use crate::runner::ds::object::{bind_self, CoreObject, JsObjectType, ObjectBase, OrdinaryObject};
use crate::runner::ds::object_property::{PropertyData, PropertyKey};
use crate::runner::ds::string_object::StringObject;
use crate::runner::ds::value::{JsNumberType, JsValue};
use crate::runner::std_lib::register_core_builtins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownIntrinsics {
    BooleanPrototype,
    FunctionPrototype,
    Global,
    NumberPrototype,
    ObjectPrototype,
    StringPrototype,
}

/// Standard objects shared by every value created in one `EvalContext`.
pub struct Realm {
    object_prototype: Rc<CoreObject>,
    function_prototype: Rc<CoreObject>,
    string_prototype: Rc<StringObject>,
    number_prototype: Rc<NumberObject>,
    boolean_prototype: Rc<BooleanObject>,
    global_object: Rc<CoreObject>,
}
impl Realm {
    pub fn new() -> Self {
        let object_prototype = Rc::new(CoreObject::new(None));
        bind_self(&object_prototype);
        let op: JsObjectType = object_prototype.clone();

        let function_prototype = Rc::new(CoreObject::new(Some(op.clone())));
        bind_self(&function_prototype);
        let string_prototype = Rc::new(StringObject::new(String::new(), Some(op.clone())));
        bind_self(&string_prototype);
        let number_prototype = Rc::new(NumberObject::new(JsNumberType::Integer(0), Some(op.clone())));
        bind_self(&number_prototype);
        let boolean_prototype = Rc::new(BooleanObject::new(false, Some(op.clone())));
        bind_self(&boolean_prototype);
        let global_object = Rc::new(CoreObject::new(Some(op)));
        bind_self(&global_object);

        let realm = Realm {
            object_prototype,
            function_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            global_object,
        };
        register_core_builtins(&realm);
        realm
    }

    pub fn intrinsic(&self, which: WellKnownIntrinsics) -> JsObjectType {
        match which {
            WellKnownIntrinsics::BooleanPrototype => self.boolean_prototype.clone(),
            WellKnownIntrinsics::FunctionPrototype => self.function_prototype.clone(),
            WellKnownIntrinsics::Global => self.global_object.clone(),
            WellKnownIntrinsics::NumberPrototype => self.number_prototype.clone(),
            WellKnownIntrinsics::ObjectPrototype => self.object_prototype.clone(),
            WellKnownIntrinsics::StringPrototype => self.string_prototype.clone(),
        }
    }

    pub fn object_prototype(&self) -> JsObjectType {
        self.intrinsic(WellKnownIntrinsics::ObjectPrototype)
    }

    pub fn global_object(&self) -> JsObjectType {
        self.intrinsic(WellKnownIntrinsics::Global)
    }

    fn intrinsic_base(&self, which: WellKnownIntrinsics) -> &ObjectBase {
        match which {
            WellKnownIntrinsics::BooleanPrototype => self.boolean_prototype.get_object_base(),
            WellKnownIntrinsics::FunctionPrototype => self.function_prototype.get_object_base(),
            WellKnownIntrinsics::Global => self.global_object.get_object_base(),
            WellKnownIntrinsics::NumberPrototype => self.number_prototype.get_object_base(),
            WellKnownIntrinsics::ObjectPrototype => self.object_prototype.get_object_base(),
            WellKnownIntrinsics::StringPrototype => self.string_prototype.get_object_base(),
        }
    }

    /// An empty ordinary object inheriting from `Object.prototype`.
    pub fn create_object(&self) -> Rc<CoreObject> {
        let obj = Rc::new(CoreObject::new(Some(self.object_prototype())));
        bind_self(&obj);
        obj
    }

    pub fn create_function(&self, name: &str, arity: i64, f: NativeFn) -> Rc<NativeFunctionObject> {
        let func = Rc::new(NativeFunctionObject::new(
            name,
            arity,
            f,
            Some(self.intrinsic(WellKnownIntrinsics::FunctionPrototype)),
        ));
        bind_self(&func);
        func
    }

    pub(crate) fn define_method_on(&self, target: &ObjectBase, name: &str, arity: i64, f: NativeFn) {
        let func: JsObjectType = self.create_function(name, arity, f);
        target.define(PropertyKey::from(name), PropertyData::hidden(JsValue::Object(func)));
    }

    pub(crate) fn define_method(&self, target: WellKnownIntrinsics, name: &str, arity: i64, f: NativeFn) {
        self.define_method_on(self.intrinsic_base(target), name, arity, f);
    }

    /// Installs a global constructor function linked both ways with `prototype`.
    pub(crate) fn define_constructor(
        &self,
        name: &str,
        arity: i64,
        f: NativeFn,
        prototype: WellKnownIntrinsics,
    ) -> Rc<NativeFunctionObject> {
        let ctor = self.create_function(name, arity, f);
        ctor.get_object_base().define(
            PropertyKey::from("prototype"),
            PropertyData::read_only(JsValue::Object(self.intrinsic(prototype))),
        );
        let as_object: JsObjectType = ctor.clone();
        self.intrinsic_base(prototype).define(
            PropertyKey::from("constructor"),
            PropertyData::hidden(JsValue::Object(as_object.clone())),
        );
        self.define_global(name, JsValue::Object(as_object));
        ctor
    }

    pub(crate) fn define_global(&self, name: &str, value: JsValue) {
        self.global_object
            .get_object_base()
            .define(PropertyKey::from(name), PropertyData::hidden(value));
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}
