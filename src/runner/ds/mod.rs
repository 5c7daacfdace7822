pub mod error;
pub mod function_object;
pub mod number_object;
pub mod object;
pub mod object_property;
pub mod operations;
pub mod realm;
pub mod string_object;
pub mod transparent_proxy;
pub mod value;
