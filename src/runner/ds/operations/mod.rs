pub mod arithmetic;
pub mod object;
pub mod type_conversion;
