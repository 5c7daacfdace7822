pub mod config;
pub mod context;
pub mod ds;
pub mod std_lib;
