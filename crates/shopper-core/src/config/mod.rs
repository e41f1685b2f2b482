//! Configuration module for the shopping assistant
//!
//! YAML files are parsed into [`ShopperConfig`], resolved against the process
//! environment (search app id, `PORT`) and validated before use.

pub mod types;
pub mod loader;
pub mod validation;

pub use types::*;
pub use loader::*;
