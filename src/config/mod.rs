//! Layered configuration (file, environment, defaults)

pub mod loader;
pub mod types;
