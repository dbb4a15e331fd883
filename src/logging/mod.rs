// src/logging/mod.rs

pub mod adapter_log;
pub mod tracing_setup;

pub use adapter_log::AdapterLog;
pub use tracing_setup::init_tracing;
