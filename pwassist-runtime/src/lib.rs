pub mod backends;
pub mod config_store;
pub mod env;
pub mod runtime_engine;
