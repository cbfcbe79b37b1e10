pub mod gateway;
pub mod orchestrator;
pub mod traits;
