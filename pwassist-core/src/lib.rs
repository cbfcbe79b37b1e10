pub mod config;
pub mod envelope;
pub mod prompt;
pub mod schema;
pub mod segment;
pub mod types;

// Keep the public surface small and intentional.
pub use config::*;
pub use envelope::*;
pub use prompt::*;
pub use schema::*;
pub use segment::*;
pub use types::*;
