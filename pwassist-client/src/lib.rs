pub mod copy;
pub mod labels;
pub mod service;
pub mod session;
pub mod transport;
