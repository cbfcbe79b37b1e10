//! HTTP surface for the request orchestrator.

pub mod router;
