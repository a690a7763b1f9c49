//! DTOs for the adapter's REST surface
//!
//! These are the JSON shapes the adapter exposes upward (to the training
//! manager and other callers), as opposed to the orchestrator's own wire
//! objects which stay inside the client crate.

pub mod experiment;
pub mod pipeline;
pub mod run;
