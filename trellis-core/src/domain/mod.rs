//! Domain types for the wrapped orchestrator

pub mod experiment;
pub mod pipeline;
pub mod run;
