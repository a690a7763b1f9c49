//! Trellis Core
//!
//! Core types shared between the adapter service and the orchestrator client.
//!
//! This crate contains:
//! - Domain types: entities of the wrapped orchestrator (Experiment, Pipeline, Run)
//! - DTOs: the adapter's outward JSON shapes, including the run notification
//!   posted to the training manager

pub mod domain;
pub mod dto;
