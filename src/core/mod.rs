//! Core library components.
//!
//! This module contains secret discovery, the parallel fetch engine, and
//! the output sinks, independent of the command-line front end.

pub mod config;
pub mod constants;
pub mod definition;
pub mod entrypoint;
pub mod fetch;
pub mod orchestrator;
pub mod resolver;
pub mod sink;
pub mod store;
