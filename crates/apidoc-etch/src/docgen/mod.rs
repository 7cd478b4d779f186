//! Documentation generation core
//!
//! This module provides the generation pipeline and its configuration.
//! The [`Generator`] turns declaration dumps into the frontend and backend
//! documentation trees plus the generation report.

mod config;
mod generator;

pub use config::{GeneratorConfig, DEFAULT_HIDDEN_PARAMETER_TYPES};
pub use generator::{GenerationOutput, Generator};
