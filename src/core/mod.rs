//! Core domain models
//!
//! This module defines the fundamental data structures that represent
//! the stack configuration, the pipeline, and its steps.

pub mod config;
pub mod pipeline;
pub mod state;
pub mod step;

pub use config::*;
pub use pipeline::*;
pub use state::*;
pub use step::*;
