//! Workflow validation and execution.
//!
//! - `definition`: parsing and structural validation of workflow definitions
//! - `mapping`: evaluation of declarative input mappings against node outputs
//! - `engine`: the linear fail-fast execution engine

pub mod definition;
pub mod engine;
pub mod mapping;
