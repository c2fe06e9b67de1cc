//! Schema module - Configuration, matrix and reporting types for evolutionary runs.

mod config;
mod evolution;
mod matrix;

pub use config::*;
pub use evolution::*;
pub use matrix::*;
