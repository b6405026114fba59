//! Shared runtime helpers for the instance store binaries.

pub mod env;
pub mod utils;
