//! CLI command implementations.

pub mod common;
pub mod generate;
pub mod seed;
pub mod version;
