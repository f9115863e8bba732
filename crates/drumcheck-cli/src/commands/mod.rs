//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod compare;
pub mod info;
pub mod profile;
