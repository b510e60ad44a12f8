//! Operator-facing terminal output.

pub mod markdown;
pub mod render;
pub mod settings;
