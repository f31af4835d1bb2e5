//! Centralized theme: color palette and semantic style builders.

pub mod palette;
pub mod styles;
