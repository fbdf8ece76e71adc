//! Internal "plugin" modules (crate-local sub-systems).
//!
//! Regular Rust modules with a stable boundary so services can depend on
//! them without tight coupling.

pub mod history;
pub mod render;
