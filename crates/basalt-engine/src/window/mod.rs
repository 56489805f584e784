//! Window construction parameters.
//!
//! The event loop stays with the application; this module only describes the
//! window it should create.

mod config;

pub use config::{WindowConfig, WindowMode};
