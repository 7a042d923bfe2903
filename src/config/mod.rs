//! Configuration files
//!
//! Loads YAML (or JSON) documents describing a phrase list and timing, and
//! validates them before they reach the engine.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning};
pub use schema::{DelayValue, TimingSection, TypewriterFile, parse_delay};
pub use validation::{ValidationResult, Validator};
