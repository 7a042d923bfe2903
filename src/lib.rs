//! `typewriter` - timer-driven typewriter text animation
//!
//! The library exposes the engine ([`engine`]), configuration-file loading
//! ([`config`]), the terminal and JSON render sinks used by the CLI
//! ([`render`]), and the ambient error and observability layers.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod render;

pub use engine::{EngineHandle, Frame, PhraseList, RenderSink, TypewriterConfig, start, stop};
pub use error::{ConfigurationError, TypewriterError};
