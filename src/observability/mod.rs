//! Observability
//!
//! Logging, metrics, and the structured lifecycle event stream.

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, LogSettings};
pub use metrics::describe_metrics;
