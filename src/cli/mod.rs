//! Command-line interface
//!
//! Clap argument definitions ([`args`]) and the command handlers they
//! dispatch to ([`commands`]).

pub mod args;
pub mod commands;
