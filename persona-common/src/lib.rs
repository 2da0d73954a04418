//! Shared plumbing for the persona crates.
//!
//! Right now this is only [`observability`], the single place where the global
//! `tracing` subscriber is installed. Library crates emit events through `tracing`
//! and never configure output themselves.
pub mod observability;

pub use observability::{init_logging, LogConfig, LogFormat, LogHandle};
