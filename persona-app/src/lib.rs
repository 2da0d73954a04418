//! Library half of the `persona` binary: CLI definition and the fetch → analyse →
//! report pipeline, split out so integration tests can drive it against mock servers.
pub mod cli;
pub mod pipeline;

pub use cli::Cli;
pub use pipeline::{Pipeline, RunSummary};
