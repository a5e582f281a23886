//! glimmer-cli - the REPL/file-runner driver (§10, §6's out-of-scope "CLI
//! flags" collaborator, built as a thin ambient wrapper regardless).
//!
//! Everything that actually understands Glimmer lives in `glimmer-lex`,
//! `glimmer-par`, `glimmer-sem`, and `glimmer-eval`; this crate only parses
//! arguments, loads configuration, installs the `tracing` subscriber once,
//! and calls into `pipeline` to run a program.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::Config;
pub use error::{GlimmerCliError, Result};
