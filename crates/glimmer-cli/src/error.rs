//! Error handling for the glimmer CLI.
//!
//! Mirrors the teacher's `faxt::error` module: one `thiserror`-derived enum
//! for everything that can go wrong around the pipeline, used throughout
//! this crate, with `anyhow` reserved for `main`'s own process boundary.
//! Language-level failures (a type error, a runtime `Value::Error`) are not
//! represented here — they are formatted and reported on their own terms,
//! not funneled through this enum, since they come from data the pipeline
//! produced rather than a failure to run it at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlimmerCliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not read source file `{path}`: {source}")]
    ReadSource {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Diagnostics(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlimmerCliError>;
