use std::path::PathBuf;
use thiserror::Error;

/// Failures that occur around the pipeline rather than inside it: reading a
/// source file, loading configuration. Language-level failures (an
/// out-of-bounds index, a type mismatch) are `Value::Error` data produced by
/// `glimmer-eval`/`glimmer-sem`, never this enum.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not read source file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source file `{path}` is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

/// An invariant the pipeline assumes always holds (e.g. a token the lexer
/// never produces reaching the parser). Reaching one of these is this
/// crate's bug, not the input program's.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error("internal invariant violated: {0}")]
    Unreachable(String),
}
