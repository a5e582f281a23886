//! Shared plumbing for the Glimmer pipeline: source positions, string
//! interning, diagnostic collection, and the small set of error types that
//! exist outside the language's own value model.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use error::{InternalError, SourceError};
pub use span::Span;
pub use symbol::{Interner, Symbol};
