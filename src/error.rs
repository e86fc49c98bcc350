//! Error reporting for DTO conversions.
//!
//! There are two tiers. Programming errors (a buffer too small, malformed
//! binary, a typed accessor used on the wrong tag) are preconditions and
//! panic. Syntax errors in the text readers are recoverable: the reader
//! stops producing events, [`convert`](crate::convert) returns
//! [`Error::Syntax`], and a diagnostic is routed through the process-wide
//! error handler.
//!
//! # Error handler
//!
//! The handler is the only piece of process-wide state in the crate. Text
//! readers format diagnostics as `error: <line>:<col> : <detail>`; when no
//! handler is installed they go to [`log::error!`].
//!
//! ```
//! fn collect(message: &str) {
//!     eprintln!("{message}");
//! }
//!
//! dtokit::set_error_handler(Some(collect));
//! dtokit::set_error_handler(None);
//! ```

use std::fmt::{self, Display};
use std::sync::Mutex;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A text reader hit a malformed construct and stopped producing
    /// events. Details were reported through the error handler.
    Syntax,
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax => formatter.write_str("malformed text input"),
        }
    }
}

impl std::error::Error for Error {}

/// Signature of the process-wide error reporting hook.
pub type ErrorHandler = fn(&str);

static ERROR_HANDLER: Mutex<Option<ErrorHandler>> = Mutex::new(None);

/// Installs or clears the process-wide error handler.
///
/// Readers report syntax diagnostics through the handler; with no handler
/// installed, diagnostics go to [`log::error!`] instead.
pub fn set_error_handler(handler: Option<ErrorHandler>) {
    let mut slot = ERROR_HANDLER
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    *slot = handler;
}

pub(crate) fn report(message: fmt::Arguments<'_>) {
    let handler = *ERROR_HANDLER
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    match handler {
        Some(handler) => handler(&message.to_string()),
        None => log::error!("{message}"),
    }
}
