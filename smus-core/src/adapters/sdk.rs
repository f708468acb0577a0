//! Glue between AWS SDK shapes and crate types.

use crate::error::SmusError;
use aws_sdk_datazone::error::{DisplayErrorContext, ProvideErrorMetadata};

/// Maps an SDK call failure, keeping the service error code.
pub(crate) fn remote_error<E>(operation: &'static str, error: E) -> SmusError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = error.code().map(str::to_owned);
    let message = DisplayErrorContext(error).to_string();
    SmusError::remote(operation, code, message)
}

/// Maps a builder failure for a request shape.
pub(crate) fn build_error(operation: &'static str, error: impl std::fmt::Display) -> SmusError {
    SmusError::remote(operation, None, format!("invalid request: {}", error))
}

// Smithy getters return `&str` for required members and `Option<&str>` for
// optional ones; which is which varies between service model revisions.

/// Owned text from a string getter.
pub(crate) trait SdkText {
    fn text(self) -> String;
    fn opt_text(self) -> Option<String>;
}

impl SdkText for &str {
    fn text(self) -> String {
        self.to_owned()
    }

    fn opt_text(self) -> Option<String> {
        Some(self.to_owned())
    }
}

impl SdkText for Option<&str> {
    fn text(self) -> String {
        self.unwrap_or_default().to_owned()
    }

    fn opt_text(self) -> Option<String> {
        self.map(str::to_owned)
    }
}

/// Slice view of a list getter.
pub(crate) trait SdkList<'a, T> {
    fn list(self) -> &'a [T];
}

impl<'a, T> SdkList<'a, T> for &'a [T] {
    fn list(self) -> &'a [T] {
        self
    }
}

impl<'a, T> SdkList<'a, T> for Option<&'a [T]> {
    fn list(self) -> &'a [T] {
        self.unwrap_or_default()
    }
}
