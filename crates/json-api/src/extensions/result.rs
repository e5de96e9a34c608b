//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use tracing::error;

use crate::errors::ApiError;

/// Map any error to a logged internal server error.
pub(crate) trait ResultExt<T> {
    fn or_500(self, context: &'static str) -> Result<T, ApiError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            ApiError::internal(context)
        })
    }
}
