//! Tracking service errors.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = anyhow::Result<T, Error>;

/// Domain level error type returned by the tracking service.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    /// The request payload is invalid or missing required fields.
    #[error("code: 400, description: {0}")]
    BadRequest(String),

    /// The requested resource could not be found.
    #[error("code: 404, description: {0}")]
    NotFound(String),

    /// A non recoverable internal error occurred.
    #[error("code: 500, description: {0}")]
    Internal(String),

    /// The position store could not fulfil a read or write.
    #[error("code: 500, description: store_error {0}")]
    StoreError(String),

    /// A payload failed to serialize or deserialize.
    #[error("code: 500, description: invalid_format {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Returns the HTTP status code associated with the variant.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error description.
    #[must_use]
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        let chain = err.chain().map(ToString::to_string).collect::<Vec<_>>().join(" -> ");

        // if type is Error, return it with the newly added context
        if let Some(inner) = err.downcast_ref::<Self>() {
            tracing::debug!("Error: {err}, caused by: {inner}");

            return match inner {
                Self::BadRequest(_s) => Self::BadRequest(chain),
                Self::NotFound(_s) => Self::NotFound(chain),
                Self::Internal(_s) => Self::Internal(chain),
                Self::StoreError(e) => Self::StoreError(format!("{err}: {e}")),
                Self::InvalidFormat(e) => Self::InvalidFormat(format!("{err}: {e}")),
            };
        }

        // otherwise, return an Internal error
        Self::Internal(chain)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

pub struct HttpError {
    status: StatusCode,
    error: String,
}

impl From<Error> for HttpError {
    fn from(e: Error) -> Self {
        Self { status: e.code(), error: e.description() }
    }
}

impl From<anyhow::Error> for HttpError {
    fn from(e: anyhow::Error) -> Self {
        let error = format!("{e}, caused by: {}", e.root_cause());
        let status = e.downcast_ref().map_or(StatusCode::INTERNAL_SERVER_ERROR, Error::code);
        Self { status, error }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.error).into_response()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result, anyhow};
    use serde_json::Value;

    use super::Error;

    #[test]
    fn error_display() {
        let err = Error::BadRequest("invalid input".to_string());
        assert_eq!(format!("{err}"), "code: 400, description: invalid input");
    }

    #[test]
    fn with_context() {
        let result = Err::<(), Error>(Error::NotFound("vehicle V001".to_string()))
            .context("looking up vehicle");
        let err: Error = result.unwrap_err().into();

        assert_eq!(
            err.to_string(),
            "code: 404, description: looking up vehicle -> code: 404, description: vehicle V001"
        );
    }

    #[test]
    fn anyhow_context() {
        let result = Err::<(), anyhow::Error>(anyhow!("one-off error")).context("error context");
        let err: Error = result.unwrap_err().into();

        assert_eq!(err.to_string(), "code: 500, description: error context -> one-off error");
    }

    #[test]
    fn serde_context() {
        let result: Result<Value, anyhow::Error> =
            serde_json::from_str(r#"{"foo": "bar""#).context("error context");
        let err: Error = result.unwrap_err().into();

        assert_eq!(
            err.to_string(),
            "code: 500, description: error context -> EOF while parsing an object at line 1 column 13"
        );
    }
}
