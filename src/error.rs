mod error_kind;

use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};
use anyhow::anyhow;
use serde_json::json;
use std::fmt::{Debug, Display, Formatter};
use tracing::error;

pub use error_kind::ErrorKind;

/// Key manager native error type.
#[derive(thiserror::Error)]
pub struct Error {
    root_cause: anyhow::Error,
    kind: ErrorKind,
}

impl Error {
    /// Creates a Client error instance with the given root cause.
    pub fn client_with_root_cause(root_cause: anyhow::Error) -> Self {
        Self {
            root_cause,
            kind: ErrorKind::ClientError,
        }
    }

    /// Creates a Client error instance with the given message.
    pub fn client<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::ClientError,
        }
    }

    /// Creates an access forbidden error instance.
    pub fn access_forbidden() -> Self {
        Self {
            root_cause: anyhow!("Access Forbidden"),
            kind: ErrorKind::AccessForbidden,
        }
    }

    /// Creates a Not Found error instance with the given message.
    pub fn not_found<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::NotFound,
        }
    }

    /// Creates a Conflict error instance with the given message.
    pub fn conflict<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::Conflict,
        }
    }

    /// Creates an error that signals missing or disabled configuration.
    pub fn not_configured<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::NotConfigured,
        }
    }

    /// Creates a dependency unavailable error with the given root cause. Only the outermost
    /// context of the root cause is exposed to the client.
    pub fn dependency_unavailable(root_cause: anyhow::Error) -> Self {
        Self {
            root_cause,
            kind: ErrorKind::DependencyUnavailable,
        }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the outermost message of the root cause, without its chain or backtrace.
    pub fn message(&self) -> String {
        self.root_cause.to_string()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.root_cause, f)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.root_cause, f)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::ClientError => StatusCode::BAD_REQUEST,
            ErrorKind::AccessForbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::DependencyUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self.kind {
            ErrorKind::Unknown => {
                error!("Request failed with an unexpected error: {:?}", self.root_cause);
                "Internal Server Error".to_string()
            }
            ErrorKind::DependencyUnavailable => {
                error!("Request failed due to unavailable dependency: {:?}", self.root_cause);
                self.message()
            }
            _ => self.message(),
        };

        HttpResponseBuilder::new(self.status_code()).json(json!({ "message": message }))
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        err.downcast::<Error>().unwrap_or_else(|root_cause| Error {
            root_cause,
            kind: ErrorKind::Unknown,
        })
    }
}
