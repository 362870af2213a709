//! Error types

use std::error;
use std::fmt::{self, Display, Formatter};
use std::io;

use crate::rate_limit::RateLimit;
use crate::types::StatusCode;

/// An error occurred while decoding a Geocoding API response.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A feature lacks a required field or has a structurally invalid one.
    #[error("malformed feature: {0}")]
    MalformedFeature(String),

    /// A feature identifier does not start with a known scope.
    #[error("unrecognized scope in identifier `{0}`")]
    UnrecognizedScope(String),

    /// The response is not a feature collection of the expected shape.
    #[error("unexpected response shape: {0}")]
    EnvelopeShapeMismatch(String),

    /// The API returned a message in place of results.
    #[error("{message}")]
    Api { message: String },

    /// The response is not valid JSON for the expected schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// An error occurred while performing a geocoding request.
#[derive(Debug)]
pub enum Error<E> {
    /// An error from the underlying HTTP client.
    Service(E),
    /// A non-success HTTP status from the API, with the API's message if it sent one.
    Http {
        status: StatusCode,
        message: Option<String>,
    },
    /// The access token has exceeded its rate limit.
    RateLimited(RateLimit),
    /// An error occured while decoding a gzip response body.
    Gzip(io::Error),
    /// The response body could not be decoded.
    Decode(DecodeError),
}

impl<E> Error<E> {
    /// Converts the client error type, leaving the other variants untouched.
    pub fn map_service<F>(self, f: impl FnOnce(E) -> F) -> Error<F> {
        match self {
            Error::Service(e) => Error::Service(f(e)),
            Error::Http { status, message } => Error::Http { status, message },
            Error::RateLimited(limit) => Error::RateLimited(limit),
            Error::Gzip(e) => Error::Gzip(e),
            Error::Decode(e) => Error::Decode(e),
        }
    }
}

impl<E> From<DecodeError> for Error<E> {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl<E: error::Error + 'static> error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use Error::*;

        match *self {
            Service(ref e) => Some(e),
            Http { .. } | RateLimited(_) => None,
            Gzip(ref e) => Some(e),
            Decode(ref e) => Some(e),
        }
    }
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Error::*;

        match *self {
            Service(ref e) => Display::fmt(e, f),
            Http {
                status,
                message: Some(ref message),
            } => write!(f, "{}: {}", status, message),
            Http {
                status,
                message: None,
            } => Display::fmt(&status, f),
            RateLimited(ref limit) => Display::fmt(limit, f),
            Gzip(ref e) => Display::fmt(e, f),
            Decode(ref e) => Display::fmt(e, f),
        }
    }
}
