//! Itinerary provider error types.

use std::fmt;

use super::convert::ConversionError;

/// Errors from an itinerary provider.
#[derive(Debug)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// Response body was not a `plan` response
    Json {
        message: String,
        body: Option<String>,
    },

    /// Planner returned an itinerary we cannot represent
    Conversion(ConversionError),

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// The planner answered but found no itinerary.
    ///
    /// `code` is the OTP planner error id (e.g. 404 for `PATH_NOT_FOUND`)
    /// when the planner reported one.
    NoItinerary { code: Option<i32>, reason: String },

    /// Rate limited by the API
    RateLimited,

    /// Missing or rejected credentials
    Unauthorized,

    /// Client configuration cannot work
    InvalidConfig(String),

    /// The client's request limiter was shut down
    Closed,
}

impl ProviderError {
    /// A missing itinerary without a planner error id.
    pub fn no_itinerary(reason: impl Into<String>) -> Self {
        ProviderError::NoItinerary {
            code: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(e) => write!(f, "HTTP error: {e}"),
            ProviderError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            ProviderError::Conversion(e) => write!(f, "unusable itinerary: {e}"),
            ProviderError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            ProviderError::NoItinerary {
                code: Some(code),
                reason,
            } => write!(f, "no itinerary found (planner error {code}): {reason}"),
            ProviderError::NoItinerary { code: None, reason } => {
                write!(f, "no itinerary found: {reason}")
            }
            ProviderError::RateLimited => write!(f, "rate limited by route planner"),
            ProviderError::Unauthorized => write!(f, "unauthorized by route planner"),
            ProviderError::InvalidConfig(msg) => write!(f, "invalid client configuration: {msg}"),
            ProviderError::Closed => write!(f, "route planner client is shut down"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Http(e) => Some(e),
            ProviderError::Conversion(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err)
    }
}

impl From<ConversionError> for ProviderError {
    fn from(err: ConversionError) -> Self {
        ProviderError::Conversion(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn error_display() {
        let err = ProviderError::NoItinerary {
            code: Some(404),
            reason: "PATH_NOT_FOUND".into(),
        };
        assert_eq!(
            err.to_string(),
            "no itinerary found (planner error 404): PATH_NOT_FOUND"
        );

        let err = ProviderError::no_itinerary("car not available");
        assert_eq!(err.to_string(), "no itinerary found: car not available");

        let err = ProviderError::ApiError {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = ProviderError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));
    }

    #[test]
    fn conversion_error_is_the_source() {
        let err: ProviderError = ConversionError::UnknownMode("TELEPORT".into()).into();
        assert_eq!(err.to_string(), "unusable itinerary: unknown OTP mode: TELEPORT");
        assert!(err.source().is_some());
        assert!(ProviderError::Closed.source().is_none());
    }
}
