//! Failure types for the provider clients.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Coarse classification used by callers that only care whether the fetch
/// failed because of setup, the network, or the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Decode,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("{endpoint} request failed: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("failed to decode {endpoint} response: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Network { .. } | Self::Status { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_transport() {
        let err = FetchError::Status {
            endpoint: "weather",
            status: StatusCode::UNAUTHORIZED,
        };

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn decode_and_config_errors_have_no_status() {
        let err = FetchError::Decode {
            endpoint: "pollution",
            reason: "missing field `list`".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.status(), None);

        let err = FetchError::from(ConfigError::MissingApiKey);
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.status(), None);
    }
}
