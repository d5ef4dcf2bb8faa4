use thiserror::Error;

/// Errors that callers of the contacts module can observe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactsError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{endpoint} did not answer in time")]
    Timeout { endpoint: String },

    #[error("cannot reach {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} answered HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("invalid endpoint URL '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("cannot set up HTTP client: {message}")]
    ClientSetup { message: String },
}

impl ContactsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn invalid_endpoint(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Map a transport failure from the HTTP client.
    pub fn from_client(endpoint: impl Into<String>, err: &httpkit::ClientError) -> Self {
        let endpoint = endpoint.into();
        match err {
            httpkit::ClientError::Timeout { .. } => Self::Timeout { endpoint },
            httpkit::ClientError::Build(_) => Self::ClientSetup {
                message: err.to_string(),
            },
            other => Self::Transport {
                endpoint,
                message: other.to_string(),
            },
        }
    }
}

impl From<crate::domain::error::DomainError> for ContactsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        Self::validation(domain_error.to_string())
    }
}
