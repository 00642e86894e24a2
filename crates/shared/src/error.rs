use thiserror::Error;

/// Any failure of a backend call. Callers treat every variant the same way;
/// the variants only exist so logs can say what actually went wrong.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not build request for {endpoint}: {message}")]
    Request { endpoint: String, message: String },
    #[error("request to {endpoint} failed: {message}")]
    Network { endpoint: String, message: String },
    #[error("{endpoint} returned {status}{}", detail_suffix(.detail))]
    Status {
        endpoint: String,
        status: u16,
        detail: Option<String>,
    },
    #[error("invalid response body from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("backend rejected {endpoint}: {message}")]
    Rejected { endpoint: String, message: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl TransportError {
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Request { endpoint, .. }
            | Self::Network { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Rejected { endpoint, .. } => endpoint,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
