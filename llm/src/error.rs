use std::fmt;

/// Errors from the completion provider. Every variant is surfaced to the
/// caller: a reply is mandatory for the request cycle to proceed, so the
/// caller decides whether to retry or abort.
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// Network-level failure before a response was received
    Transport(String),

    /// Non-success HTTP status, with whatever body the provider sent
    Status(u16, String),

    /// Response body that could not be interpreted as a completion
    MalformedResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "Transport failure: {}", msg),
            ProviderError::Status(code, body) => {
                write!(f, "Provider returned status {}: {}", code, body)
            }
            ProviderError::MalformedResponse(msg) => {
                write!(f, "Malformed provider response: {}", msg)
            }
        }
    }
}

impl std::error::Error for ProviderError {}
