use tasklet_shared::staging::StageError;
use tasklet_shared::validate::ValidationError;
use thiserror::Error;

/// Failures of a call against the task gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No bearer token; the request was never sent.
    #[error("not signed in; run `tasklet login` first")]
    Unauthenticated,

    #[error("task not found")]
    NotFound,

    #[error("gateway answered {status}{}", suffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Staging(#[from] StageError),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl GatewayError {
    /// The `message` field of an error body, if the gateway sent one.
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound => Some(404),
            _ => None,
        }
    }

    /// Text for an inline error line. Input problems are shown as is,
    /// everything else collapses to the view's fallback message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Unauthenticated | Self::Validation(_) | Self::Staging(_) => self.to_string(),
            Self::NotFound => "The requested task could not be found.".to_string(),
            _ => fallback.to_string(),
        }
    }
}
