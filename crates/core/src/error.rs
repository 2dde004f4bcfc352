use crate::session_state::Phase;
use debate_client::ClientError;

/// Why an exchange with the responder produced no reply.
///
/// These never escape the exchange boundary: the session turns them into a
/// fallback assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// The request never reached the responder or nothing came back.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// The responder was reached but did not produce a usable reply.
    #[error("remote failure (status {status:?}): {detail}")]
    RemoteFailure { status: Option<u16>, detail: String },
}

impl From<ClientError> for ExchangeError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) => ExchangeError::NetworkFailure(e.to_string()),
            ClientError::InvalidUrl(url) => {
                ExchangeError::NetworkFailure(format!("invalid backend url {url}"))
            }
            ClientError::Status { status, body } => ExchangeError::RemoteFailure {
                status: Some(status),
                detail: body,
            },
            ClientError::Decode(e) => ExchangeError::RemoteFailure {
                status: None,
                detail: format!("malformed response: {e}"),
            },
        }
    }
}

/// A transition the session refused. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("an exchange is already in flight")]
    Busy,
    #[error("transition requires phase {expected}, session is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
}
