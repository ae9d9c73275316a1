//! Error type shared by the codec, the channel and request parsing.

use crate::constants::INVALID_ARGUMENTS_ERROR_CODE;

#[derive(Debug)]
pub enum WindowPlusError {
    /// A required argument is missing or has the wrong type.
    InvalidArguments { method: String, reason: String },
    /// Bytes on the channel are not a valid method call envelope.
    MalformedMessage(String),
    /// The host messenger was torn down.
    ///
    /// Raised only when sending outbound calls and handled inside
    /// [`crate::MethodChannel::notify`]. Replies never carry it: inbound calls
    /// are answered by the host from the return value of `handle_message`.
    MessengerDetached,
}

impl WindowPlusError {
    pub fn invalid_arguments(method: &str, reason: impl Into<String>) -> Self {
        WindowPlusError::InvalidArguments {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// Error code sent back over the channel for this error.
    ///
    /// Only `InvalidArguments` and `MalformedMessage` reach a reply; the
    /// `MessengerDetached` code appears in logs only.
    pub fn code(&self) -> &'static str {
        match self {
            WindowPlusError::InvalidArguments { .. } => INVALID_ARGUMENTS_ERROR_CODE,
            WindowPlusError::MalformedMessage(_) => "malformed-message",
            WindowPlusError::MessengerDetached => "messenger-detached",
        }
    }
}

impl std::fmt::Display for WindowPlusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowPlusError::InvalidArguments { method, reason } => {
                write!(f, "Invalid arguments for `{}`: {}", method, reason)
            }
            WindowPlusError::MalformedMessage(s) => {
                write!(f, "Malformed method channel message: {}", s)
            }
            WindowPlusError::MessengerDetached => {
                write!(f, "Host messenger is no longer attached.")
            }
        }
    }
}
impl std::error::Error for WindowPlusError {}
