//! Method channel plumbing between the plugin and the UI host.

use std::sync::{Arc, Weak};

use log::{debug, warn};
use serde_json::Value;

use crate::codec::{self, MethodCall};
use crate::error::WindowPlusError;

/// Outbound half of the host's message transport.
///
/// Inbound messages are delivered by the host calling
/// [`crate::WindowPlusPlugin::handle_message`] with the raw bytes and sending
/// back whatever it returns.
pub trait BinaryMessenger: Send + Sync {
    fn send(&self, channel: &str, message: &[u8]) -> Result<(), WindowPlusError>;
}

/// A named channel over a host messenger.
///
/// The messenger is held weakly so the host stays in charge of its lifetime.
pub struct MethodChannel {
    name: String,
    messenger: Weak<dyn BinaryMessenger>,
}

impl MethodChannel {
    pub fn new(name: &str, messenger: &Arc<dyn BinaryMessenger>) -> Self {
        MethodChannel {
            name: name.to_string(),
            messenger: Arc::downgrade(messenger),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pushes an unsolicited call to the host. Fire-and-forget: no reply is awaited.
    pub fn invoke_method(&self, method: &str, args: Value) -> Result<(), WindowPlusError> {
        let messenger = self
            .messenger
            .upgrade()
            .ok_or(WindowPlusError::MessengerDetached)?;
        let payload = codec::encode_method_call(&MethodCall::new(method, args));
        messenger.send(&self.name, &payload)
    }

    /// Like [`MethodChannel::invoke_method`], but a torn-down host is not an error.
    pub fn notify(&self, method: &str, args: Value) {
        match self.invoke_method(method, args) {
            Ok(()) => debug!("[WindowPlus] Sent '{}' on '{}'", method, self.name),
            Err(WindowPlusError::MessengerDetached) => {
                debug!("[WindowPlus] Messenger detached, dropping '{}'", method)
            }
            Err(e) => warn!("[WindowPlus] Failed to send '{}': {}", method, e),
        }
    }
}
