//! Typed view of the requests the plugin understands.

use serde::de::DeserializeOwned;

use crate::codec::MethodCall;
use crate::constants::*;
use crate::error::WindowPlusError;
use crate::window_state::SavedWindowState;

#[derive(Debug, Clone, PartialEq)]
pub enum WindowRequest {
    EnsureInitialized,
    NotifyFirstFrameRendered,
    GetIsFullscreen,
    SetIsFullscreen { enabled: bool },
    SetMinimumSize { width: f64, height: f64 },
    GetIsMaximized,
    Maximize,
    Restore,
    Close,
    Destroy,
    GetCaptionHeight,
    GetState { saved: Option<SavedWindowState> },
    SetState { saved: SavedWindowState },
    NotifyReceiverReady,
}

impl WindowRequest {
    /// Parses `call`. `Ok(None)` means the method is not one of ours.
    pub fn parse(call: &MethodCall) -> Result<Option<Self>, WindowPlusError> {
        let request = match call.method.as_str() {
            ENSURE_INITIALIZED_METHOD_NAME => WindowRequest::EnsureInitialized,
            NOTIFY_FIRST_FRAME_RENDERED_METHOD_NAME => WindowRequest::NotifyFirstFrameRendered,
            GET_IS_FULLSCREEN_METHOD_NAME => WindowRequest::GetIsFullscreen,
            SET_IS_FULLSCREEN_METHOD_NAME => WindowRequest::SetIsFullscreen {
                enabled: required(call, "enabled")?,
            },
            SET_MINIMUM_SIZE_METHOD_NAME => {
                let width = dimension(call, "width")?;
                let height = dimension(call, "height")?;
                WindowRequest::SetMinimumSize { width, height }
            }
            GET_IS_MAXIMIZED_METHOD_NAME => WindowRequest::GetIsMaximized,
            MAXIMIZE_METHOD_NAME => WindowRequest::Maximize,
            RESTORE_METHOD_NAME => WindowRequest::Restore,
            CLOSE_METHOD_NAME => WindowRequest::Close,
            DESTROY_METHOD_NAME => WindowRequest::Destroy,
            GET_CAPTION_HEIGHT_METHOD_NAME => WindowRequest::GetCaptionHeight,
            GET_STATE_METHOD_NAME => WindowRequest::GetState {
                saved: optional(call, SAVED_WINDOW_STATE_KEY)?,
            },
            SET_STATE_METHOD_NAME => WindowRequest::SetState {
                saved: required(call, SAVED_WINDOW_STATE_KEY)?,
            },
            NOTIFY_RECEIVER_READY_METHOD_NAME => WindowRequest::NotifyReceiverReady,
            _ => return Ok(None),
        };
        Ok(Some(request))
    }
}

fn optional<T: DeserializeOwned>(call: &MethodCall, key: &str) -> Result<Option<T>, WindowPlusError> {
    call.argument(key)
        .map(|value| {
            serde_json::from_value(value.clone()).map_err(|e| {
                WindowPlusError::invalid_arguments(&call.method, format!("`{}`: {}", key, e))
            })
        })
        .transpose()
}

fn required<T: DeserializeOwned>(call: &MethodCall, key: &str) -> Result<T, WindowPlusError> {
    optional(call, key)?
        .ok_or_else(|| WindowPlusError::invalid_arguments(&call.method, format!("missing `{}`", key)))
}

/// A size component: finite and non-negative.
fn dimension(call: &MethodCall, key: &str) -> Result<f64, WindowPlusError> {
    let value: f64 = required(call, key)?;
    if !value.is_finite() || value < 0.0 {
        return Err(WindowPlusError::invalid_arguments(
            &call.method,
            format!("`{}` must be finite and non-negative, got {}", key, value),
        ));
    }
    Ok(value)
}
