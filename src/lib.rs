//! Native window controls for an embedded UI framework, over a method channel.
//!
//! - Dispatches a closed set of window requests (fullscreen, maximize/restore,
//!   minimum size, close/destroy, caption height, saved state) to a
//!   [`WindowingHost`]
//! - Vetoes every native close and forwards it as `windowCloseReceived`; only
//!   an explicit `destroy` lets the application terminate
//! - Delivers launch and forwarded "open" payloads as `singleInstanceDataReceived`
//! - Arbitrates single-instance launches over a named local socket

pub mod channel;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod host;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod plugin;
pub mod registry;
pub mod request;
#[cfg(unix)]
pub mod single_instance;
pub mod window_state;

use std::sync::Once;

use env_logger::{Builder, Env};

pub use channel::{BinaryMessenger, MethodChannel};
pub use codec::{MethodCall, MethodResponse};
pub use config::PluginConfig;
pub use error::WindowPlusError;
pub use host::{
    Application, LifecycleObserver, NativeWindow, ObserverSet, Rect, TerminateReply, WindowingHost,
};
pub use plugin::{WindowPlusPlugin, launch_payload};
pub use window_state::SavedWindowState;

// The host may tear the engine down and register the plugin again in the same
// process; the logger can only be installed once.
static LOGGER_INIT: Once = Once::new();

pub fn init_logging() {
    LOGGER_INIT.call_once(|| {
        let _ = Builder::from_env(Env::default().default_filter_or("debug")).try_init();
    });
}
