//! The window control plugin: request dispatch and lifecycle forwarding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use log::{debug, error, info};
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::channel::{BinaryMessenger, MethodChannel};
use crate::codec::{self, MethodCall, MethodResponse};
use crate::config::PluginConfig;
use crate::constants::{
    OBSERVER_NAME, SINGLE_INSTANCE_DATA_RECEIVED_METHOD_NAME, WINDOW_CLOSE_RECEIVED_METHOD_NAME,
};
use crate::host::{LifecycleObserver, TerminateReply, WindowingHost};
use crate::registry;
use crate::request::WindowRequest;
use crate::window_state::{self, SavedWindowState};

/// Strips the program path from process arguments, leaving the files/URLs the
/// app was launched with.
pub fn launch_payload<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().skip(1).collect()
}

pub struct WindowPlusPlugin {
    host: Arc<dyn WindowingHost>,
    channel: MethodChannel,
    /// Set by `destroy`; termination is vetoed until then.
    pending_close: AtomicBool,
    /// Launch payload, taken on first flush.
    startup_payload: Mutex<Option<Vec<String>>>,
}

impl WindowPlusPlugin {
    /// Creates the plugin, subscribes it to lifecycle events and schedules the
    /// fallback flush of the launch payload.
    ///
    /// `launch_args` are the raw process arguments, program path first.
    pub fn register(
        host: Arc<dyn WindowingHost>,
        messenger: &Arc<dyn BinaryMessenger>,
        config: &PluginConfig,
        launch_args: Vec<String>,
    ) -> Arc<Self> {
        crate::init_logging();
        let plugin = Arc::new(WindowPlusPlugin {
            host: host.clone(),
            channel: MethodChannel::new(&config.channel_name, messenger),
            pending_close: AtomicBool::new(false),
            startup_payload: Mutex::new(Some(launch_payload(launch_args))),
        });

        let weak: Weak<WindowPlusPlugin> = Arc::downgrade(&plugin);
        let observer: Weak<dyn LifecycleObserver> = weak.clone();
        host.subscribe(OBSERVER_NAME, observer);

        if let Some(window) = host.window() {
            registry::register_window(window);
        }

        host.post_delayed(
            config.startup_flush_delay(),
            Box::new(move || {
                if let Some(plugin) = weak.upgrade() {
                    plugin.flush_startup_payload();
                }
            }),
        );

        info!(
            "[WindowPlus] Registered on channel '{}'",
            plugin.channel.name()
        );
        plugin
    }

    /// Entry point for raw channel bytes; returns the encoded reply.
    pub fn handle_message(&self, message: &[u8]) -> Vec<u8> {
        let response = match codec::decode_method_call(message) {
            Ok(call) => self.handle_method_call(&call),
            Err(e) => {
                error!("[WindowPlus] {}", e);
                MethodResponse::from(e)
            }
        };
        codec::encode_response(&response)
    }

    pub fn handle_method_call(&self, call: &MethodCall) -> MethodResponse {
        match WindowRequest::parse(call) {
            Ok(Some(request)) => self.dispatch(request),
            Ok(None) => {
                debug!("[WindowPlus] Not implemented: '{}'", call.method);
                MethodResponse::NotImplemented
            }
            Err(e) => {
                error!("[WindowPlus] {}", e);
                MethodResponse::from(e)
            }
        }
    }

    fn dispatch(&self, request: WindowRequest) -> MethodResponse {
        let window = self.host.window();
        match request {
            WindowRequest::EnsureInitialized => {
                let id = match window {
                    Some(window) => {
                        let id = window.id();
                        registry::register_window(window);
                        id
                    }
                    None => 0,
                };
                MethodResponse::Success(json!(id))
            }
            WindowRequest::NotifyFirstFrameRendered => {
                self.bring_to_front();
                MethodResponse::success_empty()
            }
            WindowRequest::GetIsFullscreen => {
                MethodResponse::Success(json!(window.is_some_and(|w| w.is_fullscreen())))
            }
            WindowRequest::SetIsFullscreen { enabled } => {
                if let Some(window) = window {
                    if window.is_fullscreen() != enabled {
                        window.toggle_fullscreen();
                    }
                }
                MethodResponse::success_empty()
            }
            WindowRequest::SetMinimumSize { width, height } => {
                if let Some(window) = window {
                    window.set_content_min_size(width, height);
                }
                MethodResponse::success_empty()
            }
            WindowRequest::GetIsMaximized => {
                MethodResponse::Success(json!(window.is_some_and(|w| w.is_zoomed())))
            }
            WindowRequest::Maximize => {
                if let Some(window) = window {
                    if !window.is_zoomed() {
                        window.zoom();
                    }
                }
                MethodResponse::success_empty()
            }
            WindowRequest::Restore => {
                if let Some(window) = window {
                    if window.is_zoomed() {
                        window.zoom();
                    }
                }
                MethodResponse::success_empty()
            }
            WindowRequest::Close => {
                if let Some(window) = window {
                    window.perform_close();
                }
                MethodResponse::success_empty()
            }
            WindowRequest::Destroy => {
                self.pending_close.store(true, Ordering::SeqCst);
                if let Some(application) = self.host.application() {
                    application.terminate();
                }
                MethodResponse::success_empty()
            }
            WindowRequest::GetCaptionHeight => {
                let height = window
                    .map(|w| window_state::caption_height(w.as_ref()))
                    .unwrap_or(0.0);
                MethodResponse::Success(json!(height))
            }
            WindowRequest::GetState { saved } => {
                let state = match window {
                    // While zoomed, report the caller's saved geometry, not the zoomed frame.
                    Some(window) if window.is_zoomed() => match saved {
                        Some(saved) => SavedWindowState { maximized: true, ..saved },
                        None => SavedWindowState::from_frame(window.frame(), true),
                    },
                    Some(window) => SavedWindowState::from_frame(window.frame(), false),
                    None => SavedWindowState::unknown(),
                };
                MethodResponse::Success(json!(state))
            }
            WindowRequest::SetState { saved } => {
                if let Some(window) = window {
                    let frame = window_state::restore_frame(&saved, self.host.work_area());
                    window.set_frame(frame);
                    if saved.maximized && !window.is_zoomed() {
                        window.zoom();
                    }
                }
                MethodResponse::success_empty()
            }
            WindowRequest::NotifyReceiverReady => {
                self.flush_startup_payload();
                MethodResponse::success_empty()
            }
        }
    }

    /// Pushes the launch payload to the host. Only the first call sends
    /// anything; returns whether this call did.
    pub fn flush_startup_payload(&self) -> bool {
        let Some(payload) = self.startup_payload.lock().take() else {
            return false;
        };
        debug!("[WindowPlus] Flushing startup payload ({} item(s))", payload.len());
        self.channel
            .notify(SINGLE_INSTANCE_DATA_RECEIVED_METHOD_NAME, json!(payload));
        true
    }

    /// Delivers a payload routed to this running instance and brings the window forward.
    pub fn deliver_payload(&self, payload: Vec<String>) {
        self.bring_to_front();
        self.channel
            .notify(SINGLE_INSTANCE_DATA_RECEIVED_METHOD_NAME, json!(payload));
    }

    /// A sink for payloads arriving off the UI context; each payload is posted
    /// back onto it before reaching the plugin.
    pub fn payload_sink(self: &Arc<Self>) -> impl Fn(Vec<String>) + Send + Sync + use<> {
        let host = self.host.clone();
        let weak = Arc::downgrade(self);
        move |payload| {
            let weak = weak.clone();
            host.post_delayed(
                Duration::ZERO,
                Box::new(move || {
                    if let Some(plugin) = weak.upgrade() {
                        plugin.deliver_payload(payload);
                    }
                }),
            );
        }
    }

    pub fn is_pending_close(&self) -> bool {
        self.pending_close.load(Ordering::SeqCst)
    }

    fn bring_to_front(&self) {
        if let Some(window) = self.host.window() {
            window.make_key_and_order_front();
        }
        if let Some(application) = self.host.application() {
            application.activate();
        }
    }

    fn notify_close_requested(&self) {
        self.channel.notify(WINDOW_CLOSE_RECEIVED_METHOD_NAME, Value::Null);
    }
}

impl LifecycleObserver for WindowPlusPlugin {
    fn window_should_close(&self) -> bool {
        self.notify_close_requested();
        false
    }

    fn application_should_terminate(&self) -> TerminateReply {
        if self.is_pending_close() {
            return TerminateReply::Now;
        }
        self.notify_close_requested();
        TerminateReply::Cancel
    }

    fn application_open_urls(&self, urls: Vec<String>) {
        self.deliver_payload(urls);
    }
}
