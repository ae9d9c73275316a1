use std::time::Duration;

/// Name of the method channel shared with the UI host.
pub const METHOD_CHANNEL_NAME: &str = "com.alexmercerind/window_plus";

/// Name under which the plugin subscribes to window/application lifecycle events.
pub const OBSERVER_NAME: &str = "window_plus";

/// Application identity used for the single-instance endpoint when none is configured.
pub const DEFAULT_APP_IDENTITY: &str = "com.alexmercerind.window_plus";

// Requests.
pub const ENSURE_INITIALIZED_METHOD_NAME: &str = "ensureInitialized";
pub const NOTIFY_FIRST_FRAME_RENDERED_METHOD_NAME: &str = "notifyFirstFrameRendered";
pub const GET_IS_FULLSCREEN_METHOD_NAME: &str = "getIsFullscreen";
pub const SET_IS_FULLSCREEN_METHOD_NAME: &str = "setIsFullscreen";
pub const SET_MINIMUM_SIZE_METHOD_NAME: &str = "setMinimumSize";
pub const GET_IS_MAXIMIZED_METHOD_NAME: &str = "getIsMaximized";
pub const MAXIMIZE_METHOD_NAME: &str = "maximize";
pub const RESTORE_METHOD_NAME: &str = "restore";
pub const CLOSE_METHOD_NAME: &str = "close";
pub const DESTROY_METHOD_NAME: &str = "destroy";
pub const GET_CAPTION_HEIGHT_METHOD_NAME: &str = "getCaptionHeight";
pub const GET_STATE_METHOD_NAME: &str = "getState";
pub const SET_STATE_METHOD_NAME: &str = "setState";
pub const NOTIFY_RECEIVER_READY_METHOD_NAME: &str = "notifySingleInstanceReceiverReady";

// Notifications pushed to the UI host.
pub const WINDOW_CLOSE_RECEIVED_METHOD_NAME: &str = "windowCloseReceived";
pub const SINGLE_INSTANCE_DATA_RECEIVED_METHOD_NAME: &str = "singleInstanceDataReceived";

/// Argument key carrying a persisted window state map.
pub const SAVED_WINDOW_STATE_KEY: &str = "savedWindowState";

/// Error code replied for missing or ill-typed request arguments.
pub const INVALID_ARGUMENTS_ERROR_CODE: &str = "invalid-arguments";

/// Fallback delay before the startup payload is pushed, for hosts that never
/// send the readiness handshake.
pub const STARTUP_PAYLOAD_FLUSH_DELAY: Duration = Duration::from_millis(500);

/// Margin (in points) a restored window origin must keep from the work area edges.
pub const MONITOR_SAFE_AREA: f64 = 8.0;

/// How many times a secondary launch retries reaching the primary's endpoint
/// while the primary is still binding it.
pub const SINGLE_INSTANCE_CONNECT_ATTEMPTS: u32 = 50;
pub const SINGLE_INSTANCE_CONNECT_INTERVAL: Duration = Duration::from_millis(20);

/// A forwarding peer must deliver its payload line within this time.
pub const SINGLE_INSTANCE_READ_TIMEOUT: Duration = Duration::from_secs(2);
