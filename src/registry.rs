//! Process-wide registry of native windows, keyed by window id.
//!
//! Lifecycle: each window is written once, when the plugin initializes, and
//! only read afterwards. It lets code without a plugin instance (an exported
//! C entry point, for instance) answer window queries.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::host::NativeWindow;
use crate::window_state;

static WINDOW_REGISTRY: Lazy<RwLock<HashMap<i64, Arc<dyn NativeWindow>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `window` under its id. Returns `false` if the id was already
/// taken; the first registration wins.
pub fn register_window(window: Arc<dyn NativeWindow>) -> bool {
    let id = window.id();
    let mut registry = WINDOW_REGISTRY.write();
    if registry.contains_key(&id) {
        return false;
    }
    registry.insert(id, window);
    debug!("[Registry] Registered window {:#x}", id);
    true
}

pub fn lookup_window(window_id: i64) -> Option<Arc<dyn NativeWindow>> {
    WINDOW_REGISTRY.read().get(&window_id).cloned()
}

/// Caption height of a registered window, 0 when the id is unknown.
pub fn caption_height(window_id: i64) -> f64 {
    match lookup_window(window_id) {
        Some(window) => window_state::caption_height(window.as_ref()),
        None => {
            warn!("[Registry] caption_height: unknown window {:#x}", window_id);
            0.0
        }
    }
}

/// C entry point for native code that needs the caption height.
#[unsafe(no_mangle)]
pub extern "C" fn window_plus_caption_height(window_id: i64) -> f64 {
    caption_height(window_id)
}
