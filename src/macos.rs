//! AppKit implementation of the windowing host.
//!
//! The runner that owns the `NSWindow`/`NSApplication` delegates forwards
//! `windowShouldClose:`, `applicationShouldTerminate:` and
//! `application:openURLs:` to [`AppKitHost::observers`]; scheduling is left to
//! the runner's main-thread task runner.

use std::sync::{Arc, Weak};
use std::time::Duration;

use objc2::MainThreadMarker;
use objc2::rc::Retained;
use objc2_app_kit::{NSApplication, NSWindow, NSWindowStyleMask};
use objc2_foundation::{NSPoint, NSRect, NSSize};

use crate::host::{
    Application, LifecycleObserver, NativeWindow, ObserverSet, Rect, WindowingHost,
};

/// Posts a task onto the main thread after a delay.
pub type MainThreadScheduler = Box<dyn Fn(Duration, Box<dyn FnOnce() + Send>) + Send + Sync>;

fn to_rect(rect: NSRect) -> Rect {
    Rect::new(rect.origin.x, rect.origin.y, rect.size.width, rect.size.height)
}

pub struct AppKitWindow(Retained<NSWindow>);

// SAFETY: the plugin is only driven from the main thread (channel handlers,
// delegate callbacks and tasks posted through the scheduler all run there).
unsafe impl Send for AppKitWindow {}
unsafe impl Sync for AppKitWindow {}

impl NativeWindow for AppKitWindow {
    fn id(&self) -> i64 {
        Retained::as_ptr(&self.0) as i64
    }

    fn is_fullscreen(&self) -> bool {
        self.0.styleMask().contains(NSWindowStyleMask::FullScreen)
    }

    fn toggle_fullscreen(&self) {
        self.0.toggleFullScreen(None);
    }

    fn is_zoomed(&self) -> bool {
        self.0.isZoomed()
    }

    fn zoom(&self) {
        self.0.zoom(None);
    }

    fn set_content_min_size(&self, width: f64, height: f64) {
        self.0.setContentMinSize(NSSize::new(width, height));
    }

    fn make_key_and_order_front(&self) {
        self.0.makeKeyAndOrderFront(None);
    }

    fn perform_close(&self) {
        self.0.performClose(None);
    }

    fn frame(&self) -> Rect {
        to_rect(self.0.frame())
    }

    fn set_frame(&self, frame: Rect) {
        let rect = NSRect::new(
            NSPoint::new(frame.x, frame.y),
            NSSize::new(frame.width, frame.height),
        );
        self.0.setFrame_display(rect, true);
    }

    fn content_view_height(&self) -> f64 {
        self.0
            .contentView()
            .map(|view| view.frame().size.height)
            .unwrap_or(0.0)
    }

    fn content_layout_height(&self) -> f64 {
        self.0.contentLayoutRect().size.height
    }
}

pub struct AppKitApplication(Retained<NSApplication>);

// SAFETY: see `AppKitWindow`.
unsafe impl Send for AppKitApplication {}
unsafe impl Sync for AppKitApplication {}

impl Application for AppKitApplication {
    #[allow(deprecated)]
    fn activate(&self) {
        self.0.activateIgnoringOtherApps(true);
    }

    fn terminate(&self) {
        self.0.terminate(None);
    }
}

pub struct AppKitHost {
    window: Option<Arc<AppKitWindow>>,
    application: Arc<AppKitApplication>,
    observers: ObserverSet,
    scheduler: MainThreadScheduler,
}

impl AppKitHost {
    /// Wraps the window hosting the embedded view. Must be called on the main thread.
    pub fn new(
        _mtm: MainThreadMarker,
        window: Option<Retained<NSWindow>>,
        application: Retained<NSApplication>,
        scheduler: MainThreadScheduler,
    ) -> Self {
        AppKitHost {
            window: window.map(|w| Arc::new(AppKitWindow(w))),
            application: Arc::new(AppKitApplication(application)),
            observers: ObserverSet::default(),
            scheduler,
        }
    }

    /// Lifecycle fan-out for the runner's window and application delegates.
    pub fn observers(&self) -> &ObserverSet {
        &self.observers
    }
}

impl WindowingHost for AppKitHost {
    fn window(&self) -> Option<Arc<dyn NativeWindow>> {
        self.window
            .clone()
            .map(|window| window as Arc<dyn NativeWindow>)
    }

    fn application(&self) -> Option<Arc<dyn Application>> {
        let application: Arc<dyn Application> = self.application.clone();
        Some(application)
    }

    fn work_area(&self) -> Option<Rect> {
        let window = self.window.as_ref()?;
        window.0.screen().map(|screen| to_rect(screen.visibleFrame()))
    }

    fn subscribe(&self, name: &str, observer: Weak<dyn LifecycleObserver>) {
        self.observers.subscribe(name, observer);
    }

    fn post_delayed(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        (self.scheduler)(delay, task);
    }
}
