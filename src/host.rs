//! The windowing host collaborator.
//!
//! These traits are the only way the plugin touches native windowing. An
//! AppKit backend implements them over `NSWindow`/`NSApplication`; tests
//! implement them in memory.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

/// A rectangle in screen points, origin at the bottom-left on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrinks the rectangle by `margin` on every side.
    pub fn inset(&self, margin: f64) -> Rect {
        Rect {
            x: self.x + margin,
            y: self.y + margin,
            width: (self.width - 2.0 * margin).max(0.0),
            height: (self.height - 2.0 * margin).max(0.0),
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// The single native window hosting the embedded view.
pub trait NativeWindow: Send + Sync {
    /// Opaque, stable identifier (the window pointer on AppKit).
    fn id(&self) -> i64;

    fn is_fullscreen(&self) -> bool;
    /// Flips native fullscreen, animating the transition.
    fn toggle_fullscreen(&self);

    fn is_zoomed(&self) -> bool;
    /// Flips the native zoom state.
    fn zoom(&self);

    fn set_content_min_size(&self, width: f64, height: f64);

    /// Makes the window visible, key, and frontmost.
    fn make_key_and_order_front(&self);

    /// Asks the window to close; the window consults its lifecycle observers first.
    fn perform_close(&self);

    fn frame(&self) -> Rect;
    fn set_frame(&self, frame: Rect);

    /// Height of the full content view, title bar area included.
    fn content_view_height(&self) -> f64;
    /// Height of the content layout rect, below the title bar.
    fn content_layout_height(&self) -> f64;
}

pub trait Application: Send + Sync {
    fn activate(&self);
    /// Requests termination; the application consults its lifecycle observers first.
    fn terminate(&self);
}

/// Answer to "may the application terminate now?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateReply {
    Now,
    Cancel,
}

/// Receiver of window/application lifecycle events.
pub trait LifecycleObserver: Send + Sync {
    /// The window is about to close. Returning `false` vetoes the close.
    fn window_should_close(&self) -> bool;

    fn application_should_terminate(&self) -> TerminateReply;

    /// The OS routed an "open" request (files/URLs) to this running instance.
    fn application_open_urls(&self, urls: Vec<String>);
}

pub trait WindowingHost: Send + Sync {
    /// The window of the embedded view, if one exists right now.
    fn window(&self) -> Option<Arc<dyn NativeWindow>>;

    fn application(&self) -> Option<Arc<dyn Application>>;

    /// Visible frame of the screen currently holding the window.
    fn work_area(&self) -> Option<Rect>;

    /// Registers `observer` under `name`, replacing any previous subscriber of that name.
    fn subscribe(&self, name: &str, observer: Weak<dyn LifecycleObserver>);

    /// Runs `task` once on the UI context after `delay`.
    fn post_delayed(&self, delay: Duration, task: Box<dyn FnOnce() + Send>);
}

/// Named lifecycle subscribers, for host implementations to fan events out to.
///
/// A close or termination goes ahead only if every live subscriber allows it.
/// Subscribers that were dropped are skipped.
#[derive(Default)]
pub struct ObserverSet {
    observers: Mutex<Vec<(String, Weak<dyn LifecycleObserver>)>>,
}

impl ObserverSet {
    /// Adds `observer` under `name`, replacing an earlier subscriber of that name.
    pub fn subscribe(&self, name: &str, observer: Weak<dyn LifecycleObserver>) {
        let mut observers = self.observers.lock();
        observers.retain(|(existing, _)| existing != name);
        observers.push((name.to_string(), observer));
    }

    pub fn names(&self) -> Vec<String> {
        self.observers.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    // Upgraded outside the lock so observers may re-enter the host.
    fn live(&self) -> Vec<Arc<dyn LifecycleObserver>> {
        self.observers
            .lock()
            .iter()
            .filter_map(|(_, observer)| observer.upgrade())
            .collect()
    }
}

impl LifecycleObserver for ObserverSet {
    fn window_should_close(&self) -> bool {
        self.live()
            .iter()
            .fold(true, |allowed, observer| observer.window_should_close() && allowed)
    }

    fn application_should_terminate(&self) -> TerminateReply {
        let cancelled = self.live().iter().fold(false, |cancelled, observer| {
            (observer.application_should_terminate() == TerminateReply::Cancel) || cancelled
        });
        if cancelled {
            TerminateReply::Cancel
        } else {
            TerminateReply::Now
        }
    }

    fn application_open_urls(&self, urls: Vec<String>) {
        for observer in self.live() {
            observer.application_open_urls(urls.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Veto {
        asked: AtomicUsize,
        allow: bool,
    }

    impl LifecycleObserver for Veto {
        fn window_should_close(&self) -> bool {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.allow
        }
        fn application_should_terminate(&self) -> TerminateReply {
            self.asked.fetch_add(1, Ordering::SeqCst);
            if self.allow { TerminateReply::Now } else { TerminateReply::Cancel }
        }
        fn application_open_urls(&self, _urls: Vec<String>) {}
    }

    fn veto(allow: bool) -> Arc<Veto> {
        Arc::new(Veto { asked: AtomicUsize::new(0), allow })
    }

    #[test]
    fn every_observer_is_asked_and_any_veto_wins() {
        let set = ObserverSet::default();
        let (allow, deny) = (veto(true), veto(false));
        let allow_dyn: Arc<dyn LifecycleObserver> = allow.clone();
        let deny_dyn: Arc<dyn LifecycleObserver> = deny.clone();
        set.subscribe("deny", Arc::downgrade(&deny_dyn));
        set.subscribe("allow", Arc::downgrade(&allow_dyn));

        assert!(!set.window_should_close());
        assert_eq!(set.application_should_terminate(), TerminateReply::Cancel);
        assert_eq!(allow.asked.load(Ordering::SeqCst), 2);
        assert_eq!(deny.asked.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn resubscribing_replaces_and_dropped_observers_are_skipped() {
        let set = ObserverSet::default();
        let deny: Arc<dyn LifecycleObserver> = veto(false);
        let allow: Arc<dyn LifecycleObserver> = veto(true);
        set.subscribe("window_plus", Arc::downgrade(&deny));
        set.subscribe("window_plus", Arc::downgrade(&allow));
        assert_eq!(set.names(), vec!["window_plus".to_string()]);
        assert!(set.window_should_close());

        drop(allow);
        assert_eq!(set.application_should_terminate(), TerminateReply::Now);
    }

    #[test]
    fn inset_never_goes_negative() {
        let rect = Rect::new(0.0, 0.0, 50.0, 100.0).inset(8.0);
        assert_eq!(rect, Rect::new(8.0, 8.0, 34.0, 84.0));

        let rect = Rect::new(0.0, 0.0, 10.0, 100.0).inset(8.0);
        assert_eq!(rect.width, 0.0);
    }

    #[test]
    fn contains_point_is_inclusive() {
        let rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert!(rect.contains_point(10.0, 110.0));
        assert!(!rect.contains_point(9.9, 50.0));
    }
}
