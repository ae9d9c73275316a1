//! In-memory windowing host used by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use window_plus::codec;
use window_plus::{
    Application, BinaryMessenger, LifecycleObserver, MethodCall, NativeWindow, ObserverSet,
    PluginConfig, Rect, TerminateReply, WindowPlusError, WindowPlusPlugin, WindowingHost,
};

type Task = Box<dyn FnOnce() + Send>;

static NEXT_WINDOW_ID: AtomicI64 = AtomicI64::new(0x7f00_0000);

#[derive(Debug, Default, Clone)]
pub struct WindowModel {
    pub visible: bool,
    pub key: bool,
    pub fullscreen: bool,
    pub zoomed: bool,
    pub closed: bool,
    pub fullscreen_toggles: usize,
    pub zoom_toggles: usize,
    pub min_size: Option<(f64, f64)>,
    pub frame: Rect,
    pub content_view_height: f64,
    pub content_layout_height: f64,
}

pub struct FakeWindow {
    id: i64,
    observers: Arc<ObserverSet>,
    pub model: Mutex<WindowModel>,
}

impl FakeWindow {
    pub fn state(&self) -> WindowModel {
        self.model.lock().clone()
    }
}

impl NativeWindow for FakeWindow {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_fullscreen(&self) -> bool {
        self.model.lock().fullscreen
    }

    fn toggle_fullscreen(&self) {
        let mut model = self.model.lock();
        model.fullscreen = !model.fullscreen;
        model.fullscreen_toggles += 1;
    }

    fn is_zoomed(&self) -> bool {
        self.model.lock().zoomed
    }

    fn zoom(&self) {
        let mut model = self.model.lock();
        model.zoomed = !model.zoomed;
        model.zoom_toggles += 1;
    }

    fn set_content_min_size(&self, width: f64, height: f64) {
        self.model.lock().min_size = Some((width, height));
    }

    fn make_key_and_order_front(&self) {
        let mut model = self.model.lock();
        model.visible = true;
        model.key = true;
    }

    fn perform_close(&self) {
        if self.observers.window_should_close() {
            let mut model = self.model.lock();
            model.closed = true;
            model.visible = false;
        }
    }

    fn frame(&self) -> Rect {
        self.model.lock().frame
    }

    fn set_frame(&self, frame: Rect) {
        self.model.lock().frame = frame;
    }

    fn content_view_height(&self) -> f64 {
        self.model.lock().content_view_height
    }

    fn content_layout_height(&self) -> f64 {
        self.model.lock().content_layout_height
    }
}

#[derive(Default)]
pub struct FakeApplication {
    observers: Arc<ObserverSet>,
    pub activations: Mutex<usize>,
    pub terminated: Mutex<bool>,
}

impl Application for FakeApplication {
    fn activate(&self) {
        *self.activations.lock() += 1;
    }

    fn terminate(&self) {
        if self.observers.application_should_terminate() == TerminateReply::Now {
            *self.terminated.lock() = true;
        }
    }
}

pub struct FakeHost {
    observers: Arc<ObserverSet>,
    window: Mutex<Option<Arc<FakeWindow>>>,
    pub application: Arc<FakeApplication>,
    work_area: Option<Rect>,
    tasks: Mutex<Vec<(Duration, Task)>>,
}

impl FakeHost {
    /// A host with one hidden 1024x640 window under a 28pt title bar.
    pub fn new() -> Arc<Self> {
        Self::build(true)
    }

    pub fn without_window() -> Arc<Self> {
        Self::build(false)
    }

    fn build(with_window: bool) -> Arc<Self> {
        let observers = Arc::new(ObserverSet::default());
        let window = with_window.then(|| {
            Arc::new(FakeWindow {
                id: NEXT_WINDOW_ID.fetch_add(1, Ordering::SeqCst),
                observers: observers.clone(),
                model: Mutex::new(WindowModel {
                    frame: Rect::new(100.0, 100.0, 1024.0, 640.0),
                    content_view_height: 668.0,
                    content_layout_height: 640.0,
                    ..WindowModel::default()
                }),
            })
        });
        Arc::new(FakeHost {
            application: Arc::new(FakeApplication {
                observers: observers.clone(),
                ..FakeApplication::default()
            }),
            observers,
            window: Mutex::new(window),
            work_area: Some(Rect::new(0.0, 0.0, 1440.0, 875.0)),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn fake_window(&self) -> Arc<FakeWindow> {
        self.window.lock().clone().expect("host has no window")
    }

    pub fn observer_names(&self) -> Vec<String> {
        self.observers.names()
    }

    pub fn pending_task_delays(&self) -> Vec<Duration> {
        self.tasks.lock().iter().map(|(d, _)| *d).collect()
    }

    /// Runs every posted task, as the UI loop would once their delays elapse.
    pub fn run_pending_tasks(&self) -> usize {
        let tasks: Vec<(Duration, Task)> = self.tasks.lock().drain(..).collect();
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }

    pub fn is_terminated(&self) -> bool {
        *self.application.terminated.lock()
    }
}

impl WindowingHost for FakeHost {
    fn window(&self) -> Option<Arc<dyn NativeWindow>> {
        self.window
            .lock()
            .clone()
            .map(|w| w as Arc<dyn NativeWindow>)
    }

    fn application(&self) -> Option<Arc<dyn Application>> {
        let application: Arc<dyn Application> = self.application.clone();
        Some(application)
    }

    fn work_area(&self) -> Option<Rect> {
        self.work_area
    }

    fn subscribe(&self, name: &str, observer: Weak<dyn LifecycleObserver>) {
        self.observers.subscribe(name, observer);
    }

    fn post_delayed(&self, delay: Duration, task: Task) {
        self.tasks.lock().push((delay, task));
    }
}

/// Messenger that decodes and keeps every outbound call.
#[derive(Default)]
pub struct RecordingMessenger {
    calls: Mutex<Vec<(String, MethodCall)>>,
}

impl RecordingMessenger {
    pub fn calls_named(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(_, call)| call.method == method)
            .map(|(_, call)| call.args.clone())
            .collect()
    }

    pub fn channels(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(c, _)| c.clone()).collect()
    }
}

impl BinaryMessenger for RecordingMessenger {
    fn send(&self, channel: &str, message: &[u8]) -> Result<(), WindowPlusError> {
        let call = codec::decode_method_call(message)?;
        self.calls.lock().push((channel.to_string(), call));
        Ok(())
    }
}

pub struct Harness {
    pub host: Arc<FakeHost>,
    pub recorder: Arc<RecordingMessenger>,
    pub messenger: Arc<dyn BinaryMessenger>,
    pub plugin: Arc<WindowPlusPlugin>,
}

impl Harness {
    pub fn with_host(host: Arc<FakeHost>, launch_args: &[&str]) -> Self {
        let recorder = Arc::new(RecordingMessenger::default());
        let messenger: Arc<dyn BinaryMessenger> = recorder.clone();
        let dyn_host: Arc<dyn WindowingHost> = host.clone();
        let plugin = WindowPlusPlugin::register(
            dyn_host,
            &messenger,
            &PluginConfig::default(),
            launch_args.iter().map(|s| s.to_string()).collect(),
        );
        Harness {
            host,
            recorder,
            messenger,
            plugin,
        }
    }

    pub fn new() -> Self {
        Self::with_host(FakeHost::new(), &["app"])
    }

    /// Sends `method` through the JSON codec, as the UI host would.
    pub fn call(&self, method: &str, args: Value) -> window_plus::MethodResponse {
        let bytes = codec::encode_method_call(&MethodCall::new(method, args));
        let reply = self.plugin.handle_message(&bytes);
        codec::decode_response(&reply).expect("plugin replied with a malformed envelope")
    }
}
