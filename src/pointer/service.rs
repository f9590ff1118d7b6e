use crate::geometry::{Point, Rect};
use crate::pointer::engine::PointerEngine;
use crate::pointer::scheduler::{SleepState, Visibility};
use crate::pointer::stroke::Gesture;
use crate::pointer::PointerSink;
use crate::settings::AirMouseSettings;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// Upper bound on a worker wait so stop requests are noticed promptly even
// with no deadline pending.
const WORKER_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
enum Command {
    Motion { dx: f32, dy: f32 },
    Button { down: bool },
    SetBounds(Rect),
    UpdateSettings(AirMouseSettings),
    Wake,
}

/// Cheap clonable handle the transport collaborator uses to feed raw pen
/// events into a running service. Events sent after the service stops are
/// dropped.
#[derive(Clone)]
pub struct AirMouseHandle {
    tx: Sender<Command>,
}

impl AirMouseHandle {
    pub fn ingest_motion(&self, dx: f32, dy: f32) {
        let _ = self.tx.send(Command::Motion { dx, dy });
    }

    pub fn ingest_button(&self, down: bool) {
        let _ = self.tx.send(Command::Button { down });
    }
}

/// Source of raw pen events (vendor SDK, evdev, a test fixture). Attach
/// hands over the service handle; detach must stop event delivery.
pub trait InputBackend: Send {
    fn attach(&mut self, handle: AirMouseHandle) -> anyhow::Result<()>;
    fn detach(&mut self) -> anyhow::Result<()>;
    fn is_attached(&self) -> bool;
}

/// Power-control half of the transport: toggled on sleep/wake so the
/// backend can drop or re-register its motion listener.
pub trait MotionGate: Send + Sync {
    fn set_motion_enabled(&self, enabled: bool);
}

/// Overlay renderer: moves and shows/hides the on-screen cursor.
pub trait CursorOutput: Send + Sync {
    fn move_to(&self, pos: Point);
    fn set_visible(&self, visible: bool);
}

/// Consumes finished gestures, typically an accessibility/input-injection
/// API performing the actual tap or drag.
pub trait GestureDispatcher: Send + Sync {
    fn dispatch(&self, gesture: &Gesture);
}

#[derive(Debug, Default)]
pub struct NoopMotionGate;

impl MotionGate for NoopMotionGate {
    fn set_motion_enabled(&self, _enabled: bool) {}
}

#[derive(Debug, Default)]
pub struct NoopCursorOutput;

impl CursorOutput for NoopCursorOutput {
    fn move_to(&self, _pos: Point) {}
    fn set_visible(&self, _visible: bool) {}
}

#[derive(Debug, Default)]
pub struct NoopGestureDispatcher;

impl GestureDispatcher for NoopGestureDispatcher {
    fn dispatch(&self, _gesture: &Gesture) {}
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<()>,
}

/// Threaded wrapper around [`PointerEngine`]: one worker thread owns the
/// engine and serializes ingestion, timer firing and outward callbacks,
/// which run on that thread.
pub struct AirMouseService {
    settings: AirMouseSettings,
    backend: Box<dyn InputBackend>,
    cursor: Arc<dyn CursorOutput>,
    dispatcher: Arc<dyn GestureDispatcher>,
    gate: Arc<dyn MotionGate>,
    tx: Option<Sender<Command>>,
    worker: Option<WorkerHandle>,
}

impl AirMouseService {
    pub fn new(
        backend: Box<dyn InputBackend>,
        cursor: Arc<dyn CursorOutput>,
        dispatcher: Arc<dyn GestureDispatcher>,
        gate: Arc<dyn MotionGate>,
        settings: AirMouseSettings,
    ) -> Self {
        Self {
            settings: settings.clamped(),
            backend,
            cursor,
            dispatcher,
            gate,
            tx: None,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Handle for pushing input events, once running.
    pub fn handle(&self) -> Option<AirMouseHandle> {
        self.tx.as_ref().map(|tx| AirMouseHandle { tx: tx.clone() })
    }

    pub fn start(&mut self) {
        if self.worker.is_some() {
            tracing::warn!("air mouse already running");
            return;
        }

        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel();

        if let Err(err) = self.backend.attach(AirMouseHandle { tx: tx.clone() }) {
            tracing::error!(?err, "failed to attach input backend");
            return;
        }

        tracing::debug!("starting air mouse");
        let sink = ServiceSink {
            cursor: Arc::clone(&self.cursor),
            dispatcher: Arc::clone(&self.dispatcher),
            gate: Arc::clone(&self.gate),
        };
        let settings = self.settings.clone();
        let join = thread::spawn(move || worker_loop(settings, sink, rx, stop_rx));
        self.tx = Some(tx);
        self.worker = Some(WorkerHandle { stop_tx, join });
    }

    pub fn stop(&mut self) {
        if self.worker.is_none() && !self.backend.is_attached() {
            return;
        }

        tracing::debug!("stopping air mouse");
        if let Err(err) = self.backend.detach() {
            tracing::error!(?err, "failed to detach input backend");
        }

        self.tx = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.join();
        }
    }

    /// New screen bounds from the display collaborator.
    pub fn set_bounds(&self, bounds: Rect) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Command::SetBounds(bounds));
        }
    }

    /// Explicitly wake the cursor, e.g. from a notification action.
    pub fn wake(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Command::Wake);
        }
    }

    /// Apply new settings to the running worker without a restart.
    pub fn update_settings(&mut self, settings: AirMouseSettings) {
        self.settings = settings.clamped();
        if let Some(tx) = &self.tx {
            let _ = tx.send(Command::UpdateSettings(self.settings.clone()));
        }
    }
}

impl Drop for AirMouseService {
    fn drop(&mut self) {
        self.stop();
    }
}

struct ServiceSink {
    cursor: Arc<dyn CursorOutput>,
    dispatcher: Arc<dyn GestureDispatcher>,
    gate: Arc<dyn MotionGate>,
}

impl PointerSink for ServiceSink {
    fn position_changed(&mut self, pos: Point) {
        self.cursor.move_to(pos);
    }

    fn gesture(&mut self, gesture: Gesture) {
        tracing::debug!(
            points = gesture.path.len(),
            hold_ms = gesture.hold_duration.as_millis() as u64,
            "dispatching gesture"
        );
        self.dispatcher.dispatch(&gesture);
    }

    fn visibility_changed(&mut self, visibility: Visibility) {
        self.cursor.set_visible(visibility == Visibility::Visible);
    }

    fn sleep_changed(&mut self, sleep: SleepState, reattach_motion: bool) {
        tracing::info!(?sleep, "sleep state changed");
        self.gate.set_motion_enabled(reattach_motion);
    }
}

fn worker_loop(
    settings: AirMouseSettings,
    sink: ServiceSink,
    rx: Receiver<Command>,
    stop_rx: Receiver<()>,
) {
    let mut engine = PointerEngine::new(settings, sink);
    engine.start(Instant::now());

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }

        let now = Instant::now();
        let until_deadline = engine
            .next_deadline()
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or(WORKER_POLL);

        match rx.recv_timeout(until_deadline.min(WORKER_POLL)) {
            Ok(command) => {
                let now = Instant::now();
                match command {
                    Command::Motion { dx, dy } => engine.ingest_motion(dx, dy, now),
                    Command::Button { down } => engine.ingest_button(down, now),
                    Command::SetBounds(bounds) => engine.set_bounds(bounds),
                    Command::UpdateSettings(settings) => engine.update_settings(settings, now),
                    Command::Wake => engine.wake(now),
                }
            }
            Err(RecvTimeoutError::Timeout) => engine.advance(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    engine.stop();
}
