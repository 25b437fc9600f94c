//! Debounced background rendering.
//!
//! A [`RenderSession`] owns a worker thread. Every [`request`] bumps a
//! generation counter and hands the worker a snapshot of the source and
//! stack. The worker waits until no newer request has arrived for the
//! debounce interval, renders the most recent one, and publishes the frame
//! only if no newer request came in while it was rendering. Callers only
//! ever observe complete frames.
//!
//! [`request`]: RenderSession::request

use crate::executor::render;
use crate::stack::EffectStack;
use pixfx_core::Raster;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Session tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet period required before a render starts.
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
        }
    }
}

/// A completed render.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Generation of the request that produced it.
    pub generation: u64,
    /// Rendered image.
    pub raster: Arc<Raster>,
}

struct Request {
    generation: u64,
    source: Arc<Raster>,
    stack: EffectStack,
}

enum Message {
    Render(Request),
    Shutdown,
}

#[derive(Default)]
struct Shared {
    generation: AtomicU64,
    renders: AtomicU64,
    frame: Mutex<Option<Frame>>,
    published: Condvar,
}

/// Trailing-debounce renderer running on its own thread.
pub struct RenderSession {
    config: SessionConfig,
    shared: Arc<Shared>,
    tx: Sender<Message>,
    worker: Option<JoinHandle<()>>,
}

impl RenderSession {
    /// Starts the worker thread.
    pub fn new(config: SessionConfig) -> Self {
        let shared = Arc::new(Shared::default());
        let (tx, rx) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let debounce = config.debounce;
        let worker = thread::spawn(move || worker_loop(rx, worker_shared, debounce));
        Self {
            config,
            shared,
            tx,
            worker: Some(worker),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Schedules a render and returns its generation.
    ///
    /// Any earlier request that has not yet been published is superseded.
    pub fn request(&self, source: Arc<Raster>, stack: EffectStack) -> u64 {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(generation, "render requested");
        let msg = Message::Render(Request {
            generation,
            source,
            stack,
        });
        if self.tx.send(msg).is_err() {
            warn!(generation, "render worker is gone; request dropped");
        }
        generation
    }

    /// Generation of the most recent request.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Number of render passes actually run.
    pub fn render_count(&self) -> u64 {
        self.shared.renders.load(Ordering::SeqCst)
    }

    /// Most recently published frame.
    pub fn latest_frame(&self) -> Option<Frame> {
        self.shared
            .frame
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Blocks until a frame of at least `generation` is published or the
    /// timeout expires.
    pub fn wait_for(&self, generation: u64, timeout: Duration) -> Option<Frame> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.shared.frame.lock().ok()?;
        loop {
            if let Some(frame) = guard.as_ref().filter(|f| f.generation >= generation) {
                return Some(frame.clone());
            }
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (next, _) = self.shared.published.wait_timeout(guard, remaining).ok()?;
            guard = next;
        }
    }
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        let _ = self.tx.send(Message::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("render worker panicked");
            }
        }
    }
}

fn worker_loop(rx: Receiver<Message>, shared: Arc<Shared>, debounce: Duration) {
    while let Ok(Message::Render(mut pending)) = rx.recv() {
        // Trailing debounce: restart the quiet period on every newer request.
        loop {
            match rx.recv_timeout(debounce) {
                Ok(Message::Render(newer)) => pending = newer,
                Ok(Message::Shutdown) | Err(RecvTimeoutError::Disconnected) => return,
                Err(RecvTimeoutError::Timeout) => break,
            }
        }

        if pending.generation != shared.generation.load(Ordering::SeqCst) {
            continue;
        }

        let raster = render(&pending.source, &pending.stack);
        shared.renders.fetch_add(1, Ordering::SeqCst);

        if pending.generation != shared.generation.load(Ordering::SeqCst) {
            debug!(generation = pending.generation, "discarding superseded frame");
            continue;
        }
        if let Ok(mut frame) = shared.frame.lock() {
            *frame = Some(Frame {
                generation: pending.generation,
                raster: Arc::new(raster),
            });
            shared.published.notify_all();
        }
    }
}
