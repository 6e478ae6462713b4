//! Background OS threads that do nothing but wait to be stopped.
//!
//! Each [`ThreadController`] owns one stop signal. Every thread it starts
//! polls that same signal, so calling [`ThreadController::start`] twice before
//! stopping gives two threads that both exit on the first
//! [`ThreadController::stop`]. That is the behaviour being modelled and is kept
//! as is. Separate controllers do not affect each other.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::handle::ThreadToken;
use crate::os_dependent::{NativeThreads, PLATFORM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// No thread from this controller is alive.
    Idle,
    /// At least one thread is alive and no stop has been requested.
    Running,
    /// A stop was requested and some thread hasn't noticed yet.
    Stopping,
}

pub struct ThreadController {
    stop_requested: Arc<AtomicBool>,
    live: Arc<AtomicUsize>,
    poll_interval: Duration,
}

/// Decrements the live count when the worker exits, even by unwinding.
struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

fn worker(stop_requested: Arc<AtomicBool>, live: LiveGuard, poll_interval: Duration) {
    while !stop_requested.load(Ordering::Acquire) {
        std::thread::sleep(poll_interval);
    }
    drop(live);
}

impl ThreadController {
    pub fn new() -> Self {
        Self::with_config(&HarnessConfig::default())
    }

    pub fn with_config(config: &HarnessConfig) -> Self {
        Self {
            stop_requested: Arc::new(AtomicBool::new(false)),
            live: Arc::new(AtomicUsize::new(0)),
            poll_interval: config.poll_interval,
        }
    }

    /// Spawns a thread that sleeps in `poll_interval` steps until stopped.
    ///
    /// Clears the stop signal first, which also un-stops any thread from this
    /// controller that has been signalled but hasn't looked yet.
    pub fn start(&self) -> Result<ThreadToken> {
        self.stop_requested.store(false, Ordering::Release);

        let stop_requested = Arc::clone(&self.stop_requested);
        self.live.fetch_add(1, Ordering::AcqRel);
        let live = LiveGuard(Arc::clone(&self.live));
        let poll_interval = self.poll_interval;

        let thread = std::thread::Builder::new()
            .name("nativeleak-worker".into())
            .spawn(move || worker(stop_requested, live, poll_interval))
            .map_err(|e| {
                // the closure (and its guard) was dropped, so the count is already back
                warn!("failed to spawn worker thread: {e}");
                HarnessError::ThreadCreateError(e)
            })?;

        let token = PLATFORM.into_token(thread);
        debug!("started worker {token:?}");
        Ok(token)
    }

    /// Signals every thread from this controller to stop, then blocks until
    /// the one behind `token` has exited and been joined.
    ///
    /// This takes at most one poll interval plus scheduling latency. There is
    /// no timeout.
    ///
    /// # Safety
    /// `token` must come from [`ThreadController::start`] and not have been
    /// stopped already.
    pub unsafe fn stop(&self, token: ThreadToken) {
        self.request_stop();
        // SAFETY: guaranteed by caller
        match unsafe { PLATFORM.join(token) } {
            Ok(()) => debug!("joined worker {token:?}"),
            Err(code) => error!("joining worker {token:?} failed: {}", std::io::Error::from_raw_os_error(code)),
        }
    }

    fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Number of threads from this controller that haven't exited yet.
    pub fn live_threads(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ThreadState {
        match (self.live_threads(), self.stop_requested.load(Ordering::Acquire)) {
            (0, _) => ThreadState::Idle,
            (_, false) => ThreadState::Running,
            (_, true) => ThreadState::Stopping,
        }
    }
}

impl Default for ThreadController {
    fn default() -> Self {
        Self::new()
    }
}

/// The controller behind the free [`start`] and [`stop`] functions. Its stop
/// signal is shared by the whole process.
static PROCESS_CONTROLLER: LazyLock<ThreadController> = LazyLock::new(|| {
    match HarnessConfig::from_env() {
        Ok(config) => ThreadController::with_config(&config),
        Err(e) => {
            warn!("ignoring environment: {e}");
            ThreadController::new()
        }
    }
});

pub fn process_controller() -> &'static ThreadController {
    &PROCESS_CONTROLLER
}

/// [`ThreadController::start`] on the process-wide controller.
pub fn start() -> Result<ThreadToken> {
    PROCESS_CONTROLLER.start()
}

/// [`ThreadController::stop`] on the process-wide controller.
///
/// # Safety
/// `token` must come from [`start`] and not have been stopped already.
pub unsafe fn stop(token: ThreadToken) {
    // SAFETY: guaranteed by caller
    unsafe { PROCESS_CONTROLLER.stop(token) }
}
