//! Background maintenance tasks.
//!
//! Each task owns one crossbeam queue and the writer handle of exactly one
//! derived layer, and runs on its own named thread until its sender is
//! dropped:
//!
//! ```text
//!   sim thread                         task threads
//!   ──────────                         ────────────
//!   change_owner ──[BorderMsg]──────▶  settle-border       (border flags)
//!                ──[LandmarkMsg]────▶  settle-landmark     (landmark values)
//!                ◀─[OwnerCorrection]─┘
//!   set_screen   ──[ConstructionMsg]▶  settle-construction (construction marks)
//! ```
//!
//! A panic while processing one message is caught and logged; the task
//! carries on with the next message.

pub(crate) mod border;
pub(crate) mod construction;
pub(crate) mod landmark;

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, error};

use crate::config::ConfigError;

pub use landmark::OwnerCorrection;

// ── TaskError ──────────────────────────────────────────────────────

/// Failure to reach a background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The task's thread has exited or the grid was shut down.
    Disconnected {
        /// Task name.
        task: &'static str,
    },
    /// The task did not answer within the flush timeout.
    Timeout {
        /// Task name.
        task: &'static str,
        /// How long the caller waited.
        waited_ms: u64,
    },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { task } => write!(f, "{task} task is not running"),
            Self::Timeout { task, waited_ms } => {
                write!(f, "{task} task did not respond within {waited_ms}ms")
            }
        }
    }
}

impl std::error::Error for TaskError {}

// ── TaskHandle ─────────────────────────────────────────────────────

/// Sim-side end of one background task.
pub(crate) struct TaskHandle<M> {
    name: &'static str,
    tx: Option<Sender<M>>,
    thread: Option<JoinHandle<()>>,
}

impl<M: Send + 'static> TaskHandle<M> {
    /// Spawn `handler` on a thread named `settle-{name}`, fed by a queue of
    /// `capacity` (unbounded if `None`).
    pub(crate) fn spawn<H>(
        name: &'static str,
        capacity: Option<usize>,
        mut handler: H,
    ) -> Result<Self, ConfigError>
    where
        H: FnMut(M) + Send + 'static,
    {
        let (tx, rx) = match capacity {
            Some(n) => crossbeam_channel::bounded(n),
            None => crossbeam_channel::unbounded(),
        };
        let thread = thread::Builder::new()
            .name(format!("settle-{name}"))
            .spawn(move || run(name, rx, &mut handler))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("{name} task: {e}"),
            })?;
        Ok(Self {
            name,
            tx: Some(tx),
            thread: Some(thread),
        })
    }

    /// Task name, for logs and errors.
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Queue `msg`. Blocks while a bounded queue is full.
    pub(crate) fn send(&self, msg: M) -> Result<(), TaskError> {
        let tx = self.tx.as_ref().ok_or(TaskError::Disconnected { task: self.name })?;
        tx.send(msg)
            .map_err(|_| TaskError::Disconnected { task: self.name })
    }

    /// Send the message built by `make` around a fresh reply channel and
    /// wait up to `timeout` for the task to answer.
    pub(crate) fn request(
        &self,
        make: impl FnOnce(Sender<()>) -> M,
        timeout: Duration,
    ) -> Result<(), TaskError> {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        self.send(make(reply_tx))?;
        match reply_rx.recv_timeout(timeout) {
            Ok(()) => Ok(()),
            Err(RecvTimeoutError::Timeout) => Err(TaskError::Timeout {
                task: self.name,
                waited_ms: timeout.as_millis() as u64,
            }),
            Err(RecvTimeoutError::Disconnected) => {
                Err(TaskError::Disconnected { task: self.name })
            }
        }
    }

    /// Close the queue and join the thread. Returns whether the thread
    /// exited cleanly. Idempotent.
    pub(crate) fn join(&mut self) -> bool {
        self.tx.take();
        match self.thread.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }
}

/// Task main loop: handle messages until every sender is gone.
fn run<M, H: FnMut(M)>(name: &'static str, rx: Receiver<M>, handler: &mut H) {
    debug!(task = name, "task started");
    let mut handled = 0u64;
    while let Ok(msg) = rx.recv() {
        if catch_unwind(AssertUnwindSafe(|| handler(msg))).is_err() {
            error!(task = name, "panic while processing queue entry; entry skipped");
        }
        handled += 1;
    }
    debug!(task = name, handled, "task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Msg {
        Work(u32),
        Flush(Sender<()>),
    }

    fn counting_task(count: Arc<AtomicUsize>) -> TaskHandle<Msg> {
        TaskHandle::spawn("test", None, move |msg| match msg {
            Msg::Work(0) => panic!("poison entry"),
            Msg::Work(_) => {
                count.fetch_add(1, Ordering::Relaxed);
            }
            Msg::Flush(reply) => {
                let _ = reply.send(());
            }
        })
        .unwrap()
    }

    #[test]
    fn panic_in_one_entry_does_not_stop_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut task = counting_task(Arc::clone(&count));
        task.send(Msg::Work(1)).unwrap();
        task.send(Msg::Work(0)).unwrap();
        task.send(Msg::Work(2)).unwrap();
        task.request(Msg::Flush, Duration::from_secs(5)).unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 2);
        assert!(task.join());
    }

    #[test]
    fn send_after_join_is_disconnected() {
        let mut task = counting_task(Arc::new(AtomicUsize::new(0)));
        assert!(task.join());
        assert!(task.join());
        assert_eq!(
            task.send(Msg::Work(1)),
            Err(TaskError::Disconnected { task: "test" })
        );
    }

    #[test]
    fn request_times_out_when_task_never_replies() {
        let (hold_tx, hold_rx) = crossbeam_channel::bounded::<()>(0);
        let mut task: TaskHandle<Sender<()>> = TaskHandle::spawn("slow", None, move |_reply| {
            // Keep the reply sender alive until released.
            let _ = hold_rx.recv();
        })
        .unwrap();
        let result = task.request(|reply| reply, Duration::from_millis(20));
        assert_eq!(
            result,
            Err(TaskError::Timeout {
                task: "slow",
                waited_ms: 20
            })
        );
        drop(hold_tx);
        assert!(task.join());
    }
}
