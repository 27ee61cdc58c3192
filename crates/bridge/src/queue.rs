//! Frame handoff queue
//!
//! Bounded buffer between the device's acquisition thread and the
//! publishing thread. `push` never blocks and never panics; when full, the
//! incoming frame is dropped so resident frames are favored. `pop_latest`
//! hands out the most recently pushed frame first, trading completeness for
//! freshness under load.
//!
//! The mutex protects only queue membership and the wait condition; it is
//! never held across publication work.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use contracts::Frame;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct QueueInner {
    frames: Vec<Arc<Frame>>,
    running: bool,
}

/// Bounded, drop-incoming, latest-first frame queue
pub struct FrameQueue {
    inner: Mutex<QueueInner>,
    available: Condvar,
    capacity: usize,
    dropped: AtomicU64,
}

impl FrameQueue {
    /// Create a queue with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                frames: Vec::with_capacity(capacity),
                running: true,
            }),
            available: Condvar::new(),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Push a frame from the acquisition thread.
    ///
    /// Returns false when the queue was full and the frame was dropped.
    /// Completes in bounded time; it runs on the device's delivery thread.
    pub fn push(&self, frame: Arc<Frame>) -> bool {
        let mut inner = lock(&self.inner);
        if inner.frames.len() < self.capacity {
            inner.frames.push(frame);
            self.available.notify_all();
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Wait for a frame and pop the most recently pushed one.
    ///
    /// Returns `None` on a timeout wake with an empty queue, or once
    /// shutdown has been requested (queued frames are then discarded). The
    /// lock is released before the caller does any publication work.
    pub fn pop_latest(&self, timeout: Duration) -> Option<Arc<Frame>> {
        let mut inner = lock(&self.inner);
        loop {
            if !inner.running {
                return None;
            }
            if let Some(frame) = inner.frames.pop() {
                return Some(frame);
            }

            let (guard, wait) = match self.available.wait_timeout(inner, timeout) {
                Ok(r) => r,
                Err(poisoned) => poisoned.into_inner(),
            };
            inner = guard;
            if wait.timed_out() {
                // caller re-enters; no side effects on a timeout wake
                return None;
            }
        }
    }

    /// Request shutdown: clear the running flag and wake all waiters
    pub fn shutdown(&self) {
        let mut inner = lock(&self.inner);
        inner.running = false;
        self.available.notify_all();
    }

    /// Whether shutdown has not been requested yet
    pub fn is_running(&self) -> bool {
        lock(&self.inner).running
    }

    /// Number of frames currently queued
    pub fn len(&self) -> usize {
        lock(&self.inner).frames.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total frames dropped because the queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
