//! Thread Handle
//!
//! [`Thread`] owns at most one native thread. The lifecycle operations live in
//! `thread_impl`: `start`/`spawn` in `create.rs`, `stop` in `wait.rs` and
//! naming in `name.rs`.

use core::{fmt, sync::atomic::Ordering};
use std::sync::Arc;

use crate::{sys, thread_inner::ThreadInner};

/// Status reported by [`Thread::exit_code`] before the first completed run.
pub const EXIT_SUCCESS: i32 = 0;

/// Handle owning at most one native thread at a time.
///
/// A `Thread` starts out idle. [`start`](Thread::start) or
/// [`spawn`](Thread::spawn) moves it to running, [`stop`](Thread::stop) joins
/// the native thread and brings it back to idle, ready to be started again.
///
/// Dropping a running `Thread` blocks until the native thread has exited.
pub struct Thread {
    pub(crate) inner: Arc<ThreadInner>,

    /// Native thread, present exactly while running.
    pub(crate) raw: Option<sys::RawThread>,

    /// Stack size requested by the last start, 0 for the platform default.
    pub(crate) stack_size: usize,

    pub(crate) exit_code: i32,
}

// SAFETY: The native handle may be joined and released from any thread, and
// the shared state is only touched through atomics and the semaphore.
unsafe impl Send for Thread {}
// SAFETY: Shared access only reads plain fields or names the thread, which
// the native APIs allow from any thread.
unsafe impl Sync for Thread {}

impl Thread {
    /// Creates an idle thread handle.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadInner::new()),
            raw: None,
            stack_size: 0,
            exit_code: EXIT_SUCCESS,
        }
    }

    /// Returns `true` between a successful start and the matching stop.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.raw.is_some()
    }

    /// Returns the status captured by the last [`stop`](Thread::stop).
    ///
    /// Before the first completed run this is [`EXIT_SUCCESS`].
    #[inline]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns the native id of the running thread.
    ///
    /// This is the Win32 thread id on Windows and the `pthread_t` value on
    /// POSIX targets. `None` while idle.
    pub fn thread_id(&self) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        // Neither a `pthread_t` nor a Win32 thread id is ever 0.
        match self.inner.thread_id.load(Ordering::Acquire) {
            0 => None,
            id => Some(id),
        }
    }

    /// Returns the stack size requested by the last start.
    pub fn stack_size(&self) -> usize {
        self.stack_size
    }
}

impl Default for Thread {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Thread {
    fn drop(&mut self) {
        if !self.is_running() {
            return;
        }

        if let Err(err) = self.stop() {
            log::error!("failed to join thread on drop: {err}");
        }
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("running", &self.is_running())
            .field("thread_id", &self.thread_id())
            .field("stack_size", &self.stack_size)
            .field("exit_code", &self.exit_code)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::{EXIT_SUCCESS, Thread};

    assert_impl_all!(Thread: Send, Sync, Default);
    assert_not_impl_any!(Thread: Clone, Copy);

    #[test_log::test]
    fn new_thread_is_idle() {
        let thread = Thread::new();

        assert!(!thread.is_running());
        assert_eq!(thread.exit_code(), EXIT_SUCCESS);
        assert_eq!(thread.thread_id(), None);
        assert_eq!(thread.stack_size(), 0);
    }

    #[test_log::test]
    fn dropping_idle_thread_is_a_no_op() {
        drop(Thread::new());
    }
}
