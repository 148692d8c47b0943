//! Thread stop
//!
//! [`Thread::stop`] waits without timeout for the native thread to exit. There
//! is no way to interrupt a worker; it has to return on its own.

use core::sync::atomic::Ordering;

use crate::Thread;

impl Thread {
    /// Blocks until the native thread has exited, then records its exit code
    /// and releases the native handle.
    ///
    /// On error the thread is still considered running and the handle is
    /// kept.
    ///
    /// # Panics
    /// Panics if the thread is not running.
    pub fn stop(&mut self) -> Result<(), ThreadJoinError> {
        let Some(raw) = self.raw.as_ref() else {
            panic!("Not running!");
        };

        // SAFETY: `raw` is taken out of `self` right after a successful join,
        // so it is never joined twice.
        let exit_code = unsafe { raw.join() }?;

        if let Some(raw) = self.raw.take() {
            raw.release();
        }
        let thread_id = self.inner.thread_id.swap(0, Ordering::AcqRel);
        self.exit_code = exit_code;

        log::debug!("thread {thread_id:#x} exited with code {exit_code}");
        Ok(())
    }
}

/// Error type returned by [`Thread::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ThreadJoinError {
    /// The thread tried to join itself.
    #[error("Deadlock detected")]
    Deadlock,

    /// The native handle no longer refers to a joinable thread.
    #[error("Invalid handle")]
    InvalidHandle,

    /// Any other error reported by the platform, as the raw OS error code.
    #[error("Unknown error: {0}")]
    Unknown(i32),
}
