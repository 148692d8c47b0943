//! Thread creation
//!
//! [`Thread::start`] spawns the native thread and waits on the handle's
//! startup semaphore. The new thread posts it from the start trampoline after
//! it has recorded its own id and before it calls the worker, so once start
//! returns the thread is running and its id is valid.

use core::ffi::c_void;
use std::sync::Arc;

use super::{name::ThreadName, options::ThreadOptions};
use crate::{Thread, sys, thread_inner::StartArgs};

/// Worker entry point.
///
/// Receives the user data pointer given to [`Thread::start`]. The returned
/// value becomes the thread's exit code.
pub type ThreadFunc = unsafe extern "C" fn(*mut c_void) -> i32;

type BoxedWorker = Box<dyn FnOnce() -> i32 + Send + 'static>;

impl Thread {
    /// Starts a native thread running `func(user_data)`.
    ///
    /// Blocks until the new thread has begun executing. If a name is given in
    /// `options` it is applied on a best-effort basis.
    ///
    /// Returns an error if the platform refuses to create the thread; the
    /// handle then stays idle.
    ///
    /// # Panics
    /// Panics if the thread is already running.
    ///
    /// # Safety
    /// * `user_data` must stay valid for `func` until the thread is stopped.
    /// * `func` must be safe to call on another thread with `user_data`.
    pub unsafe fn start(
        &mut self,
        func: ThreadFunc,
        user_data: *mut c_void,
        options: ThreadOptions,
    ) -> Result<(), ThreadStartError> {
        assert!(!self.is_running(), "Already running!");

        let ThreadOptions { stack_size, name } = options;
        let name = name.as_deref().and_then(ThreadName::new);

        let arg = StartArgs {
            inner: Arc::clone(&self.inner),
            func,
            user_data,
            name: if sys::SELF_NAMING { name.clone() } else { None },
        }
        .into_raw();

        // SAFETY: `arg` comes from `StartArgs::into_raw`.
        let raw = match unsafe { sys::RawThread::spawn(arg, stack_size) } {
            Ok(raw) => raw,
            Err(err) => {
                // The thread never ran, so the arguments are still ours.
                drop(unsafe { StartArgs::from_raw(arg) });
                log::debug!("failed to create thread: {err}");
                return Err(err);
            }
        };

        self.inner.started.wait();

        self.raw = Some(raw);
        self.stack_size = stack_size;
        log::debug!(
            "thread {:#x} running (stack size {stack_size})",
            self.thread_id().unwrap_or_default()
        );

        if !sys::SELF_NAMING {
            if let Some(name) = &name {
                self.apply_name(name);
            }
        }

        Ok(())
    }

    /// Starts a native thread running the closure `f`.
    ///
    /// Same as [`start`](Thread::start), with the closure owning its data
    /// instead of borrowing a raw pointer. The closure's return value becomes
    /// the exit code.
    ///
    /// # Panics
    /// Panics if the thread is already running.
    pub fn spawn<F>(&mut self, f: F, options: ThreadOptions) -> Result<(), ThreadStartError>
    where
        F: FnOnce() -> i32 + Send + 'static,
    {
        assert!(!self.is_running(), "Already running!");

        let worker: Box<BoxedWorker> = Box::new(Box::new(f));
        let data = Box::into_raw(worker).cast::<c_void>();

        // SAFETY: `data` is owned by `run_boxed_worker` once the thread runs,
        // and the closure is `Send + 'static`.
        let result = unsafe { self.start(run_boxed_worker, data, options) };
        if result.is_err() {
            // The worker never ran; reclaim the closure.
            drop(unsafe { Box::from_raw(data.cast::<BoxedWorker>()) });
        }
        result
    }
}

unsafe extern "C" fn run_boxed_worker(data: *mut c_void) -> i32 {
    // SAFETY: `data` was produced by `Thread::spawn` and is consumed once.
    let worker = unsafe { Box::from_raw(data.cast::<BoxedWorker>()) };
    worker()
}

/// Thread creation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ThreadStartError {
    /// The platform rejected the requested stack size.
    #[error("Invalid stack size: {0}")]
    InvalidStackSize(usize),

    /// The system lacked the resources to create another thread, or the
    /// per-process thread limit was reached.
    #[error("Thread resources exhausted")]
    ResourceExhausted,

    /// Memory for the thread could not be allocated.
    #[error("Out of memory")]
    OutOfMemory,

    /// The caller is not allowed to create threads with the requested
    /// attributes.
    #[error("Permission denied")]
    PermissionDenied,

    /// Any other error reported by the platform, as the raw OS error code.
    #[error("Unknown error: {0}")]
    Unknown(i32),
}
