//! State shared between a [`Thread`](crate::Thread) and the native thread it
//! spawns, plus the body of the start trampoline.

use core::{
    ffi::c_void,
    sync::atomic::{AtomicU64, Ordering},
};
use std::sync::Arc;

use ost_sys_sync::Semaphore;

use crate::{ThreadFunc, ThreadName, sys};

/// Long-lived state of a thread handle.
///
/// Kept behind an [`Arc`] so the spawned thread can still touch the semaphore
/// while the spawner returns from `start`.
pub(crate) struct ThreadInner {
    /// Posted exactly once per start by the spawned thread.
    pub(crate) started: Semaphore,

    /// Native id of the running thread, 0 while idle.
    pub(crate) thread_id: AtomicU64,
}

impl ThreadInner {
    pub(crate) const fn new() -> Self {
        Self {
            started: Semaphore::new(0),
            thread_id: AtomicU64::new(0),
        }
    }
}

/// Arguments handed to a new native thread.
///
/// Boxed by the spawner, owned by the spawned thread once the native create
/// call succeeds.
pub(crate) struct StartArgs {
    pub(crate) inner: Arc<ThreadInner>,
    pub(crate) func: ThreadFunc,
    pub(crate) user_data: *mut c_void,
    /// Only set on platforms that can name the calling thread only.
    pub(crate) name: Option<ThreadName>,
}

impl StartArgs {
    pub(crate) fn into_raw(self) -> *mut c_void {
        Box::into_raw(Box::new(self)).cast()
    }

    /// # Safety
    /// `raw` must come from [`StartArgs::into_raw`] and not be used again.
    pub(crate) unsafe fn from_raw(raw: *mut c_void) -> Self {
        *unsafe { Box::from_raw(raw.cast::<StartArgs>()) }
    }
}

/// Runs on the new native thread.
///
/// Records the thread id, applies a self-applied name, releases the spawner,
/// and only then calls the worker. The worker's return value becomes the
/// native exit status.
///
/// # Safety
/// `arg` must be a pointer produced by [`StartArgs::into_raw`].
pub(crate) unsafe fn entry(arg: *mut c_void) -> i32 {
    let StartArgs {
        inner,
        func,
        user_data,
        name,
    } = unsafe { StartArgs::from_raw(arg) };

    let thread_id = sys::current_thread_id();
    inner.thread_id.store(thread_id, Ordering::Release);

    if let Some(name) = &name {
        if let Err(code) = sys::set_current_name(name) {
            log::debug!("failed to name thread {thread_id:#x} {:?}: {code}", name.as_str());
        }
    }

    log::trace!("thread {thread_id:#x} started");
    inner.started.signal();
    drop(inner);

    // SAFETY: The caller of `Thread::start` guarantees `user_data` is valid
    // for `func` for the whole run of the thread.
    unsafe { func(user_data) }
}
