//! POSIX backend built on pthreads.
//!
//! The worker's `i32` status travels through the `void *` returned by the
//! start routine and is read back by `pthread_join`.

use core::{ffi::c_void, mem::MaybeUninit, ptr};

use crate::{ThreadJoinError, ThreadName, ThreadStartError, thread_inner};

/// Apple platforms can only name the calling thread.
pub(crate) const SELF_NAMING: bool = cfg!(target_vendor = "apple");

cfg_if::cfg_if! {
    if #[cfg(target_vendor = "apple")] {
        pub(crate) const MAX_NAME_LEN: usize = 63;
    } else {
        // Linux `TASK_COMM_LEN` is 16 bytes, including the NUL.
        pub(crate) const MAX_NAME_LEN: usize = 15;
    }
}

/// A joinable pthread.
pub(crate) struct RawThread {
    handle: libc::pthread_t,
}

impl RawThread {
    /// Creates a new thread running the start trampoline with `arg`.
    ///
    /// A `stack_size` of 0 keeps the platform default; other values are
    /// raised to at least `PTHREAD_STACK_MIN` and rounded up to a whole number
    /// of pages.
    ///
    /// # Safety
    /// `arg` must be a start-args pointer produced by the thread handle. On
    /// success its ownership moves to the new thread.
    pub(crate) unsafe fn spawn(arg: *mut c_void, stack_size: usize) -> Result<Self, ThreadStartError> {
        let mut attr = MaybeUninit::<libc::pthread_attr_t>::uninit();

        // SAFETY: `attr` is valid storage for an attributes object.
        let rc = unsafe { libc::pthread_attr_init(attr.as_mut_ptr()) };
        if rc != 0 {
            return Err(start_error(rc));
        }

        // SAFETY: `attr` was initialised above and is destroyed right after.
        let result = unsafe { spawn_with_attr(attr.as_mut_ptr(), arg, stack_size) };
        unsafe { libc::pthread_attr_destroy(attr.as_mut_ptr()) };

        result
    }

    /// Blocks until the thread terminates and returns its exit status.
    ///
    /// # Safety
    /// Must not be called again after it returned `Ok`.
    pub(crate) unsafe fn join(&self) -> Result<i32, ThreadJoinError> {
        let mut retval: *mut c_void = ptr::null_mut();

        // SAFETY: `handle` refers to a joinable thread that was not joined yet.
        match unsafe { libc::pthread_join(self.handle, &mut retval) } {
            0 => Ok(retval.addr() as isize as i32),
            libc::EDEADLK => Err(ThreadJoinError::Deadlock),
            libc::ESRCH | libc::EINVAL => Err(ThreadJoinError::InvalidHandle),
            code => Err(ThreadJoinError::Unknown(code)),
        }
    }

    /// Releases the native handle. A joined pthread holds no further
    /// resources.
    pub(crate) fn release(self) {}

    /// Names the thread from the outside.
    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub(crate) fn set_name(&self, name: &ThreadName) -> Result<(), i32> {
        // SAFETY: `handle` refers to a live thread and the name is NUL
        // terminated and within `MAX_NAME_LEN`.
        match unsafe { libc::pthread_setname_np(self.handle, name.as_c_str().as_ptr()) } {
            0 => Ok(()),
            code => Err(code),
        }
    }

    /// Names the thread from the outside. Unsupported on this target.
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    pub(crate) fn set_name(&self, _name: &ThreadName) -> Result<(), i32> {
        Ok(())
    }
}

/// Names the calling thread.
#[cfg(target_vendor = "apple")]
pub(crate) fn set_current_name(name: &ThreadName) -> Result<(), i32> {
    // SAFETY: The name is NUL terminated and within `MAX_NAME_LEN`.
    match unsafe { libc::pthread_setname_np(name.as_c_str().as_ptr()) } {
        0 => Ok(()),
        code => Err(code),
    }
}

/// Names the calling thread.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn set_current_name(name: &ThreadName) -> Result<(), i32> {
    // SAFETY: `pthread_self` is always valid and the name is NUL terminated
    // and within `MAX_NAME_LEN`.
    match unsafe { libc::pthread_setname_np(libc::pthread_self(), name.as_c_str().as_ptr()) } {
        0 => Ok(()),
        code => Err(code),
    }
}

/// Names the calling thread. Unsupported on this target.
#[cfg(not(any(target_vendor = "apple", target_os = "linux", target_os = "android")))]
pub(crate) fn set_current_name(_name: &ThreadName) -> Result<(), i32> {
    Ok(())
}

/// Returns the `pthread_t` of the calling thread as an integer.
pub(crate) fn current_thread_id() -> u64 {
    // SAFETY: `pthread_self` has no preconditions.
    unsafe { libc::pthread_self() as usize as u64 }
}

unsafe fn spawn_with_attr(
    attr: *mut libc::pthread_attr_t,
    arg: *mut c_void,
    stack_size: usize,
) -> Result<RawThread, ThreadStartError> {
    if stack_size != 0 {
        let size = page_align(stack_size.max(libc::PTHREAD_STACK_MIN))
            .ok_or(ThreadStartError::InvalidStackSize(stack_size))?;

        // SAFETY: `attr` is initialised by the caller.
        let rc = unsafe { libc::pthread_attr_setstacksize(attr, size) };
        if rc != 0 {
            return Err(ThreadStartError::InvalidStackSize(stack_size));
        }
    }

    let mut handle = MaybeUninit::<libc::pthread_t>::uninit();

    // SAFETY: `attr` is initialised and `arg` stays valid until the new
    // thread takes ownership of it.
    let rc = unsafe { libc::pthread_create(handle.as_mut_ptr(), attr, thread_start, arg) };
    if rc != 0 {
        return Err(start_error(rc));
    }

    Ok(RawThread {
        // SAFETY: `pthread_create` succeeded and wrote the handle.
        handle: unsafe { handle.assume_init() },
    })
}

extern "C" fn thread_start(arg: *mut c_void) -> *mut c_void {
    // SAFETY: `arg` is the start-args pointer passed to `pthread_create`.
    let code = unsafe { thread_inner::entry(arg) };
    ptr::without_provenance_mut(code as isize as usize)
}

/// Rounds `size` up to the page size, or `None` if that overflows.
fn page_align(size: usize) -> Option<usize> {
    // SAFETY: `sysconf` has no preconditions.
    let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    let page = if page > 0 { page as usize } else { 0x1000 };
    size.checked_next_multiple_of(page)
}

fn start_error(code: i32) -> ThreadStartError {
    match code {
        libc::EAGAIN => ThreadStartError::ResourceExhausted,
        libc::ENOMEM => ThreadStartError::OutOfMemory,
        libc::EPERM => ThreadStartError::PermissionDenied,
        code => ThreadStartError::Unknown(code),
    }
}
