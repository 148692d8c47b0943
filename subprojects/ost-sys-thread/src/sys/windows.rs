//! Win32 backend built on thread handles.
//!
//! The worker's `i32` status is returned as the thread's `DWORD` exit code
//! and read back with `GetExitCodeThread`.

use core::{ffi::c_void, ptr};

use windows_sys::Win32::{
    Foundation::{
        CloseHandle, ERROR_INVALID_HANDLE, ERROR_INVALID_PARAMETER, ERROR_NOT_ENOUGH_MEMORY,
        ERROR_OUTOFMEMORY, GetLastError, HANDLE, WAIT_FAILED,
    },
    System::Threading::{
        CreateThread, GetCurrentThread, GetCurrentThreadId, GetExitCodeThread, INFINITE,
        SetThreadDescription, WaitForSingleObject,
    },
};

use crate::{ThreadJoinError, ThreadName, ThreadStartError, thread_inner};

/// `SetThreadDescription` accepts any thread handle.
pub(crate) const SELF_NAMING: bool = false;

/// Thread descriptions have no documented length limit.
pub(crate) const MAX_NAME_LEN: usize = usize::MAX;

/// Granularity of virtual memory reservations, including thread stacks.
const ALLOCATION_GRANULARITY: usize = 0x1_0000;

/// An owned Win32 thread handle.
pub(crate) struct RawThread {
    handle: HANDLE,
}

impl RawThread {
    /// Creates a new thread running the start trampoline with `arg`.
    ///
    /// A `stack_size` of 0 keeps the default taken from the executable
    /// header. Sizes that cannot be rounded up to the allocation granularity
    /// are rejected.
    ///
    /// # Safety
    /// `arg` must be a start-args pointer produced by the thread handle. On
    /// success its ownership moves to the new thread.
    pub(crate) unsafe fn spawn(arg: *mut c_void, stack_size: usize) -> Result<Self, ThreadStartError> {
        // The reservation is rounded up to the allocation granularity.
        if stack_size.checked_next_multiple_of(ALLOCATION_GRANULARITY).is_none() {
            return Err(ThreadStartError::InvalidStackSize(stack_size));
        }

        // SAFETY: `thread_start` matches `LPTHREAD_START_ROUTINE` and `arg`
        // stays valid until the new thread takes ownership of it.
        let handle = unsafe {
            CreateThread(
                ptr::null(),
                stack_size,
                Some(thread_start),
                arg.cast_const(),
                0,
                ptr::null_mut(),
            )
        };

        if handle.is_null() {
            // SAFETY: Reads the calling thread's last-error value.
            return Err(match unsafe { GetLastError() } {
                ERROR_NOT_ENOUGH_MEMORY | ERROR_OUTOFMEMORY => ThreadStartError::OutOfMemory,
                ERROR_INVALID_PARAMETER => ThreadStartError::InvalidStackSize(stack_size),
                code => ThreadStartError::Unknown(code as i32),
            });
        }

        Ok(Self { handle })
    }

    /// Blocks until the thread terminates and returns its exit status.
    ///
    /// # Safety
    /// The handle must not have been released.
    pub(crate) unsafe fn join(&self) -> Result<i32, ThreadJoinError> {
        // SAFETY: `handle` is a live thread handle owned by `self`.
        if unsafe { WaitForSingleObject(self.handle, INFINITE) } == WAIT_FAILED {
            return Err(last_join_error());
        }

        let mut code = 0u32;
        // SAFETY: Same as above; `code` is a valid out pointer.
        if unsafe { GetExitCodeThread(self.handle, &mut code) } == 0 {
            return Err(last_join_error());
        }

        Ok(code as i32)
    }

    /// Closes the thread handle.
    pub(crate) fn release(self) {
        // SAFETY: `handle` is owned by `self` and closed exactly once.
        if unsafe { CloseHandle(self.handle) } == 0 {
            log::warn!("CloseHandle failed for thread handle {:?}", self.handle);
        }
    }

    /// Names the thread from the outside.
    pub(crate) fn set_name(&self, name: &ThreadName) -> Result<(), i32> {
        describe(self.handle, name)
    }
}

/// Names the calling thread.
pub(crate) fn set_current_name(name: &ThreadName) -> Result<(), i32> {
    // SAFETY: `GetCurrentThread` returns a pseudo handle that needs no closing.
    describe(unsafe { GetCurrentThread() }, name)
}

/// Returns the Win32 thread id of the calling thread.
pub(crate) fn current_thread_id() -> u64 {
    // SAFETY: `GetCurrentThreadId` has no preconditions.
    u64::from(unsafe { GetCurrentThreadId() })
}

fn describe(handle: HANDLE, name: &ThreadName) -> Result<(), i32> {
    let wide: Vec<u16> = name.as_str().encode_utf16().chain(Some(0)).collect();

    // SAFETY: `wide` is NUL terminated and outlives the call.
    let hr = unsafe { SetThreadDescription(handle, wide.as_ptr()) };
    if hr < 0 { Err(hr) } else { Ok(()) }
}

fn last_join_error() -> ThreadJoinError {
    // SAFETY: Reads the calling thread's last-error value.
    match unsafe { GetLastError() } {
        ERROR_INVALID_HANDLE => ThreadJoinError::InvalidHandle,
        code => ThreadJoinError::Unknown(code as i32),
    }
}

unsafe extern "system" fn thread_start(arg: *mut c_void) -> u32 {
    // SAFETY: `arg` is the start-args pointer passed to `CreateThread`.
    (unsafe { thread_inner::entry(arg) }) as u32
}
