//! FFI bindings for the thread lifecycle API.
//!
//! A thread handle is handed to C as an opaque heap pointer created by
//! [`__ost_sys_thread__thread_new`] and released by
//! [`__ost_sys_thread__thread_free`]. Contract violations (starting a running
//! thread, stopping an idle one) abort the process.

use core::ffi::{CStr, c_char, c_void};

use crate::{Thread, ThreadFunc, ThreadJoinError, ThreadOptions, ThreadStartError};

/// Allocates a new idle thread handle.
#[unsafe(no_mangle)]
pub extern "C" fn __ost_sys_thread__thread_new() -> *mut Thread {
    Box::into_raw(Box::new(Thread::new()))
}

/// Releases a thread handle, joining the thread first if it is running.
///
/// # Safety
/// `t` must be null or a pointer returned by `__ost_sys_thread__thread_new`
/// that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __ost_sys_thread__thread_free(t: *mut Thread) {
    if !t.is_null() {
        drop(unsafe { Box::from_raw(t) });
    }
}

/// Starts the thread. `stack_size` 0 selects the platform default and `name`
/// may be null.
///
/// Returns 0 on success, a positive code for a known error and the negated OS
/// error code otherwise.
///
/// # Safety
/// * `t` must point to a live thread handle.
/// * `name` must be null or a NUL terminated string.
/// * `user_data` must stay valid for `func` until the thread is stopped.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __ost_sys_thread__thread_start(
    t: *mut Thread,
    func: ThreadFunc,
    user_data: *mut c_void,
    stack_size: usize,
    name: *const c_char,
) -> i32 {
    let thread = unsafe { &mut *t };

    let mut options = ThreadOptions::new().stack_size(stack_size);
    if !name.is_null() {
        options = options.name(unsafe { CStr::from_ptr(name) }.to_string_lossy());
    }

    match unsafe { thread.start(func, user_data, options) } {
        Ok(()) => 0,
        Err(err) => start_error_code(err),
    }
}

/// Joins the thread. Returns 0 on success, a positive code for a known error
/// and the negated OS error code otherwise.
///
/// # Safety
/// `t` must point to a live, running thread handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __ost_sys_thread__thread_stop(t: *mut Thread) -> i32 {
    match unsafe { &mut *t }.stop() {
        Ok(()) => 0,
        Err(ThreadJoinError::Deadlock) => 1,
        Err(ThreadJoinError::InvalidHandle) => 2,
        Err(ThreadJoinError::Unknown(code)) => unknown_code(code),
    }
}

/// Returns whether the thread is running.
///
/// # Safety
/// `t` must point to a live thread handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __ost_sys_thread__thread_is_running(t: *const Thread) -> bool {
    unsafe { &*t }.is_running()
}

/// Returns the exit code captured by the last stop.
///
/// # Safety
/// `t` must point to a live thread handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __ost_sys_thread__thread_exit_code(t: *const Thread) -> i32 {
    unsafe { &*t }.exit_code()
}

/// Names the running thread, best effort.
///
/// # Safety
/// `t` must point to a live thread handle and `name` to a NUL terminated
/// string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __ost_sys_thread__thread_set_name(t: *const Thread, name: *const c_char) {
    if name.is_null() {
        return;
    }
    let name = unsafe { CStr::from_ptr(name) }.to_string_lossy();
    unsafe { &*t }.set_thread_name(&name);
}

fn start_error_code(err: ThreadStartError) -> i32 {
    match err {
        ThreadStartError::InvalidStackSize(_) => 1,
        ThreadStartError::ResourceExhausted => 2,
        ThreadStartError::OutOfMemory => 3,
        ThreadStartError::PermissionDenied => 4,
        ThreadStartError::Unknown(code) => unknown_code(code),
    }
}

/// Negates a raw OS error so it cannot collide with the known error codes.
fn unknown_code(code: i32) -> i32 {
    if code > 0 { -code } else { i32::MIN }
}

#[cfg(test)]
mod tests {
    use core::{
        ffi::c_void,
        ptr,
        sync::atomic::{AtomicBool, Ordering},
    };
    use std::{ffi::CString, thread, time::Duration};

    use super::*;

    unsafe extern "C" fn return_user_data(data: *mut c_void) -> i32 {
        // SAFETY: The tests pass a pointer to a live `i32`.
        unsafe { *data.cast::<i32>() }
    }

    unsafe extern "C" fn sleep_then_flag(data: *mut c_void) -> i32 {
        thread::sleep(Duration::from_millis(50));
        // SAFETY: The tests pass a pointer to a live `AtomicBool`.
        unsafe { &*data.cast::<AtomicBool>() }.store(true, Ordering::SeqCst);
        0
    }

    #[test_log::test]
    fn lifecycle_through_the_c_interface() {
        let mut value = -17i32;

        unsafe {
            let t = __ost_sys_thread__thread_new();
            assert!(!__ost_sys_thread__thread_is_running(t));
            assert_eq!(__ost_sys_thread__thread_exit_code(t), 0);

            let data = (&raw mut value).cast();
            let rc = __ost_sys_thread__thread_start(t, return_user_data, data, 0, ptr::null());
            assert_eq!(rc, 0);
            assert!(__ost_sys_thread__thread_is_running(t));

            assert_eq!(__ost_sys_thread__thread_stop(t), 0);
            assert!(!__ost_sys_thread__thread_is_running(t));
            assert_eq!(__ost_sys_thread__thread_exit_code(t), -17);

            __ost_sys_thread__thread_free(t);
        }
    }

    #[test_log::test]
    fn start_accepts_a_name() {
        let name = CString::new("ffi-worker").unwrap();
        let mut value = 3i32;

        unsafe {
            let t = __ost_sys_thread__thread_new();
            let data = (&raw mut value).cast();
            let rc = __ost_sys_thread__thread_start(t, return_user_data, data, 0, name.as_ptr());
            assert_eq!(rc, 0);

            __ost_sys_thread__thread_set_name(t, name.as_ptr());
            __ost_sys_thread__thread_set_name(t, ptr::null());

            assert_eq!(__ost_sys_thread__thread_stop(t), 0);
            assert_eq!(__ost_sys_thread__thread_exit_code(t), 3);
            __ost_sys_thread__thread_free(t);
        }
    }

    #[test_log::test]
    fn invalid_stack_size_maps_to_its_code() {
        let mut value = 0i32;

        unsafe {
            let t = __ost_sys_thread__thread_new();
            let data = (&raw mut value).cast();
            let rc =
                __ost_sys_thread__thread_start(t, return_user_data, data, usize::MAX, ptr::null());
            assert_eq!(rc, 1);
            assert!(!__ost_sys_thread__thread_is_running(t));
            __ost_sys_thread__thread_free(t);
        }
    }

    #[test_log::test]
    fn freeing_a_running_thread_joins_it() {
        let finished = AtomicBool::new(false);

        unsafe {
            let t = __ost_sys_thread__thread_new();
            let data = (&raw const finished).cast_mut().cast::<c_void>();
            let rc = __ost_sys_thread__thread_start(t, sleep_then_flag, data, 0, ptr::null());
            assert_eq!(rc, 0);

            __ost_sys_thread__thread_free(t);
        }

        assert!(finished.load(Ordering::SeqCst));
    }

    #[test_log::test]
    fn freeing_null_is_a_no_op() {
        unsafe { __ost_sys_thread__thread_free(ptr::null_mut()) };
    }

    #[test_log::test]
    fn os_errors_never_collide_with_known_codes() {
        assert_eq!(start_error_code(ThreadStartError::Unknown(2)), -2);
        assert_ne!(
            start_error_code(ThreadStartError::Unknown(2)),
            start_error_code(ThreadStartError::ResourceExhausted)
        );
        assert_eq!(start_error_code(ThreadStartError::Unknown(0)), i32::MIN);
        assert_eq!(unknown_code(-5), i32::MIN);
    }
}
