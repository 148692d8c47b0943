//! C FFI bindings for ost-sys-thread-tls.
//!
//! A slot is handed to C as an opaque heap pointer created by
//! [`__ost_sys_thread_tls__tls_new`] and released by
//! [`__ost_sys_thread_tls__tls_free`].

use core::{ffi::c_void, ptr};

use crate::{TlsAllocError, TlsData, TlsSetError};

/// Allocates a new TLS slot and writes its pointer to `out`.
///
/// Returns 0 on success, a positive code for a known error and the negated OS
/// error code otherwise; `out` is set to null on failure.
///
/// # Safety
/// `out` must be a valid, writable pointer.
#[unsafe(no_mangle)]
unsafe extern "C" fn __ost_sys_thread_tls__tls_new(out: *mut *mut TlsData) -> i32 {
    match TlsData::new() {
        Ok(tls) => {
            unsafe { out.write(Box::into_raw(Box::new(tls))) };
            0
        }
        Err(err) => {
            unsafe { out.write(ptr::null_mut()) };
            alloc_error_code(err)
        }
    }
}

/// Releases a slot created by [`__ost_sys_thread_tls__tls_new`].
///
/// # Safety
/// `tls` must be null or a pointer returned by `__ost_sys_thread_tls__tls_new`
/// that has not been freed yet.
#[unsafe(no_mangle)]
unsafe extern "C" fn __ost_sys_thread_tls__tls_free(tls: *mut TlsData) {
    if !tls.is_null() {
        drop(unsafe { Box::from_raw(tls) });
    }
}

/// Returns the calling thread's value for `tls`.
///
/// # Safety
/// `tls` must point to a live slot.
#[unsafe(no_mangle)]
unsafe extern "C" fn __ost_sys_thread_tls__tls_get(tls: *const TlsData) -> *mut c_void {
    unsafe { &*tls }.get()
}

/// Stores `value` for the calling thread. Returns 0 on success and an error
/// code as for [`__ost_sys_thread_tls__tls_new`] otherwise.
///
/// # Safety
/// `tls` must point to a live slot.
#[unsafe(no_mangle)]
unsafe extern "C" fn __ost_sys_thread_tls__tls_set(tls: *const TlsData, value: *mut c_void) -> i32 {
    match unsafe { &*tls }.set(value) {
        Ok(()) => 0,
        Err(TlsSetError::OutOfMemory) => 1,
        Err(TlsSetError::InvalidKey) => 2,
        Err(TlsSetError::Unknown(code)) => unknown_code(code),
    }
}

fn alloc_error_code(err: TlsAllocError) -> i32 {
    match err {
        TlsAllocError::Exhausted => 1,
        TlsAllocError::OutOfMemory => 2,
        TlsAllocError::Unknown(code) => unknown_code(code),
    }
}

/// Negates a raw OS error so it cannot collide with the known error codes.
fn unknown_code(code: i32) -> i32 {
    if code > 0 { -code } else { i32::MIN }
}

#[cfg(test)]
mod tests {
    use core::ptr;
    use std::thread;

    use super::*;

    #[test_log::test]
    fn slot_through_the_c_interface() {
        let mut value = 9u32;
        let value_ptr = (&raw mut value).cast::<c_void>();

        unsafe {
            let mut tls = ptr::null_mut();
            assert_eq!(__ost_sys_thread_tls__tls_new(&mut tls), 0);
            assert!(!tls.is_null());

            assert!(__ost_sys_thread_tls__tls_get(tls).is_null());
            assert_eq!(__ost_sys_thread_tls__tls_set(tls, value_ptr), 0);
            assert_eq!(__ost_sys_thread_tls__tls_get(tls), value_ptr);

            let shared = tls as usize;
            let seen = thread::spawn(move || {
                __ost_sys_thread_tls__tls_get(shared as *const TlsData) as usize
            })
            .join()
            .unwrap();
            assert_eq!(seen, 0);

            __ost_sys_thread_tls__tls_free(tls);
            __ost_sys_thread_tls__tls_free(ptr::null_mut());
        }
    }

    #[test_log::test]
    fn os_errors_never_collide_with_known_codes() {
        assert_eq!(alloc_error_code(TlsAllocError::Unknown(2)), -2);
        assert_ne!(
            alloc_error_code(TlsAllocError::Unknown(1)),
            alloc_error_code(TlsAllocError::Exhausted)
        );
        assert_eq!(alloc_error_code(TlsAllocError::Unknown(0)), i32::MIN);
    }
}
