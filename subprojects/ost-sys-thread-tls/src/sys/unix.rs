//! POSIX backend: `pthread_key_t` keys.

use core::ffi::c_void;

use crate::{TlsAllocError, TlsFreeError, TlsSetError};

/// Native key type.
pub(crate) type RawKey = libc::pthread_key_t;

/// Allocates a new key without a destructor.
pub(crate) fn alloc() -> Result<RawKey, TlsAllocError> {
    let mut key: RawKey = 0;

    // SAFETY: `key` is a valid out pointer for the duration of the call.
    let rc = unsafe { libc::pthread_key_create(&mut key, None) };
    match rc {
        0 => Ok(key),
        libc::EAGAIN => Err(TlsAllocError::Exhausted),
        libc::ENOMEM => Err(TlsAllocError::OutOfMemory),
        code => Err(TlsAllocError::Unknown(code)),
    }
}

/// Releases `key`.
///
/// # Safety
/// `key` must have been returned by [`alloc`] and must not be used afterwards.
pub(crate) unsafe fn free(key: RawKey) -> Result<(), TlsFreeError> {
    // SAFETY: Upheld by the caller.
    match unsafe { libc::pthread_key_delete(key) } {
        0 => Ok(()),
        libc::EINVAL => Err(TlsFreeError::InvalidKey),
        code => Err(TlsFreeError::Unknown(code)),
    }
}

/// Reads the calling thread's value for `key`.
pub(crate) fn get(key: RawKey) -> *mut c_void {
    // SAFETY: `pthread_getspecific` returns null for keys without a value on
    // this thread.
    unsafe { libc::pthread_getspecific(key) }
}

/// Stores `value` for the calling thread under `key`.
pub(crate) fn set(key: RawKey, value: *mut c_void) -> Result<(), TlsSetError> {
    // SAFETY: The value is stored as an opaque pointer and never dereferenced.
    match unsafe { libc::pthread_setspecific(key, value.cast_const()) } {
        0 => Ok(()),
        libc::ENOMEM => Err(TlsSetError::OutOfMemory),
        libc::EINVAL => Err(TlsSetError::InvalidKey),
        code => Err(TlsSetError::Unknown(code)),
    }
}

