//! Win32 backend: TLS indices.

use core::ffi::c_void;

use windows_sys::Win32::{
    Foundation::{ERROR_INVALID_PARAMETER, ERROR_NOT_ENOUGH_MEMORY, GetLastError},
    System::Threading::{TLS_OUT_OF_INDEXES, TlsAlloc, TlsFree, TlsGetValue, TlsSetValue},
};

use crate::{TlsAllocError, TlsFreeError, TlsSetError};

/// Native key type.
pub(crate) type RawKey = u32;

/// Allocates a new TLS index.
pub(crate) fn alloc() -> Result<RawKey, TlsAllocError> {
    // SAFETY: `TlsAlloc` has no preconditions.
    let index = unsafe { TlsAlloc() };
    if index == TLS_OUT_OF_INDEXES {
        // SAFETY: Reads the calling thread's last-error value.
        let code = unsafe { GetLastError() };
        return Err(match code {
            ERROR_NOT_ENOUGH_MEMORY => TlsAllocError::OutOfMemory,
            // `TlsAlloc` does not always set a specific error on exhaustion.
            0 => TlsAllocError::Exhausted,
            code => TlsAllocError::Unknown(code as i32),
        });
    }
    Ok(index)
}

/// Releases `key`.
///
/// # Safety
/// `key` must have been returned by [`alloc`] and must not be used afterwards.
pub(crate) unsafe fn free(key: RawKey) -> Result<(), TlsFreeError> {
    // SAFETY: Upheld by the caller.
    if unsafe { TlsFree(key) } != 0 {
        return Ok(());
    }

    // SAFETY: Reads the calling thread's last-error value.
    match unsafe { GetLastError() } {
        ERROR_INVALID_PARAMETER => Err(TlsFreeError::InvalidKey),
        code => Err(TlsFreeError::Unknown(code as i32)),
    }
}

/// Reads the calling thread's value for `key`.
pub(crate) fn get(key: RawKey) -> *mut c_void {
    // SAFETY: `TlsGetValue` returns null for slots never set on this thread.
    unsafe { TlsGetValue(key) }
}

/// Stores `value` for the calling thread under `key`.
pub(crate) fn set(key: RawKey, value: *mut c_void) -> Result<(), TlsSetError> {
    // SAFETY: The value is stored as an opaque pointer and never dereferenced.
    if unsafe { TlsSetValue(key, value.cast_const()) } != 0 {
        return Ok(());
    }

    // SAFETY: Reads the calling thread's last-error value.
    match unsafe { GetLastError() } {
        ERROR_NOT_ENOUGH_MEMORY => Err(TlsSetError::OutOfMemory),
        ERROR_INVALID_PARAMETER => Err(TlsSetError::InvalidKey),
        code => Err(TlsSetError::Unknown(code as i32)),
    }
}
