//! Untyped TLS slot.

use core::ffi::c_void;

use crate::sys;

/// A process-wide TLS key holding one untyped pointer per thread.
///
/// The key is allocated in [`TlsData::new`] and released when the value is
/// dropped. Threads never observe each other's values: a thread that has not
/// called [`set`](TlsData::set) reads null.
///
/// `TlsData` is neither `Clone` nor `Copy`; the key it owns is released
/// exactly once.
pub struct TlsData {
    key: sys::RawKey,
}

impl TlsData {
    /// Allocates a new TLS key.
    ///
    /// Fails with [`TlsAllocError::Exhausted`] when the process has run out
    /// of TLS keys.
    pub fn new() -> Result<Self, TlsAllocError> {
        let key = sys::alloc()?;
        log::trace!("allocated tls key {key:?}");
        Ok(Self { key })
    }

    /// Returns the value stored by the calling thread, or null if the calling
    /// thread never stored one.
    #[inline]
    pub fn get(&self) -> *mut c_void {
        sys::get(self.key)
    }

    /// Stores `value` for the calling thread, replacing its previous value.
    ///
    /// Other threads are not affected. The previous value is not freed.
    #[inline]
    pub fn set(&self, value: *mut c_void) -> Result<(), TlsSetError> {
        sys::set(self.key, value)
    }
}

impl Drop for TlsData {
    fn drop(&mut self) {
        // SAFETY: The key was allocated in `new` and is released only here.
        if let Err(err) = unsafe { sys::free(self.key) } {
            log::error!("failed to free tls key {:?}: {err}", self.key);
        }
    }
}

impl core::fmt::Debug for TlsData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TlsData").field("key", &self.key).finish()
    }
}

/// Error returned by [`TlsData::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TlsAllocError {
    /// The process-wide limit of TLS keys has been reached.
    #[error("No TLS keys available")]
    Exhausted,
    /// The system could not allocate memory for a new key.
    #[error("Out of memory")]
    OutOfMemory,
    /// Any other error reported by the platform, as the raw OS error code.
    #[error("Unknown error: {0}")]
    Unknown(i32),
}

/// Error returned by [`TlsData::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TlsSetError {
    /// The per-thread value table could not be grown.
    #[error("Out of memory")]
    OutOfMemory,
    /// The platform rejected the key.
    #[error("Invalid TLS key")]
    InvalidKey,
    /// Any other error reported by the platform, as the raw OS error code.
    #[error("Unknown error: {0}")]
    Unknown(i32),
}

/// Error reported when a key cannot be released.
///
/// Only surfaces through the log when a [`TlsData`] is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TlsFreeError {
    /// The platform rejected the key.
    #[error("Invalid TLS key")]
    InvalidKey,
    /// Any other error reported by the platform, as the raw OS error code.
    #[error("Unknown error: {0}")]
    Unknown(i32),
}

#[cfg(test)]
mod tests {
    use core::{ffi::c_void, ptr};
    use std::thread;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::TlsData;

    assert_impl_all!(TlsData: Send, Sync);
    assert_not_impl_any!(TlsData: Clone, Copy);

    #[test_log::test]
    fn fresh_slot_reads_null() {
        let tls = TlsData::new().unwrap();

        assert!(tls.get().is_null());
    }

    #[test_log::test]
    fn set_then_get_returns_value() {
        let tls = TlsData::new().unwrap();
        let mut value = 42u32;
        let value_ptr = (&raw mut value).cast::<c_void>();

        tls.set(value_ptr).unwrap();

        assert_eq!(tls.get(), value_ptr);
        assert_eq!(unsafe { *tls.get().cast::<u32>() }, 42);
    }

    #[test_log::test]
    fn set_overwrites_previous_value() {
        let tls = TlsData::new().unwrap();

        tls.set(0x10 as *mut c_void).unwrap();
        tls.set(0x20 as *mut c_void).unwrap();

        assert_eq!(tls.get() as usize, 0x20);

        tls.set(ptr::null_mut()).unwrap();
        assert!(tls.get().is_null());
    }

    #[test_log::test]
    fn separate_slots_hold_separate_values() {
        let a = TlsData::new().unwrap();
        let b = TlsData::new().unwrap();

        a.set(0x1 as *mut c_void).unwrap();
        b.set(0x2 as *mut c_void).unwrap();

        assert_eq!(a.get() as usize, 0x1);
        assert_eq!(b.get() as usize, 0x2);
    }

    #[test_log::test]
    fn value_is_not_visible_from_other_threads() {
        let tls = TlsData::new().unwrap();
        tls.set(0x42 as *mut c_void).unwrap();

        let seen = thread::scope(|s| s.spawn(|| tls.get() as usize).join().unwrap());

        assert_eq!(seen, 0);
        assert_eq!(tls.get() as usize, 0x42);
    }
}
