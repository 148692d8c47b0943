//! Typed TLS slot.

use core::marker::PhantomData;

use crate::{TlsAllocError, TlsData, TlsSetError};

/// A [`TlsData`] that stores `*mut T` instead of an untyped pointer.
///
/// The slot never dereferences or frees the stored pointer; keeping the
/// pointee alive while any thread may read it is the caller's job.
pub struct TlsSlot<T> {
    data: TlsData,
    _marker: PhantomData<fn(*mut T) -> *mut T>,
}

impl<T> TlsSlot<T> {
    /// Allocates a new TLS key.
    pub fn new() -> Result<Self, TlsAllocError> {
        Ok(Self {
            data: TlsData::new()?,
            _marker: PhantomData,
        })
    }

    /// Returns the pointer stored by the calling thread, or null.
    #[inline]
    pub fn get(&self) -> *mut T {
        self.data.get().cast()
    }

    /// Stores `value` for the calling thread.
    #[inline]
    pub fn set(&self, value: *mut T) -> Result<(), TlsSetError> {
        self.data.set(value.cast())
    }

    /// Returns the underlying untyped slot.
    pub fn as_untyped(&self) -> &TlsData {
        &self.data
    }
}

impl<T> core::fmt::Debug for TlsSlot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("TlsSlot").field(&self.data).finish()
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::TlsSlot;

    assert_impl_all!(TlsSlot<core::cell::Cell<u8>>: Send, Sync);

    #[test_log::test]
    fn typed_slot_round_trips_pointer() {
        let slot = TlsSlot::<u64>::new().unwrap();
        let mut value = 7u64;

        assert!(slot.get().is_null());

        slot.set(&raw mut value).unwrap();
        assert_eq!(unsafe { *slot.get() }, 7);

        // Same key as the untyped view.
        assert_eq!(slot.as_untyped().get().cast::<u64>(), slot.get());
    }
}
