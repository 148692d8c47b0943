//! # Semaphore
//!
//! A counting semaphore built on top of a `parking_lot` mutex and condition
//! variable. The counter holds the number of available permits: [`wait`]
//! consumes one, blocking while none are available, and [`signal`] releases
//! one and wakes a single waiter.
//!
//! [`wait`]: Semaphore::wait
//! [`signal`]: Semaphore::signal

use parking_lot::{Condvar, Mutex};

/// A counting semaphore.
///
/// The semaphore can be placed in static storage and shared between threads
/// by reference.
pub struct Semaphore {
    count: Mutex<u64>,
    cvar: Condvar,
}

impl Semaphore {
    /// Creates a new semaphore holding `count` permits.
    pub const fn new(count: u64) -> Self {
        Self {
            count: Mutex::new(count),
            cvar: Condvar::new(),
        }
    }

    /// Releases one permit and wakes up a single waiting thread, if any.
    pub fn signal(&self) {
        let mut count = self.count.lock();
        *count += 1;
        self.cvar.notify_one();
    }

    /// Takes one permit, blocking the calling thread until one is available.
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.cvar.wait(&mut count);
        }
        *count -= 1;
    }

    /// Takes one permit without blocking.
    ///
    /// Returns `true` if a permit was taken, `false` if the counter was zero.
    pub fn try_wait(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}
