//! Thread Implementation

use crate::sys;

mod create;
mod name;
mod options;
mod wait;

pub use create::*;
pub use name::*;
pub use options::*;
pub use wait::*;

/// Returns the native id of the calling thread.
///
/// Uses the same encoding as [`Thread::thread_id`](crate::Thread::thread_id),
/// so a worker can compare its own id with the one reported by its handle.
pub fn current_thread_id() -> u64 {
    sys::current_thread_id()
}
