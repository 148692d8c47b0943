//! # ost-sys-sync
//!
//! Blocking synchronization primitives used by the `ost-sys-*` crates.
//!
//! The only primitive currently provided is a counting [`Semaphore`]. The
//! thread crate uses it for the startup handshake between a spawning thread
//! and the thread it creates.

mod semaphore;

#[doc(inline)]
pub use self::semaphore::Semaphore;
