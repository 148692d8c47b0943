//! # ost-sys-thread
//!
//! Native OS threads with an explicit start/stop lifecycle.
//!
//! A [`Thread`] owns at most one native thread at a time. [`Thread::start`]
//! creates the thread and blocks until it has begun executing, so the native
//! identifier reported by [`Thread::thread_id`] is valid once start returns.
//! [`Thread::stop`] joins the thread and captures the `i32` status returned by
//! the worker. A stopped `Thread` can be started again, and dropping a running
//! `Thread` joins it.
//!
//! ## Backends
//!
//! | Target    | Create           | Join                                       | Naming                 |
//! |-----------|------------------|--------------------------------------------|------------------------|
//! | `unix`    | `pthread_create` | `pthread_join`                             | `pthread_setname_np`   |
//! | `windows` | `CreateThread`   | `WaitForSingleObject`, `GetExitCodeThread` | `SetThreadDescription` |
//!
//! Thread naming is best effort and never fails loudly.

mod sys;
mod thread_handle;
mod thread_impl;
mod thread_inner;

pub use thread_handle::*;
pub use thread_impl::*;

#[cfg(feature = "ffi")]
mod ffi;
