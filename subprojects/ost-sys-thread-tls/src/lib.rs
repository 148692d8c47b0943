//! # ost-sys-thread-tls
//!
//! Dynamically allocated thread-local storage slots backed by the native
//! platform TLS API.
//!
//! A [`TlsData`] owns exactly one process-wide TLS key. Every thread that
//! touches the key sees its own pointer-sized value, starting out as null.
//! The value is never freed by this crate; the pointee's lifetime is managed
//! by the caller.
//!
//! ## Backends
//!
//! | Target    | Allocation             | Access                                      |
//! |-----------|------------------------|---------------------------------------------|
//! | `unix`    | `pthread_key_create`   | `pthread_getspecific`, `pthread_setspecific`|
//! | `windows` | `TlsAlloc`             | `TlsGetValue`, `TlsSetValue`                |
//!
//! [`TlsSlot`] layers a typed pointer API over [`TlsData`].

#[cfg(feature = "ffi")]
mod ffi;

mod sys;
mod tls_data;
mod tls_slot;

pub use tls_data::*;
pub use tls_slot::*;
