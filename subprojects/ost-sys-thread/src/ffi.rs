//! FFI bindings for the `ost-sys-thread` crate

mod thread;
