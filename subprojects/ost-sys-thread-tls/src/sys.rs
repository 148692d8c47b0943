//! Native TLS backends.
//!
//! Every backend exposes the same set of items: the `RawKey` type plus the
//! `alloc`, `free`, `get` and `set` functions.

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub(crate) use windows::*;
    } else if #[cfg(unix)] {
        mod unix;
        pub(crate) use unix::*;
    } else {
        compile_error!("ost-sys-thread-tls supports only unix and windows targets");
    }
}
