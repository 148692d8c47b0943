//! Native thread backends.
//!
//! Every backend exposes the same items:
//!
//! * `RawThread` with `spawn`, `join`, `release` and `set_name`
//! * `current_thread_id` and `set_current_name`
//! * `SELF_NAMING`: set when the platform can only name the calling thread
//! * `MAX_NAME_LEN`: longest accepted thread name in bytes, without the NUL

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub(crate) use windows::*;
    } else if #[cfg(unix)] {
        mod unix;
        pub(crate) use unix::*;
    } else {
        compile_error!("ost-sys-thread supports only unix and windows targets");
    }
}
