//! Thread naming
//!
//! Names are cosmetic: failures are logged at debug level and otherwise
//! ignored. Where the platform can only name the calling thread, the name is
//! applied by the new thread itself during startup and
//! [`Thread::set_thread_name`] does nothing.

use std::ffi::{CStr, CString};

use crate::{Thread, sys};

/// A thread name accepted by the native naming API.
///
/// Longer names are cut at a character boundary to the platform limit
/// (15 bytes on Linux).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadName {
    name: CString,
}

impl ThreadName {
    /// Builds a name from `name`, or returns `None` if it contains a NUL byte.
    pub fn new(name: &str) -> Option<Self> {
        if name.contains('\0') {
            log::debug!("ignoring thread name with interior NUL: {name:?}");
            return None;
        }

        let mut end = name.len().min(sys::MAX_NAME_LEN);
        while !name.is_char_boundary(end) {
            end -= 1;
        }

        CString::new(&name[..end]).ok().map(|name| Self { name })
    }

    pub fn as_str(&self) -> &str {
        // Built from a `&str` prefix, so always valid UTF-8.
        self.name.to_str().unwrap_or_default()
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.name
    }
}

impl Thread {
    /// Names the running thread for debuggers and profilers.
    ///
    /// Best effort: does nothing when the thread is idle, when the name is
    /// rejected, or when the platform cannot name another thread. Never
    /// panics.
    pub fn set_thread_name(&self, name: &str) {
        if let Some(name) = ThreadName::new(name) {
            self.apply_name(&name);
        }
    }

    pub(crate) fn apply_name(&self, name: &ThreadName) {
        if sys::SELF_NAMING {
            log::debug!(
                "cannot rename thread from outside on this platform, pass the name when starting it"
            );
            return;
        }

        let Some(raw) = self.raw.as_ref() else {
            log::debug!("not naming idle thread {:?}", name.as_str());
            return;
        };

        if let Err(code) = raw.set_name(name) {
            log::debug!("failed to name thread {:?}: {code}", name.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThreadName;
    use crate::sys::MAX_NAME_LEN;

    #[test_log::test]
    fn short_name_is_kept() {
        let name = ThreadName::new("worker").unwrap();

        assert_eq!(name.as_str(), "worker");
        assert_eq!(name.as_c_str().to_bytes(), b"worker");
    }

    #[test_log::test]
    fn name_with_nul_is_rejected() {
        assert_eq!(ThreadName::new("bad\0name"), None);
    }

    #[test_log::test]
    fn long_name_is_cut_to_platform_limit() {
        let long = "x".repeat(300);
        let name = ThreadName::new(&long).unwrap();

        assert_eq!(name.as_str().len(), long.len().min(MAX_NAME_LEN));
        assert!(long.starts_with(name.as_str()));
    }

    #[test_log::test]
    fn cut_respects_char_boundaries() {
        // Two bytes per character.
        let long = "é".repeat(200);
        let name = ThreadName::new(&long).unwrap();

        assert!(name.as_str().len() <= MAX_NAME_LEN);
        assert!(name.as_str().chars().all(|c| c == 'é'));
        assert!(long.starts_with(name.as_str()));
    }
}
