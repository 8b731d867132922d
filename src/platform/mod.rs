//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{close_checked, open_log_file_secure_append, same_volume};

#[cfg(not(unix))]
pub use windows::{close_checked, open_log_file_secure_append, same_volume};
