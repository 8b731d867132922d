//! Filesystem operations: collision-free naming and safe single-file moves.

mod atomic;
pub mod collision;
mod file_move;
mod helpers;
mod io_copy;
mod lock;
mod meta;
mod space;
mod util;

pub use collision::{path_taken, resolve_destination, unique_destination, unique_destination_with};
pub use file_move::{MoveMethod, MoveOutcome, copy_verify_delete, relocate, safe_move};
pub use helpers::{io_error_with_help, io_hint};
pub use lock::{RunLock, try_acquire_run_lock};

pub(crate) use util::is_internal_name;
