//! File header parsing.
//!
//! Recognizes the header that precedes a file's fragments and describes the
//! file(s) involved and the kind of change. Two dialects are supported:
//! - git's extended header (`diff --git` followed by extended lines)
//! - the traditional `---`/`+++` pair, when followed by a fragment header
//!
//! Each parser returns `Ok(None)` when the input is not its dialect at all,
//! so callers can try the next one; errors are reserved for input that
//! committed to a dialect and then failed validation.

mod driver;
mod git;
mod model;
mod name;
mod traditional;


// Re-export public API
pub use driver::{FileHeader, next_file_header};
pub use git::parse_git_file_header;
pub use model::{ChangeKind, File, FileMode};
pub use name::DEV_NULL;
pub use traditional::parse_traditional_file_header;
