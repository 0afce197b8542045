//! diffhead: parser for the file headers of unified diffs.
//!
//! Given patch text positioned at a file header, the parsers here produce a
//! [`File`] describing the old and new names, modes, object ids and the kind
//! of change, leaving the cursor on the first fragment header.
//!
//! ```
//! use diffhead::{Config, LineCursor, parse_git_file_header};
//!
//! let patch = "diff --git a/foo.txt b/bar.txt\n\
//!              similarity index 100%\n\
//!              rename from foo.txt\n\
//!              rename to bar.txt\n";
//! let mut cursor = LineCursor::from_text(patch).unwrap();
//! let file = parse_git_file_header(&mut cursor, &Config::default())
//!     .unwrap()
//!     .unwrap();
//! assert!(file.is_rename);
//! assert_eq!(file.new_name.as_deref(), Some("bar.txt"));
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod header;

pub use config::Config;
pub use cursor::LineCursor;
pub use error::{HeaderError, Result};
pub use header::{
    ChangeKind, File, FileHeader, FileMode, next_file_header, parse_git_file_header,
    parse_traditional_file_header,
};
