//! Locating the next file header in a patch.

use super::git::parse_git_file_header;
use super::model::File;
use super::traditional::{FRAGMENT_PREFIX, parse_traditional_file_header};
use crate::config::Config;
use crate::cursor::LineCursor;
use crate::error::{HeaderError, Result};
use std::io::BufRead;
use tracing::debug;

/// A file header together with the text that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub file: File,
    /// Lines skipped before the header (commit message, mail headers, ...).
    pub preamble: String,
}

/// Scan forward to the next file header, trying the git dialect before the
/// traditional one at every line.
///
/// # Returns
///
/// * `Ok(Some(FileHeader))` - A header was found; the cursor is positioned
///   for the fragment parser
/// * `Ok(None)` - The input ended before any header
/// * `Err(HeaderError::Parse)` - A header was malformed, or a fragment
///   header appeared with no file header before it
pub fn next_file_header<R: BufRead>(
    cursor: &mut LineCursor<R>,
    config: &Config,
) -> Result<Option<FileHeader>> {
    let mut preamble = String::new();

    while !cursor.at_end() {
        if cursor.line(0).starts_with(FRAGMENT_PREFIX) {
            return Err(cursor.error(0, "patch fragment without file header"));
        }

        let file = match parse_git_file_header(cursor, config)? {
            Some(file) => Some(file),
            None => parse_traditional_file_header(cursor, config)?,
        };
        if let Some(file) = file {
            return Ok(Some(FileHeader { file, preamble }));
        }

        preamble.push_str(cursor.line(0));
        match cursor.next() {
            Ok(()) | Err(HeaderError::Eof) => {}
            Err(err) => return Err(err),
        }
    }

    debug!(preamble_bytes = preamble.len(), "no file header before end of input");
    Ok(None)
}
