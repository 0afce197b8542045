//! Parser for the traditional two-line unified diff header.
//!
//! ```text
//! --- dir/file.txt	2019-03-21 23:00:00.0 -0700
//! +++ dir/file.txt	2019-03-21 23:30:00.0 -0700
//! @@ -1,3 +1,4 @@
//! ```

use super::model::File;
use super::name::{DEV_NULL, NameError, parse_name};
use crate::config::Config;
use crate::cursor::LineCursor;
use crate::error::Result;
use chrono::DateTime;
use std::io::BufRead;
use tracing::debug;

const OLD_PREFIX: &str = "--- ";
const NEW_PREFIX: &str = "+++ ";
pub(crate) const FRAGMENT_PREFIX: &str = "@@ -";
const SHORTEST_FRAGMENT_HEADER: &str = "@@ -1 +1 @@\n";

/// Timestamp layouts GNU diff writes after the tab.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S %z"];

/// Parse a traditional `---`/`+++` file header at the cursor.
///
/// Only matches when the two name lines are followed by a fragment header,
/// so stray `---`/`+++` text is not mistaken for a header. On a match the
/// cursor is left on the fragment header.
///
/// # Returns
///
/// * `Ok(Some(File))` - A header was parsed
/// * `Ok(None)` - The next three lines do not form a traditional header
/// * `Err(HeaderError::Parse)` - A name on either line is malformed
pub fn parse_traditional_file_header<R: BufRead>(
    cursor: &mut LineCursor<R>,
    config: &Config,
) -> Result<Option<File>> {
    let (old_line, new_line, fragment_line) = (cursor.line(0), cursor.line(1), cursor.line(2));

    let (Some(old_rest), Some(new_rest)) = (
        old_line.strip_prefix(OLD_PREFIX),
        new_line.strip_prefix(NEW_PREFIX),
    ) else {
        return Ok(None);
    };
    // only a file header if followed by a (probable) fragment header
    if fragment_line.len() < SHORTEST_FRAGMENT_HEADER.len()
        || !fragment_line.starts_with(FRAGMENT_PREFIX)
    {
        return Ok(None);
    }

    for offset in [0, 1] {
        if !cursor.is_utf8(offset) {
            let message = format!("file header: {}", NameError::InvalidUtf8);
            return Err(cursor.error(offset, message));
        }
    }

    let (old_name, _) = parse_name(old_rest, Some(b'\t'), 0)
        .map_err(|e| cursor.error(0, format!("file header: {}", e)))?;
    let (new_name, _) = parse_name(new_rest, Some(b'\t'), 0)
        .map_err(|e| cursor.error(1, format!("file header: {}", e)))?;

    let old_missing =
        old_name == DEV_NULL || (config.epoch_timestamps && has_epoch_timestamp(old_line));
    let new_missing =
        new_name == DEV_NULL || (config.epoch_timestamps && has_epoch_timestamp(new_line));

    let mut file = File::default();
    if old_missing {
        file.is_new = true;
        file.new_name = Some(new_name);
    } else if new_missing {
        file.is_delete = true;
        file.old_name = Some(old_name);
    } else {
        // prefer the old name when the new one only adds a suffix ("file~", "file.orig")
        let name = if new_name.starts_with(&old_name) {
            old_name
        } else {
            new_name
        };
        file.old_name = Some(name.clone());
        file.new_name = Some(name);
    }

    debug!(
        line = cursor.line_number(0),
        kind = ?file.change_kind(),
        "parsed traditional file header"
    );

    // three lines are buffered, so neither step can reach end of input
    cursor.next()?;
    cursor.next()?;

    Ok(Some(file))
}

/// True if the text after the first tab is a timestamp equal to the UNIX
/// epoch, which GNU diff uses to mark a side that does not exist.
fn has_epoch_timestamp(line: &str) -> bool {
    let Some((_, timestamp)) = line.split_once('\t') else {
        return false;
    };
    let timestamp = timestamp.trim_end_matches(['\n', '\r']);

    // the zone may be written with a colon ("-07:00")
    let timestamp = match timestamp.len().checked_sub(3) {
        Some(i) if timestamp.as_bytes()[i] == b':' => {
            format!("{}{}", &timestamp[..i], &timestamp[i + 1..])
        }
        _ => timestamp.to_string(),
    };

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&timestamp, format).ok())
        .is_some_and(|t| t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_timestamp_detection() {
        assert!(has_epoch_timestamp("--- a.txt\t1970-01-01 00:00:00.000000000 +0000\n"));
        assert!(has_epoch_timestamp("--- a.txt\t1969-12-31 17:00:00.0 -0700\n"));
        assert!(has_epoch_timestamp("--- a.txt\t1970-01-01 01:00:00 +01:00\n"));

        assert!(!has_epoch_timestamp("--- a.txt\t2019-03-21 23:00:00.0 -0700\n"));
        assert!(!has_epoch_timestamp("--- a.txt\t1970-01-01 00:00:00.5 +0000\n"));
        assert!(!has_epoch_timestamp("--- a.txt\tyesterday\n"));
        assert!(!has_epoch_timestamp("--- a.txt\n"));
    }
}
