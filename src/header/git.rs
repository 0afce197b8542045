//! Parser for git's extended file header.
//!
//! A git header starts with `diff --git a/<old> b/<new>` and continues with
//! extended header lines (`index`, `new file mode`, `rename from`, ...) until
//! the first fragment header or an unrecognized line.

use super::model::{File, FileMode};
use super::name::{DEV_NULL, NameError, parse_git_header_name, parse_name};
use crate::config::Config;
use crate::cursor::LineCursor;
use crate::error::{HeaderError, Result};
use regex::Regex;
use std::io::BufRead;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace};

const GIT_HEADER_PREFIX: &str = "diff --git ";

/// `<old-oid>..<new-oid>[ <mode>]`
static INDEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-fA-F]+)\.\.([0-9a-fA-F]+)(?:[ \t]+(\S+))?\s*$")
        .expect("Invalid index line regex")
});

/// Failure of a single extended header line.
#[derive(Error, Debug)]
enum FieldError {
    #[error(transparent)]
    Name(#[from] NameError),

    #[error("invalid mode '{0}'")]
    Mode(String),

    #[error("invalid similarity percentage '{0}'")]
    Score(String),

    #[error("invalid index line '{0}'")]
    Index(String),

    #[error("expected /dev/null, but filename is set to {0}")]
    ExpectedDevNull(String),

    #[error("expected /dev/null for missing {0} file")]
    MissingDevNull(&'static str),

    #[error("inconsistent {0} filename")]
    InconsistentName(&'static str),
}

type FieldResult = std::result::Result<(), FieldError>;

/// State shared by every line of one header.
struct HeaderContext<'a> {
    default_name: Option<&'a str>,
    strip: usize,
}

type LineHandler = fn(&mut File, &str, &HeaderContext<'_>) -> FieldResult;

/// One recognized extended header line.
struct HeaderLine {
    prefix: &'static str,
    /// Recognizing this line ends the header.
    end: bool,
    parse: Option<LineHandler>,
}

/// Recognizers in match order; the first matching prefix wins.
#[rustfmt::skip]
const HEADER_LINES: &[HeaderLine] = &[
    HeaderLine { prefix: "@@ -", end: true, parse: None },
    HeaderLine { prefix: "--- ", end: false, parse: Some(parse_old_name) },
    HeaderLine { prefix: "+++ ", end: false, parse: Some(parse_new_name) },
    HeaderLine { prefix: "old mode ", end: false, parse: Some(parse_old_mode) },
    HeaderLine { prefix: "new mode ", end: false, parse: Some(parse_new_mode) },
    HeaderLine { prefix: "deleted file mode ", end: false, parse: Some(parse_deleted_mode) },
    HeaderLine { prefix: "new file mode ", end: false, parse: Some(parse_created_mode) },
    HeaderLine { prefix: "copy from ", end: false, parse: Some(parse_copy_from) },
    HeaderLine { prefix: "copy to ", end: false, parse: Some(parse_copy_to) },
    HeaderLine { prefix: "rename old ", end: false, parse: Some(parse_rename_from) },
    HeaderLine { prefix: "rename new ", end: false, parse: Some(parse_rename_to) },
    HeaderLine { prefix: "rename from ", end: false, parse: Some(parse_rename_from) },
    HeaderLine { prefix: "rename to ", end: false, parse: Some(parse_rename_to) },
    HeaderLine { prefix: "similarity index ", end: false, parse: Some(parse_score) },
    HeaderLine { prefix: "dissimilarity index ", end: false, parse: Some(parse_score) },
    HeaderLine { prefix: "index ", end: false, parse: Some(parse_index) },
];

/// Parse a git extended file header at the cursor.
///
/// # Returns
///
/// * `Ok(Some(File))` - A header was parsed; the cursor is on the line that
///   ended it (the fragment header, an unrecognized line, or end of input)
/// * `Ok(None)` - The current line is not a `diff --git` line
/// * `Err(HeaderError::Parse)` - A header line is malformed or the header
///   lacks filename information
/// * `Err(HeaderError::Io)` - The line source failed
pub fn parse_git_file_header<R: BufRead>(
    cursor: &mut LineCursor<R>,
    config: &Config,
) -> Result<Option<File>> {
    let Some(header) = cursor.line(0).strip_prefix(GIT_HEADER_PREFIX) else {
        return Ok(None);
    };
    let start_line = cursor.line_number(0);
    if !cursor.is_utf8(0) {
        return Err(cursor.error(0, format!("git file header: {}", NameError::InvalidUtf8)));
    }

    let default_name = parse_git_header_name(header, config.strip_components)
        .map_err(|e| cursor.error(0, format!("git file header: {}", e)))?;
    debug!(line = start_line, default_name = ?default_name, "parsing git file header");

    let ctx = HeaderContext {
        default_name: default_name.as_deref(),
        strip: config.strip_components,
    };

    let mut file = File::default();
    loop {
        let end = if cursor.is_utf8(1) {
            parse_header_line(&mut file, cursor.line(1), &ctx)
        } else {
            check_undecodable_line(cursor.line(1))
        }
        .map_err(|e| cursor.error(1, format!("git file header: {}", e)))?;

        match cursor.next() {
            Ok(()) => {}
            // the header may run to the end of input (empty files, mode changes)
            Err(HeaderError::Eof) => break,
            Err(err) => return Err(err),
        }

        if end {
            break;
        }
    }

    if file.old_name.is_none() && file.new_name.is_none() {
        let Some(name) = default_name else {
            return Err(header_error(start_line, "missing filename information"));
        };
        file.old_name = Some(name.clone());
        file.new_name = Some(name);
    }

    if (file.new_name.is_none() && !file.is_delete) || (file.old_name.is_none() && !file.is_new) {
        return Err(header_error(start_line, "missing filename information"));
    }
    if (file.is_delete && file.new_name.is_some()) || (file.is_new && file.old_name.is_some()) {
        return Err(header_error(start_line, "conflicting filename information"));
    }
    if file.is_new && file.is_delete {
        return Err(header_error(start_line, "file is both created and deleted"));
    }
    if file.is_rename && file.is_copy {
        return Err(header_error(start_line, "file is both renamed and copied"));
    }

    debug!(line = start_line, kind = ?file.change_kind(), "parsed git file header");
    Ok(Some(file))
}

fn header_error(line: usize, message: &str) -> HeaderError {
    HeaderError::Parse {
        line,
        message: format!("git file header: {}", message),
    }
}

/// Apply one extended header line to `file`.
///
/// Returns true if the line ends the header. Lines matching no recognizer
/// also end it.
fn parse_header_line(
    file: &mut File,
    line: &str,
    ctx: &HeaderContext<'_>,
) -> std::result::Result<bool, FieldError> {
    let line = line.strip_suffix('\n').unwrap_or(line);

    for header in HEADER_LINES {
        if let Some(rest) = line.strip_prefix(header.prefix) {
            trace!(prefix = header.prefix.trim_end(), "recognized git header line");
            if let Some(parse) = header.parse {
                parse(file, rest, ctx)?;
            }
            return Ok(header.end);
        }
    }

    Ok(true)
}

/// A line with undecodable bytes may only end the header.
fn check_undecodable_line(line: &str) -> std::result::Result<bool, FieldError> {
    match HEADER_LINES.iter().find(|h| line.starts_with(h.prefix)) {
        Some(HeaderLine { parse: Some(_), .. }) => Err(NameError::InvalidUtf8.into()),
        _ => Ok(true),
    }
}

fn parse_old_name(file: &mut File, line: &str, ctx: &HeaderContext<'_>) -> FieldResult {
    let (name, _) = parse_name(line, Some(b'\t'), ctx.strip)?;
    verify_name(&mut file.old_name, name, file.is_new, "old")
}

fn parse_new_name(file: &mut File, line: &str, ctx: &HeaderContext<'_>) -> FieldResult {
    let (name, _) = parse_name(line, Some(b'\t'), ctx.strip)?;
    verify_name(&mut file.new_name, name, file.is_delete, "new")
}

/// Check a `---`/`+++` name against what earlier lines established.
///
/// `is_null` means this side is known not to exist, so only the sentinel
/// is acceptable. The sentinel never sets a name.
fn verify_name(
    slot: &mut Option<String>,
    parsed: String,
    is_null: bool,
    side: &'static str,
) -> FieldResult {
    let parsed_null = parsed == DEV_NULL;

    if let Some(existing) = slot.as_deref() {
        if is_null {
            return Err(FieldError::ExpectedDevNull(existing.to_string()));
        }
        if existing != parsed {
            return Err(FieldError::InconsistentName(side));
        }
        return Ok(());
    }

    if is_null && !parsed_null {
        return Err(FieldError::MissingDevNull(side));
    }
    if !parsed_null {
        *slot = Some(parsed);
    }
    Ok(())
}

fn parse_mode(s: &str) -> std::result::Result<FileMode, FieldError> {
    let s = s.trim();
    // from_str_radix accepts a sign
    if !s.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(FieldError::Mode(s.to_string()));
    }
    u32::from_str_radix(s, 8)
        .ok()
        .and_then(FileMode::new)
        .ok_or_else(|| FieldError::Mode(s.to_string()))
}

fn parse_old_mode(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    file.old_mode = Some(parse_mode(line)?);
    Ok(())
}

fn parse_new_mode(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    file.new_mode = Some(parse_mode(line)?);
    Ok(())
}

fn parse_deleted_mode(file: &mut File, line: &str, ctx: &HeaderContext<'_>) -> FieldResult {
    file.is_delete = true;
    if let Some(name) = ctx.default_name {
        file.old_name = Some(name.to_string());
    }
    parse_old_mode(file, line, ctx)
}

fn parse_created_mode(file: &mut File, line: &str, ctx: &HeaderContext<'_>) -> FieldResult {
    file.is_new = true;
    if let Some(name) = ctx.default_name {
        file.new_name = Some(name.to_string());
    }
    parse_new_mode(file, line, ctx)
}

fn parse_copy_from(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    file.is_copy = true;
    file.old_name = Some(parse_name(line, None, 0)?.0);
    Ok(())
}

fn parse_copy_to(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    file.is_copy = true;
    file.new_name = Some(parse_name(line, None, 0)?.0);
    Ok(())
}

fn parse_rename_from(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    file.is_rename = true;
    file.old_name = Some(parse_name(line, None, 0)?.0);
    Ok(())
}

fn parse_rename_to(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    file.is_rename = true;
    file.new_name = Some(parse_name(line, None, 0)?.0);
    Ok(())
}

fn parse_score(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    let line = line.trim();
    let value = line.strip_suffix('%').unwrap_or(line);

    let score = Some(value)
        .filter(|v| v.starts_with(|c: char| c.is_ascii_digit()))
        .and_then(|v| v.parse::<u8>().ok())
        .filter(|score| *score <= 100)
        .ok_or_else(|| FieldError::Score(line.to_string()))?;
    file.score = Some(score);
    Ok(())
}

fn parse_index(file: &mut File, line: &str, _: &HeaderContext<'_>) -> FieldResult {
    let caps = INDEX_REGEX
        .captures(line)
        .ok_or_else(|| FieldError::Index(line.trim().to_string()))?;

    file.old_oid_prefix = Some(caps[1].to_string());
    file.new_oid_prefix = Some(caps[2].to_string());

    if let Some(mode) = caps.get(3) {
        let mode = parse_mode(mode.as_str())?;
        file.old_mode = Some(mode);
        file.new_mode = Some(mode);
    }
    Ok(())
}
