//! Path token decoding for header lines.
//!
//! Names are either bare (running to end of line or a terminator byte) or
//! C-style quoted, as git writes paths containing special bytes.

use thiserror::Error;

/// Placeholder path meaning "no file on this side".
pub const DEV_NULL: &str = "/dev/null";

/// Failure to decode a path token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum NameError {
    #[error("missing name")]
    Missing,

    #[error("malformed name: unterminated quoted name")]
    Unterminated,

    #[error("malformed name: invalid escape '\\{0}'")]
    InvalidEscape(char),

    #[error("malformed name: invalid octal escape")]
    InvalidOctal,

    #[error("malformed name: missing separator after name")]
    MissingSeparator,

    #[error("malformed name: not valid UTF-8")]
    InvalidUtf8,
}

/// Decode the name at the start of `s`.
///
/// Bare names stop at a newline or at `term`. Unless the name is exactly
/// [`DEV_NULL`], duplicate slashes are collapsed and `strip` leading path
/// components are dropped.
///
/// Returns the name and the number of input bytes it occupied.
pub(crate) fn parse_name(
    s: &str,
    term: Option<u8>,
    strip: usize,
) -> Result<(String, usize), NameError> {
    let (name, n) = if s.starts_with('"') {
        parse_quoted_name(s)?
    } else {
        parse_unquoted_name(s, term)?
    };

    if name == DEV_NULL {
        return Ok((name, n));
    }
    Ok((clean_name(&name, strip), n))
}

fn parse_quoted_name(s: &str) -> Result<(String, usize), NameError> {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 1;

    loop {
        let Some(&b) = bytes.get(i) else {
            return Err(NameError::Unterminated);
        };
        i += 1;

        match b {
            b'"' => break,
            b'\n' => return Err(NameError::Unterminated),
            b'\\' => {
                let Some(&esc) = bytes.get(i) else {
                    return Err(NameError::Unterminated);
                };
                i += 1;
                decoded.push(match esc {
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'v' => 0x0b,
                    b'\\' | b'"' => esc,
                    b'0'..=b'3' => {
                        let digits = bytes.get(i..i + 2).ok_or(NameError::InvalidOctal)?;
                        if !digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                            return Err(NameError::InvalidOctal);
                        }
                        i += 2;
                        ((esc - b'0') << 6) | ((digits[0] - b'0') << 3) | (digits[1] - b'0')
                    }
                    other => return Err(NameError::InvalidEscape(other as char)),
                });
            }
            _ => decoded.push(b),
        }
    }

    if decoded.is_empty() {
        return Err(NameError::Missing);
    }
    let name = String::from_utf8(decoded).map_err(|_| NameError::InvalidUtf8)?;
    Ok((name, i))
}

fn parse_unquoted_name(s: &str, term: Option<u8>) -> Result<(String, usize), NameError> {
    let end = s
        .bytes()
        .position(|b| b == b'\n' || Some(b) == term)
        .unwrap_or(s.len());

    if end == 0 {
        return Err(NameError::Missing);
    }
    Ok((s[..end].to_string(), end))
}

/// Collapse duplicate slashes and drop `strip` leading components.
fn clean_name(name: &str, strip: usize) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut strip = strip;
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '/' {
            if chars.peek() == Some(&'/') {
                continue;
            }
            if strip > 0 {
                strip -= 1;
                cleaned.clear();
                continue;
            }
        }
        cleaned.push(c);
    }
    cleaned
}

/// Extract the default name from the remainder of a `diff --git ` line.
///
/// Both sides must name the same file after stripping; otherwise (a rename
/// or copy) there is no default and `None` is returned. Handles every mix of
/// bare and quoted names. Bare pairs are split at the first space where the
/// two halves agree, since names may themselves contain spaces.
pub(crate) fn parse_git_header_name(
    header: &str,
    strip: usize,
) -> Result<Option<String>, NameError> {
    let header = header.trim_end_matches(['\n', '\r']);
    if header.is_empty() {
        return Ok(None);
    }

    let (first, second) = match header.find('"') {
        None => return Ok(split_bare_pair(header, strip)),
        Some(0) => {
            let (first, n) = parse_quoted_name(header)?;
            // any number of spaces may follow a quoted name
            let rest = header[n..].trim_start_matches([' ', '\t']);
            if rest.is_empty() {
                return Ok(None);
            }
            let second = if rest.starts_with('"') {
                parse_quoted_name(rest)?.0
            } else {
                rest.to_string()
            };
            (first, second)
        }
        Some(quote) => {
            if !header[..quote].ends_with([' ', '\t']) {
                return Err(NameError::MissingSeparator);
            }
            let first = header[..quote - 1].to_string();
            let second = parse_quoted_name(&header[quote..])?.0;
            (first, second)
        }
    };

    let first = clean_name(&first, strip);
    let second = clean_name(&second, strip);
    Ok((!first.is_empty() && first == second).then_some(first))
}

fn split_bare_pair(header: &str, strip: usize) -> Option<String> {
    header.match_indices(' ').find_map(|(i, _)| {
        let first = clean_name(&header[..i], strip);
        let second = clean_name(&header[i + 1..], strip);
        (!first.is_empty() && first == second).then_some(first)
    })
}
