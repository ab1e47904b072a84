//! Shared utility helpers.

use std::path::Path;

use encoding_rs::WINDOWS_1252;

/// Case-insensitive substring search without allocating an uppercase copy.
#[inline]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle_bytes = needle.as_bytes();
    let haystack_bytes = haystack.as_bytes();
    if needle_bytes.is_empty() {
        return true;
    }
    if needle_bytes.len() > haystack_bytes.len() {
        return false;
    }
    haystack_bytes
        .windows(needle_bytes.len())
        .any(|window| window.eq_ignore_ascii_case(needle_bytes))
}

/// Case-insensitive starts_with check without allocating.
#[inline]
pub fn starts_with_ci(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}

/// Read a script as UTF-8, falling back to Windows-1252 for files saved by
/// older editors.
pub fn read_file_with_encoding_fallback(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}
