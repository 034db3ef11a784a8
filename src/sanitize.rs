//! Output filename sanitisation.

/// Characters that are not allowed in file names on common filesystems.
pub const RESERVED_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Trim surrounding whitespace and replace every reserved character with `_`.
///
/// No truncation or Unicode normalisation is applied.
pub fn sanitize_filename(candidate: &str) -> String {
    candidate
        .trim()
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
