//! Format characters for diagnostics.

/// Format a `char` for an error message, e.g. `` `a` (U+0061)`` or, for
/// non-printable characters, just `U+001F`.
#[must_use]
pub fn format(c: char) -> String {
    let representation = format!("U+{:>04X}", c as u32);
    match c {
        '`' => format!("`` ` `` ({representation})"),
        ' '..='~' => format!("`{c}` ({representation})"),
        _ => representation,
    }
}

/// Like [`format`], but `None` renders as `"end of input"`.
#[must_use]
pub fn format_opt(c: Option<char>) -> String {
    match c {
        None => "end of input".into(),
        Some(c) => format(c),
    }
}
