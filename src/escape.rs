//! The escape table shared by the scanner and the printer.
//!
//! Both directions read from the same pair of tables, so any string that
//! encodes also decodes back to the original text.

/// Maps the character following a backslash to the character it denotes.
/// Returns `None` for characters that are not part of an escape sequence.
pub(crate) fn unescape_char(ch: char) -> Option<char> {
    match ch {
        '"' => Some('"'),
        '\\' => Some('\\'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

/// Maps a character to its escape sequence, or `None` when it is emitted
/// verbatim.
pub(crate) fn escape_char(ch: char) -> Option<&'static str> {
    match ch {
        '"' => Some("\\\""),
        '\\' => Some("\\\\"),
        '\u{8}' => Some("\\b"),
        '\u{c}' => Some("\\f"),
        '\n' => Some("\\n"),
        '\r' => Some("\\r"),
        '\t' => Some("\\t"),
        _ => None,
    }
}

/// Wraps text in double quotes, escaping through the table above.
pub(crate) fn escape_string(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 2);
    output.push('"');

    for ch in text.chars() {
        match escape_char(ch) {
            Some(escaped) => output.push_str(escaped),
            None => output.push(ch),
        }
    }

    output.push('"');
    output
}
