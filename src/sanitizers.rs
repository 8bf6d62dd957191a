//! This module contains a collection of sanitizers which is really just a fancy way of saying
//! that this is a bunch of functions which take strings, change them, and give them back.
//!
//! Exchange files come out of all kinds of accounting and bank software and are frequently edited
//! by hand. None of these functions are needed for well-formed input.

use crate::END_OF_FILE;

/// Run all sanitizers on the input in a useful order.
///
/// If you don't really care exactly _how_ your input is sanitized and just want it to work, this
/// is probably the function to use.
pub fn sanitize(s: &str) -> String {
    let s1 = strip_bom(s);
    let s2 = normalize_line_endings(s1);
    let s3 = strip_trailing_whitespace(&s2);
    strip_stuff_after_end_of_file(&s3)
}

/// Remove a leading byte order mark as written by some Windows editors.
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{feff}').unwrap_or(s)
}

/// Turn `\r\n` and lone `\r` line endings into `\n`.
pub fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove trailing blanks from every line.
///
/// Text values get trimmed anyway, but bare marker lines like `КонецДокумента ` only match
/// without them.
pub fn strip_trailing_whitespace(s: &str) -> String {
    let stripped: Vec<&str> = s.split('\n').map(str::trim_end).collect();
    stripped.join("\n")
}

/// Drop everything after the end-of-file marker.
///
/// Some programs pad the file or append a second export after it. If there is no marker, the
/// input is returned unchanged.
pub fn strip_stuff_after_end_of_file(s: &str) -> String {
    let mut kept = vec![];
    for line in s.split('\n') {
        kept.push(line);
        if line.trim() == END_OF_FILE {
            let dropped = s.split('\n').count() - kept.len();
            if dropped > 0 {
                debug!("Dropping {} lines after end of file marker", dropped);
            }
            return kept.join("\n");
        }
    }
    s.to_string()
}
