use std::collections::HashSet;
use std::sync::LazyLock;

use std::borrow::Cow;

/// Characters that must be escaped in an iCalendar TEXT value
static ICS_DISALLOWED_CHARS: LazyLock<HashSet<&char>> = LazyLock::new(|| {
    let mut set = HashSet::new();
    set.insert(&'\\');
    set.insert(&';');
    set.insert(&',');
    set.insert(&'\n');
    set.insert(&'\r');
    set
});

/// Longest content line, in octets, before it must be folded
const ICS_LINE_LIMIT: usize = 75;

/// Escapes iCalendar TEXT special characters in the input string.
pub fn sanitize_ics_text(input: &str) -> Cow<str> {
    for (idx, c) in input.char_indices() {
        if ICS_DISALLOWED_CHARS.contains(&c) {
            let mut res = String::from(&input[..idx]);
            input[idx..].chars().for_each(|c| match c {
                '\\' => res.push_str("\\\\"),
                ';' => res.push_str("\\;"),
                ',' => res.push_str("\\,"),
                '\n' => res.push_str("\\n"),
                '\r' => {}
                _ => res.push(c),
            });
            return Cow::Owned(res);
        }
    }
    Cow::Borrowed(input)
}

/// Fold a content line so no physical line exceeds 75 octets, never splitting a character.
///
/// The returned text ends with a CRLF.
pub fn fold_ics_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + 2);
    let mut width = 0;
    for c in line.chars() {
        if width + c.len_utf8() > ICS_LINE_LIMIT {
            folded.push_str("\r\n ");
            // The leading space counts toward the continuation line
            width = 1;
        }
        folded.push(c);
        width += c.len_utf8();
    }
    folded.push_str("\r\n");
    folded
}
