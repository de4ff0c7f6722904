/*!
 Contains helpers that turn raw archive string bytes into displayable text.
*/

/// Decode raw string bytes as Latin-1, the encoding Palm Desktop wrote.
///
/// Every byte maps to exactly one character, so this never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

/// Rewrite line breaks as spaces and drop trailing spaces, so the text fits on one line
pub fn single_line(text: &str) -> String {
    let flattened: String = text
        .chars()
        .map(|letter| match letter {
            '\r' | '\n' => ' ',
            other => other,
        })
        .collect();
    flattened.trim_end_matches(' ').to_string()
}

/// Decode and sanitize an optional string field
pub fn field_text(bytes: Option<Vec<u8>>) -> Option<String> {
    bytes.map(|bytes| single_line(&decode_latin1(&bytes)))
}
