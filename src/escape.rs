/// Escapes every meta character in `text` so that the result, compiled as a
/// pattern, matches `text` literally.
///
/// Tab, form feed, vertical tab, newline and carriage return are rewritten as
/// `\t`, `\f`, `\v`, `\n` and `\r`. Space and `#` are escaped too, so the
/// result also works under [`Options::EXTEND`](crate::Options::EXTEND).
///
/// # Example
///
/// ```
/// assert_eq!(rubex::quote("1.5 (approx)"), r"1\.5\ \(approx\)");
/// ```
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => quoted.push_str("\\t"),
            '\x0C' => quoted.push_str("\\f"),
            '\x0B' => quoted.push_str("\\v"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            c if is_meta_character(c) => {
                quoted.push('\\');
                quoted.push(c);
            }
            c => quoted.push(c),
        }
    }
    quoted
}

fn is_meta_character(c: char) -> bool {
    match c {
        '[' | ']' | '{' | '}' | '(' | ')' | '|' | '-' | '*' | '.' | '\\'
        | '?' | '+' | '^' | '$' | ' ' | '#' => true,
        _ => false,
    }
}
