//! FILENAME: persistence/src/codec.rs
//! PURPOSE: Delimiter splitting and joining for one physical CSV line.
//! CONTEXT: A separator only counts as a field boundary at even quote
//! parity, so a quoted span may contain the separator. On write, any field
//! containing the separator is wrapped in double quotes. Embedded quote
//! characters are not escaped in either direction; malformed quoting
//! produces a best-effort split rather than an error.

/// Splits `line` on `separator`, honoring `"`-quoted spans. A field wrapped
/// in a leading and trailing quote has that one pair stripped. Trailing
/// empty fields are preserved.
pub fn split_line(line: &str, separator: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c == separator && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);

    fields.into_iter().map(unquote).collect()
}

/// Joins `fields` with `separator`, wrapping any field that contains the
/// separator in double quotes.
pub fn join_fields(fields: &[String], separator: char) -> String {
    fields
        .iter()
        .map(|field| {
            if field.contains(separator) {
                format!("\"{}\"", field)
            } else {
                field.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

fn unquote(field: String) -> String {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].to_string()
    } else {
        field
    }
}
