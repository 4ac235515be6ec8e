//! Minimal CSV reading/writing helpers.
//!
//! Handles RFC-4180-style quoting (embedded commas, quotes, newlines within
//! quoted fields are not supported -- exports never produce them and imports
//! treat a record as one line). Shared by the bulk importer and the export
//! handlers.

/// Escape a value for CSV output: wrap in quotes if it contains a comma,
/// quote, or newline.
pub fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Join already-escaped or raw values into one CSV row.
pub fn build_row<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| escape(v.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a single CSV line, handling quoted fields and escaped quotes.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote.
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            result.push(current.clone());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    result.push(current);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_line() {
        assert_eq!(parse_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        assert_eq!(
            parse_line(r#"a,"b, with comma",c"#),
            vec!["a", "b, with comma", "c"]
        );
        assert_eq!(
            parse_line(r#""she said ""hi""",x"#),
            vec![r#"she said "hi""#, "x"]
        );
    }

    #[test]
    fn test_parse_empty_fields() {
        assert_eq!(parse_line("a,,c,"), vec!["a", "", "c", ""]);
    }

    #[test]
    fn test_escape_round_trip() {
        for value in ["plain", "with, comma", r#"with "quotes""#, ""] {
            let line = build_row([value, "tail"]);
            assert_eq!(parse_line(&line), vec![value, "tail"]);
        }
    }
}
