//! Delimited-field tokenizer for export lines.
//!
//! Export lines are delimiter-separated, but the delimiter also shows up
//! inside quoted text and inside `{...}` metadata blobs, so a plain
//! `split` fragments fields. [`tokenize`] scans the line with two
//! independent nesting trackers — a quote-toggle flag and a brace-depth
//! counter — and treats the delimiter as a separator only while both
//! report "not nested".
//!
//! Malformed nesting never fails a line. An unterminated quote or brace
//! leaves its tracker engaged for the rest of the line, so the remainder
//! lands in the final field as-is.
//!
//! # Example
//!
//! ```
//! use postpack::tokenize::tokenize;
//!
//! let fields = tokenize(r#"a,"hello, world",{"k": 1},b"#, ',');
//! assert_eq!(fields, vec!["a", "hello, world", r#"{"k": 1}"#, "b"]);
//! ```

/// Splits one raw line into ordered fields on `delimiter`.
///
/// Tracker rules:
/// - `"` toggles the quote flag; the delimiter is not a separator while
///   the flag is set
/// - `{` increments and `}` decrements a depth counter (never below
///   zero); the delimiter is not a separator while depth > 0
///
/// Each emitted field is whitespace-trimmed, and a quote pair is stripped
/// only when it wraps the entire field. Embedded quotes are kept. Empty
/// fields are preserved as empty strings — downstream stages decide
/// relevance.
pub fn tokenize(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut brace_depth: u32 = 0;

    for ch in line.trim().chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '{' => {
                brace_depth += 1;
                current.push(ch);
            }
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                current.push(ch);
            }
            c if c == delimiter && !in_quotes && brace_depth == 0 => {
                fields.push(finish_field(&current));
                current.clear();
            }
            c => current.push(c),
        }
    }

    fields.push(finish_field(&current));
    fields
}

/// Trims a raw field and strips a quote pair when it wraps the whole
/// field.
fn finish_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
