//! Placeholder template engine: renders `{}` tokens into a SQL skeleton,
//! deciding quoting from the surrounding quote context.
//!
//! One token syntax serves both identifiers and literals: a `{}` inside a
//! quoted span (the caller already wrote the quote marks) renders bare, a `{}`
//! in open text renders as a self-contained single-quoted literal. String
//! values self-escape by doubling backslashes and single quotes, so no value
//! can terminate the span it is inserted into.

use serde_json::Value;

/// Quote context while scanning a template. Doubled quotes and (outside
/// backticks) backslash escapes keep a span open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QuoteState {
    Unquoted,
    InSingle,
    InDouble,
    InBacktick,
}

impl QuoteState {
    fn quote_byte(self) -> u8 {
        match self {
            QuoteState::InSingle => b'\'',
            QuoteState::InDouble => b'"',
            QuoteState::InBacktick => b'`',
            QuoteState::Unquoted => 0,
        }
    }
}

/// Substitute every `{}` in `template` with the rendered form of the
/// corresponding entry of `values`, consumed left to right. Excess
/// placeholders render as unquoted `NULL`; excess values are ignored.
/// Pure function: identical input yields identical output.
pub fn render(template: &str, values: &[Value]) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len() + values.len() * 8);
    let mut state = QuoteState::Unquoted;
    let mut next_value = 0;
    let mut seg_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == b'{' && bytes.get(i + 1) == Some(&b'}') {
            out.push_str(&template[seg_start..i]);
            let value = values.get(next_value).unwrap_or(&Value::Null);
            next_value += 1;
            render_value(&mut out, value, state == QuoteState::Unquoted);
            i += 2;
            seg_start = i;
            continue;
        }

        match state {
            QuoteState::Unquoted => {
                state = match b {
                    b'\'' => QuoteState::InSingle,
                    b'"' => QuoteState::InDouble,
                    b'`' => QuoteState::InBacktick,
                    _ => QuoteState::Unquoted,
                };
                i += 1;
            }
            QuoteState::InSingle | QuoteState::InDouble => {
                if b == b'\\' {
                    // backslash escape: the next byte cannot close the span
                    i += 2;
                } else if b == state.quote_byte() {
                    if bytes.get(i + 1) == Some(&state.quote_byte()) {
                        // doubled quote stays inside the span
                        i += 2;
                    } else {
                        state = QuoteState::Unquoted;
                        i += 1;
                    }
                } else {
                    i += 1;
                }
            }
            QuoteState::InBacktick => {
                // backslash is not special inside identifier quotes
                if b == b'`' {
                    if bytes.get(i + 1) == Some(&b'`') {
                        i += 2;
                    } else {
                        state = QuoteState::Unquoted;
                        i += 1;
                    }
                } else {
                    i += 1;
                }
            }
        }
    }

    out.push_str(&template[seg_start..]);
    out
}

/// Render one bound value. `add_quotes` is false inside quoted spans, where
/// the template supplies the quote marks.
fn render_value(out: &mut String, value: &Value, add_quotes: bool) {
    match value {
        // NULL is never quoted, booleans render as numeric 1/0
        Value::Null => out.push_str("NULL"),
        Value::Bool(true) => out.push('1'),
        Value::Bool(false) => out.push('0'),
        Value::Number(n) => {
            if add_quotes {
                out.push('\'');
                out.push_str(&n.to_string());
                out.push('\'');
            } else {
                out.push_str(&n.to_string());
            }
        }
        Value::String(s) => push_escaped(out, s, add_quotes),
        // sequences self-quote each element regardless of context (IN lists)
        Value::Array(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_value(out, item, true);
            }
            out.push(')');
        }
        Value::Object(_) => push_escaped(out, &value.to_string(), add_quotes),
    }
}

fn push_escaped(out: &mut String, s: &str, add_quotes: bool) {
    if add_quotes {
        out.push('\'');
    }
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("''"),
            _ => out.push(c),
        }
    }
    if add_quotes {
        out.push('\'');
    }
}
