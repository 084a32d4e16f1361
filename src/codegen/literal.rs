//! Shortest spellings of literal values.
//!
//! Everything here is a pure function from a value to source text. No
//! function emits a raw line break: newlines inside strings are always
//! escaped, so a literal never spans two physical lines.

use minipy_ast::IntLiteral;

// ============================================================================
// Numbers
// ============================================================================

/// Shortest float literal for a finite, non-negative value.
///
/// Starts from the shortest round-trip digits and picks the shorter of the
/// positional form (`.5`, `100.`, `0.`) and the scientific forms (`1e-5`,
/// `15e19`). Ties go to the positional form.
pub fn float_literal(value: f64) -> String {
    let (digits, exponent) = decompose(value);
    let point = exponent + 1;
    let len = digits.len() as i32;

    let positional = if point <= 0 {
        format!(".{}{}", "0".repeat((-point) as usize), digits)
    } else if point >= len {
        format!("{}{}.", digits, "0".repeat((point - len) as usize))
    } else {
        let (head, tail) = digits.split_at(point as usize);
        format!("{}.{}", head, tail)
    };

    let dotted = if digits.len() > 1 {
        format!("{}.{}e{}", &digits[..1], &digits[1..], exponent)
    } else {
        format!("{}e{}", digits, exponent)
    };
    let integral = format!("{}e{}", digits, exponent - (len - 1));

    [positional, dotted, integral]
        .into_iter()
        .min_by_key(String::len)
        .unwrap_or_default()
}

/// Significant digits without leading/trailing zeros, and the decimal
/// exponent of the first digit.
fn decompose(value: f64) -> (String, i32) {
    let sci = format!("{:e}", value);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        ("0".to_string(), 0)
    } else {
        (digits.to_string(), exponent)
    }
}

/// Imaginary literal for a finite, non-negative coefficient.
///
/// `1j` is valid, so a trailing point is dropped.
pub fn imaginary_literal(value: f64) -> String {
    let float = float_literal(value);
    let trimmed = float.strip_suffix('.').unwrap_or(&float);
    format!("{}j", trimmed)
}

/// `(base, exponent)` when an integer is worth writing as a power:
/// `10**k` for `k >= 5`, else `2**k` for `k >= 17`. Powers of ten are
/// checked first.
pub fn power_form(value: &IntLiteral) -> Option<(u32, u32)> {
    if let Some(k) = value.pow10_exponent() {
        if k >= 5 {
            return Some((10, k));
        }
    }
    match value.pow2_exponent() {
        Some(k) if k >= 17 => Some((2, k)),
        _ => None,
    }
}

// ============================================================================
// Strings
// ============================================================================

const STRING_QUOTES: [&str; 2] = ["'", "\""];
const DOCSTRING_QUOTES: [&str; 4] = ["'", "\"", "'''", "\"\"\""];

/// Shortest single-line string literal for `value`.
pub fn str_literal(value: &str) -> String {
    shortest(&STRING_QUOTES, |quote| {
        format!("{quote}{}{quote}", escape_str(value, quote))
    })
}

/// Docstring literal: like [`str_literal`] but triple quotes compete too.
pub fn docstring_literal(value: &str) -> String {
    shortest(&DOCSTRING_QUOTES, |quote| {
        format!("{quote}{}{quote}", escape_str(value, quote))
    })
}

/// Shortest bytes literal for `value`.
pub fn bytes_literal(value: &[u8]) -> String {
    shortest(&STRING_QUOTES, |quote| {
        let q = quote.as_bytes()[0];
        let mut out = format!("b{}", quote);
        for &b in value {
            match b {
                b'\\' => out.push_str("\\\\"),
                b'\n' => out.push_str("\\n"),
                b'\r' => out.push_str("\\r"),
                b'\t' => out.push_str("\\t"),
                b if b == q => {
                    out.push('\\');
                    out.push(b as char);
                }
                0x20..=0x7e => out.push(b as char),
                b => out.push_str(&format!("\\x{:02x}", b)),
            }
        }
        out.push_str(quote);
        out
    })
}

fn shortest<F>(quotes: &[&str], render: F) -> String
where
    F: Fn(&str) -> String,
{
    quotes
        .iter()
        .map(|quote| render(quote))
        .min_by_key(String::len)
        .unwrap_or_default()
}

/// Escape `value` for a literal delimited by `quote` (one or three quote
/// characters).
pub fn escape_str(value: &str, quote: &str) -> String {
    let q = quote.chars().next().unwrap_or('\'');
    let triple = quote.len() == 3;
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 2);
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                // Inside triple quotes only a quote that could close the
                // literal needs a backslash.
                let closing = !matches!(chars.get(i + 1), Some(next) if *next != q);
                if !triple || closing {
                    out.push('\\');
                }
                out.push(c);
            }
            c if needs_escape(c) => out.push_str(&hex_escape(c)),
            c => out.push(c),
        }
    }
    out
}

fn needs_escape(c: char) -> bool {
    c.is_control()
        || (c.is_whitespace() && c != ' ')
        || matches!(
            c,
            '\u{ad}' | '\u{200b}'..='\u{200f}' | '\u{202a}'..='\u{202e}' | '\u{2060}'..='\u{2064}' | '\u{feff}'
        )
}

fn hex_escape(c: char) -> String {
    let code = c as u32;
    if code <= 0xff {
        format!("\\x{:02x}", code)
    } else if code <= 0xffff {
        format!("\\u{:04x}", code)
    } else {
        format!("\\U{:08x}", code)
    }
}

/// Remove the common leading whitespace of all non-blank lines.
///
/// Whitespace-only lines are emptied and do not take part in the margin.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i);
    &a[..end]
}

/// Docstring text as it is written: dedented, outer newlines stripped.
pub fn clean_docstring(text: &str) -> String {
    dedent(text).trim_matches('\n').to_string()
}
