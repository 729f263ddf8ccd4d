//! Superscript exponents.
//!
//! `x²` is written as an explicit power before anything else looks at the
//! text. What the exponent binds to depends on the notation:
//!
//! - algebraic: the single preceding letter, or the whole preceding number
//!   (`ab²` → `a(b**2)`, `12²` → `(12**2)`)
//! - non-algebraic: the whole preceding name or number (`ab²` → `((ab)**2)`)
//! - after `)`: the balanced group, with the function name in front of it
//!   when there is one (`(a+b)²` → `((a+b)**2)`, `sin(x)²` → `(sin(x)**2)`)

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::is_irrational;
use crate::error::{Result, SanitizeError};
use crate::scan::longest_function_suffix;

static SUPERSCRIPT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[⁰¹²³⁴⁵⁶⁷⁸⁹]+").expect("BUG: invalid superscript regex"));

/// The ASCII digit a superscript digit stands for.
pub fn superscript_digit(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        _ => None,
    }
}

/// Whether `c` is a superscript digit.
pub fn is_superscript(c: char) -> bool {
    superscript_digit(c).is_some()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || is_irrational(c)
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Byte index where the trailing run of `pred` characters starts.
fn trailing_start(s: &str, pred: impl Fn(char) -> bool) -> usize {
    let mut start = s.len();
    for (i, c) in s.char_indices().rev() {
        if !pred(c) {
            break;
        }
        start = i;
    }
    start
}

/// Byte index of the `(` matching the final `)` of `s`.
fn matching_open(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Where the base of an exponent starts in the text written so far.
fn base_start(out: &str, algebraic: bool) -> Option<usize> {
    let last = out.chars().next_back()?;

    if last == ')' {
        let open = matching_open(out)?;
        let prefix = &out[..open];
        let run = &prefix[trailing_start(prefix, |c| c.is_ascii_alphanumeric() || c == '_')..];
        let name_len = longest_function_suffix(run, algebraic).unwrap_or(0);
        return Some(open - name_len);
    }

    if !is_name_char(last) {
        return None;
    }
    if !algebraic {
        return Some(trailing_start(out, is_name_char));
    }
    if is_number_char(last) {
        return Some(trailing_start(out, is_number_char));
    }
    Some(out.len() - last.len_utf8())
}

/// Rewrite every superscript run as a `**` power.
pub fn rewrite_superscripts(text: &str, algebraic: bool) -> Result<String> {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for found in SUPERSCRIPT_RUN.find_iter(text) {
        out.push_str(&text[last..found.start()]);
        last = found.end();

        let exponent: String = found.as_str().chars().filter_map(superscript_digit).collect();
        let start = base_start(&out, algebraic).ok_or_else(|| {
            let symbol = found.as_str().chars().next().unwrap_or('?');
            SanitizeError::UnauthorizedSymbol(symbol.to_string())
        })?;
        let base = out.split_off(start);

        if base.ends_with(')') || algebraic {
            out.push('(');
            out.push_str(&base);
        } else {
            out.push_str("((");
            out.push_str(&base);
            out.push(')');
        }
        out.push_str("**");
        out.push_str(&exponent);
        out.push(')');
    }

    out.push_str(&text[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgraph_functions as _;

    #[test]
    fn test_algebraic_binds_single_letter() {
        assert_eq!(rewrite_superscripts("ab²", true).unwrap(), "a(b**2)");
        assert_eq!(rewrite_superscripts("x²+1", true).unwrap(), "(x**2)+1");
    }

    #[test]
    fn test_algebraic_binds_whole_number() {
        assert_eq!(rewrite_superscripts("12²", true).unwrap(), "(12**2)");
        assert_eq!(rewrite_superscripts("a1.5²", true).unwrap(), "a(1.5**2)");
    }

    #[test]
    fn test_non_algebraic_binds_run() {
        assert_eq!(rewrite_superscripts("ab²", false).unwrap(), "((ab)**2)");
        assert!(rewrite_superscripts("2ab²", false).unwrap().contains("(2ab)**2"));
    }

    #[test]
    fn test_groups_and_calls() {
        assert_eq!(rewrite_superscripts("(a+b)²", true).unwrap(), "((a+b)**2)");
        assert_eq!(rewrite_superscripts("sin(x)²", true).unwrap(), "(sin(x)**2)");
        assert_eq!(rewrite_superscripts("2sin(x)²", true).unwrap(), "2(sin(x)**2)");
        assert_eq!(rewrite_superscripts("sin(x)²", false).unwrap(), "(sin(x)**2)");
        assert_eq!(rewrite_superscripts("ab(x)²", true).unwrap(), "ab((x)**2)");
    }

    #[test]
    fn test_multi_digit_exponent() {
        assert_eq!(rewrite_superscripts("x¹⁰", true).unwrap(), "(x**10)");
        assert_eq!(rewrite_superscripts("π²", true).unwrap(), "(π**2)");
    }

    #[test]
    fn test_nothing_to_bind() {
        assert_eq!(
            rewrite_superscripts("²x", true),
            Err(SanitizeError::UnauthorizedSymbol("²".into()))
        );
        assert_eq!(
            rewrite_superscripts("x+³", false),
            Err(SanitizeError::UnauthorizedSymbol("³".into()))
        );
    }
}
