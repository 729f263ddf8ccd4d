//! Irrational constants and the macro words that spell them.
//!
//! Users can type `π`, `𝑒` and `φ` directly or, with macros enabled, the
//! ASCII aliases `Pi`, `eNum`, `Phi` and `Gold`. Aliases become symbols
//! first; symbols become fixed-precision literals after superscripts are
//! rewritten, so `π²` still binds as one atom.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// An irrational constant with its literal spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Irrational {
    /// Symbol as typed.
    pub symbol: char,
    /// Literal that replaces it.
    pub literal: &'static str,
    /// Short description.
    pub description: &'static str,
}

/// Every irrational symbol the sanitizer accepts.
pub const IRRATIONALS: &[Irrational] = &[
    Irrational {
        symbol: 'π',
        literal: "3.1415927",
        description: "Pi: ratio of circumference to diameter",
    },
    Irrational {
        symbol: '𝑒',
        literal: "2.7182818",
        description: "Euler's number: base of the natural logarithm",
    },
    Irrational {
        symbol: 'φ',
        literal: "1.6180339",
        description: "Golden ratio: (1 + sqrt(5)) / 2",
    },
];

/// ASCII aliases and the symbol each one stands for.
pub const MACROS: &[(&str, char)] = &[("Pi", 'π'), ("eNum", '𝑒'), ("Phi", 'φ'), ("Gold", 'φ')];

static LETTER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("BUG: invalid letter-run regex"));

/// The irrational spelled by `c`, if any.
pub fn irrational(c: char) -> Option<&'static Irrational> {
    IRRATIONALS.iter().find(|i| i.symbol == c)
}

/// Whether `c` is an irrational symbol.
pub fn is_irrational(c: char) -> bool {
    irrational(c).is_some()
}

/// Replace macro words with their symbols.
///
/// A macro matches a whole run of letters, so `2Pi` becomes `2π` but `xPi`
/// is left alone. Returns the new text and whether anything changed.
pub fn substitute_macros(text: &str) -> (String, bool) {
    let mut changed = false;
    let rewritten = LETTER_RUN.replace_all(text, |caps: &Captures| {
        let word = &caps[0];
        match MACROS.iter().find(|(alias, _)| *alias == word) {
            Some((_, symbol)) => {
                changed = true;
                symbol.to_string()
            }
            None => word.to_string(),
        }
    });
    (rewritten.into_owned(), changed)
}

fn touches_operand(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || is_irrational(c)
}

/// Replace irrational symbols with their literals.
///
/// Each literal is kept a separate atom: a `*` is inserted on any side
/// where it would otherwise run into a name, a number, another irrational
/// or a parenthesis (`2π` → `2*3.1415927`).
pub fn substitute_irrationals(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let Some(constant) = irrational(c) else {
            out.push(c);
            continue;
        };
        if out.ends_with(|p: char| touches_operand(p) || p == ')') {
            out.push('*');
        }
        out.push_str(constant.literal);
        if chars.peek().is_some_and(|n| touches_operand(*n) || *n == '(') {
            out.push('*');
        }
    }
    out
}
