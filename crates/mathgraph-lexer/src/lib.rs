// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for canonical math expressions.
//!
//! This crate tokenizes the output of the sanitizer using logos.
//!
//! # Design
//!
//! - `Token`: every token the expression grammar knows about
//! - Operators the compiler refuses (comparisons, bitwise) are still lexed so
//!   the transformer can report `Operator Not Supported` instead of a parse error
//! - Token strings defined once in `TOKEN_STRINGS` table (single source of truth for Display)
//!
//! # Examples
//!
//! ```
//! # use mathgraph_lexer::*;
//! # use logos::Logos;
//! let tokens: Vec<Result<Token, ()>> = Token::lexer("x*2 + sin(y)").collect();
//! assert_eq!(tokens.len(), 8);
//! ```

use logos::Logos;
use std::ops::Range;
use std::rc::Rc;

/// Expression token.
///
/// Token strings for operators and delimiters are defined once in the
/// `TOKEN_STRINGS` table and indexed by discriminant for Display.
///
/// # Layout
///
/// Uses `#[repr(u16)]` to guarantee discriminant values are stable and
/// can be safely used to index into `TOKEN_STRINGS`. Data-carrying variants
/// come last.
#[derive(Logos, Debug, Clone, PartialEq)]
#[repr(u16)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // === Supported operators ===
    /// Operator `+`
    #[token("+")]
    Plus,
    /// Operator `-`
    #[token("-")]
    Minus,
    /// Operator `*`
    #[token("*")]
    Star,
    /// Operator `**`
    #[token("**")]
    StarStar,
    /// Operator `/`
    #[token("/")]
    Slash,
    /// Operator `//`
    #[token("//")]
    SlashSlash,
    /// Operator `%`
    #[token("%")]
    Percent,

    // === Refused operators ===
    /// Operator `<`
    #[token("<")]
    Lt,
    /// Operator `<=`
    #[token("<=")]
    LtEq,
    /// Operator `>`
    #[token(">")]
    Gt,
    /// Operator `>=`
    #[token(">=")]
    GtEq,
    /// Operator `==`
    #[token("==")]
    EqEq,
    /// Operator `!=`
    #[token("!=")]
    BangEq,
    /// Operator `&`
    #[token("&")]
    Amp,
    /// Operator `|`
    #[token("|")]
    Pipe,
    /// Operator `^`
    #[token("^")]
    Caret,
    /// Operator `@`
    #[token("@")]
    At,
    /// Operator `~`
    #[token("~")]
    Tilde,

    // === Delimiters ===
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,
    /// Separator `,`
    #[token(",")]
    Comma,

    // === Literals ===
    /// Numeric literal, kept as written (`2`, `1.5`, `.5`, `3.`).
    ///
    /// The source text is preserved so the unparsed IR reproduces the
    /// user's constants exactly and constant bindings can be looked up by
    /// their textual form.
    #[regex(r"[0-9]+(\.[0-9]*)?", |lex| Rc::from(lex.slice()))]
    #[regex(r"\.[0-9]+", |lex| Rc::from(lex.slice()))]
    Number(Rc<str>),

    /// Identifier (variables and function names).
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

/// Token string lookup table.
///
/// Maps discriminant indices to their string representation.
///
/// NOTE: The `#[token("...")]` attributes above must match these strings.
const TOKEN_STRINGS: &[&str] = &[
    "+", "-", "*", "**", "/", "//", "%", // supported
    "<", "<=", ">", ">=", "==", "!=", "&", "|", "^", "@", "~", // refused
    "(", ")", ",", // delimiters
];

impl Token {
    /// Get the index into TOKEN_STRINGS for simple tokens.
    ///
    /// # Safety
    ///
    /// Safe due to `#[repr(u16)]` on Token enum ensuring stable discriminants.
    fn token_string_index(&self) -> usize {
        // Safe: Token has #[repr(u16)] so the discriminant is the first field
        let discriminant = unsafe { *(self as *const Token as *const u16) };
        discriminant as usize
    }

    /// Numeric value of a `Number` token.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Token::Number(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// Whether this token is an operator the grammar parses but the
    /// compiler refuses.
    pub fn is_refused_operator(&self) -> bool {
        matches!(
            self,
            Token::Lt
                | Token::LtEq
                | Token::Gt
                | Token::GtEq
                | Token::EqEq
                | Token::BangEq
                | Token::Amp
                | Token::Pipe
                | Token::Caret
                | Token::At
                | Token::Tilde
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(text) => write!(f, "{}", text),
            Token::Ident(id) => write!(f, "{}", id),
            _ => {
                let idx = self.token_string_index();
                let s = TOKEN_STRINGS
                    .get(idx)
                    .expect("BUG: token discriminant out of bounds for TOKEN_STRINGS");
                write!(f, "{}", s)
            }
        }
    }
}

/// A character sequence the lexer could not turn into a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Byte range of the offending text.
    pub span: Range<usize>,
    /// The offending text.
    pub text: String,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unexpected '{}' at {:?}", self.text, self.span)
    }
}

impl std::error::Error for LexError {}

/// Lex a whole source string into tokens paired with their byte spans.
///
/// Stops at the first character sequence that is not a token.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source).spanned();
    while let Some((result, span)) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(LexError {
                    text: source[span.clone()].to_string(),
                    span,
                });
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: lex source and filter out errors.
    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source)
            .filter_map(|result| result.ok())
            .collect()
    }

    fn ident(s: &str) -> Token {
        Token::Ident(Rc::from(s))
    }

    fn num(s: &str) -> Token {
        Token::Number(Rc::from(s))
    }

    #[test]
    fn test_identifiers() {
        let tokens = lex("x velocity my_var a1");
        assert_eq!(
            tokens,
            vec![ident("x"), ident("velocity"), ident("my_var"), ident("a1")]
        );
    }

    #[test]
    fn test_numbers_keep_source_text() {
        let tokens = lex("42 3.14 .5 1.50 7.");
        assert_eq!(
            tokens,
            vec![num("42"), num("3.14"), num(".5"), num("1.50"), num("7.")]
        );
        assert_eq!(num("1.50").as_number(), Some(1.5));
        assert_eq!(num(".5").as_number(), Some(0.5));
    }

    #[test]
    fn test_double_char_operators_win() {
        let tokens = lex("a**b//c*d/e");
        assert_eq!(
            tokens,
            vec![
                ident("a"),
                Token::StarStar,
                ident("b"),
                Token::SlashSlash,
                ident("c"),
                Token::Star,
                ident("d"),
                Token::Slash,
                ident("e"),
            ]
        );
    }

    #[test]
    fn test_call_syntax() {
        let tokens = lex("clamp(x, 0, 1)");
        assert_eq!(
            tokens,
            vec![
                ident("clamp"),
                Token::LParen,
                ident("x"),
                Token::Comma,
                num("0"),
                Token::Comma,
                num("1"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_refused_operators_are_lexed() {
        let tokens = lex("a < b >= c ^ d");
        assert_eq!(tokens[1], Token::Lt);
        assert_eq!(tokens[3], Token::GtEq);
        assert_eq!(tokens[5], Token::Caret);
        assert!(tokens[1].is_refused_operator());
        assert!(!Token::Plus.is_refused_operator());
    }

    #[test]
    fn test_lexer_error_detection() {
        let results: Vec<_> = Token::lexer("a $ b").collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_tokenize_reports_offending_text() {
        let err = tokenize("a + # b").unwrap_err();
        assert_eq!(err.text, "#");
        assert_eq!(err.span, 4..5);

        let ok = tokenize("a+b").unwrap();
        assert_eq!(ok.len(), 3);
        assert_eq!(ok[2].1, 2..3);
    }

    #[test]
    fn test_token_string_consistency() {
        assert_eq!(Token::Plus.to_string(), "+");
        assert_eq!(Token::StarStar.to_string(), "**");
        assert_eq!(Token::SlashSlash.to_string(), "//");
        assert_eq!(Token::Percent.to_string(), "%");
        assert_eq!(Token::BangEq.to_string(), "!=");
        assert_eq!(Token::Tilde.to_string(), "~");
        assert_eq!(Token::LParen.to_string(), "(");
        assert_eq!(Token::Comma.to_string(), ",");
        assert_eq!(num("2.5").to_string(), "2.5");
        assert_eq!(ident("x").to_string(), "x");
    }
}
