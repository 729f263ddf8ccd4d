//! Token stream wrapper for hand-written parser.

use mathgraph_ast::Span;
use mathgraph_lexer::Token;
use std::ops::Range;

use super::ParseError;

/// Token stream with lookahead, position tracking and a nesting guard.
///
/// Each token is paired with its byte span from the source, enabling
/// accurate error message locations.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'src> TokenStream<'src> {
    /// Create a new token stream from tokens with their byte spans.
    pub fn new(tokens: &'src [(Token, Range<usize>)], max_depth: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches the expected token kind.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Expect a specific token and advance if it matches.
    pub fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            let start = self.pos;
            self.advance();
            Ok(self.span_from(start))
        } else {
            Err(ParseError::expected_token(
                expected,
                self.peek().cloned(),
                self.current_span(),
            ))
        }
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get the current position in the token stream.
    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Create a span from a starting position to the current position.
    pub fn span_from(&self, start: usize) -> Span {
        let start_byte = self
            .tokens
            .get(start)
            .map(|(_, span)| span.start)
            .unwrap_or_else(|| self.end_byte());

        let end_byte = if self.pos > 0 && self.pos <= self.tokens.len() {
            self.tokens
                .get(self.pos - 1)
                .map(|(_, span)| span.end)
                .unwrap_or(start_byte)
        } else {
            start_byte
        };

        Span::new(start_byte as u32, end_byte.max(start_byte) as u32)
    }

    /// Get a span for the current token (zero-length at the end of input).
    pub fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some((_, span)) => Span::new(span.start as u32, span.end as u32),
            None => {
                let end = self.end_byte() as u32;
                Span::new(end, end)
            }
        }
    }

    fn end_byte(&self) -> usize {
        self.tokens.last().map(|(_, span)| span.end).unwrap_or(0)
    }

    /// Enter one nesting level; fails once the configured limit is passed.
    pub fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::too_deep(self.max_depth, self.current_span()));
        }
        Ok(())
    }

    /// Leave one nesting level.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
