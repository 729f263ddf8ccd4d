//! Atomic expressions - numbers, identifiers, parenthesized expressions.

use super::super::{ParseError, TokenStream};
use super::pratt;
use mathgraph_ast::{Expr, ExprKind};
use mathgraph_lexer::Token;

/// Parse atomic expressions.
pub(super) fn parse_atom(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let span = stream.current_span();

    match stream.peek() {
        Some(Token::Number(_)) => match stream.advance() {
            Some(Token::Number(text)) => {
                let text = text.clone();
                Expr::number(&text, stream.span_from(start)).ok_or_else(|| {
                    ParseError::invalid_syntax(format!("'{}' is not a number", text), span)
                })
            }
            other => Err(ParseError::unexpected_token(other, "numeric literal", span)),
        },
        Some(Token::Ident(_)) => match stream.advance() {
            Some(Token::Ident(name)) => {
                let name = name.to_string();
                Ok(Expr::ident(name, stream.span_from(start)))
            }
            other => Err(ParseError::unexpected_token(other, "identifier", span)),
        },
        Some(Token::LParen) => parse_parenthesized(stream),
        other => Err(ParseError::unexpected_token(other, "in expression", span)),
    }
}

/// Parse `( expr )` or a tuple `( expr, expr, ... )`.
///
/// A single element without a trailing comma is plain grouping. `()` is
/// rejected.
fn parse_parenthesized(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::LParen)?;

    if matches!(stream.peek(), Some(Token::RParen)) {
        return Err(ParseError::invalid_syntax(
            "empty parentheses",
            stream.current_span(),
        ));
    }

    let first = pratt::parse_pratt(stream, 0)?;

    if !matches!(stream.peek(), Some(Token::Comma)) {
        stream.expect(Token::RParen)?;
        return Ok(first);
    }

    let mut elements = vec![first];
    while matches!(stream.peek(), Some(Token::Comma)) {
        stream.advance();
        if matches!(stream.peek(), Some(Token::RParen)) {
            break;
        }
        elements.push(pratt::parse_pratt(stream, 0)?);
    }

    stream.expect(Token::RParen)?;
    Ok(Expr::new(ExprKind::Tuple(elements), stream.span_from(start)))
}
