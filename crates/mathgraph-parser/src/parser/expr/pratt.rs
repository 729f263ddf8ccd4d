//! Pratt parser core - precedence climbing for binary and unary operators.

use super::super::{ParseError, TokenStream};
use super::atoms;
use mathgraph_ast::{BinaryOp, Expr, UnaryOp};
use mathgraph_lexer::Token;

/// Binding power of prefix operators.
///
/// Lower than `**` so that `-x**2` is `-(x**2)`.
const UNARY_PREC: u8 = 40;

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// Get binary operator metadata (precedence, associativity, and operator enum).
///
/// Returns (precedence, associativity, op) where higher precedence = tighter binding.
/// This is the single source of truth for binary operator parsing.
fn binary_op_info(token: &Token) -> Option<(u8, Assoc, BinaryOp)> {
    match token {
        Token::EqEq => Some((5, Assoc::Left, BinaryOp::Eq)),
        Token::BangEq => Some((5, Assoc::Left, BinaryOp::Ne)),
        Token::Lt => Some((5, Assoc::Left, BinaryOp::Lt)),
        Token::LtEq => Some((5, Assoc::Left, BinaryOp::Le)),
        Token::Gt => Some((5, Assoc::Left, BinaryOp::Gt)),
        Token::GtEq => Some((5, Assoc::Left, BinaryOp::Ge)),
        Token::Pipe => Some((10, Assoc::Left, BinaryOp::BitOr)),
        Token::Caret => Some((12, Assoc::Left, BinaryOp::BitXor)),
        Token::Amp => Some((14, Assoc::Left, BinaryOp::BitAnd)),
        Token::Plus => Some((20, Assoc::Left, BinaryOp::Add)),
        Token::Minus => Some((20, Assoc::Left, BinaryOp::Sub)),
        Token::Star => Some((30, Assoc::Left, BinaryOp::Mul)),
        Token::Slash => Some((30, Assoc::Left, BinaryOp::Div)),
        Token::SlashSlash => Some((30, Assoc::Left, BinaryOp::FloorDiv)),
        Token::Percent => Some((30, Assoc::Left, BinaryOp::Mod)),
        Token::At => Some((30, Assoc::Left, BinaryOp::MatMul)),
        Token::StarStar => Some((50, Assoc::Right, BinaryOp::Pow)),
        _ => None,
    }
}

/// Pratt parser - handles binary operators with precedence climbing.
pub(super) fn parse_pratt(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, ParseError> {
    stream.enter()?;
    let start = stream.current_pos();
    let mut left = parse_prefix(stream)?;

    while let Some(token) = stream.peek() {
        if let Some((prec, assoc, op)) = binary_op_info(token) {
            if prec < min_prec {
                break;
            }

            stream.advance();

            let next_prec = if assoc == Assoc::Left { prec + 1 } else { prec };
            let right = parse_pratt(stream, next_prec)?;

            let span = stream.span_from(start);
            left = Expr::binary(op, left, right, span);
        } else {
            break;
        }
    }

    stream.leave();
    Ok(left)
}

/// Parse prefix expressions (unary operators, atoms).
fn parse_prefix(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    match stream.peek() {
        Some(Token::Minus) | Some(Token::Plus) | Some(Token::Tilde) => parse_unary(stream),
        _ => parse_postfix(stream),
    }
}

/// Parse unary operators.
fn parse_unary(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let span = stream.current_span();
    let op = match stream.advance() {
        Some(Token::Minus) => UnaryOp::Neg,
        Some(Token::Plus) => UnaryOp::Pos,
        Some(Token::Tilde) => UnaryOp::Invert,
        other => {
            return Err(ParseError::unexpected_token(other, "unary operator", span));
        }
    };

    let operand = parse_pratt(stream, UNARY_PREC)?;
    let span = stream.span_from(start);

    Ok(Expr::unary(op, operand, span))
}

/// Parse postfix expressions (function calls).
fn parse_postfix(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let bare_name = matches!(stream.peek(), Some(Token::Ident(_)));
    let expr = atoms::parse_atom(stream)?;

    if !matches!(stream.peek(), Some(Token::LParen)) {
        return Ok(expr);
    }

    let func = match expr.as_ident() {
        Some(name) if bare_name => name.to_string(),
        _ => {
            return Err(ParseError::invalid_syntax(
                "only a function name can be called",
                stream.current_span(),
            ));
        }
    };

    let args = parse_call_args(stream)?;
    Ok(Expr::call(func, args, stream.span_from(start)))
}

/// Parse function call arguments: `(arg1, arg2, ...)`.
fn parse_call_args(stream: &mut TokenStream) -> Result<Vec<Expr>, ParseError> {
    stream.expect(Token::LParen)?;

    let mut args = Vec::new();

    if !matches!(stream.peek(), Some(Token::RParen)) {
        loop {
            args.push(parse_pratt(stream, 0)?);

            if matches!(stream.peek(), Some(Token::Comma)) {
                stream.advance();
            } else {
                break;
            }
        }
    }

    stream.expect(Token::RParen)?;
    Ok(args)
}
