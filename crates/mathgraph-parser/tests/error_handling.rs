//! Error handling tests for the expression parser.
//!
//! This test suite verifies that the parser correctly detects and reports:
//! - Unclosed delimiters
//! - Unexpected end of input
//! - Malformed syntax and unknown characters
//! - Nesting beyond the configured depth

use mathgraph_ast::Expr;
use mathgraph_parser::{parse_expr, parse_expr_with_depth, ParseError, ParseErrorKind};

/// Helper to verify that parsing fails.
fn expect_error(source: &str) -> ParseError {
    match parse_expr(source) {
        Ok(expr) => panic!("Expected parse error, but parsing succeeded: {}", expr),
        Err(error) => error,
    }
}

/// Helper for tests that expect success.
fn parse_ok(source: &str) -> Expr {
    parse_expr(source).expect("Parse should succeed")
}

// =============================================================================
// Unclosed Delimiters
// =============================================================================

#[test]
fn test_unclosed_call() {
    let error = expect_error("sin(x");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);
    assert!(error.message.contains("expected ')'"), "{}", error.message);
}

#[test]
fn test_unclosed_group() {
    let error = expect_error("(a + b");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn test_unbalanced_close() {
    let error = expect_error("a + b)");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(error.span.start, 5);
}

// =============================================================================
// Unexpected EOF
// =============================================================================

#[test]
fn test_dangling_operator() {
    let error = expect_error("a +");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn test_empty_input() {
    let error = expect_error("");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);
    assert_eq!(error.span.start, 0);
}

// =============================================================================
// Malformed Syntax
// =============================================================================

#[test]
fn test_empty_parentheses() {
    let error = expect_error("a * ()");
    assert_eq!(error.kind, ParseErrorKind::InvalidSyntax);
}

#[test]
fn test_calling_a_group() {
    let error = expect_error("(a)(b)");
    assert_eq!(error.kind, ParseErrorKind::InvalidSyntax);
}

#[test]
fn test_adjacent_operands() {
    let error = expect_error("2 x");
    assert_eq!(error.kind, ParseErrorKind::UnexpectedToken);
}

#[test]
fn test_unknown_character() {
    let error = expect_error("a $ b");
    assert_eq!(error.kind, ParseErrorKind::InvalidToken);
    assert!(error.message.contains('$'));
}

#[test]
fn test_display_includes_location() {
    let error = expect_error("a + )");
    assert!(error.to_string().contains("at 4..5"), "{}", error);
}

// =============================================================================
// Depth limit
// =============================================================================

#[test]
fn test_depth_limit() {
    let source = format!("{}x{}", "(".repeat(10), ")".repeat(10));
    let error = parse_expr_with_depth(&source, 5).unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::TooDeep);

    assert!(parse_expr_with_depth(&source, 64).is_ok());
}

#[test]
fn test_long_flat_chain_is_not_deep() {
    let source = vec!["x"; 200].join(" + ");
    parse_ok(&source);
}
