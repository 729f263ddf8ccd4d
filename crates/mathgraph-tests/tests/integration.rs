//! Integration tests for end-to-end mathgraph compilation.
//!
//! These tests verify the full pipeline:
//! Raw text → Sanitize → Transform → Build → Evaluate

use mathgraph::{CompileError, CompileOptions, NodeKind, SocketType, Value};
use mathgraph_tests::{TestHarness, OUT};

/// A plain expression compiles and evaluates like the infix form.
#[test]
fn test_transformer_example_evaluates() {
    let mut harness = TestHarness::scalar(&["x", "y"]);
    let report = harness.compile("x*2 + (3-4/5)/3 + (x+y)**2").unwrap();
    assert_eq!(
        report.ir,
        "add(add(mult(x, 2), div(sub(3, div(4, 5)), 3)), pow(add(x, y), 2))"
    );

    harness.set_input("x", 1.0).set_input("y", 2.0);
    assert!((harness.eval_scalar() - 11.733_333_333).abs() < 1e-6);
}

/// Algebraic shorthand: implicit multiplication and superscripts.
#[test]
fn test_algebraic_shorthand() {
    let mut harness = TestHarness::scalar(&["x", "y"]);
    let report = harness.compile("2xy² + sin(x)").unwrap();
    assert_eq!(report.canonical, "2*x*(y**2)+sin(x)");

    harness.set_input("x", 0.0).set_input("y", 3.0);
    assert_eq!(harness.eval_scalar(), 0.0);
    harness.set_input("x", 1.0);
    let expected = 2.0 * 9.0 + 1f64.sin();
    assert!((harness.eval_scalar() - expected).abs() < 1e-12);
}

/// Irrationals and macros substitute their values.
#[test]
fn test_irrationals_and_macros() {
    let mut harness = TestHarness::scalar(&["x"]);
    harness.compile("Pi*x").unwrap();
    harness.set_input("x", 2.0);
    assert!((harness.eval_scalar() - 2.0 * std::f64::consts::PI).abs() < 1e-6);

    harness.compile("2π").unwrap();
    assert!((harness.eval_scalar() - std::f64::consts::TAU).abs() < 1e-6);
}

/// Re-running the same text changes nothing.
#[test]
fn test_recompile_is_idempotent() {
    let mut harness = TestHarness::scalar(&["x", "y"]);
    harness.compile("clamp(x*y, 0, 10) + abs(x)").unwrap();
    let tags = harness.tags();
    let nodes = harness.graph().node_count();

    let report = harness.compile("clamp(x*y, 0, 10) + abs(x)").unwrap();
    assert!(report.build.is_noop(), "{:?}", report.build);
    assert_eq!(harness.tags(), tags);
    assert_eq!(harness.graph().node_count(), nodes);
}

/// Editing a constant updates it in place.
#[test]
fn test_constant_edit_reuses_nodes() {
    let mut harness = TestHarness::scalar(&["x"]);
    harness.compile("x*2").unwrap();
    let nodes = harness.graph().node_count();

    harness.compile("x*3").unwrap();
    assert_eq!(harness.graph().node_count(), nodes);
    harness.set_input("x", 4.0);
    assert_eq!(harness.eval_scalar(), 12.0);
}

/// Changing the expression shape prunes what the old one left behind.
#[test]
fn test_shape_edit_prunes_stale_nodes() {
    let mut harness = TestHarness::scalar(&["x", "y"]);
    harness.compile("sin(x) + cos(y) + x*y").unwrap();
    let report = harness.compile("x - y").unwrap();
    assert!(!report.build.pruned.is_empty());
    assert_eq!(harness.tags().len(), 1);

    harness.set_input("x", 5.0).set_input("y", 2.0);
    assert_eq!(harness.eval_scalar(), 3.0);
}

/// Rejected input never mutates the graph.
#[test]
fn test_errors_leave_graph_untouched() {
    let mut harness = TestHarness::scalar(&["x"]);
    harness.compile("x + 1").unwrap();
    let tags = harness.tags();

    for raw in ["x $ 1", "x +", "x < 1", "q + 1"] {
        let err = harness.compile(raw).unwrap_err();
        assert!(!err.user_message().is_empty(), "{raw}");
        assert_eq!(harness.tags(), tags, "{raw}");
    }
}

/// User-facing messages are the short sentences.
#[test]
fn test_user_messages() {
    let mut harness = TestHarness::scalar(&["x"]);
    let err = harness.compile("x $ 1").unwrap_err();
    assert_eq!(err.user_message(), "Unauthorized Symbol '$'");

    let err = harness.compile("clamp(x, 1)").unwrap_err();
    assert!(matches!(err, CompileError::Build(_)), "{err}");
}

/// Non-algebraic mode allows long names and rejects unknown calls.
#[test]
fn test_non_algebraic_mode() {
    let options = CompileOptions {
        algebraic_notation: false,
        ..CompileOptions::default()
    };
    let mut harness = TestHarness::scalar(&["speed", "time"]).with_options(options);
    harness.compile("speed * time").unwrap();
    harness.set_input("speed", 3.0).set_input("time", 4.0);
    assert_eq!(harness.eval_scalar(), 12.0);

    let err = harness.compile("warp(speed)").unwrap_err();
    assert_eq!(err.user_message(), "Unknown Function 'warp'");
}

/// Options loaded from host preferences.
#[test]
fn test_options_from_json() {
    let options: CompileOptions = serde_json::from_str(r#"{ "max_depth": 4 }"#).unwrap();
    let mut harness = TestHarness::scalar(&["x"]).with_options(options);
    harness.compile("x+1").unwrap();

    let err = harness.compile("sin(sin(sin(sin(sin(x)))))").unwrap_err();
    assert!(matches!(err, CompileError::Transform(_) | CompileError::Build(_)), "{err}");
}

/// Expressions and scripts can write different outputs of one graph.
#[test]
fn test_script_and_compile_share_a_graph() {
    let mut harness = TestHarness::new(
        &[("x", SocketType::Float), ("v", SocketType::Vector)],
        &[(OUT, SocketType::Float), ("moved", SocketType::Vector)],
    );
    harness.compile_into("x/2", OUT).unwrap();
    harness
        .script(|ns| {
            let v = ns.input_vector("v")?;
            let x = ns.input_scalar("x")?;
            let moved = (&v + &x)?;
            ns.output_vector("moved", &moved)?;
            Ok(())
        })
        .unwrap();

    harness
        .set_input("x", 4.0)
        .set_input("v", [1.0, 2.0, 3.0]);
    assert_eq!(harness.eval_scalar(), 2.0);
    assert_eq!(harness.eval("moved"), Value::Vector([5.0, 6.0, 7.0]));
    assert_eq!(harness.graph().count_kind(NodeKind::SeparateXyz), 0);

    // Recompiling, then editing, the expression leaves the script's nodes alone.
    harness.compile_into("x/2", OUT).unwrap();
    assert_eq!(harness.eval("moved"), Value::Vector([5.0, 6.0, 7.0]));
    let report = harness.compile_into("x*3", OUT).unwrap();
    assert_eq!(report.build.pruned.len(), 1, "{:?}", report);
    assert_eq!(harness.eval_scalar(), 12.0);
    assert_eq!(harness.eval("moved"), Value::Vector([5.0, 6.0, 7.0]));
}

/// Editing an expression re-evaluates to the edited result.
#[test]
fn test_edited_expression_evaluates() {
    let mut harness = TestHarness::scalar(&["x", "y"]);
    harness.set_input("x", 3.0).set_input("y", 4.0);

    harness.compile("(x+y)*x").unwrap();
    assert_eq!(harness.eval_scalar(), 21.0);

    let report = harness.compile("(x-y)*x").unwrap();
    assert_eq!(report.build.pruned.len(), 2, "{:?}", report);
    assert_eq!(harness.eval_scalar(), -3.0);

    harness.compile("(x-y)*2").unwrap();
    assert_eq!(harness.eval_scalar(), -2.0);
    harness.compile("(x-y)*5").unwrap();
    assert_eq!(harness.eval_scalar(), -5.0);
}

/// Vector power is a type error in scripts, and nothing is built.
#[test]
fn test_script_vector_power_builds_nothing() {
    let mut harness = TestHarness::new(&[("v", SocketType::Vector)], &[("o", SocketType::Vector)]);
    let before = harness.graph().node_count();
    let err = harness
        .script(|ns| {
            let v = ns.input_vector("v")?;
            let squared = v.pow(2.0)?;
            ns.output_vector("o", &squared)?;
            Ok(())
        })
        .unwrap_err();
    assert!(err.to_string().contains("'**'"));
    assert_eq!(harness.graph().node_count(), before);
}
