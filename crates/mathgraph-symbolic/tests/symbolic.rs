//! Symbolic scripts building and re-building graphs.

use std::collections::HashMap;

use mathgraph_graph::{MathOp, MemoryGraph, NodeKind, SetterReport, SocketType, Value};
use mathgraph_symbolic::{
    make_symbolic_namespace, Arg, Constructor, Namespace, NodeContext, Result, SocketTypeError, ValueKind,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn graph() -> MemoryGraph {
    MemoryGraph::with_interface(
        &[("a", SocketType::Float), ("b", SocketType::Float), ("v", SocketType::Vector)],
        &[("out", SocketType::Float), ("vout", SocketType::Vector)],
    )
    .unwrap()
}

/// Run one symbolic pass over `graph`, rolling it back if the script fails.
fn run<F>(graph: &mut MemoryGraph, script: F) -> Result<SetterReport>
where
    F: for<'g> FnOnce(&Namespace<'g>) -> Result<()>,
{
    run_in(NodeContext::new(graph), script)
}

fn run_in<F>(context: NodeContext<'_>, script: F) -> Result<SetterReport>
where
    F: for<'g> FnOnce(&Namespace<'g>) -> Result<()>,
{
    let ns = make_symbolic_namespace(context);
    match script(&ns) {
        Ok(()) => ns.finish(),
        Err(err) => {
            ns.abort();
            Err(err)
        }
    }
}

fn inputs() -> HashMap<String, Value> {
    HashMap::from([
        ("a".to_string(), Value::Float(3.0)),
        ("b".to_string(), Value::Float(4.0)),
        ("v".to_string(), Value::Vector([1.0, 2.0, 3.0])),
    ])
}

fn scalar(graph: &MemoryGraph) -> f64 {
    graph.evaluate("out", &inputs()).unwrap().as_float().unwrap()
}

fn vector(graph: &MemoryGraph) -> [f64; 3] {
    graph.evaluate("vout", &inputs()).unwrap().as_vector().unwrap()
}

fn quadratic(ns: &Namespace<'_>) -> Result<()> {
    let a = ns.input_scalar("a")?;
    let b = ns.input_scalar("b")?;
    let square = a.pow(2.0)?;
    let sum = (&square + &b)?;
    ns.output_scalar("out", &sum)?;
    Ok(())
}

#[test]
fn arithmetic_builds_an_evaluable_graph() {
    init_tracing();
    let mut g = graph();
    let report = run(&mut g, quadratic).unwrap();
    assert_eq!(report.created.len(), 2);
    assert_eq!(scalar(&g), 13.0);
}

#[test]
fn second_pass_is_a_noop() {
    init_tracing();
    let mut g = graph();
    run(&mut g, quadratic).unwrap();
    let nodes = g.node_count();

    let report = run(&mut g, quadratic).unwrap();
    assert!(report.is_noop(), "{:?}", report);
    assert_eq!(g.node_count(), nodes);
}

#[test]
fn tags_are_stable_across_passes() {
    let mut g = graph();
    let mut tags = Vec::new();
    for _ in 0..2 {
        let mut seen = None;
        run(&mut g, |ns| {
            let a = ns.input_scalar("a")?;
            let doubled = (&a * 2.0)?;
            seen = doubled.tag();
            Ok(())
        })
        .unwrap();
        tags.push(seen.unwrap());
    }
    assert_eq!(tags[0], tags[1]);
    assert!(tags[0].starts_with("mult."));
}

#[test]
fn reflected_operators_keep_operand_order() {
    let mut g = graph();
    run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        let diff = (10.0 - &a)?;
        let quotient = a.rdiv(12.0)?;
        let total = (&diff + &quotient)?;
        ns.output_scalar("out", &total)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(scalar(&g), 7.0 + 4.0);
}

#[test]
fn negation_and_floor_division() {
    let mut g = graph();
    run(&mut g, |ns| {
        let b = ns.input_scalar("b")?;
        let neg = (-&b)?;
        let floored = neg.floordiv(3.0)?;
        ns.output_scalar("out", &floored)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(scalar(&g), -2.0);
}

#[test]
fn vector_power_is_refused_before_building() {
    init_tracing();
    let mut g = graph();
    let before = g.node_count();
    let err = run(&mut g, |ns| {
        let v = ns.input_vector("v")?;
        let result = v.pow(2.0);
        assert!(ns.report().created.is_empty());
        result.map(|_| ())
    })
    .unwrap_err();

    assert!(matches!(err, SocketTypeError::Incompatible { .. }), "{err}");
    assert_eq!(
        err.to_string(),
        "Cannot use '**' on 'v': Vector and Scalar are incompatible"
    );
    assert_eq!(g.node_count(), before);
}

#[test]
fn scalar_to_vector_power_is_refused() {
    let mut g = graph();
    let err = run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        let v = ns.input_vector("v")?;
        a.pow(&v).map(|_| ())
    })
    .unwrap_err();
    assert!(matches!(err, SocketTypeError::Incompatible { .. }));
}

#[test]
fn scalars_broadcast_against_vectors() {
    let mut g = graph();
    run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        let v = ns.input_vector("v")?;
        let scaled = (&v * &a)?;
        assert_eq!(scaled.kind(), ValueKind::Vector);
        let shifted = (&scaled + [1.0, 0.0, -1.0])?;
        ns.output_vector("vout", &shifted)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(vector(&g), [4.0, 6.0, 8.0]);
}

#[test]
fn components_share_one_separate_node() {
    let mut g = graph();
    run(&mut g, |ns| {
        let v = ns.input_vector("v")?;
        let x = v.x()?;
        let z = v.index(-1)?;
        let [_, y, _] = v.components()?;
        let sum = (&(&x + &y)? + &z)?;
        assert_eq!(sum.kind(), ValueKind::Scalar);
        ns.output_scalar("out", &sum)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(g.count_kind(NodeKind::SeparateXyz), 1);
    assert_eq!(scalar(&g), 6.0);
}

#[test]
fn component_access_errors() {
    let mut g = graph();
    let err = run(&mut g, |ns| ns.input_vector("v")?.index(3).map(|_| ())).unwrap_err();
    assert_eq!(
        err,
        SocketTypeError::IndexOutOfRange {
            name: "v".into(),
            index: 3
        }
    );

    let err = run(&mut g, |ns| ns.input_scalar("a")?.x().map(|_| ())).unwrap_err();
    assert!(matches!(err, SocketTypeError::Incompatible { .. }));
    assert_eq!(g.count_kind(NodeKind::SeparateXyz), 0);
}

#[test]
fn slices_clamp_to_three_components() {
    let mut g = graph();
    run(&mut g, |ns| {
        let v = ns.input_vector("v")?;
        assert_eq!(v.slice(1..).unwrap().len(), 2);
        assert_eq!(v.slice(..10).unwrap().len(), 3);
        assert!(v.slice(5..).unwrap().is_empty());
        assert_eq!(v.iter()?.count(), 3);
        Ok(())
    })
    .unwrap();
}

#[test]
fn scalar_output_refuses_vectors() {
    let mut g = graph();
    let err = run(&mut g, |ns| {
        let v = ns.input_vector("v")?;
        ns.output_scalar("out", &v).map(|_| ())
    })
    .unwrap_err();
    assert!(matches!(err, SocketTypeError::Incompatible { .. }));
}

#[test]
fn vector_output_broadcasts_scalars_and_literals() {
    let mut g = graph();
    run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        ns.output_vector("vout", &a)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(vector(&g), [3.0, 3.0, 3.0]);

    let mut g = graph();
    run(&mut g, |ns| {
        ns.output_vector("vout", [1.0, 2.0, 3.0])?;
        ns.output_scalar("out", 0.5)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(vector(&g), [1.0, 2.0, 3.0]);
    assert_eq!(scalar(&g), 0.5);
}

#[test]
fn sinks_cannot_be_read() {
    let mut g = graph();
    let err = run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        let sink = ns.output_scalar("out", &a)?;
        assert_eq!(sink.kind(), ValueKind::Sink);
        assert_eq!(sink.name(), "out");
        (&sink + 1.0).map(|_| ())
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot use '+' on 'out': Output and Scalar are incompatible"
    );
}

#[test]
fn missing_sockets_are_reported() {
    let mut g = graph();
    let err = run(&mut g, |ns| ns.input_scalar("nope").map(|_| ())).unwrap_err();
    assert_eq!(err.to_string(), "The Scalar socket 'nope' does not exist");

    // Right name, wrong type.
    let err = run(&mut g, |ns| ns.input_scalar("v").map(|_| ())).unwrap_err();
    assert!(matches!(err, SocketTypeError::MissingSocket { kind: ValueKind::Scalar, .. }));

    let err = run(&mut g, |ns| ns.output_vector("out", 1.0).map(|_| ())).unwrap_err();
    assert!(matches!(err, SocketTypeError::MissingSocket { kind: ValueKind::Vector, .. }));
}

#[test]
fn sequences_must_have_three_elements() {
    let mut g = graph();
    let err = run(&mut g, |ns| {
        let v = ns.input_vector("v")?;
        v.add(vec![1.0, 2.0]).map(|_| ())
    })
    .unwrap_err();
    assert_eq!(err, SocketTypeError::SequenceLength(2));
}

#[test]
fn anonymous_values_are_numbered_per_kind() {
    let mut g = graph();
    run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        assert!(!a.is_anonymous());
        assert_eq!(a.identity(), "sc:a");
        let first = (&a + 1.0)?;
        let second = (&a + 2.0)?;
        assert!(first.is_anonymous());
        assert_eq!(first.name(), "AnonymousVariable");
        assert_eq!(second.id(), first.id() + 1);
        assert_eq!(second.identity(), format!("{}:0", second.tag().unwrap()));
        assert_ne!(first.identity(), second.identity());
        Ok(())
    })
    .unwrap();
}

fn product_of(ns: &Namespace<'_>, subtract: bool) -> Result<()> {
    let a = ns.input_scalar("a")?;
    let b = ns.input_scalar("b")?;
    let inner = if subtract { (&a - &b)? } else { (&a + &b)? };
    let product = (&inner * &a)?;
    ns.output_scalar("out", &product)?;
    Ok(())
}

#[test]
fn editing_an_operand_rebuilds_the_consumer() {
    init_tracing();
    let mut g = graph();
    run(&mut g, |ns| product_of(ns, false)).unwrap();
    assert_eq!(scalar(&g), 21.0);

    let report = run(&mut g, |ns| product_of(ns, true)).unwrap();
    // Both the subtraction and the product that reads it are new.
    assert_eq!(report.created.len(), 2, "{:?}", report);
    assert_eq!(scalar(&g), -3.0);

    // Back to the first form: its nodes are still there.
    let report = run(&mut g, |ns| product_of(ns, false)).unwrap();
    assert!(report.created.is_empty(), "{:?}", report);
    assert_eq!(scalar(&g), 21.0);
}

#[test]
fn editing_a_constant_updates_in_place() {
    let mut g = graph();
    for (factor, expected) in [(2.0, 6.0), (5.0, 15.0)] {
        run(&mut g, |ns| {
            let a = ns.input_scalar("a")?;
            ns.output_scalar("out", &(&a * factor)?)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(scalar(&g), expected);
    }
    assert_eq!(g.count_kind(NodeKind::Math(MathOp::Multiply)), 1);
}

#[test]
fn failed_pass_rolls_back_its_nodes() {
    let mut g = graph();
    run(&mut g, quadratic).unwrap();
    let nodes = g.node_count();

    let err = run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        let shifted = (&a + 100.0)?;
        assert_eq!(ns.report().created.len(), 1);
        let v = ns.input_vector("v")?;
        shifted.pow(&v).map(|_| ())
    })
    .unwrap_err();

    assert!(matches!(err, SocketTypeError::Incompatible { .. }));
    assert_eq!(g.node_count(), nodes);
    assert_eq!(scalar(&g), 13.0);
}

#[test]
fn abort_reports_removed_nodes() {
    let mut g = graph();
    let nodes = g.node_count();
    let ns = make_symbolic_namespace(NodeContext::new(&mut g));
    {
        let a = ns.input_scalar("a").unwrap();
        let doubled = (&a * 2.0).unwrap();
        (&doubled + 1.0).unwrap();
    }
    let report = ns.abort();
    assert_eq!(report.removed.len(), 2);
    assert!(report.created.is_empty());
    assert_eq!(g.node_count(), nodes);
}

fn product(ns: &Namespace<'_>) -> Result<()> {
    let a = ns.input_scalar("a")?;
    let b = ns.input_scalar("b")?;
    ns.output_scalar("out", &(&a * &b)?)?;
    Ok(())
}

#[test]
fn stale_nodes_are_pruned_only_when_asked() {
    let mut g = graph();
    run(&mut g, quadratic).unwrap();
    let base = g.node_count();

    // Without the option the old power and sum stay behind.
    run(&mut g, product).unwrap();
    assert_eq!(g.node_count(), base + 1);

    let report = run_in(NodeContext::new(&mut g).with_prune_stale(true), product).unwrap();
    assert_eq!(report.removed.len(), 2, "{:?}", report);
    assert_eq!(g.node_count(), base - 1);
    assert_eq!(scalar(&g), 12.0);
}

#[test]
fn pruning_keeps_nodes_feeding_other_outputs() {
    let mut g = graph();
    run(&mut g, |ns| {
        let v = ns.input_vector("v")?;
        ns.output_vector("vout", &(&v * 2.0)?)?;
        Ok(())
    })
    .unwrap();

    run_in(NodeContext::new(&mut g).with_prune_stale(true), quadratic).unwrap();
    assert_eq!(vector(&g), [2.0, 4.0, 6.0]);
    assert_eq!(scalar(&g), 13.0);
}

#[test]
fn library_calls_infer_the_result_kind() {
    let mut g = graph();
    run(&mut g, |ns| {
        let a = ns.input_scalar("a")?;
        let v = ns.input_vector("v")?;
        let clamped = ns.call("clamp", &[Arg::from(&a), Arg::from(0.0), Arg::from(1.0)])?;
        assert_eq!(clamped.kind(), ValueKind::Scalar);
        let floored = ns.call("floor", &[Arg::from(&v)])?;
        assert_eq!(floored.kind(), ValueKind::Vector);
        ns.output_scalar("out", &clamped)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(scalar(&g), 1.0);

    let err = run(&mut g, |ns| ns.call("nosuch", &[]).map(|_| ())).unwrap_err();
    assert!(matches!(err, SocketTypeError::Function(_)));
}

#[test]
fn constructor_names() {
    assert_eq!(Namespace::constructor_names(), ["inFloat", "inVec", "outFloat", "outVec"]);
    assert_eq!(Namespace::constructor("outVec"), Some(Constructor::OutVec));
    assert!(Constructor::OutFloat.is_output());
    assert_eq!(Constructor::InVec.kind(), ValueKind::Vector);
    assert_eq!(Constructor::from_name("float"), None);
}
