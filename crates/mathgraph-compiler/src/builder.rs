//! Graph builder and linker.
//!
//! Walks the function-call IR and materializes every call through the
//! registry and a [`NodeSetter`], then links the result into the sink.
//! Identifiers and constants are resolved per AST node, so binding `x`
//! never touches `xy` and binding `2` never touches `2.5`.
//!
//! Everything that can be checked without touching the graph (names,
//! bindings, depth) is checked first. Once nodes start being created, a
//! failure removes every node this build created.

use mathgraph_ast::{walk::walk_expr, Expr, ExprKind};
use mathgraph_graph::{
    GraphBackend, NodeKind, NodeSetter, Operand, OutputRef, SetterReport,
};
use mathgraph_parser::{parse_expr_with_depth, ParseErrorKind};
use tracing::{debug, instrument};

use crate::bindings::Bindings;
use crate::error::{BuildError, DEBUG_TARGET};
use crate::options::BuildOptions;

/// Tag function name for vector literals assembled from sockets.
const COMBINE: &str = "combine";
/// Tag function name for a bare literal result.
const VALUE: &str = "value";

/// Result of one build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// Output linked into the sink.
    pub output: OutputRef,
    /// Whether the sink link had to be made.
    pub sink_linked: bool,
    /// Nodes created, refreshed, reused and removed.
    pub nodes: SetterReport,
    /// Tags of stale nodes removed after the build.
    pub pruned: Vec<String>,
}

impl BuildReport {
    /// Whether the build changed nothing.
    pub fn is_noop(&self) -> bool {
        self.nodes.is_noop() && !self.sink_linked && self.pruned.is_empty()
    }
}

/// Build the IR in `graph`.
#[instrument(skip_all, fields(ir = %ir))]
pub fn build(
    ir: &Expr,
    bindings: &Bindings,
    graph: &mut dyn GraphBackend,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    precheck(ir, bindings, &*graph, options)?;

    let mut setter = NodeSetter::new(graph).with_spacing(options.node_spacing);
    let outcome = materialize(&mut setter, ir, bindings);

    let (output, sink_linked) = match outcome {
        Ok(linked) => linked,
        Err(err) => {
            let removed = setter.cleanse();
            debug!(error = %err, removed, "build failed, rolled back");
            return Err(err);
        }
    };

    let pruned = if options.prune_stale {
        setter.prune_stale().map_err(|err| {
            debug!(target: DEBUG_TARGET, error = %err, "pruning failed");
            BuildError::Execution
        })?
    } else {
        Vec::new()
    };

    let nodes = setter.finish();
    debug!(
        created = nodes.created.len(),
        updated = nodes.updated.len(),
        reused = nodes.reused.len(),
        pruned = pruned.len(),
        "built"
    );
    Ok(BuildReport {
        output,
        sink_linked,
        nodes,
        pruned,
    })
}

/// Parse the textual IR and build it.
///
/// The text must already be in call form; operators are refused.
pub fn build_text(
    ir_text: &str,
    bindings: &Bindings,
    graph: &mut dyn GraphBackend,
    options: &BuildOptions,
) -> Result<BuildReport, BuildError> {
    let ir = parse_expr_with_depth(ir_text, options.max_depth).map_err(|err| {
        debug!(target: DEBUG_TARGET, error = %err, source = ir_text, "IR does not parse");
        match err.kind {
            ParseErrorKind::TooDeep => BuildError::TooLarge,
            _ => BuildError::Execution,
        }
    })?;
    if !ir.is_call_form() {
        debug!(target: DEBUG_TARGET, source = ir_text, "IR still contains operators");
        return Err(BuildError::Execution);
    }
    build(&ir, bindings, graph, options)
}

/// Checks that need no mutation: depth, function names, variables.
fn precheck(
    ir: &Expr,
    bindings: &Bindings,
    graph: &dyn GraphBackend,
    options: &BuildOptions,
) -> Result<(), BuildError> {
    if ir.depth() > options.max_depth {
        return Err(BuildError::TooLarge);
    }

    let mut first_error = None;
    walk_expr(ir, &mut |node| {
        if first_error.is_some() {
            return;
        }
        match &node.kind {
            ExprKind::Call { func, .. } => {
                if let Err(err) = mathgraph_registry::require(func) {
                    first_error = Some(BuildError::from(err));
                }
            }
            ExprKind::Ident(name) if bindings.resolve(graph, name).is_none() => {
                first_error = Some(BuildError::UnknownVariable(name.clone()));
            }
            _ => {}
        }
    });
    first_error.map_or(Ok(()), Err)
}

/// Build the root and link it into the sink.
fn materialize(
    setter: &mut NodeSetter<'_>,
    ir: &Expr,
    bindings: &Bindings,
) -> Result<(OutputRef, bool), BuildError> {
    let mut walker = Walker { setter, bindings };
    let output = walker.root(ir)?;
    let linked = walker
        .setter
        .link_output(output, bindings.sink())
        .map_err(|err| {
            debug!(target: DEBUG_TARGET, error = %err, "final link failed");
            BuildError::FinalLink
        })?;
    Ok((output, linked))
}

struct Walker<'a, 'g> {
    setter: &'a mut NodeSetter<'g>,
    bindings: &'a Bindings,
}

impl Walker<'_, '_> {
    /// Output of the whole expression.
    ///
    /// A bare literal gets a value node of its own so there is something to
    /// link; a bare identifier links straight from its socket.
    fn root(&mut self, expr: &Expr) -> Result<OutputRef, BuildError> {
        match &expr.kind {
            ExprKind::Tuple(_) => match self.argument(expr)? {
                Operand::Socket(output) => Ok(output),
                Operand::Vector(v) => self.combine(&[v[0].into(), v[1].into(), v[2].into()]),
                Operand::Float(_) => Err(BuildError::WrongTupleSyntax),
            },
            _ => match self.operand(expr)? {
                Operand::Socket(output) => Ok(output),
                literal => {
                    let operands = [literal];
                    let tag = self.setter.tag_for(VALUE, &operands);
                    let node = self.setter.find_or_create(&tag, NodeKind::Value, &operands)?;
                    Ok(OutputRef::new(node, 0))
                }
            },
        }
    }

    /// Operand for an argument position, where tuples are allowed.
    fn argument(&mut self, expr: &Expr) -> Result<Operand, BuildError> {
        let ExprKind::Tuple(items) = &expr.kind else {
            return self.operand(expr);
        };
        if items.len() != 3 {
            return Err(BuildError::WrongTupleSyntax);
        }

        let elements = items
            .iter()
            .map(|item| self.operand(item))
            .collect::<Result<Vec<_>, _>>()?;

        let floats: Vec<f64> = elements
            .iter()
            .filter_map(|op| match op {
                Operand::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        if let [x, y, z] = floats[..] {
            return Ok(Operand::Vector([x, y, z]));
        }
        if elements.iter().any(|op| matches!(op, Operand::Vector(_))) {
            return Err(BuildError::WrongTupleSyntax);
        }
        self.combine(&elements).map(Operand::Socket)
    }

    fn combine(&mut self, elements: &[Operand]) -> Result<OutputRef, BuildError> {
        let tag = self.setter.tag_for(COMBINE, elements);
        let node = self.setter.find_or_create(&tag, NodeKind::CombineXyz, elements)?;
        Ok(OutputRef::new(node, 0))
    }

    fn operand(&mut self, expr: &Expr) -> Result<Operand, BuildError> {
        match &expr.kind {
            ExprKind::Number { value, text } => Ok(match self.bindings.constant(text) {
                Some(output) => Operand::Socket(output),
                None => Operand::Float(*value),
            }),

            ExprKind::Ident(name) => self
                .bindings
                .resolve(self.setter.graph(), name)
                .map(Operand::Socket)
                .ok_or_else(|| BuildError::UnknownVariable(name.clone())),

            ExprKind::Call { func, args } => {
                let desc = mathgraph_registry::require(func)?;
                let operands = args
                    .iter()
                    .map(|arg| self.argument(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let tag = self.setter.tag_for(func, &operands);
                let output = desc.call(self.setter, &tag, &operands)?;
                Ok(Operand::Socket(output))
            }

            ExprKind::Tuple(_) => Err(BuildError::WrongTupleSyntax),

            ExprKind::Binary { .. } | ExprKind::Unary { .. } => {
                debug!(target: DEBUG_TARGET, expr = %expr, "operator left in IR");
                Err(BuildError::Execution)
            }
        }
    }
}

impl From<mathgraph_graph::GraphError> for BuildError {
    fn from(err: mathgraph_graph::GraphError) -> Self {
        debug!(target: DEBUG_TARGET, error = %err, "graph refused a mutation");
        BuildError::Execution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform;
    use mathgraph_graph::{MemoryGraph, SocketType, Value};
    use std::collections::HashMap;

    fn graph() -> MemoryGraph {
        MemoryGraph::with_interface(
            &[("x", SocketType::Float), ("y", SocketType::Float), ("v", SocketType::Vector)],
            &[("out", SocketType::Float), ("vout", SocketType::Vector)],
        )
        .unwrap()
    }

    fn build_into(graph: &mut MemoryGraph, source: &str, sink: &str) -> Result<BuildReport, BuildError> {
        let ir = transform(source).unwrap().ir;
        let bindings = Bindings::for_interface(&*graph, sink)?;
        build(&ir, &bindings, graph, &BuildOptions::default())
    }

    fn eval(graph: &MemoryGraph, sink: &str, x: f64, y: f64) -> Value {
        let inputs = HashMap::from([
            ("x".to_string(), Value::Float(x)),
            ("y".to_string(), Value::Float(y)),
            ("v".to_string(), Value::Vector([1.0, 2.0, 3.0])),
        ]);
        graph.evaluate(sink, &inputs).unwrap()
    }

    #[test]
    fn test_builds_and_links() {
        let mut g = graph();
        let report = build_into(&mut g, "x*2+y", "out").unwrap();
        assert_eq!(report.nodes.created.len(), 2);
        assert!(report.sink_linked);
        assert_eq!(eval(&g, "out", 3.0, 1.0), Value::Float(7.0));
    }

    #[test]
    fn test_second_build_is_noop() {
        let mut g = graph();
        build_into(&mut g, "sin(x)*(y+1)", "out").unwrap();
        let (nodes, links) = (g.node_count(), g.link_count());
        let again = build_into(&mut g, "sin(x)*(y+1)", "out").unwrap();
        assert!(again.is_noop(), "{:?}", again);
        assert_eq!((g.node_count(), g.link_count()), (nodes, links));
    }

    #[test]
    fn test_constant_edit_updates_in_place() {
        let mut g = graph();
        build_into(&mut g, "x*2", "out").unwrap();
        let nodes = g.node_count();
        let report = build_into(&mut g, "x*5", "out").unwrap();
        assert!(report.nodes.created.is_empty());
        assert_eq!(report.nodes.updated.len(), 1);
        assert_eq!(g.node_count(), nodes);
        assert_eq!(eval(&g, "out", 2.0, 0.0), Value::Float(10.0));
    }

    #[test]
    fn test_structural_edit_prunes_stale_nodes() {
        let mut g = graph();
        build_into(&mut g, "sin(x)+1", "out").unwrap();
        let report = build_into(&mut g, "cos(x)+1", "out").unwrap();
        assert_eq!(report.pruned.len(), 2);
        assert_eq!(g.node_count(), 4);
        assert_eq!(eval(&g, "out", 0.0, 0.0), Value::Float(2.0));
    }

    #[test]
    fn test_rebuild_keeps_other_outputs() {
        let mut g = graph();
        build_into(&mut g, "v*2", "vout").unwrap();
        build_into(&mut g, "sin(x)", "out").unwrap();

        let report = build_into(&mut g, "cos(x)*y", "out").unwrap();
        assert_eq!(report.pruned.len(), 1);
        assert_eq!(eval(&g, "vout", 0.0, 0.0), Value::Vector([2.0, 4.0, 6.0]));
        assert_eq!(eval(&g, "out", 0.0, 3.0), Value::Float(3.0));

        let again = build_into(&mut g, "cos(x)*y", "out").unwrap();
        assert!(again.pruned.is_empty());
        assert_eq!(eval(&g, "vout", 0.0, 0.0), Value::Vector([2.0, 4.0, 6.0]));
    }

    #[test]
    fn test_unknown_variable_touches_nothing() {
        let mut g = graph();
        let nodes = g.node_count();
        let err = build_into(&mut g, "sin(z)+x", "out").unwrap_err();
        assert_eq!(err, BuildError::UnknownVariable("z".into()));
        assert_eq!(g.node_count(), nodes);
    }

    #[test]
    fn test_arity_errors() {
        let mut g = graph();
        assert_eq!(
            build_into(&mut g, "clamp(x)", "out").unwrap_err().to_string(),
            "Function 'clamp' needs 2 more Params"
        );
        assert_eq!(
            build_into(&mut g, "sin(x,y)", "out").unwrap_err().to_string(),
            "Function 'sin' received Extra Params"
        );
    }

    #[test]
    fn test_failure_cleanses_created_nodes() {
        let mut g = graph();
        let nodes = g.node_count();
        let err = build_into(&mut g, "sin(add(v,x)*2)", "out").unwrap_err();
        assert!(matches!(err, BuildError::Function(_)), "{err}");
        assert_eq!(g.node_count(), nodes);
    }

    #[test]
    fn test_tuples() {
        let mut g = graph();
        build_into(&mut g, "add(v,(1,0,0))", "vout").unwrap();
        assert_eq!(eval(&g, "vout", 0.0, 0.0), Value::Vector([2.0, 2.0, 3.0]));

        let mut g = graph();
        build_into(&mut g, "mult(v,(x,y,1))", "vout").unwrap();
        assert_eq!(g.count_kind(NodeKind::CombineXyz), 1);
        assert_eq!(eval(&g, "vout", 2.0, 3.0), Value::Vector([2.0, 6.0, 3.0]));

        let mut g = graph();
        assert_eq!(
            build_into(&mut g, "add(v,(1,2))", "vout").unwrap_err(),
            BuildError::WrongTupleSyntax
        );
    }

    #[test]
    fn test_bare_roots() {
        let mut g = graph();
        let report = build_into(&mut g, "x", "out").unwrap();
        assert!(report.nodes.created.is_empty());
        assert_eq!(eval(&g, "out", 4.0, 0.0), Value::Float(4.0));

        let mut g = graph();
        build_into(&mut g, "2.5", "out").unwrap();
        assert_eq!(g.count_kind(NodeKind::Value), 1);
        assert_eq!(eval(&g, "out", 0.0, 0.0), Value::Float(2.5));

        let mut g = graph();
        build_into(&mut g, "(1,2,x)", "vout").unwrap();
        assert_eq!(eval(&g, "vout", 3.0, 0.0), Value::Vector([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_bound_constant() {
        let mut g = graph();
        let (y, _) = g.interface_input("y").unwrap();
        let (out, _) = g.interface_output("out").unwrap();
        let (x, _) = g.interface_input("x").unwrap();
        let bindings = Bindings::new(out).bind("x", x).bind_constant("2", y);
        let ir = transform("x*2+2.5").unwrap().ir;
        build(&ir, &bindings, &mut g, &BuildOptions::default()).unwrap();
        assert_eq!(eval(&g, "out", 3.0, 10.0), Value::Float(32.5));
    }

    #[test]
    fn test_build_text() {
        let mut g = graph();
        let bindings = Bindings::for_interface(&g, "out").unwrap();
        build_text("add(mult(x, 2), 1)", &bindings, &mut g, &BuildOptions::default()).unwrap();
        assert_eq!(eval(&g, "out", 1.0, 0.0), Value::Float(3.0));

        assert_eq!(
            build_text("x+1", &bindings, &mut g, &BuildOptions::default()),
            Err(BuildError::Execution)
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut g = graph();
        let ir = transform("sin(sin(sin(sin(x))))").unwrap().ir;
        let bindings = Bindings::for_interface(&g, "out").unwrap();
        let options = BuildOptions {
            max_depth: 3,
            ..BuildOptions::default()
        };
        assert_eq!(build(&ir, &bindings, &mut g, &options), Err(BuildError::TooLarge));
    }
}
