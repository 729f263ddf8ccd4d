//! Integration test harness for mathgraph.
//!
//! This crate provides utilities for end-to-end testing of the full
//! pipeline: Sanitize → Transform → Build → Evaluate, and of symbolic
//! scripts run against the same in-memory graph.

use indexmap::IndexMap;
use mathgraph::{
    compile_to_graph, make_symbolic_namespace, Bindings, CompileError, CompileOptions, CompileReport,
    GraphBackend, MemoryGraph, Namespace, NodeContext, SetterReport, SocketType, SocketTypeError, Value,
};

/// Name of the default output socket.
pub const OUT: &str = "out";

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A graph with a fixed interface plus the input values to evaluate it with.
pub struct TestHarness {
    graph: MemoryGraph,
    options: CompileOptions,
    inputs: IndexMap<String, Value>,
}

impl TestHarness {
    /// Create a harness over a fresh graph with the given interface.
    ///
    /// # Panics
    ///
    /// Panics if the interface has duplicate socket names.
    pub fn new(inputs: &[(&str, SocketType)], outputs: &[(&str, SocketType)]) -> Self {
        init_tracing();
        let graph = MemoryGraph::with_interface(inputs, outputs).expect("interface creation failed");
        Self {
            graph,
            options: CompileOptions::default(),
            inputs: IndexMap::new(),
        }
    }

    /// Scalar inputs named `names`, one scalar output [`OUT`].
    pub fn scalar(names: &[&str]) -> Self {
        let inputs: Vec<(&str, SocketType)> = names.iter().map(|n| (*n, SocketType::Float)).collect();
        Self::new(&inputs, &[(OUT, SocketType::Float)])
    }

    /// Replace the compile options.
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile `raw` into [`OUT`].
    pub fn compile(&mut self, raw: &str) -> Result<CompileReport, CompileError> {
        self.compile_into(raw, OUT)
    }

    /// Compile `raw` into the output socket `sink`.
    ///
    /// # Panics
    ///
    /// Panics if the graph has no output called `sink`.
    pub fn compile_into(&mut self, raw: &str, sink: &str) -> Result<CompileReport, CompileError> {
        let bindings = Bindings::for_interface(&self.graph, sink).expect("sink socket missing");
        compile_to_graph(raw, &self.options, &bindings, &mut self.graph)
    }

    /// Run a symbolic script as one pass; a failing script leaves no
    /// nodes behind.
    pub fn script<F>(&mut self, script: F) -> Result<SetterReport, SocketTypeError>
    where
        F: for<'g> FnOnce(&Namespace<'g>) -> Result<(), SocketTypeError>,
    {
        let ns = make_symbolic_namespace(NodeContext::new(&mut self.graph));
        match script(&ns) {
            Ok(()) => ns.finish(),
            Err(err) => {
                ns.abort();
                Err(err)
            }
        }
    }

    /// Set the value an input is evaluated with.
    pub fn set_input(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.inputs.insert(name.to_string(), value.into());
        self
    }

    /// Evaluate an output socket with the current inputs.
    ///
    /// # Panics
    ///
    /// Panics if evaluation fails (missing input, unknown socket, cycle).
    pub fn eval(&self, output: &str) -> Value {
        let inputs = self.inputs.iter().map(|(k, v)| (k.clone(), *v)).collect();
        self.graph
            .evaluate(output, &inputs)
            .unwrap_or_else(|e| panic!("evaluating '{}' failed: {}", output, e))
    }

    /// Evaluate [`OUT`] as a float.
    pub fn eval_scalar(&self) -> f64 {
        self.eval(OUT).as_float().expect("output is not a float")
    }

    /// Tags of every node the compiler manages, in creation order.
    pub fn tags(&self) -> Vec<String> {
        self.graph.tagged_nodes().into_iter().map(|(tag, _)| tag).collect()
    }

    /// The underlying graph.
    pub fn graph(&self) -> &MemoryGraph {
        &self.graph
    }

    /// Mutable access for tests that edit the graph by hand.
    pub fn graph_mut(&mut self) -> &mut MemoryGraph {
        &mut self.graph
    }
}
