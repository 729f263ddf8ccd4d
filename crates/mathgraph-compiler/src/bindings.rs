//! What identifiers, constants and the result are wired to.

use indexmap::IndexMap;
use mathgraph_graph::{GraphBackend, InputRef, OutputRef};

use crate::error::BuildError;

/// Sockets an expression reads from and writes to.
///
/// Identifiers resolve through explicit bindings first; when built with
/// [`Bindings::for_interface`], any other identifier falls back to the
/// interface input of the same name. Constants resolve by their exact
/// source text, so binding `"2"` does not capture `"2.5"`.
#[derive(Debug, Clone)]
pub struct Bindings {
    variables: IndexMap<String, OutputRef>,
    constants: IndexMap<String, OutputRef>,
    sink: InputRef,
    interface_fallback: bool,
}

impl Bindings {
    /// Bindings writing the result into `sink`.
    pub fn new(sink: InputRef) -> Self {
        Self {
            variables: IndexMap::new(),
            constants: IndexMap::new(),
            sink,
            interface_fallback: false,
        }
    }

    /// Bindings over a graph interface: the result goes to the interface
    /// output `sink_name`, identifiers resolve to interface inputs.
    pub fn for_interface(graph: &dyn GraphBackend, sink_name: &str) -> Result<Self, BuildError> {
        let (sink, _) = graph
            .interface_output(sink_name)
            .ok_or_else(|| BuildError::UnknownOutput(sink_name.to_string()))?;
        Ok(Self {
            interface_fallback: true,
            ..Self::new(sink)
        })
    }

    /// Bind an identifier to an output.
    pub fn bind(mut self, name: impl Into<String>, output: OutputRef) -> Self {
        self.variables.insert(name.into(), output);
        self
    }

    /// Bind a constant, by its source text, to an output.
    pub fn bind_constant(mut self, text: impl Into<String>, output: OutputRef) -> Self {
        self.constants.insert(text.into(), output);
        self
    }

    /// The input the result is linked into.
    pub fn sink(&self) -> InputRef {
        self.sink
    }

    /// Output an identifier reads from.
    pub fn resolve(&self, graph: &dyn GraphBackend, name: &str) -> Option<OutputRef> {
        if let Some(output) = self.variables.get(name) {
            return Some(*output);
        }
        if self.interface_fallback {
            return graph.interface_input(name).map(|(output, _)| output);
        }
        None
    }

    /// Output a constant is bound to, if any.
    pub fn constant(&self, text: &str) -> Option<OutputRef> {
        self.constants.get(text).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgraph_graph::{MemoryGraph, NodeHandle, SocketType};

    #[test]
    fn test_explicit_bindings_win() {
        let graph = MemoryGraph::with_interface(&[("x", SocketType::Float)], &[("out", SocketType::Float)]).unwrap();
        let other = OutputRef::new(NodeHandle(99), 0);
        let bindings = Bindings::for_interface(&graph, "out").unwrap().bind("x", other);
        assert_eq!(bindings.resolve(&graph, "x"), Some(other));
        assert_eq!(bindings.resolve(&graph, "y"), None);
    }

    #[test]
    fn test_interface_fallback() {
        let graph = MemoryGraph::with_interface(&[("x", SocketType::Float)], &[("out", SocketType::Float)]).unwrap();
        let (x, _) = graph.interface_input("x").unwrap();
        let (out, _) = graph.interface_output("out").unwrap();
        let bindings = Bindings::for_interface(&graph, "out").unwrap();
        assert_eq!(bindings.resolve(&graph, "x"), Some(x));
        assert_eq!(bindings.sink(), out);

        let plain = Bindings::new(out);
        assert_eq!(plain.resolve(&graph, "x"), None);
    }

    #[test]
    fn test_constants_match_exact_text() {
        let bound = OutputRef::new(NodeHandle(7), 0);
        let bindings = Bindings::new(InputRef::new(NodeHandle(1), 0)).bind_constant("2", bound);
        assert_eq!(bindings.constant("2"), Some(bound));
        assert_eq!(bindings.constant("2.5"), None);
        assert_eq!(bindings.constant("12"), None);
    }

    #[test]
    fn test_missing_sink() {
        let graph = MemoryGraph::new();
        assert_eq!(
            Bindings::for_interface(&graph, "out").unwrap_err(),
            BuildError::UnknownOutput("out".into())
        );
    }
}
