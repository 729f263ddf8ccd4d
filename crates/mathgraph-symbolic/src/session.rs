//! Per-pass state shared by a namespace and every value it hands out.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use mathgraph_graph::{GraphBackend, NodeHandle, NodeSetter, OutputRef, DEFAULT_NODE_SPACING};

use crate::kind::ValueKind;

/// The graph a symbolic pass builds into.
pub struct NodeContext<'g> {
    /// Graph being built.
    pub graph: &'g mut dyn GraphBackend,
    /// Horizontal distance between a new node and the active node.
    pub node_spacing: f32,
    /// Remove tagged nodes no output depends on when the pass finishes.
    pub prune_stale: bool,
}

impl<'g> NodeContext<'g> {
    /// Context over `graph` with default spacing.
    pub fn new(graph: &'g mut dyn GraphBackend) -> Self {
        Self {
            graph,
            node_spacing: DEFAULT_NODE_SPACING,
            prune_stale: false,
        }
    }

    /// Prune stale tagged nodes on [`Namespace::finish`](crate::Namespace::finish).
    pub fn with_prune_stale(mut self, prune_stale: bool) -> Self {
        self.prune_stale = prune_stale;
        self
    }
}

pub(crate) type SharedSession<'g> = Rc<RefCell<Session<'g>>>;

/// Node setter plus the counters that name anonymous values.
pub(crate) struct Session<'g> {
    pub(crate) setter: NodeSetter<'g>,
    pub(crate) prune_stale: bool,
    counters: [u32; 3],
    separators: HashMap<OutputRef, NodeHandle>,
}

impl<'g> Session<'g> {
    pub(crate) fn shared(context: NodeContext<'g>) -> SharedSession<'g> {
        Rc::new(RefCell::new(Self {
            setter: NodeSetter::new(context.graph).with_spacing(context.node_spacing),
            prune_stale: context.prune_stale,
            counters: [0; 3],
            separators: HashMap::new(),
        }))
    }

    /// Next instance id for `kind`.
    pub(crate) fn next_id(&mut self, kind: ValueKind) -> u32 {
        let counter = &mut self.counters[kind.index()];
        *counter += 1;
        *counter
    }

    /// Separate node already built for `vector` in this pass.
    pub(crate) fn separator(&self, vector: OutputRef) -> Option<NodeHandle> {
        self.separators.get(&vector).copied()
    }

    pub(crate) fn remember_separator(&mut self, vector: OutputRef, node: NodeHandle) {
        self.separators.insert(vector, node);
    }
}
