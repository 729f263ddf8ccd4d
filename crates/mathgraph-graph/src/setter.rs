//! Incremental node cache.
//!
//! [`NodeSetter`] is the only way compiled code touches a graph. Each node it
//! hands out is keyed by a [`Tag`]; asking for a tag that already exists
//! returns the existing node with its constants refreshed, so recompiling an
//! unchanged expression leaves the graph as it was.
//!
//! One setter lives for one compile pass. It records what it created,
//! refreshed and reused, which is what the caller needs both for its report
//! and to roll the graph back when a later step fails.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::backend::GraphBackend;
use crate::error::{GraphError, Result};
use crate::node::NodeKind;
use crate::tag::{Tag, FLOAT_IDENTITY, VECTOR_IDENTITY};
use crate::types::{InputRef, NodeHandle, Operand, OutputRef, SocketType, Value};

/// Default horizontal distance between a new node and the active node.
pub const DEFAULT_NODE_SPACING: f32 = 200.0;

/// What a pass did to the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetterReport {
    /// Nodes created this pass.
    pub created: Vec<NodeHandle>,
    /// Existing nodes whose constants changed.
    pub updated: Vec<NodeHandle>,
    /// Existing nodes used unchanged.
    pub reused: Vec<NodeHandle>,
    /// Nodes removed (kind changed, pruned, or rolled back).
    pub removed: Vec<NodeHandle>,
    /// Links created.
    pub links_created: usize,
}

impl SetterReport {
    /// Whether the pass left the graph untouched.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
            && self.updated.is_empty()
            && self.removed.is_empty()
            && self.links_created == 0
    }
}

/// Tag-keyed node cache over a borrowed graph.
pub struct NodeSetter<'g> {
    graph: &'g mut dyn GraphBackend,
    cache: HashMap<Tag, NodeHandle>,
    occurrences: HashMap<Tag, usize>,
    touched: HashSet<NodeHandle>,
    report: SetterReport,
    spacing: f32,
}

impl<'g> NodeSetter<'g> {
    /// Start a pass over `graph`.
    pub fn new(graph: &'g mut dyn GraphBackend) -> Self {
        Self {
            graph,
            cache: HashMap::new(),
            occurrences: HashMap::new(),
            touched: HashSet::new(),
            report: SetterReport::default(),
            spacing: DEFAULT_NODE_SPACING,
        }
    }

    /// Set the distance new nodes keep from the active node.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Read access to the graph.
    pub fn graph(&self) -> &dyn GraphBackend {
        &*self.graph
    }

    /// Write access to the graph, bypassing the cache.
    pub fn graph_mut(&mut self) -> &mut dyn GraphBackend {
        &mut *self.graph
    }

    /// What the pass has done so far.
    pub fn report(&self) -> &SetterReport {
        &self.report
    }

    /// End the pass.
    pub fn finish(self) -> SetterReport {
        self.report
    }

    /// Identity of an operand for tag derivation.
    ///
    /// Literals contribute only their type; sockets contribute the name of
    /// the producing node (its tag, once tagged) and the output position.
    pub fn operand_identity(&self, operand: &Operand) -> String {
        match operand {
            Operand::Float(_) => FLOAT_IDENTITY.to_string(),
            Operand::Vector(_) => VECTOR_IDENTITY.to_string(),
            Operand::Socket(output) => {
                let name = self
                    .graph
                    .node_name(output.node)
                    .unwrap_or_else(|| output.node.to_string());
                format!("{}:{}", name, output.index)
            }
        }
    }

    /// Next tag for `function` applied to operands with these identities.
    ///
    /// Repeats of the same key in one pass get an occurrence suffix, so two
    /// call sites never share a node.
    pub fn next_tag<S: AsRef<str>>(&mut self, function: &str, identities: &[S]) -> Tag {
        let base = Tag::derive(function, identities);
        let count = self.occurrences.entry(base.clone()).or_insert(0);
        let tag = base.with_occurrence(*count);
        *count += 1;
        tag
    }

    /// Next tag for `function` applied to `operands`.
    pub fn tag_for(&mut self, function: &str, operands: &[Operand]) -> Tag {
        let identities: Vec<String> = operands.iter().map(|op| self.operand_identity(op)).collect();
        self.next_tag(function, &identities)
    }

    /// Value type an operand carries.
    pub fn operand_type(&self, operand: &Operand) -> Option<SocketType> {
        match operand {
            Operand::Float(_) => Some(SocketType::Float),
            Operand::Vector(_) => Some(SocketType::Vector),
            Operand::Socket(output) => self.graph.output_type(*output),
        }
    }

    fn lookup(&mut self, tag: &Tag) -> Option<NodeHandle> {
        if let Some(node) = self.cache.get(tag).copied() {
            if self.graph.node_kind(node).is_some() {
                return Some(node);
            }
            self.cache.remove(tag);
        }
        let node = self.graph.node_by_tag(tag.as_str())?;
        self.cache.insert(tag.clone(), node);
        Some(node)
    }

    /// Return the node tagged `tag`, creating it if needed.
    ///
    /// `operands` feed the node's inputs in order: sockets are linked,
    /// literals become socket defaults. An existing node of the same kind
    /// only has its constants refreshed; its links are left alone since a
    /// different reference would have produced a different tag.
    pub fn find_or_create(&mut self, tag: &Tag, kind: NodeKind, operands: &[Operand]) -> Result<NodeHandle> {
        let expected = kind.inputs().len();
        if operands.len() != expected {
            return Err(GraphError::OperandCount {
                kind,
                expected,
                found: operands.len(),
            });
        }

        if let Some(node) = self.lookup(tag) {
            if self.graph.node_kind(node) == Some(kind) {
                let changed = self.refresh_constants(node, operands)?;
                self.graph.mark_automated(node)?;
                self.touched.insert(node);
                if changed {
                    trace!(%tag, %node, "refreshed constants");
                    self.report.updated.push(node);
                } else {
                    trace!(%tag, %node, "reused");
                    self.report.reused.push(node);
                }
                return Ok(node);
            }

            debug!(%tag, %node, %kind, "node kind changed, recreating");
            self.graph.remove_node(node)?;
            self.cache.remove(tag);
            self.report.removed.push(node);
        }

        self.create(tag, kind, operands)
    }

    fn create(&mut self, tag: &Tag, kind: NodeKind, operands: &[Operand]) -> Result<NodeHandle> {
        let node = self.graph.create_node(kind)?;
        self.report.created.push(node);
        self.touched.insert(node);

        let location = self
            .graph
            .active_node()
            .and_then(|active| self.graph.node_location(active))
            .map(|[x, y]| [x + self.spacing, y])
            .unwrap_or([0.0, 0.0]);
        self.graph.set_node_location(node, location)?;
        self.graph.set_node_tag(node, tag.as_str())?;

        for (index, operand) in operands.iter().enumerate() {
            let input = InputRef::new(node, index);
            match operand {
                Operand::Socket(output) => {
                    self.graph.link(*output, input)?;
                    self.report.links_created += 1;
                }
                _ => {
                    if let Some(value) = operand.constant() {
                        let value = self.coerce(input, value)?;
                        self.graph.set_socket_default(input, value)?;
                    }
                }
            }
        }

        self.graph.mark_automated(node)?;
        self.graph.set_active_node(Some(node));
        self.cache.insert(tag.clone(), node);
        trace!(%tag, %node, %kind, "created");
        Ok(node)
    }

    fn coerce(&self, input: InputRef, value: Value) -> Result<Value> {
        let ty = self.graph.input_type(input).ok_or(GraphError::UnknownInput(input))?;
        match (value.socket_type(), ty) {
            (SocketType::Vector, SocketType::Float) => Err(GraphError::ConstantType {
                expected: ty,
                found: SocketType::Vector,
            }),
            _ => Ok(value.convert(ty)),
        }
    }

    fn refresh_constants(&mut self, node: NodeHandle, operands: &[Operand]) -> Result<bool> {
        let mut changed = false;
        for (index, operand) in operands.iter().enumerate() {
            let Some(value) = operand.constant() else {
                continue;
            };
            let input = InputRef::new(node, index);
            let value = self.coerce(input, value)?;
            if self.graph.socket_default(input) != Some(value) {
                self.graph.set_socket_default(input, value)?;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Link `from` into `to` unless that exact link already exists.
    ///
    /// Returns whether a link was made.
    pub fn link_output(&mut self, from: OutputRef, to: InputRef) -> Result<bool> {
        if let Some((_, source)) = self.graph.incoming_link(to) {
            if source == from {
                return Ok(false);
            }
        }
        self.graph.link(from, to)?;
        self.report.links_created += 1;
        Ok(true)
    }

    /// Set a constant on an input, dropping whatever was linked into it.
    ///
    /// Returns whether anything changed.
    pub fn set_constant(&mut self, input: InputRef, value: Value) -> Result<bool> {
        let mut changed = false;
        if let Some((link, _)) = self.graph.incoming_link(input) {
            self.graph.unlink(link)?;
            changed = true;
        }
        let value = self.coerce(input, value)?;
        if self.graph.socket_default(input) != Some(value) {
            self.graph.set_socket_default(input, value)?;
            changed = true;
        }
        Ok(changed)
    }

    /// Remove every node created in this pass.
    ///
    /// Returns how many were removed.
    pub fn cleanse(&mut self) -> usize {
        let created = std::mem::take(&mut self.report.created);
        let mut removed = 0;
        for node in created.into_iter().rev() {
            if self.graph.remove_node(node).is_ok() {
                self.touched.remove(&node);
                self.report.removed.push(node);
                removed += 1;
            }
        }
        self.cache.retain(|_, node| !self.report.removed.contains(node));
        debug!(removed, "cleansed nodes created this pass");
        removed
    }

    /// Nodes some interface output depends on, through any chain of links.
    pub fn live_nodes(&self) -> HashSet<NodeHandle> {
        let mut live = HashSet::new();
        let mut pending: Vec<InputRef> = self
            .graph
            .interface_outputs()
            .into_iter()
            .map(|(_, input, _)| input)
            .collect();
        while let Some(input) = pending.pop() {
            let Some((_, source)) = self.graph.incoming_link(input) else {
                continue;
            };
            if !live.insert(source.node) {
                continue;
            }
            let inputs = self.graph.node_kind(source.node).map_or(0, |kind| kind.inputs().len());
            pending.extend((0..inputs).map(|index| InputRef::new(source.node, index)));
        }
        live
    }

    /// Remove tagged nodes this pass did not touch and no interface output
    /// depends on.
    ///
    /// Nodes feeding other outputs, whoever built them, stay. Returns the
    /// tags that were pruned.
    pub fn prune_stale(&mut self) -> Result<Vec<String>> {
        let live = self.live_nodes();
        let mut pruned = Vec::new();
        for (tag, node) in self.graph.tagged_nodes() {
            if self.touched.contains(&node) || live.contains(&node) {
                continue;
            }
            self.graph.remove_node(node)?;
            self.report.removed.push(node);
            pruned.push(tag);
        }
        self.cache.retain(|_, node| !self.report.removed.contains(node));
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "pruned stale nodes");
        }
        Ok(pruned)
    }
}
