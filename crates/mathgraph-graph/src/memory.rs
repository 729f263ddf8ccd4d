//! In-memory graph backend.
//!
//! [`MemoryGraph`] implements [`GraphBackend`] with plain collections and can
//! evaluate its own outputs, which lets tests check that a compiled graph
//! computes what the expression says.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::backend::GraphBackend;
use crate::error::{GraphError, Result};
use crate::node::NodeKind;
use crate::types::{InputRef, LinkHandle, NodeHandle, OutputRef, SocketType, Value};

/// A socket stored on a [`MemoryNode`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySocket {
    /// Display name (interface sockets use their interface name).
    pub name: String,
    /// Value type.
    pub ty: SocketType,
    /// Constant used when nothing is linked.
    pub default: Value,
}

impl MemorySocket {
    fn new(name: impl Into<String>, ty: SocketType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: Value::zero(ty),
        }
    }
}

/// A node stored in a [`MemoryGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    /// Node kind.
    pub kind: NodeKind,
    /// Unique display name.
    pub name: String,
    /// Label shown in the editor.
    pub label: String,
    /// Compiler tag, if any.
    pub tag: Option<String>,
    /// Editor location.
    pub location: [f32; 2],
    /// Input sockets.
    pub inputs: Vec<MemorySocket>,
    /// Output sockets.
    pub outputs: Vec<MemorySocket>,
    /// Whether the compiler owns this node.
    pub automated: bool,
}

/// A link stored in a [`MemoryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLink {
    /// Source output.
    pub from: OutputRef,
    /// Target input.
    pub to: InputRef,
}

/// Node graph held entirely in memory.
///
/// Starts with one group-input and one group-output node; interface sockets
/// are added with [`GraphBackend::new_input_socket`] and
/// [`GraphBackend::new_output_socket`].
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    nodes: IndexMap<NodeHandle, MemoryNode>,
    links: IndexMap<LinkHandle, MemoryLink>,
    next_node: u32,
    next_link: u32,
    name_counts: HashMap<String, usize>,
    group_input: NodeHandle,
    group_output: NodeHandle,
    active: Option<NodeHandle>,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraph {
    /// Create a graph holding only the interface nodes.
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: IndexMap::new(),
            links: IndexMap::new(),
            next_node: 0,
            next_link: 0,
            name_counts: HashMap::new(),
            group_input: NodeHandle(0),
            group_output: NodeHandle(0),
            active: None,
        };
        graph.group_input = graph.insert_node(NodeKind::GroupInput, [-400.0, 0.0]);
        graph.group_output = graph.insert_node(NodeKind::GroupOutput, [400.0, 0.0]);
        graph
    }

    /// Create a graph with the given interface.
    pub fn with_interface(inputs: &[(&str, SocketType)], outputs: &[(&str, SocketType)]) -> Result<Self> {
        let mut graph = Self::new();
        for (name, ty) in inputs {
            graph.new_input_socket(name, *ty)?;
        }
        for (name, ty) in outputs {
            graph.new_output_socket(name, *ty)?;
        }
        Ok(graph)
    }

    /// The group-input node.
    pub fn group_input(&self) -> NodeHandle {
        self.group_input
    }

    /// The group-output node.
    pub fn group_output(&self) -> NodeHandle {
        self.group_output
    }

    /// Number of nodes, interface nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Look at a node.
    pub fn node(&self, node: NodeHandle) -> Option<&MemoryNode> {
        self.nodes.get(&node)
    }

    /// Every node, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &MemoryNode)> {
        self.nodes.iter().map(|(h, n)| (*h, n))
    }

    /// Every link, in creation order.
    pub fn links(&self) -> impl Iterator<Item = &MemoryLink> {
        self.links.values()
    }

    /// Count nodes of one kind.
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    fn insert_node(&mut self, kind: NodeKind, location: [f32; 2]) -> NodeHandle {
        let handle = NodeHandle(self.next_node);
        self.next_node += 1;

        let label = kind.default_label();
        let count = self.name_counts.entry(label.clone()).or_insert(0);
        let name = if *count == 0 {
            label.clone()
        } else {
            format!("{}.{:03}", label, count)
        };
        *count += 1;

        let inputs = kind
            .inputs()
            .into_iter()
            .map(|spec| MemorySocket::new(spec.name, spec.ty))
            .collect();
        let outputs = kind
            .outputs()
            .into_iter()
            .map(|spec| MemorySocket::new(spec.name, spec.ty))
            .collect();

        self.nodes.insert(
            handle,
            MemoryNode {
                kind,
                name,
                label,
                tag: None,
                location,
                inputs,
                outputs,
                automated: false,
            },
        );
        handle
    }

    fn node_mut(&mut self, node: NodeHandle) -> Result<&mut MemoryNode> {
        self.nodes.get_mut(&node).ok_or(GraphError::UnknownNode(node))
    }

    fn input_socket(&self, input: InputRef) -> Result<&MemorySocket> {
        let node = self.nodes.get(&input.node).ok_or(GraphError::UnknownNode(input.node))?;
        node.inputs.get(input.index).ok_or(GraphError::UnknownInput(input))
    }

    fn output_socket(&self, output: OutputRef) -> Result<&MemorySocket> {
        let node = self.nodes.get(&output.node).ok_or(GraphError::UnknownNode(output.node))?;
        node.outputs.get(output.index).ok_or(GraphError::UnknownOutput(output))
    }

    /// Whether `target` is reachable upstream from `start`.
    fn feeds(&self, start: NodeHandle, target: NodeHandle) -> bool {
        let mut stack = vec![start];
        let mut seen = Vec::new();
        while let Some(node) = stack.pop() {
            if node == target {
                return true;
            }
            if seen.contains(&node) {
                continue;
            }
            seen.push(node);
            stack.extend(self.links.values().filter(|l| l.to.node == node).map(|l| l.from.node));
        }
        false
    }

    /// Evaluate the value flowing into an interface output.
    ///
    /// `inputs` supplies the interface input values by name.
    pub fn evaluate(&self, output_name: &str, inputs: &HashMap<String, Value>) -> Result<Value> {
        let (input, ty) = self
            .interface_output(output_name)
            .ok_or_else(|| GraphError::UnknownSocket(output_name.to_string()))?;
        let mut memo = HashMap::new();
        Ok(self.evaluate_input(input, inputs, &mut memo, 0)?.convert(ty))
    }

    /// Evaluate one output socket.
    pub fn evaluate_output(&self, output: OutputRef, inputs: &HashMap<String, Value>) -> Result<Value> {
        let mut memo = HashMap::new();
        self.evaluate_socket(output, inputs, &mut memo, 0)
    }

    fn evaluate_input(
        &self,
        input: InputRef,
        inputs: &HashMap<String, Value>,
        memo: &mut HashMap<NodeHandle, Vec<Value>>,
        depth: usize,
    ) -> Result<Value> {
        let socket = self.input_socket(input)?;
        match self.incoming_link(input) {
            Some((_, from)) => Ok(self.evaluate_socket(from, inputs, memo, depth + 1)?.convert(socket.ty)),
            None => Ok(socket.default),
        }
    }

    fn evaluate_socket(
        &self,
        output: OutputRef,
        inputs: &HashMap<String, Value>,
        memo: &mut HashMap<NodeHandle, Vec<Value>>,
        depth: usize,
    ) -> Result<Value> {
        if depth > self.nodes.len() {
            return Err(GraphError::Cycle(output.node));
        }
        let socket = self.output_socket(output)?;

        if output.node == self.group_input {
            return inputs
                .get(&socket.name)
                .map(|v| v.convert(socket.ty))
                .ok_or_else(|| GraphError::MissingInput(socket.name.clone()));
        }

        if let Some(values) = memo.get(&output.node) {
            if let Some(value) = values.get(output.index) {
                return Ok(*value);
            }
        }

        let node = self.nodes.get(&output.node).ok_or(GraphError::UnknownNode(output.node))?;
        let mut args = Vec::with_capacity(node.inputs.len());
        for index in 0..node.inputs.len() {
            args.push(self.evaluate_input(InputRef::new(output.node, index), inputs, memo, depth)?);
        }
        let values = node.kind.evaluate(&args);
        let value = values
            .get(output.index)
            .copied()
            .ok_or(GraphError::UnknownOutput(output))?;
        memo.insert(output.node, values);
        Ok(value)
    }
}

impl GraphBackend for MemoryGraph {
    fn create_node(&mut self, kind: NodeKind) -> Result<NodeHandle> {
        if kind.is_interface() {
            return Err(GraphError::ProtectedNode(self.group_input));
        }
        let node = self.insert_node(kind, [0.0, 0.0]);
        tracing::trace!(%node, %kind, "create node");
        Ok(node)
    }

    fn remove_node(&mut self, node: NodeHandle) -> Result<()> {
        if node == self.group_input || node == self.group_output {
            return Err(GraphError::ProtectedNode(node));
        }
        self.nodes.shift_remove(&node).ok_or(GraphError::UnknownNode(node))?;
        self.links.retain(|_, l| l.from.node != node && l.to.node != node);
        if self.active == Some(node) {
            self.active = None;
        }
        tracing::trace!(%node, "remove node");
        Ok(())
    }

    fn node_kind(&self, node: NodeHandle) -> Option<NodeKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    fn node_name(&self, node: NodeHandle) -> Option<String> {
        self.nodes.get(&node).map(|n| n.name.clone())
    }

    fn node_by_tag(&self, tag: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, n)| n.tag.as_deref() == Some(tag))
            .map(|(h, _)| *h)
    }

    fn set_node_tag(&mut self, node: NodeHandle, tag: &str) -> Result<()> {
        let entry = self.node_mut(node)?;
        entry.tag = Some(tag.to_string());
        entry.name = tag.to_string();
        entry.label = tag.to_string();
        Ok(())
    }

    fn tagged_nodes(&self) -> Vec<(String, NodeHandle)> {
        self.nodes
            .iter()
            .filter_map(|(h, n)| n.tag.clone().map(|t| (t, *h)))
            .collect()
    }

    fn new_input_socket(&mut self, name: &str, ty: SocketType) -> Result<OutputRef> {
        if self.interface_input(name).is_some() {
            return Err(GraphError::DuplicateSocket(name.to_string()));
        }
        let group_input = self.group_input;
        let node = self.node_mut(group_input)?;
        node.outputs.push(MemorySocket::new(name, ty));
        Ok(OutputRef::new(group_input, node.outputs.len() - 1))
    }

    fn new_output_socket(&mut self, name: &str, ty: SocketType) -> Result<InputRef> {
        if self.interface_output(name).is_some() {
            return Err(GraphError::DuplicateSocket(name.to_string()));
        }
        let group_output = self.group_output;
        let node = self.node_mut(group_output)?;
        node.inputs.push(MemorySocket::new(name, ty));
        Ok(InputRef::new(group_output, node.inputs.len() - 1))
    }

    fn remove_socket(&mut self, name: &str) -> Result<()> {
        if let Some((output, _)) = self.interface_input(name) {
            let group_input = self.group_input;
            self.node_mut(group_input)?.outputs.remove(output.index);
            self.links
                .retain(|_, l| !(l.from.node == group_input && l.from.index == output.index));
            for link in self.links.values_mut() {
                if link.from.node == group_input && link.from.index > output.index {
                    link.from.index -= 1;
                }
            }
            return Ok(());
        }
        if let Some((input, _)) = self.interface_output(name) {
            let group_output = self.group_output;
            self.node_mut(group_output)?.inputs.remove(input.index);
            self.links
                .retain(|_, l| !(l.to.node == group_output && l.to.index == input.index));
            for link in self.links.values_mut() {
                if link.to.node == group_output && link.to.index > input.index {
                    link.to.index -= 1;
                }
            }
            return Ok(());
        }
        Err(GraphError::UnknownSocket(name.to_string()))
    }

    fn interface_input(&self, name: &str) -> Option<(OutputRef, SocketType)> {
        let node = self.nodes.get(&self.group_input)?;
        node.outputs
            .iter()
            .position(|s| s.name == name)
            .map(|index| (OutputRef::new(self.group_input, index), node.outputs[index].ty))
    }

    fn interface_output(&self, name: &str) -> Option<(InputRef, SocketType)> {
        let node = self.nodes.get(&self.group_output)?;
        node.inputs
            .iter()
            .position(|s| s.name == name)
            .map(|index| (InputRef::new(self.group_output, index), node.inputs[index].ty))
    }

    fn interface_outputs(&self) -> Vec<(String, InputRef, SocketType)> {
        let Some(node) = self.nodes.get(&self.group_output) else {
            return Vec::new();
        };
        node.inputs
            .iter()
            .enumerate()
            .map(|(index, s)| (s.name.clone(), InputRef::new(self.group_output, index), s.ty))
            .collect()
    }

    fn output_type(&self, output: OutputRef) -> Option<SocketType> {
        self.output_socket(output).ok().map(|s| s.ty)
    }

    fn input_type(&self, input: InputRef) -> Option<SocketType> {
        self.input_socket(input).ok().map(|s| s.ty)
    }

    fn socket_default(&self, input: InputRef) -> Option<Value> {
        self.input_socket(input).ok().map(|s| s.default)
    }

    fn set_socket_default(&mut self, input: InputRef, value: Value) -> Result<()> {
        let node = self.node_mut(input.node)?;
        let socket = node
            .inputs
            .get_mut(input.index)
            .ok_or(GraphError::UnknownInput(input))?;
        if socket.ty == SocketType::Float && value.socket_type() == SocketType::Vector {
            return Err(GraphError::ConstantType {
                expected: socket.ty,
                found: value.socket_type(),
            });
        }
        socket.default = value.convert(socket.ty);
        Ok(())
    }

    fn link(&mut self, from: OutputRef, to: InputRef) -> Result<LinkHandle> {
        self.output_socket(from)?;
        self.input_socket(to)?;
        if self.feeds(from.node, to.node) {
            return Err(GraphError::Cycle(to.node));
        }
        if let Some((existing, _)) = self.incoming_link(to) {
            self.links.shift_remove(&existing);
        }
        let handle = LinkHandle(self.next_link);
        self.next_link += 1;
        self.links.insert(handle, MemoryLink { from, to });
        tracing::trace!(from = %from.node, to = %to.node, index = to.index, "link");
        Ok(handle)
    }

    fn unlink(&mut self, link: LinkHandle) -> Result<()> {
        self.links.shift_remove(&link).map(|_| ()).ok_or(GraphError::UnknownLink)
    }

    fn incoming_link(&self, input: InputRef) -> Option<(LinkHandle, OutputRef)> {
        self.links
            .iter()
            .find(|(_, l)| l.to == input)
            .map(|(h, l)| (*h, l.from))
    }

    fn active_node(&self) -> Option<NodeHandle> {
        self.active
    }

    fn set_active_node(&mut self, node: Option<NodeHandle>) {
        self.active = node.filter(|n| self.nodes.contains_key(n));
    }

    fn node_location(&self, node: NodeHandle) -> Option<[f32; 2]> {
        self.nodes.get(&node).map(|n| n.location)
    }

    fn set_node_location(&mut self, node: NodeHandle, location: [f32; 2]) -> Result<()> {
        self.node_mut(node)?.location = location;
        Ok(())
    }

    fn mark_automated(&mut self, node: NodeHandle) -> Result<()> {
        self.node_mut(node)?.automated = true;
        Ok(())
    }
}
