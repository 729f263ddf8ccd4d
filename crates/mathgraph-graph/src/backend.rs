//! The interface the compiler consumes from a host node graph.
//!
//! Everything the compiler does to a graph goes through [`GraphBackend`]:
//! creating and removing nodes, tagging them, linking sockets and editing
//! the graph interface. A host binds its own node tree to this trait; the
//! crate ships [`MemoryGraph`](crate::MemoryGraph) as an in-memory
//! implementation.

use crate::error::Result;
use crate::node::NodeKind;
use crate::types::{InputRef, LinkHandle, NodeHandle, OutputRef, SocketType, Value};

/// Mutable access to a host node graph.
///
/// Handles stay valid until the node (or link) they name is removed.
pub trait GraphBackend {
    /// Create a node of the given kind with default socket values.
    fn create_node(&mut self, kind: NodeKind) -> Result<NodeHandle>;

    /// Remove a node and every link touching it.
    fn remove_node(&mut self, node: NodeHandle) -> Result<()>;

    /// Kind of an existing node.
    fn node_kind(&self, node: NodeHandle) -> Option<NodeKind>;

    /// Display name of an existing node.
    fn node_name(&self, node: NodeHandle) -> Option<String>;

    /// Find the node carrying `tag`.
    fn node_by_tag(&self, tag: &str) -> Option<NodeHandle>;

    /// Tag a node; the tag also becomes its name and label.
    fn set_node_tag(&mut self, node: NodeHandle, tag: &str) -> Result<()>;

    /// Every tagged node, in creation order.
    fn tagged_nodes(&self) -> Vec<(String, NodeHandle)>;

    /// Add an interface input; returns the matching group-input output.
    fn new_input_socket(&mut self, name: &str, ty: SocketType) -> Result<OutputRef>;

    /// Add an interface output; returns the matching group-output input.
    fn new_output_socket(&mut self, name: &str, ty: SocketType) -> Result<InputRef>;

    /// Remove an interface socket (input or output) by name.
    fn remove_socket(&mut self, name: &str) -> Result<()>;

    /// Look up an interface input by name.
    fn interface_input(&self, name: &str) -> Option<(OutputRef, SocketType)>;

    /// Look up an interface output by name.
    fn interface_output(&self, name: &str) -> Option<(InputRef, SocketType)>;

    /// Every interface output, in interface order.
    fn interface_outputs(&self) -> Vec<(String, InputRef, SocketType)>;

    /// Type of an output socket.
    fn output_type(&self, output: OutputRef) -> Option<SocketType>;

    /// Type of an input socket.
    fn input_type(&self, input: InputRef) -> Option<SocketType>;

    /// Constant value of an input socket.
    fn socket_default(&self, input: InputRef) -> Option<Value>;

    /// Set the constant value of an input socket.
    fn set_socket_default(&mut self, input: InputRef, value: Value) -> Result<()>;

    /// Link an output to an input, replacing any link already feeding it.
    fn link(&mut self, from: OutputRef, to: InputRef) -> Result<LinkHandle>;

    /// Remove a link.
    fn unlink(&mut self, link: LinkHandle) -> Result<()>;

    /// The link feeding an input, with its source.
    fn incoming_link(&self, input: InputRef) -> Option<(LinkHandle, OutputRef)>;

    /// Currently active node.
    fn active_node(&self) -> Option<NodeHandle>;

    /// Make a node active (or clear the active node).
    fn set_active_node(&mut self, node: Option<NodeHandle>);

    /// Editor location of a node.
    fn node_location(&self, node: NodeHandle) -> Option<[f32; 2]>;

    /// Move a node in the editor.
    fn set_node_location(&mut self, node: NodeHandle, location: [f32; 2]) -> Result<()>;

    /// Flag a node as owned by the compiler.
    fn mark_automated(&mut self, node: NodeHandle) -> Result<()>;
}
