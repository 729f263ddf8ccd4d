//! Operand checks shared by every function builder.

use mathgraph_graph::{NodeHandle, NodeSetter, Operand, OutputRef, SocketType};

use crate::{FunctionDescriptor, FunctionError, Result};

/// Fail unless exactly `found` operands fit the descriptor.
pub fn check_arity(desc: &FunctionDescriptor, found: usize) -> Result<()> {
    let expected = desc.arity();
    if found < expected {
        return Err(FunctionError::MissingParams {
            function: desc.name.to_string(),
            missing: expected - found,
        });
    }
    if found > expected {
        return Err(FunctionError::ExtraParams {
            function: desc.name.to_string(),
        });
    }
    Ok(())
}

/// Fail on the first vector-typed operand.
pub fn check_scalar(desc: &FunctionDescriptor, setter: &NodeSetter<'_>, operands: &[Operand]) -> Result<()> {
    for (index, operand) in operands.iter().enumerate() {
        if setter.operand_type(operand) == Some(SocketType::Vector) {
            return Err(FunctionError::InvalidOperand {
                function: desc.name.to_string(),
                position: index + 1,
                param: desc.params.get(index).copied().unwrap_or("?").to_string(),
                found: SocketType::Vector.to_string(),
            });
        }
    }
    Ok(())
}

/// Whether any operand is vector-typed.
pub fn any_vector(setter: &NodeSetter<'_>, operands: &[Operand]) -> bool {
    operands
        .iter()
        .any(|op| setter.operand_type(op) == Some(SocketType::Vector))
}

/// The first output of a node.
pub fn first_output(node: NodeHandle) -> OutputRef {
    OutputRef::new(node, 0)
}
