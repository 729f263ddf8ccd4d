//! Component access on vector values.
//!
//! All components of one vector come from a single separate node, built
//! the first time any component is asked for.

use std::ops::{Bound, RangeBounds};

use mathgraph_graph::{NodeHandle, NodeKind, Operand, OutputRef};

use crate::error::{Result, SocketTypeError};
use crate::kind::ValueKind;
use crate::value::{SymbolicValue, Target};

/// Tag function name for separate nodes.
const SEPARATE: &str = "separate";

impl<'g> SymbolicValue<'g> {
    /// First component.
    pub fn x(&self) -> Result<SymbolicValue<'g>> {
        self.component(0)
    }

    /// Second component.
    pub fn y(&self) -> Result<SymbolicValue<'g>> {
        self.component(1)
    }

    /// Third component.
    pub fn z(&self) -> Result<SymbolicValue<'g>> {
        self.component(2)
    }

    /// Component `index`; negative indices count from the end.
    pub fn index(&self, index: isize) -> Result<SymbolicValue<'g>> {
        let resolved = if index < 0 { index + 3 } else { index };
        if !(0..3).contains(&resolved) {
            return Err(SocketTypeError::IndexOutOfRange {
                name: self.name().to_string(),
                index,
            });
        }
        self.component(resolved as usize)
    }

    /// Components in `range`, clamped to the vector's length.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Vec<SymbolicValue<'g>>> {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        }
        .min(3);
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => 3,
        }
        .min(3);
        (start..end.max(start)).map(|i| self.component(i)).collect()
    }

    /// All three components.
    pub fn components(&self) -> Result<[SymbolicValue<'g>; 3]> {
        Ok([self.component(0)?, self.component(1)?, self.component(2)?])
    }

    /// Iterate over the three components.
    pub fn iter(&self) -> Result<std::array::IntoIter<SymbolicValue<'g>, 3>> {
        Ok(self.components()?.into_iter())
    }

    fn component(&self, index: usize) -> Result<SymbolicValue<'g>> {
        let node = self.separate()?;
        Ok(SymbolicValue::new(
            self.session.clone(),
            Target::Output(OutputRef::new(node, index)),
            ValueKind::Scalar,
            None,
        ))
    }

    fn separate(&self) -> Result<NodeHandle> {
        let vector = match (self.kind(), self.output()) {
            (ValueKind::Vector, Some(output)) => output,
            _ => {
                return Err(SocketTypeError::Incompatible {
                    operation: "[]".to_string(),
                    name: self.name().to_string(),
                    lhs: self.kind().to_string(),
                    rhs: "-".to_string(),
                })
            }
        };

        if let Some(node) = self.session.borrow().separator(vector) {
            return Ok(node);
        }
        let identity = self.identity();
        let mut session = self.session.borrow_mut();
        let tag = session.setter.next_tag(SEPARATE, &[identity]);
        let node = session
            .setter
            .find_or_create(&tag, NodeKind::SeparateXyz, &[Operand::Socket(vector)])?;
        session.remember_separator(vector, node);
        Ok(node)
    }
}
