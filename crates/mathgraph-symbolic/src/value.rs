//! Symbolic values and their operators.
//!
//! A [`SymbolicValue`] is a view onto one output of a node in the graph.
//! Arithmetic on values builds nodes through the shared node setter, so
//! `&a + &b` is the same `add` node a compiled `a+b` would produce.
//!
//! Operators return `Result`: a type error is reported before anything is
//! built.

use std::fmt;

use mathgraph_graph::{InputRef, Operand, OutputRef, FLOAT_IDENTITY, VECTOR_IDENTITY};
use tracing::trace;

use crate::error::{Result, SocketTypeError};
use crate::kind::{dispatch, Operator, ValueKind};
use crate::session::SharedSession;

/// Display name of values that are not bound to a named socket.
pub const ANONYMOUS: &str = "AnonymousVariable";

/// Where a value lives in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// An output socket the value reads from.
    Output(OutputRef),
    /// The interface input a sink writes to.
    Sink(InputRef),
}

/// A typed handle on a graph output.
#[derive(Clone)]
pub struct SymbolicValue<'g> {
    pub(crate) session: SharedSession<'g>,
    target: Target,
    kind: ValueKind,
    name: Option<String>,
    id: u32,
}

/// Something a value can be combined with.
#[derive(Debug, Clone)]
pub enum Arg<'a, 'g> {
    /// Another value.
    Value(&'a SymbolicValue<'g>),
    /// A float literal; broadcasts against vectors.
    Float(f64),
    /// A literal sequence; only three elements make a vector.
    Sequence(Vec<f64>),
}

impl<'a, 'g> From<&'a SymbolicValue<'g>> for Arg<'a, 'g> {
    fn from(value: &'a SymbolicValue<'g>) -> Self {
        Arg::Value(value)
    }
}

impl From<f64> for Arg<'_, '_> {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<[f64; 3]> for Arg<'_, '_> {
    fn from(value: [f64; 3]) -> Self {
        Arg::Sequence(value.to_vec())
    }
}

impl From<Vec<f64>> for Arg<'_, '_> {
    fn from(value: Vec<f64>) -> Self {
        Arg::Sequence(value)
    }
}

impl From<&[f64]> for Arg<'_, '_> {
    fn from(value: &[f64]) -> Self {
        Arg::Sequence(value.to_vec())
    }
}

impl Arg<'_, '_> {
    pub(crate) fn kind(&self) -> Result<ValueKind> {
        match self {
            Arg::Value(value) => Ok(value.kind),
            Arg::Float(_) => Ok(ValueKind::Scalar),
            Arg::Sequence(items) if items.len() == 3 => Ok(ValueKind::Vector),
            Arg::Sequence(items) => Err(SocketTypeError::SequenceLength(items.len())),
        }
    }

    pub(crate) fn identity(&self) -> String {
        match self {
            Arg::Value(value) => value.identity(),
            Arg::Float(_) => FLOAT_IDENTITY.to_string(),
            Arg::Sequence(_) => VECTOR_IDENTITY.to_string(),
        }
    }

    pub(crate) fn display_name(&self) -> String {
        match self {
            Arg::Value(value) => value.name().to_string(),
            Arg::Float(v) => v.to_string(),
            Arg::Sequence(items) => format!("{:?}", items),
        }
    }

    /// Operand for the node setter. Callers check kinds first.
    pub(crate) fn operand(&self, operation: &str) -> Result<Operand> {
        match self {
            Arg::Value(value) => value.output().map(Operand::Socket).ok_or_else(|| {
                SocketTypeError::Incompatible {
                    operation: operation.to_string(),
                    name: value.name().to_string(),
                    lhs: ValueKind::Sink.to_string(),
                    rhs: "-".to_string(),
                }
            }),
            Arg::Float(v) => Ok(Operand::Float(*v)),
            Arg::Sequence(items) => match items[..] {
                [x, y, z] => Ok(Operand::Vector([x, y, z])),
                _ => Err(SocketTypeError::SequenceLength(items.len())),
            },
        }
    }
}

/// Type error for `operation` applied to `args`.
pub(crate) fn incompatible(operation: &str, args: &[Arg<'_, '_>], kinds: &[ValueKind]) -> SocketTypeError {
    let offender = args
        .iter()
        .zip(kinds)
        .find(|(_, kind)| **kind == ValueKind::Sink)
        .map(|(arg, _)| arg)
        .or_else(|| args.iter().find(|arg| matches!(arg, Arg::Value(_))))
        .or(args.first());
    SocketTypeError::Incompatible {
        operation: operation.to_string(),
        name: offender.map(Arg::display_name).unwrap_or_else(|| ANONYMOUS.to_string()),
        lhs: kinds.first().map(ToString::to_string).unwrap_or_else(|| "-".to_string()),
        rhs: kinds.get(1).map(ToString::to_string).unwrap_or_else(|| "-".to_string()),
    }
}

/// Build `function` on `args` and wrap its first output as a `kind` value.
///
/// `kind` is the result kind to report, which need not be the kind the
/// operands would suggest.
pub(crate) fn materialize<'g>(
    session: &SharedSession<'g>,
    function: &str,
    args: &[Arg<'_, 'g>],
    kind: ValueKind,
) -> Result<SymbolicValue<'g>> {
    let operands = args
        .iter()
        .map(|arg| arg.operand(function))
        .collect::<Result<Vec<_>>>()?;
    let identities: Vec<String> = args.iter().map(Arg::identity).collect();
    let desc = mathgraph_registry::require(function)?;

    let output = {
        let mut session = session.borrow_mut();
        let tag = session.setter.next_tag(function, &identities);
        trace!(%tag, function, "symbolic call");
        desc.call(&mut session.setter, &tag, &operands)?
    };
    Ok(SymbolicValue::new(session.clone(), Target::Output(output), kind, None))
}

impl<'g> SymbolicValue<'g> {
    pub(crate) fn new(session: SharedSession<'g>, target: Target, kind: ValueKind, name: Option<String>) -> Self {
        let id = session.borrow_mut().next_id(kind);
        Self {
            session,
            target,
            kind,
            name,
            id,
        }
    }

    /// Value kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Socket name, or [`ANONYMOUS`].
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(ANONYMOUS)
    }

    /// Whether the value came from an operation rather than a named socket.
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    /// Per-kind instance number, counted from 1 in each pass.
    ///
    /// Only used for display; tags never depend on it.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Where the value lives.
    pub fn target(&self) -> Target {
        self.target
    }

    /// The output this value reads from; `None` for sinks.
    pub fn output(&self) -> Option<OutputRef> {
        match self.target {
            Target::Output(output) => Some(output),
            Target::Sink(_) => None,
        }
    }

    /// Identity of this value in node tags.
    ///
    /// Named values use their socket name so the tag survives interface
    /// edits. Anonymous values use the tag of the node producing them and
    /// the output position, so the identity follows what the value computes.
    pub fn identity(&self) -> String {
        if let Some(name) = &self.name {
            return format!("{}:{}", self.kind.short(), name);
        }
        match self.output() {
            Some(output) => self.session.borrow().setter.operand_identity(&Operand::Socket(output)),
            None => format!("{}{}", self.kind.short(), self.id),
        }
    }

    /// Tag of the node producing this value, if it has one.
    pub fn tag(&self) -> Option<String> {
        let output = self.output()?;
        let session = self.session.borrow();
        session.setter.graph().node_name(output.node)
    }

    fn apply(&self, op: Operator, args: &[Arg<'_, 'g>]) -> Result<SymbolicValue<'g>> {
        let kinds = args.iter().map(Arg::kind).collect::<Result<Vec<_>>>()?;
        let result = dispatch(op, kinds[0], kinds.get(1).copied())
            .ok_or_else(|| incompatible(op.symbol(), args, &kinds))?;
        materialize(&self.session, op.function(), args, result)
    }

    fn binary<'a>(&'a self, op: Operator, rhs: Arg<'a, 'g>) -> Result<SymbolicValue<'g>> {
        self.apply(op, &[Arg::Value(self), rhs])
    }

    fn reflected<'a>(&'a self, op: Operator, lhs: Arg<'a, 'g>) -> Result<SymbolicValue<'g>> {
        self.apply(op, &[lhs, Arg::Value(self)])
    }

    /// `self + other`
    pub fn add<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.binary(Operator::Add, other.into())
    }

    /// `self - other`
    pub fn sub<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.binary(Operator::Sub, other.into())
    }

    /// `self * other`
    pub fn mul<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.binary(Operator::Mul, other.into())
    }

    /// `self / other`
    pub fn div<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.binary(Operator::Div, other.into())
    }

    /// `self % other`, floored.
    pub fn rem<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.binary(Operator::Rem, other.into())
    }

    /// `self ** other`. Scalars only.
    pub fn pow<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.binary(Operator::Pow, other.into())
    }

    /// `self // other`
    pub fn floordiv<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.binary(Operator::FloorDiv, other.into())
    }

    /// `other + self`
    pub fn radd<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.reflected(Operator::Add, other.into())
    }

    /// `other - self`
    pub fn rsub<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.reflected(Operator::Sub, other.into())
    }

    /// `other * self`
    pub fn rmul<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.reflected(Operator::Mul, other.into())
    }

    /// `other / self`
    pub fn rdiv<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.reflected(Operator::Div, other.into())
    }

    /// `other % self`
    pub fn rrem<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.reflected(Operator::Rem, other.into())
    }

    /// `other ** self`
    pub fn rpow<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.reflected(Operator::Pow, other.into())
    }

    /// `other // self`
    pub fn rfloordiv<'a>(&'a self, other: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>> {
        self.reflected(Operator::FloorDiv, other.into())
    }

    /// `-self`
    pub fn neg(&self) -> Result<SymbolicValue<'g>> {
        self.apply(Operator::Neg, &[Arg::Value(self)])
    }

    /// `|self|`, component-wise for vectors.
    pub fn abs(&self) -> Result<SymbolicValue<'g>> {
        self.apply(Operator::Abs, &[Arg::Value(self)])
    }
}

impl fmt::Debug for SymbolicValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolicValue")
            .field("name", &self.name())
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("target", &self.target)
            .finish()
    }
}

impl fmt::Display for SymbolicValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.kind)
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<'a, 'g> std::ops::$trait<&'a SymbolicValue<'g>> for &'a SymbolicValue<'g> {
            type Output = Result<SymbolicValue<'g>>;
            fn $method(self, rhs: &'a SymbolicValue<'g>) -> Self::Output {
                self.binary($op, Arg::Value(rhs))
            }
        }

        impl<'g> std::ops::$trait<f64> for &SymbolicValue<'g> {
            type Output = Result<SymbolicValue<'g>>;
            fn $method(self, rhs: f64) -> Self::Output {
                self.binary($op, Arg::Float(rhs))
            }
        }

        impl<'g> std::ops::$trait<[f64; 3]> for &SymbolicValue<'g> {
            type Output = Result<SymbolicValue<'g>>;
            fn $method(self, rhs: [f64; 3]) -> Self::Output {
                self.binary($op, rhs.into())
            }
        }

        impl<'a, 'g> std::ops::$trait<&'a SymbolicValue<'g>> for f64 {
            type Output = Result<SymbolicValue<'g>>;
            fn $method(self, rhs: &'a SymbolicValue<'g>) -> Self::Output {
                rhs.reflected($op, Arg::Float(self))
            }
        }
    };
}

binary_operator!(Add, add, Operator::Add);
binary_operator!(Sub, sub, Operator::Sub);
binary_operator!(Mul, mul, Operator::Mul);
binary_operator!(Div, div, Operator::Div);
binary_operator!(Rem, rem, Operator::Rem);

impl<'g> std::ops::Neg for &SymbolicValue<'g> {
    type Output = Result<SymbolicValue<'g>>;
    fn neg(self) -> Self::Output {
        self.apply(Operator::Neg, &[Arg::Value(self)])
    }
}
