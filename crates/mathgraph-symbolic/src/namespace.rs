//! The script-facing namespace.
//!
//! A host embedding a script exposes the four constructors under their
//! reserved names (`inFloat`, `inVec`, `outFloat`, `outVec`); everything
//! else a script does is arithmetic on the values they return.

use std::rc::Rc;

use mathgraph_graph::{SetterReport, SocketType, Value};
use mathgraph_registry::Support;
use tracing::debug;

use crate::error::{Result, SocketTypeError};
use crate::kind::ValueKind;
use crate::session::{NodeContext, Session, SharedSession};
use crate::value::{incompatible, materialize, Arg, SymbolicValue, Target};

/// Script-visible constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constructor {
    /// Named scalar input.
    InFloat,
    /// Named vector input.
    InVec,
    /// Named scalar output.
    OutFloat,
    /// Named vector output.
    OutVec,
}

impl Constructor {
    /// Every constructor.
    pub const ALL: [Constructor; 4] = [
        Constructor::InFloat,
        Constructor::InVec,
        Constructor::OutFloat,
        Constructor::OutVec,
    ];

    /// Name a script uses.
    pub fn name(self) -> &'static str {
        match self {
            Constructor::InFloat => "inFloat",
            Constructor::InVec => "inVec",
            Constructor::OutFloat => "outFloat",
            Constructor::OutVec => "outVec",
        }
    }

    /// Constructor called `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Kind of the socket it binds.
    pub fn kind(self) -> ValueKind {
        match self {
            Constructor::InFloat | Constructor::OutFloat => ValueKind::Scalar,
            Constructor::InVec | Constructor::OutVec => ValueKind::Vector,
        }
    }

    /// Whether it produces a sink.
    pub fn is_output(self) -> bool {
        matches!(self, Constructor::OutFloat | Constructor::OutVec)
    }
}

fn socket_type(kind: ValueKind) -> Option<SocketType> {
    match kind {
        ValueKind::Scalar => Some(SocketType::Float),
        ValueKind::Vector => Some(SocketType::Vector),
        ValueKind::Sink => None,
    }
}

/// Entry point of the symbolic front end for one pass.
pub struct Namespace<'g> {
    session: SharedSession<'g>,
}

/// Open a symbolic pass over `context`.
pub fn make_symbolic_namespace(context: NodeContext<'_>) -> Namespace<'_> {
    Namespace {
        session: Session::shared(context),
    }
}

impl<'g> Namespace<'g> {
    /// Script-visible constructor names.
    pub fn constructor_names() -> [&'static str; 4] {
        Constructor::ALL.map(Constructor::name)
    }

    /// Constructor a script name refers to.
    pub fn constructor(name: &str) -> Option<Constructor> {
        Constructor::from_name(name)
    }

    /// Value reading the scalar interface input `name`.
    pub fn input_scalar(&self, name: &str) -> Result<SymbolicValue<'g>> {
        self.input(name, ValueKind::Scalar)
    }

    /// Value reading the vector interface input `name`.
    pub fn input_vector(&self, name: &str) -> Result<SymbolicValue<'g>> {
        self.input(name, ValueKind::Vector)
    }

    fn input(&self, name: &str, kind: ValueKind) -> Result<SymbolicValue<'g>> {
        let found = self.session.borrow().setter.graph().interface_input(name);
        match found {
            Some((output, ty)) if Some(ty) == socket_type(kind) => Ok(SymbolicValue::new(
                self.session.clone(),
                Target::Output(output),
                kind,
                Some(name.to_string()),
            )),
            _ => Err(SocketTypeError::MissingSocket {
                name: name.to_string(),
                kind,
            }),
        }
    }

    /// Write `value` to the scalar interface output `name`.
    pub fn output_scalar<'a>(&self, name: &str, value: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>>
    where
        'g: 'a,
    {
        self.output(name, ValueKind::Scalar, value.into())
    }

    /// Write `value` to the vector interface output `name`.
    pub fn output_vector<'a>(&self, name: &str, value: impl Into<Arg<'a, 'g>>) -> Result<SymbolicValue<'g>>
    where
        'g: 'a,
    {
        self.output(name, ValueKind::Vector, value.into())
    }

    /// Link (or, for literals, set) an interface output and return its sink.
    ///
    /// Scalars broadcast into vector outputs; vectors never narrow into
    /// scalar outputs.
    fn output(&self, name: &str, kind: ValueKind, value: Arg<'_, 'g>) -> Result<SymbolicValue<'g>> {
        let found = self.session.borrow().setter.graph().interface_output(name);
        let input = match found {
            Some((input, ty)) if Some(ty) == socket_type(kind) => input,
            _ => {
                return Err(SocketTypeError::MissingSocket {
                    name: name.to_string(),
                    kind,
                })
            }
        };

        let value_kind = value.kind()?;
        let fits = value_kind == kind || (kind == ValueKind::Vector && value_kind == ValueKind::Scalar);
        if !fits {
            return Err(incompatible("=", std::slice::from_ref(&value), &[kind, value_kind]));
        }

        {
            let mut session = self.session.borrow_mut();
            match &value {
                Arg::Value(source) => {
                    let output = source.output().ok_or_else(|| {
                        incompatible("=", std::slice::from_ref(&value), &[kind, value_kind])
                    })?;
                    session.setter.link_output(output, input)?;
                }
                Arg::Float(v) => {
                    session.setter.set_constant(input, Value::Float(*v))?;
                }
                Arg::Sequence(items) => {
                    if let [x, y, z] = items[..] {
                        session.setter.set_constant(input, Value::Vector([x, y, z]))?;
                    }
                }
            }
        }

        debug!(output = name, %kind, "sink written");
        Ok(SymbolicValue::new(
            self.session.clone(),
            Target::Sink(input),
            ValueKind::Sink,
            Some(name.to_string()),
        ))
    }

    /// Call any registered function.
    ///
    /// The result is a vector when the function accepts vectors and any
    /// operand is one; otherwise a scalar.
    pub fn call(&self, function: &str, args: &[Arg<'_, 'g>]) -> Result<SymbolicValue<'g>> {
        let desc = mathgraph_registry::require(function)?;
        let kinds = args.iter().map(Arg::kind).collect::<Result<Vec<_>>>()?;
        if kinds.contains(&ValueKind::Sink) {
            return Err(incompatible(function, args, &kinds));
        }
        let kind = if desc.support == Support::ScalarOrVector && kinds.contains(&ValueKind::Vector) {
            ValueKind::Vector
        } else {
            ValueKind::Scalar
        };
        materialize(&self.session, function, args, kind)
    }

    /// Call a registered function, reporting the result as `kind`.
    pub fn call_as(&self, function: &str, args: &[Arg<'_, 'g>], kind: ValueKind) -> Result<SymbolicValue<'g>> {
        let kinds = args.iter().map(Arg::kind).collect::<Result<Vec<_>>>()?;
        if kinds.contains(&ValueKind::Sink) || kind == ValueKind::Sink {
            return Err(incompatible(function, args, &kinds));
        }
        materialize(&self.session, function, args, kind)
    }

    /// What the pass has done so far.
    pub fn report(&self) -> SetterReport {
        self.session.borrow().setter.report().clone()
    }

    /// End the pass, pruning stale nodes if the context asked for it.
    pub fn finish(self) -> Result<SetterReport> {
        {
            let mut session = self.session.borrow_mut();
            if session.prune_stale {
                let pruned = session.setter.prune_stale()?;
                debug!(pruned = pruned.len(), "stale nodes pruned");
            }
        }
        Ok(self.close())
    }

    /// Abandon the pass, removing every node it created.
    ///
    /// Links and constants set on nodes that already existed are left as
    /// they are.
    pub fn abort(self) -> SetterReport {
        let removed = self.session.borrow_mut().setter.cleanse();
        debug!(removed, "pass aborted");
        self.close()
    }

    fn close(self) -> SetterReport {
        match Rc::try_unwrap(self.session) {
            Ok(session) => session.into_inner().setter.finish(),
            Err(shared) => {
                let report = shared.borrow().setter.report().clone();
                report
            }
        }
    }
}
