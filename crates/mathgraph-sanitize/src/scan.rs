//! Segment scan, token classification and implicit multiplication.
//!
//! The text is cut into maximal runs of `[A-Za-z0-9_.]` and single
//! punctuation characters. Runs are then classified, composites are spelled
//! out, and `*` is inserted where juxtaposition means multiplication.

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{Result, SanitizeError};

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_.]+|.").expect("BUG: invalid segment regex"));

static COMPOSITE_ATOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+|[A-Za-z]|.").expect("BUG: invalid composite regex"));

/// Names found in one expression, each set in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Free names; each must be bound to a socket at build time.
    pub variables: IndexSet<String>,
    /// Numeric literals, as written in the canonical text.
    pub constants: IndexSet<String>,
    /// Names used as calls.
    pub functions: IndexSet<String>,
    /// Algebraic runs that were spelled out (`2ab` → `2*a*b`).
    pub composites: IndexSet<String>,
}

impl Classification {
    /// Number of distinct names and literals.
    pub fn len(&self) -> usize {
        self.variables.len() + self.constants.len() + self.functions.len()
    }

    /// Whether nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Role of one piece of canonical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Constant,
    Variable,
    Function,
    Punct(char),
}

#[derive(Debug, Clone)]
struct Piece {
    text: String,
    role: Role,
}

impl Piece {
    fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    fn star() -> Self {
        Self::new("*", Role::Punct('*'))
    }

    fn is_value(&self) -> bool {
        matches!(self.role, Role::Constant | Role::Variable)
    }
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_float(token: &str) -> Result<()> {
    token
        .parse::<f64>()
        .map(|_| ())
        .map_err(|_| SanitizeError::UnrecognizedFloat(token.to_string()))
}

/// Length of the registered function name `run` ends with.
///
/// The whole run always counts. In algebraic notation a proper suffix
/// counts too, longest first, so `2sin` ends with `sin`.
pub fn longest_function_suffix(run: &str, algebraic: bool) -> Option<usize> {
    if mathgraph_registry::is_known(run) {
        return Some(run.len());
    }
    if !algebraic {
        return None;
    }
    run.char_indices()
        .skip(1)
        .map(|(i, _)| &run[i..])
        .find(|suffix| mathgraph_registry::is_known(suffix))
        .map(str::len)
}

/// Split an algebraic composite into numeric and single-letter atoms.
///
/// `24abc1.5` → `["24", "a", "b", "c", "1.5"]`.
pub fn split_composite(token: &str) -> Result<Vec<String>> {
    let mut atoms = Vec::new();
    for atom in COMPOSITE_ATOM.find_iter(token) {
        let atom = atom.as_str();
        if is_numeric(atom) {
            parse_float(atom)?;
        } else if !atom.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SanitizeError::UnknownCompositeElement(atom.to_string()));
        }
        atoms.push(atom.to_string());
    }
    Ok(atoms)
}

struct Scanner {
    algebraic: bool,
    pieces: Vec<Piece>,
    classification: Classification,
}

impl Scanner {
    fn constant(&mut self, text: &str) -> Result<()> {
        parse_float(text)?;
        self.classification.constants.insert(text.to_string());
        self.pieces.push(Piece::new(text, Role::Constant));
        Ok(())
    }

    fn variable(&mut self, text: &str) {
        self.classification.variables.insert(text.to_string());
        self.pieces.push(Piece::new(text, Role::Variable));
    }

    fn function(&mut self, text: &str) {
        self.classification.functions.insert(text.to_string());
        self.pieces.push(Piece::new(text, Role::Function));
    }

    /// A run used as a value.
    fn value(&mut self, run: &str) -> Result<()> {
        if is_numeric(run) {
            return self.constant(run);
        }
        if mathgraph_registry::is_known(run) || mathgraph_registry::is_reserved(run) {
            return Err(SanitizeError::UnauthorizedVariable(run.to_string()));
        }

        if !self.algebraic {
            if !is_identifier(run) {
                return Err(SanitizeError::UnauthorizedVariable(run.to_string()));
            }
            self.variable(run);
            return Ok(());
        }

        if run.len() == 1 && run.chars().all(|c| c.is_ascii_alphabetic()) {
            self.variable(run);
            return Ok(());
        }

        let atoms = split_composite(run)?;
        self.classification.composites.insert(run.to_string());
        for (i, atom) in atoms.iter().enumerate() {
            if i > 0 {
                self.pieces.push(Piece::star());
            }
            if is_numeric(atom) {
                self.constant(atom)?;
            } else {
                self.variable(atom);
            }
        }
        Ok(())
    }

    /// A run directly followed by `(`.
    fn callee(&mut self, run: &str) -> Result<()> {
        if mathgraph_registry::is_known(run) {
            self.function(run);
            return Ok(());
        }

        if self.algebraic {
            if let Some(len) = longest_function_suffix(run, true) {
                let (prefix, name) = run.split_at(run.len() - len);
                self.value(prefix)?;
                self.pieces.push(Piece::star());
                self.function(name);
                return Ok(());
            }
            return self.value(run);
        }

        // Unregistered names stay calls so the transformer can name them.
        if is_identifier(run) && !mathgraph_registry::is_reserved(run) {
            self.function(run);
            return Ok(());
        }
        self.value(run)
    }

    fn needs_star(&self, prev: &Piece, next: &Piece) -> bool {
        let next_open = next.role == Role::Punct('(');
        if !self.algebraic {
            return prev.role == Role::Constant && next_open;
        }
        if prev.is_value() && next_open {
            return true;
        }
        prev.role == Role::Punct(')') && (next.is_value() || next.role == Role::Function || next_open)
    }

    fn finish(self) -> Result<(String, Classification)> {
        if let Some(name) = self
            .classification
            .variables
            .iter()
            .find(|v| self.classification.functions.contains(*v))
        {
            return Err(SanitizeError::UnauthorizedVariable(name.clone()));
        }

        let mut canonical = String::new();
        let mut prev: Option<&Piece> = None;
        for piece in &self.pieces {
            if let Some(prev) = prev {
                if self.needs_star(prev, piece) {
                    canonical.push('*');
                }
            }
            canonical.push_str(&piece.text);
            prev = Some(piece);
        }
        Ok((canonical, self.classification))
    }
}

/// Classify the runs of `text` and produce the canonical string.
pub fn classify(text: &str, algebraic: bool) -> Result<(String, Classification)> {
    let segments: Vec<&str> = SEGMENT.find_iter(text).map(|m| m.as_str()).collect();
    let mut scanner = Scanner {
        algebraic,
        pieces: Vec::with_capacity(segments.len()),
        classification: Classification::default(),
    };

    for (index, segment) in segments.iter().enumerate() {
        let first = segment.chars().next().unwrap_or(' ');
        let is_run = first.is_ascii_alphanumeric() || first == '_' || first == '.';
        if !is_run {
            scanner.pieces.push(Piece::new(*segment, Role::Punct(first)));
            continue;
        }
        if segments.get(index + 1) == Some(&"(") {
            scanner.callee(segment)?;
        } else {
            scanner.value(segment)?;
        }
    }

    scanner.finish()
}
