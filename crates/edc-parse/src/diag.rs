//! Compiler diagnostics.
//!
//! Every failure in the pipeline funnels into a [`Diag`]: one error, one
//! source position, one message. The binary prefixes it with the program
//! name and exits non-zero; there is no recovery path.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure category. Drives nothing at runtime beyond tests and log
/// filtering, but keeps messages honest about what actually went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    /// Malformed token, unmatched brace, wrong arity.
    Syntax,
    /// Numeric value outside its declared bounds.
    Range,
    /// Unknown enumerant label.
    Enumeration,
    /// Property used in the wrong block or on the wrong part type.
    Context,
    /// Duplicate name within a scope.
    Uniqueness,
    /// Symbolic reference that never resolved.
    Reference,
    /// Grammar-level rule violation (inherit ordering, reserved names...).
    Semantic,
    /// Filesystem or container failure.
    Resource,
}

/// Source position: interned file name plus 1-based line.
#[derive(Debug, Clone)]
pub struct Pos {
    pub file: Arc<str>,
    pub line: u32,
}

impl Pos {
    pub fn new(file: &Arc<str>, line: u32) -> Self {
        Self {
            file: file.clone(),
            line,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, Error)]
#[error("parse error {pos}. {msg}")]
pub struct Diag {
    pub kind: DiagKind,
    pub pos: Pos,
    pub msg: String,
}

impl Diag {
    pub fn new(kind: DiagKind, pos: Pos, msg: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            msg: msg.into(),
        }
    }

    pub fn syntax(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Syntax, pos, msg)
    }

    pub fn range(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Range, pos, msg)
    }

    pub fn enumeration(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Enumeration, pos, msg)
    }

    pub fn context(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Context, pos, msg)
    }

    pub fn uniqueness(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Uniqueness, pos, msg)
    }

    pub fn reference(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Reference, pos, msg)
    }

    pub fn semantic(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Semantic, pos, msg)
    }

    pub fn resource(pos: Pos, msg: impl Into<String>) -> Self {
        Self::new(DiagKind::Resource, pos, msg)
    }
}
