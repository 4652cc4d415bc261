//! Template-to-IR compiler core.
//!
//! Takes an already parsed template AST and produces the block-structured
//! IR consumed by a fine-grained reactive code generator.
//! The pipeline is, leaf first:
//!
//! * [`scope`]: lexical scope analysis over embedded script ASTs
//! * [`normalizer`]: source attributes to static attributes / bound directives
//! * [`converter`]: directive transforms and the props builder
//! * [`ir`]: the Root/Block/Operation/Effect data model
//! * [`transformer`]: transform context and the node transform pipeline

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod ast;
pub mod compiler;
pub mod converter;
pub mod error;
pub mod flags;
pub mod ir;
pub mod js;
pub mod normalizer;
pub mod scope;
pub mod transformer;
pub mod util;

pub use compiler::{compile, CompileOption};
pub use error::{CompilationError, CompilationErrorKind, CompileResult};

#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    /// the 0-indexed offset in the source str modulo newline
    pub offset: usize,
    /// the line number in the source code
    pub line: usize,
    /// the column number in the source code
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

#[derive(Default, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
    /// source text covered by the location. Synthesized nodes carry
    /// reconstructed text, so it may differ from the original slice.
    pub source: String,
}

impl SourceLocation {
    /// Smallest location covering both `self` and `other`.
    /// Reconstructed source is left empty; callers fill it in.
    pub fn cover(&self, other: &SourceLocation) -> SourceLocation {
        let start = if self.start.offset <= other.start.offset {
            self.start.clone()
        } else {
            other.start.clone()
        };
        let end = if self.end.offset >= other.end.offset {
            self.end.clone()
        } else {
            other.end.clone()
        };
        SourceLocation {
            start,
            end,
            source: String::new(),
        }
    }

    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }
}

impl From<SourceLocation> for Range<usize> {
    fn from(location: SourceLocation) -> Self {
        location.start.offset..location.end.offset
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! cast {
    ($target: expr, $pat: path) => {{
        if let $pat(a) = $target {
            a
        } else {
            panic!("mismatch variant when cast to {}", stringify!($pat));
        }
    }};
}
