//! Error types for parsing and primitive coercion.
//!
//! Structural errors ([`ParseError`]) abort the whole parse. Coercion
//! errors ([`CoerceError`]) are local to one `get` call on one primitive.

use crate::scan::DelimiterSet;
use crate::value::ValueKind;

/// Fatal structural error raised by the parser.
///
/// Once returned, the parser is poisoned and every later `resume`
/// returns the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No delimiter from the active set was found before the input ended.
    ///
    /// `offset` is the last consumed byte, or `None` if nothing was
    /// consumed yet.
    #[error("PARSE ERROR{}: Expected one of {expected} but found end of input", after(.offset))]
    UnexpectedEnd {
        expected: DelimiterSet,
        offset: Option<usize>,
    },

    /// Input ended on a delimiter while containers were still open.
    #[error("PARSE ERROR{}: {depth} container(s) still open at end of input", after(.offset))]
    Unclosed { depth: usize, offset: Option<usize> },

    /// A container opened past the configured nesting limit.
    ///
    /// `offset` is the opening bracket that crossed the limit.
    #[error("PARSE ERROR after char {offset}: nesting deeper than {limit} containers")]
    TooDeep { limit: usize, offset: usize },

    /// Input held no list or object at all.
    #[error("PARSE ERROR: input contains no document")]
    NoDocument,
}

impl ParseError {
    /// Byte offset the error is annotated with, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEnd { offset, .. } | Self::Unclosed { offset, .. } => *offset,
            Self::TooDeep { offset, .. } => Some(*offset),
            Self::NoDocument => None,
        }
    }
}

fn after(offset: &Option<usize>) -> String {
    offset.map(|at| format!(" after char {at}")).unwrap_or_default()
}

/// Error from converting a primitive's raw text to a typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    /// The requested kind is outside the supported set.
    #[error("Invalid type '{requested}' requested!")]
    UnsupportedKind { requested: String },

    /// The raw text does not match the grammar of the requested kind.
    #[error("'{raw}' is not a valid {kind}")]
    Format { kind: ValueKind, raw: String },
}
