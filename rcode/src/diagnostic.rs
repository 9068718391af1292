// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use log::*;
use serde::{Deserialize, Serialize};

/// A recoverable anomaly found while decoding.
///
/// Diagnostics are observability output only: decoding always continues past
/// them with a best-effort partial result.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A string hit a byte outside the printable range. `offset` is relative
    /// to the start of the buffer the string was read from.
    InvalidByte {
        offset: usize,
        byte: u8,
        symbol: String,
    },

    /// A string ran off the end of its buffer without a NUL.
    UnterminatedString { offset: usize },

    /// A module-line sub-record too short for its layout.
    TruncatedRecord { offset: usize, len: usize },

    /// A module-line sub-record that matched neither child layout.
    UnclassifiedRecord { offset: usize, len: usize },

    /// A file-map record whose debug number names no include record.
    UnresolvedRecord { debug_num: u8, source_num: u32 },

    /// A file-map record with `line_end < line_begin`.
    InvertedRange {
        debug_num: u8,
        line_begin: u32,
        line_end: u32,
    },

    /// A file-map record spanning more lines than the artifact may still
    /// produce.
    ImplausibleRange {
        debug_num: u8,
        line_begin: u32,
        line_end: u32,
    },

    /// A file-map record whose debug lines run past `u32::MAX`. Lines from
    /// `source_line` on are dropped.
    DebugLineOverflow {
        debug_num: u8,
        source_num: u32,
        source_line: u32,
    },

    /// Two source lines claimed the same debug line; the smaller one is kept.
    DuplicateDebugLine {
        debug_line: u32,
        kept: u32,
        dropped: u32,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidByte {
                offset,
                byte,
                symbol,
            } => write!(
                f,
                "string truncated at +{offset:#x}: byte {byte} ({symbol}) is not printable"
            ),
            Diagnostic::UnterminatedString { offset } => {
                write!(f, "string starting at +{offset:#x} has no NUL terminator")
            }
            Diagnostic::TruncatedRecord { offset, len } => {
                write!(f, "module line record at {offset:#x} truncated ({len} bytes)")
            }
            Diagnostic::UnclassifiedRecord { offset, len } => {
                write!(f, "unclassified module line record at {offset:#x} ({len} bytes)")
            }
            Diagnostic::UnresolvedRecord {
                debug_num,
                source_num,
            } => write!(
                f,
                "file map record {source_num} references unknown debug number {debug_num}"
            ),
            Diagnostic::InvertedRange {
                debug_num,
                line_begin,
                line_end,
            } => write!(
                f,
                "file map record for debug number {debug_num} has inverted range {line_begin}..{line_end}"
            ),
            Diagnostic::ImplausibleRange {
                debug_num,
                line_begin,
                line_end,
            } => write!(
                f,
                "file map record for debug number {debug_num} spans too many lines: \
                 {line_begin}..{line_end}"
            ),
            Diagnostic::DebugLineOverflow {
                debug_num,
                source_num,
                source_line,
            } => write!(
                f,
                "file map record {source_num} for debug number {debug_num} overflows \
                 the debug listing at source line {source_line}"
            ),
            Diagnostic::DuplicateDebugLine {
                debug_line,
                kept,
                dropped,
            } => write!(
                f,
                "debug line {debug_line} claimed twice, keeping source line {kept} over {dropped}"
            ),
        }
    }
}

/// A decode result paired with the diagnostics raised while producing it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Decoded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Log and record a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Take the value of a nested decode, keeping its diagnostics.
    ///
    /// The nested diagnostics were already logged when they were reported.
    pub fn absorb<U>(&mut self, other: Decoded<U>) -> U {
        self.diagnostics.extend(other.diagnostics);
        other.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absorb_keeps_order() {
        let mut outer = Decoded::new(());
        outer.report(Diagnostic::UnterminatedString { offset: 4 });

        let mut inner = Decoded::new(7u32);
        inner.report(Diagnostic::TruncatedRecord { offset: 8, len: 3 });

        let value = outer.absorb(inner);

        assert_eq!(value, 7);
        assert_eq!(
            outer.diagnostics,
            vec![
                Diagnostic::UnterminatedString { offset: 4 },
                Diagnostic::TruncatedRecord { offset: 8, len: 3 },
            ]
        );
    }

    #[test]
    fn display() {
        let diagnostic = Diagnostic::DuplicateDebugLine {
            debug_line: 3,
            kept: 3,
            dropped: 10,
        };

        assert_eq!(
            diagnostic.to_string(),
            "debug line 3 claimed twice, keeping source line 3 over 10"
        );
    }

    #[test]
    fn display_wrapped_message() {
        let diagnostic = Diagnostic::ImplausibleRange {
            debug_num: 1,
            line_begin: 1,
            line_end: 5,
        };

        assert_eq!(
            diagnostic.to_string(),
            "file map record for debug number 1 spans too many lines: 1..5"
        );
    }
}
