// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One debug line and the source line it was compiled from.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SourceMapItem {
    pub debug_line: u32,
    pub source_line: u32,
    pub source_path: PathBuf,
    pub proc_name: String,
}

impl SourceMapItem {
    pub fn new<P: AsRef<Path>>(
        debug_line: u32,
        source_line: u32,
        source_path: P,
        proc_name: &str,
    ) -> Self {
        Self {
            debug_line,
            source_line,
            source_path: source_path.as_ref().to_owned(),
            proc_name: proc_name.to_owned(),
        }
    }
}

impl fmt::Display for SourceMapItem {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "{} {} -> {}:{}",
            self.proc_name,
            self.debug_line,
            self.source_path.display(),
            self.source_line
        )
    }
}

/// Orders by debug line, then source line.
impl Ord for SourceMapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.debug_line
            .cmp(&other.debug_line)
            .then_with(|| self.source_line.cmp(&other.source_line))
            .then_with(|| self.source_path.cmp(&other.source_path))
            .then_with(|| self.proc_name.cmp(&other.proc_name))
    }
}

impl PartialOrd for SourceMapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A position in a source file.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new<P: AsRef<Path>>(path: P, line: u32, column: u32) -> Self {
        let path = path.as_ref().to_owned();
        Self { path, line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// A position in the debug listing.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ListingPosition {
    pub line: u32,
    pub column: u32,
}

impl ListingPosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for ListingPosition {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}:{}", self.line, self.column)
    }
}
