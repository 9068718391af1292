// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that make an r-code artifact undecodable.
///
/// Data-shape anomalies inside an otherwise well-formed buffer are never
/// errors; they are reported as [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unable to read r-code `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("r-code buffer too small: {len} bytes, need at least {min}")]
    Truncated { len: usize, min: usize },

    #[error("r-code has no {name} section")]
    MissingSection { name: &'static str },
}
