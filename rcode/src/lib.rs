// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! # rcode
//!
//! Decoder for the debug-line tables of compiled "r-code" objects.
//!
//! The format is proprietary and undocumented; what is decoded here was
//! inferred from byte patterns. A decode runs in a fixed pipeline:
//!
//! ```text
//! file ──► RawBytes (reversed) ──► Sections::locate (split at 16)
//!                                    │
//!                     ┌──────────────┴───────────────┐
//!                     ▼                              ▼
//!             filemap::decode             ModuleLineDecoder (split at 8, then 4)
//!           Vec<FileMapRecord>                   ModuleLines
//! ```
//!
//! Only an unreadable or structurally impossible buffer is an error. Every
//! other anomaly is reported as a [`Diagnostic`] alongside a partial result,
//! since partial debug information is still useful to a developer.
//!
//! Correlating the two outputs into a source map is left to the `srcmap`
//! crate.

mod bytes;
mod cstring;
mod diagnostic;
mod error;
pub mod filemap;
mod layout;
pub mod modline;
mod options;
mod segment;
pub mod symbols;

#[cfg(any(test, feature = "fixture"))]
pub mod fixture;

use std::path::Path;

use log::*;
use serde::{Deserialize, Serialize};

pub use self::bytes::RawBytes;
pub use cstring::{decode_cstring, StringDecoder};
pub use diagnostic::{Decoded, Diagnostic};
pub use error::DecodeError;
pub use filemap::FileMapRecord;
pub use layout::{Sections, MIN_RCODE_LEN};
pub use modline::{IncludeRecord, IncludeRecordKind, ModuleLineDecoder, ModuleLines};
pub use options::DecodeOptions;
pub use segment::{Segment, SENTINEL};

/// Everything decoded from one artifact.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DecodedRcode {
    pub file_map: Vec<FileMapRecord>,
    pub module_lines: ModuleLines,
}

#[derive(Clone, Debug, Default)]
pub struct RcodeDecoder {
    options: DecodeOptions,
}

impl RcodeDecoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Read and decode the artifact at `path`.
    pub async fn decode_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Decoded<DecodedRcode>, DecodeError> {
        let raw = RawBytes::load(path).await?;
        self.decode(&raw)
    }

    /// Decode an already loaded artifact.
    ///
    /// # Errors
    ///
    /// If the buffer is too small to hold both sections, or no file-map
    /// section boundary can be found.
    pub fn decode(&self, raw: &RawBytes) -> Result<Decoded<DecodedRcode>, DecodeError> {
        let sections = Sections::locate(raw.segment())?;

        let file_map = filemap::decode(sections.file_map);
        let module_lines =
            ModuleLineDecoder::new(&self.options).decode(sections.module_lines);

        let decoded = module_lines.map(|module_lines| DecodedRcode {
            file_map,
            module_lines,
        });

        if !decoded.diagnostics.is_empty() {
            info!(
                "decoded r-code with {} diagnostics",
                decoded.diagnostics.len()
            );
        }

        Ok(decoded)
    }
}
