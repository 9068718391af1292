// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};

/// Knobs for the parts of the format that are only known empirically.
///
/// The defaults match the compiler versions the decoder was validated
/// against. The tag values exist so a different compiler version can be
/// accommodated without code changes once a mismatch is observed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Values at index 10 of a module-line sub-record that mark an include
    /// at module level (when index 9 is zero).
    pub module_level_tags: Vec<u8>,

    /// Value at index 6 of a module-line sub-record that marks an inline
    /// include reference (when index 5 is zero).
    pub inline_tag: u8,

    /// Substitute code page glyphs for high-bit bytes in filenames instead of
    /// truncating at them.
    pub extended_filenames: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            module_level_tags: vec![8, 29],
            inline_tag: 8,
            extended_filenames: false,
        }
    }
}
