// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use log::*;

use crate::error::DecodeError;
use crate::filemap::FILE_MAP_RECORD_SIZE;
use crate::segment::{Segment, SENTINEL};

/// Smallest buffer that can hold the file-map sentinel run and the
/// module-line terminator.
pub const MIN_RCODE_LEN: usize = FILE_MAP_RECORD_SIZE + 4;

/// The two sections of a reversed r-code buffer.
#[derive(Clone, Copy, Debug)]
pub struct Sections<'a> {
    /// File-map records, without the sentinel run that ends them.
    pub file_map: Segment<'a>,

    /// Everything after the file-map section.
    pub module_lines: Segment<'a>,
}

impl<'a> Sections<'a> {
    /// Find the file-map / module-line boundary.
    ///
    /// The file-map section ends at the first 16-aligned run of sixteen zero
    /// bytes, which no file-map record can contain.
    pub fn locate(buffer: Segment<'a>) -> Result<Self, DecodeError> {
        if buffer.len() < MIN_RCODE_LEN {
            return Err(DecodeError::Truncated {
                len: buffer.len(),
                min: MIN_RCODE_LEN,
            });
        }

        let segments = buffer.split(FILE_MAP_RECORD_SIZE, SENTINEL);

        let first = match segments.as_slice() {
            [first, _, ..] => *first,
            _ => return Err(DecodeError::MissingSection { name: "file map" }),
        };

        let file_map = first.slice(0..first.len() - FILE_MAP_RECORD_SIZE);
        let module_lines = buffer.slice(first.len()..buffer.len());

        if module_lines.is_empty() {
            return Err(DecodeError::MissingSection {
                name: "module line",
            });
        }

        debug!(
            "file map section {:?}, module line section {:?}",
            file_map, module_lines
        );

        Ok(Self {
            file_map,
            module_lines,
        })
    }
}
