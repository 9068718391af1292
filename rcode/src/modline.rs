// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Decoding of the module-line section into include records.
//!
//! The section is a sequence of chunks, each delimited by an 8-aligned run of
//! at least eight zero bytes. A chunk is a sequence of sub-records delimited
//! by 4-aligned runs of at least four zero bytes. Each sub-record is stored
//! reversed with its zero padding in front, so it is reversed back and the
//! zero prefix trimmed before its fields are read.
//!
//! The first sub-record of a chunk describes a file at the top of the include
//! hierarchy (the main program, for the first chunk). The remaining ones are
//! either includes at module level or include references nested under the
//! chunk's first file. Nothing in the record stores which, so the two are told
//! apart by constant bytes at fixed positions. That test is an empirical
//! approximation that is not known to hold for every compiler version; the
//! tag values are configurable through [`DecodeOptions`].
//!
//! ```text
//! root:         [debug] [u32 u32 u32 u32] filename\0
//!                  0     1            17
//! module level: [debug] [u32 u32] [0 tag] [u32 u32] filename\0
//!                  0     1         9  10   11        19
//! inline ref:   [debug] [u32] [0 8] [u32 u32 u32] filename\0
//!                  0     1     5 6   7             19
//! ```

use log::*;
use nom::bytes::complete::take;
use nom::number::complete::{be_u32, be_u8};
use nom::sequence::tuple;
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::cstring::StringDecoder;
use crate::diagnostic::{Decoded, Diagnostic};
use crate::options::DecodeOptions;
use crate::segment::{Segment, SENTINEL};

pub const CHUNK_WIDTH: usize = 8;
pub const FIELD_WIDTH: usize = 4;

const TERMINATOR_LEN: usize = 4;
const ROOT_FILENAME_OFFSET: usize = 17;
const CHILD_FILENAME_OFFSET: usize = 19;

// Byte positions tested by the child heuristics.
const MODULE_LEVEL_ZERO: usize = 9;
const MODULE_LEVEL_TAG: usize = 10;
const INLINE_ZERO: usize = 5;
const INLINE_TAG: usize = 6;

/// What a module-line sub-record was recognized as.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum IncludeRecordKind {
    /// First sub-record of a chunk.
    Root,

    /// An include at module level; a sibling of the roots.
    ChildFileBoundary,

    /// An include referenced inline from the chunk's root file.
    ChildInlineRef,

    /// Matched no known layout. Keeps the normalized bytes.
    Unclassified(Vec<u8>),
}

/// One file taking part in a compiled unit.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct IncludeRecord {
    /// Debug number of the including file, `0` at the top level.
    pub parent_debug_num: u32,
    pub debug_num: u32,

    /// Fields whose meaning is not known. Preserved, never interpreted.
    pub unknown: [u32; 4],
    pub source_filename: String,
    pub kind: IncludeRecordKind,
}

/// A sub-record that matched no known layout, kept for later analysis.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedRecord {
    /// Absolute offset of the sub-record in the reversed buffer.
    pub offset: usize,

    /// The sub-record bytes after reversal and zero trimming.
    pub raw: Vec<u8>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModuleLines {
    pub includes: Vec<IncludeRecord>,
    pub unclassified: Vec<UnclassifiedRecord>,
}

impl ModuleLines {
    /// The first root record, which describes the compiled program itself.
    pub fn main_program(&self) -> Option<&IncludeRecord> {
        self.includes
            .iter()
            .find(|r| r.kind == IncludeRecordKind::Root)
    }

    pub fn find(&self, debug_num: u32) -> Option<&IncludeRecord> {
        self.includes.iter().find(|r| r.debug_num == debug_num)
    }

    pub fn children(&self, parent_debug_num: u32) -> impl Iterator<Item = &IncludeRecord> {
        self.includes
            .iter()
            .filter(move |r| r.parent_debug_num == parent_debug_num)
    }
}

/// Classify a normalized sub-record that is not a chunk root.
///
/// The module-level layout is tested first; a record matching both is a
/// module-level include.
pub fn classify(field: &[u8], options: &DecodeOptions) -> IncludeRecordKind {
    if field.len() > CHILD_FILENAME_OFFSET {
        if field[MODULE_LEVEL_ZERO] == 0
            && options.module_level_tags.contains(&field[MODULE_LEVEL_TAG])
        {
            return IncludeRecordKind::ChildFileBoundary;
        }

        if field[INLINE_ZERO] == 0 && field[INLINE_TAG] == options.inline_tag {
            return IncludeRecordKind::ChildInlineRef;
        }
    }

    IncludeRecordKind::Unclassified(field.to_vec())
}

fn root_fields(input: &[u8]) -> IResult<&[u8], (u8, [u32; 4])> {
    let (input, debug_num) = be_u8(input)?;
    let (input, (a, b, c, d)) = tuple((be_u32, be_u32, be_u32, be_u32))(input)?;

    Ok((input, (debug_num, [a, b, c, d])))
}

fn file_boundary_fields(input: &[u8]) -> IResult<&[u8], (u8, [u32; 4])> {
    let (input, debug_num) = be_u8(input)?;
    let (input, (a, b)) = tuple((be_u32, be_u32))(input)?;
    let (input, _tag) = take(2usize)(input)?;
    let (input, (c, d)) = tuple((be_u32, be_u32))(input)?;

    Ok((input, (debug_num, [a, b, c, d])))
}

fn inline_ref_fields(input: &[u8]) -> IResult<&[u8], (u8, [u32; 4])> {
    let (input, debug_num) = be_u8(input)?;
    let (input, a) = be_u32(input)?;
    let (input, _tag) = take(2usize)(input)?;
    let (input, (b, c, d)) = tuple((be_u32, be_u32, be_u32))(input)?;

    Ok((input, (debug_num, [a, b, c, d])))
}

/// Reverse a sub-record into reading order and drop its zero padding.
fn normalize(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .rev()
        .copied()
        .skip_while(|b| *b == SENTINEL)
        .collect()
}

pub struct ModuleLineDecoder<'o> {
    options: &'o DecodeOptions,
    strings: StringDecoder,
}

impl<'o> ModuleLineDecoder<'o> {
    pub fn new(options: &'o DecodeOptions) -> Self {
        let strings = StringDecoder::new(options);

        Self { options, strings }
    }

    /// Decode the module-line section. Never fails; anything that cannot be
    /// decoded is reported and skipped.
    pub fn decode(&self, segment: Segment<'_>) -> Decoded<ModuleLines> {
        let mut decoded = Decoded::new(ModuleLines::default());

        for chunk in segment.split(CHUNK_WIDTH, SENTINEL) {
            if chunk.starts_with_sentinel(TERMINATOR_LEN, SENTINEL) {
                debug!("module line terminator at {:#x}", chunk.offset());
                break;
            }

            if chunk.is_sentinel(SENTINEL) {
                continue;
            }

            self.decode_chunk(chunk, &mut decoded);
        }

        debug!(
            "decoded {} include records, {} unclassified",
            decoded.value.includes.len(),
            decoded.value.unclassified.len()
        );

        decoded
    }

    fn decode_chunk(&self, chunk: Segment<'_>, decoded: &mut Decoded<ModuleLines>) {
        let mut root: Option<u32> = None;

        for sub in chunk.split(FIELD_WIDTH, SENTINEL) {
            let field = normalize(sub.bytes());

            if field.is_empty() {
                continue;
            }

            let parent = match root {
                Some(parent) => parent,
                None => match self.root(&field, sub.offset(), decoded) {
                    Some(record) => {
                        root = Some(record.debug_num);
                        decoded.value.includes.push(record);
                        continue;
                    }
                    None => return,
                },
            };

            match classify(&field, self.options) {
                IncludeRecordKind::Unclassified(raw) => {
                    decoded.report(Diagnostic::UnclassifiedRecord {
                        offset: sub.offset(),
                        len: raw.len(),
                    });
                    decoded.value.unclassified.push(UnclassifiedRecord {
                        offset: sub.offset(),
                        raw,
                    });
                }
                kind => {
                    if let Some(record) = self.child(&field, kind, parent, decoded) {
                        decoded.value.includes.push(record);
                    }
                }
            }
        }
    }

    fn root(
        &self,
        field: &[u8],
        offset: usize,
        decoded: &mut Decoded<ModuleLines>,
    ) -> Option<IncludeRecord> {
        let (debug_num, unknown) = match root_fields(field) {
            Ok((_, fields)) if field.len() > ROOT_FILENAME_OFFSET => fields,
            _ => {
                decoded.report(Diagnostic::TruncatedRecord {
                    offset,
                    len: field.len(),
                });
                return None;
            }
        };

        let source_filename = decoded.absorb(self.strings.decode(field, ROOT_FILENAME_OFFSET));

        Some(IncludeRecord {
            parent_debug_num: 0,
            debug_num: debug_num.into(),
            unknown,
            source_filename,
            kind: IncludeRecordKind::Root,
        })
    }

    fn child(
        &self,
        field: &[u8],
        kind: IncludeRecordKind,
        root: u32,
        decoded: &mut Decoded<ModuleLines>,
    ) -> Option<IncludeRecord> {
        let (parent_debug_num, fields) = match kind {
            IncludeRecordKind::ChildFileBoundary => (0, file_boundary_fields(field)),
            IncludeRecordKind::ChildInlineRef => (root, inline_ref_fields(field)),
            _ => return None,
        };

        // `classify` only accepts records long enough for either layout.
        let (_, (debug_num, unknown)) = fields.ok()?;

        let source_filename = decoded.absorb(self.strings.decode(field, CHILD_FILENAME_OFFSET));

        Some(IncludeRecord {
            parent_debug_num,
            debug_num: debug_num.into(),
            unknown,
            source_filename,
            kind,
        })
    }
}
