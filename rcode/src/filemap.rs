// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ops::RangeInclusive;

use log::*;
use nom::multi::many0;
use nom::number::complete::be_u32;
use nom::sequence::tuple;
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::segment::Segment;

pub const FILE_MAP_RECORD_SIZE: usize = 16;

/// A run of consecutive source lines of one file, as recorded in the file-map
/// section.
///
/// On disk (after reversal) the record is four big-endian `u32`s in the order
/// `source_num`, `line_end`, `line_begin`, and a last field of which only the
/// low byte is kept as `debug_num`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FileMapRecord {
    pub source_num: u32,
    pub line_begin: u32,
    pub line_end: u32,
    pub debug_num: u8,
}

impl FileMapRecord {
    fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, (source_num, line_end, line_begin, last)) =
            tuple((be_u32, be_u32, be_u32, be_u32))(input)?;

        let record = Self {
            source_num,
            line_begin,
            line_end,
            debug_num: (last & 0xff) as u8,
        };

        Ok((input, record))
    }

    pub fn lines(&self) -> RangeInclusive<u32> {
        self.line_begin..=self.line_end
    }
}

/// Decode every complete 16-byte record in `segment`.
///
/// An incomplete trailing stride is ignored.
pub fn decode(segment: Segment<'_>) -> Vec<FileMapRecord> {
    match many0(FileMapRecord::parse)(segment.bytes()) {
        Ok((rest, records)) => {
            if !rest.is_empty() {
                debug!(
                    "ignoring {} trailing file map bytes at {:#x}",
                    rest.len(),
                    segment.offset() + segment.len() - rest.len()
                );
            }

            debug!("decoded {} file map records", records.len());

            records
        }
        Err(err) => {
            warn!("unable to decode file map at {:#x}: {err}", segment.offset());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rustfmt::skip]
    const THREE_RECORDS: [u8; 48] = [
        0, 0, 0, 1,  0, 0, 0, 10,  0, 0, 0, 1,  0, 0, 0, 5,
        0, 0, 0, 11, 0, 0, 1, 2,   0, 0, 0, 20, 0, 0, 0, 6,
        0, 0, 0, 44, 0, 0, 0, 3,   0, 0, 0, 3,  0xff, 0xff, 0x12, 0x07,
    ];

    #[test]
    fn decode_exact_records() {
        let records = decode(Segment::new(&THREE_RECORDS, 0));

        assert_eq!(
            records,
            vec![
                FileMapRecord {
                    source_num: 1,
                    line_begin: 1,
                    line_end: 10,
                    debug_num: 5,
                },
                FileMapRecord {
                    source_num: 11,
                    line_begin: 20,
                    line_end: 258,
                    debug_num: 6,
                },
                FileMapRecord {
                    source_num: 44,
                    line_begin: 3,
                    line_end: 3,
                    debug_num: 7,
                },
            ]
        );
    }

    #[test]
    fn ignores_incomplete_stride() {
        let mut data = THREE_RECORDS.to_vec();
        data.extend_from_slice(&[0, 0, 0, 9, 0, 0, 0, 9, 0, 0]);

        let records = decode(Segment::new(&data, 0));
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn empty_segment() {
        assert!(decode(Segment::new(&[], 0)).is_empty());
    }

    #[test]
    fn lines_range() {
        let record = FileMapRecord {
            source_num: 1,
            line_begin: 4,
            line_end: 6,
            debug_num: 1,
        };

        assert_eq!(record.lines().collect::<Vec<_>>(), vec![4, 5, 6]);
    }
}
