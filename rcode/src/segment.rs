// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::ops::Range;

/// Byte value whose aligned runs delimit records.
pub const SENTINEL: u8 = 0;

/// A borrowed view into a [`RawBytes`](crate::RawBytes) buffer.
///
/// `offset` is the absolute start of the view within the original buffer and
/// is only used to make diagnostics point somewhere useful.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Segment<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Segment<'a> {
    pub fn new(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sub-view over `range`, relative to the start of this segment.
    ///
    /// # Panics
    ///
    /// If `range` is out of bounds, like slice indexing.
    pub fn slice(&self, range: Range<usize>) -> Segment<'a> {
        let offset = self.offset + range.start;
        Segment::new(&self.bytes[range], offset)
    }

    /// True if every byte is `sentinel`. Empty segments count as sentinel.
    pub fn is_sentinel(&self, sentinel: u8) -> bool {
        self.bytes.iter().all(|b| *b == sentinel)
    }

    /// True if the segment starts with at least `count` sentinel bytes.
    pub fn starts_with_sentinel(&self, count: usize, sentinel: u8) -> bool {
        self.bytes.len() >= count && self.bytes[..count].iter().all(|b| *b == sentinel)
    }

    /// Split into consecutive segments at aligned runs of `sentinel`.
    ///
    /// A split point is placed directly after the byte that brings the current
    /// sentinel run to at least `width` bytes, but only when that point is a
    /// multiple of `width` from the start of this segment. The sentinel run
    /// stays at the tail of the segment it closes. Bytes after the last split
    /// point form a final, possibly empty, segment.
    ///
    /// The lengths of the returned segments always sum to `self.len()`.
    pub fn split(&self, width: usize, sentinel: u8) -> Vec<Segment<'a>> {
        if width == 0 || self.bytes.len() < width {
            return vec![*self];
        }

        let mut segments = Vec::new();
        let mut start = 0;
        let mut run = 0;

        for (i, byte) in self.bytes.iter().enumerate() {
            if *byte == sentinel {
                run += 1;
            } else {
                run = 0;
            }

            let end = i + 1;

            if run >= width && end % width == 0 {
                segments.push(self.slice(start..end));
                start = end;
                run = 0;
            }
        }

        segments.push(self.slice(start..self.bytes.len()));

        segments
    }
}

impl fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("offset", &format_args!("{:#x}", self.offset))
            .field("len", &self.bytes.len())
            .finish()
    }
}
