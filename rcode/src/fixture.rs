// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builders for synthetic r-code, for tests.
//!
//! Records are written in reading order and laid out the way the decoder
//! expects to find them. Opaque fields should avoid zero bytes: an aligned
//! run of zeros inside a record splits it, exactly as it would in a real
//! artifact.

use crate::filemap::{FileMapRecord, FILE_MAP_RECORD_SIZE};
use crate::modline::{CHUNK_WIDTH, FIELD_WIDTH};

fn fields(unknown: &[u32]) -> Vec<u8> {
    unknown.iter().flat_map(|u| u.to_be_bytes()).collect()
}

fn filename(name: &str) -> Vec<u8> {
    let mut bytes = name.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// A chunk root sub-record.
pub fn root(debug_num: u8, unknown: [u32; 4], name: &str) -> Vec<u8> {
    let mut field = vec![debug_num];
    field.extend(fields(&unknown));
    field.extend(filename(name));
    field
}

/// A module-level include sub-record.
pub fn file_boundary(debug_num: u8, unknown: [u32; 4], tag: u8, name: &str) -> Vec<u8> {
    let mut field = vec![debug_num];
    field.extend(fields(&unknown[..2]));
    field.extend([0, tag]);
    field.extend(fields(&unknown[2..]));
    field.extend(filename(name));
    field
}

/// An inline include reference sub-record.
pub fn inline_ref(debug_num: u8, unknown: [u32; 4], name: &str) -> Vec<u8> {
    let mut field = vec![debug_num];
    field.extend(fields(&unknown[..1]));
    field.extend([0, 8]);
    field.extend(fields(&unknown[1..]));
    field.extend(filename(name));
    field
}

fn sub_record(field: &[u8]) -> Vec<u8> {
    let mut bytes: Vec<u8> = field.iter().rev().copied().collect();
    let padding = (FIELD_WIDTH - bytes.len() % FIELD_WIDTH) % FIELD_WIDTH;
    bytes.resize(bytes.len() + padding + FIELD_WIDTH, 0);
    bytes
}

fn chunk(fields: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes: Vec<u8> = fields.iter().flat_map(|f| sub_record(f)).collect();
    let mut run = bytes.iter().rev().take_while(|b| **b == 0).count();

    while bytes.len() % CHUNK_WIDTH != 0 || run < CHUNK_WIDTH {
        bytes.push(0);
        run += 1;
    }

    bytes
}

/// A module-line section in logical order, including its terminator.
pub fn module_lines(chunks: &[Vec<Vec<u8>>]) -> Vec<u8> {
    let mut bytes: Vec<u8> = chunks.iter().flat_map(|c| chunk(c)).collect();
    bytes.extend([0; 4]);
    bytes
}

/// A file-map section in logical order, including its sentinel run.
pub fn file_map(records: &[FileMapRecord]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((records.len() + 1) * FILE_MAP_RECORD_SIZE);

    for record in records {
        bytes.extend(record.source_num.to_be_bytes());
        bytes.extend(record.line_end.to_be_bytes());
        bytes.extend(record.line_begin.to_be_bytes());
        bytes.extend(u32::from(record.debug_num).to_be_bytes());
    }

    bytes.extend([0; FILE_MAP_RECORD_SIZE]);
    bytes
}

/// Assembles a whole artifact.
#[derive(Clone, Debug, Default)]
pub struct RcodeBuilder {
    file_map: Vec<FileMapRecord>,
    chunks: Vec<Vec<Vec<u8>>>,
    trailer: Vec<u8>,
}

impl RcodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        mut self,
        source_num: u32,
        line_begin: u32,
        line_end: u32,
        debug_num: u8,
    ) -> Self {
        self.file_map.push(FileMapRecord {
            source_num,
            line_begin,
            line_end,
            debug_num,
        });
        self
    }

    /// Start a new chunk whose first sub-record is `field`.
    pub fn chunk(mut self, field: Vec<u8>) -> Self {
        self.chunks.push(vec![field]);
        self
    }

    /// Append a sub-record to the current chunk.
    pub fn field(mut self, field: Vec<u8>) -> Self {
        match self.chunks.last_mut() {
            Some(chunk) => chunk.push(field),
            None => self.chunks.push(vec![field]),
        }
        self
    }

    /// Bytes that follow the module-line terminator, standing in for the
    /// rest of the artifact.
    pub fn trailer(mut self, bytes: &[u8]) -> Self {
        self.trailer.extend_from_slice(bytes);
        self
    }

    /// The artifact in logical order.
    pub fn logical(&self) -> Vec<u8> {
        let mut bytes = file_map(&self.file_map);
        bytes.extend(module_lines(&self.chunks));
        bytes.extend(&self.trailer);
        bytes
    }

    /// The artifact as it is stored on disk.
    pub fn build(&self) -> Vec<u8> {
        let mut bytes = self.logical();
        bytes.reverse();
        bytes
    }
}
