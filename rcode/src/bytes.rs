// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::*;

use crate::error::DecodeError;
use crate::segment::Segment;

/// The bytes of one r-code artifact in logical order.
///
/// Artifacts store their records tail-first, so the file contents are
/// reversed exactly once when loaded. Every [`Segment`] handed out afterwards
/// borrows from this buffer.
#[derive(Clone, Eq, PartialEq)]
pub struct RawBytes {
    data: Arc<[u8]>,
}

impl RawBytes {
    /// Read an artifact from disk.
    ///
    /// This is the only suspension point in a decode.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| DecodeError::Io {
                path: path.to_owned(),
                source,
            })?;

        debug!("read {} bytes from {}", data.len(), path.display());

        Ok(Self::from_file_bytes(data))
    }

    /// Wrap bytes as they appear on disk, reversing them into logical order.
    pub fn from_file_bytes(mut data: Vec<u8>) -> Self {
        data.reverse();

        Self { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// A view of the whole buffer.
    pub fn segment(&self) -> Segment<'_> {
        Segment::new(&self.data, 0)
    }
}

impl fmt::Debug for RawBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBytes")
            .field("len", &self.data.len())
            .finish()
    }
}
