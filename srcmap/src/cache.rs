// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use log::*;
use rcode::{DecodeOptions, RcodeDecoder};
use tokio::sync::{Mutex, OnceCell};

use crate::assemble::assemble_decoded;
use crate::sourcemap::SourceMap;

type Slot = Arc<OnceCell<Arc<SourceMap>>>;

struct Entry {
    modified: Option<SystemTime>,
    slot: Slot,
}

/// Source maps keyed by r-code path and modification time.
///
/// Concurrent requests for the same path share a single decode. A map is
/// rebuilt when the artifact's modification time changes. Failed decodes are
/// not cached; the next request tries again.
#[derive(Default)]
pub struct SourceMapCache {
    decoder: RcodeDecoder,
    entries: Mutex<HashMap<PathBuf, Entry>>,
}

impl SourceMapCache {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            decoder: RcodeDecoder::new(options),
            entries: Mutex::default(),
        }
    }

    pub async fn get(&self, rcode: impl AsRef<Path>) -> Result<Arc<SourceMap>> {
        let rcode = rcode.as_ref();

        let modified = tokio::fs::metadata(rcode)
            .await
            .and_then(|m| m.modified())
            .ok();

        let slot = self.slot(rcode, modified).await;

        let map = slot.get_or_try_init(|| self.build(rcode)).await?;

        Ok(map.clone())
    }

    /// Drop any cached map for `rcode`.
    pub async fn invalidate(&self, rcode: impl AsRef<Path>) -> bool {
        self.entries.lock().await.remove(rcode.as_ref()).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn slot(&self, rcode: &Path, modified: Option<SystemTime>) -> Slot {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(rcode) {
            if entry.modified == modified {
                return entry.slot.clone();
            }

            debug!("r-code changed, discarding source map: {}", rcode.display());
        }

        let slot = Slot::default();
        let entry = Entry {
            modified,
            slot: slot.clone(),
        };
        entries.insert(rcode.to_owned(), entry);

        slot
    }

    async fn build(&self, rcode: &Path) -> Result<Arc<SourceMap>> {
        let decoded = self
            .decoder
            .decode_file(rcode)
            .await
            .with_context(|| format!("unable to decode r-code: {}", rcode.display()))?;

        let map = assemble_decoded(rcode, decoded);

        info!(
            "built source map for {}: {} items, {} diagnostics",
            rcode.display(),
            map.value.len(),
            map.diagnostics.len()
        );

        Ok(Arc::new(map.value))
    }
}
