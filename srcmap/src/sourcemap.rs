// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rcode::{Decoded, Diagnostic};
use serde::{Deserialize, Serialize};

use crate::item::SourceMapItem;
use crate::position::PositionTranslator;

/// Paths from r-code may use either separator; compare them with `/`.
pub(crate) fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The correlation table between debug lines and source lines of one r-code
/// artifact.
///
/// Items are ordered by debug line and each debug line appears once. When
/// several source lines claim the same debug line, the smallest source line
/// is kept, so lookups by debug line are deterministic.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "SourceMapData")]
pub struct SourceMap {
    rcode: PathBuf,
    items: Vec<SourceMapItem>,

    // (normalized path, source line) -> index of the item with the smallest
    // debug line for that source line.
    #[serde(skip)]
    source_index: BTreeMap<(String, u32), usize>,
}

#[derive(Deserialize)]
struct SourceMapData {
    rcode: PathBuf,
    items: Vec<SourceMapItem>,
}

impl From<SourceMapData> for SourceMap {
    fn from(data: SourceMapData) -> Self {
        SourceMap::new(data.rcode, data.items)
    }
}

impl SourceMap {
    /// Build a map from `items`, silently resolving debug line conflicts.
    pub fn new<P: AsRef<Path>>(rcode: P, items: impl IntoIterator<Item = SourceMapItem>) -> Self {
        Self::build(rcode, items).value
    }

    /// Build a map from `items`, reporting each debug line conflict.
    pub fn build<P: AsRef<Path>>(
        rcode: P,
        items: impl IntoIterator<Item = SourceMapItem>,
    ) -> Decoded<Self> {
        let mut items: Vec<SourceMapItem> = items.into_iter().collect();
        items.sort();

        let mut decoded = Decoded::new(Vec::with_capacity(items.len()));
        let mut by_debug_line: BTreeMap<u32, SourceMapItem> = BTreeMap::new();

        // Sorted, so the first item seen for a debug line has the smallest
        // source line.
        for item in items {
            match by_debug_line.entry(item.debug_line) {
                Entry::Vacant(entry) => {
                    entry.insert(item);
                }
                Entry::Occupied(entry) => {
                    decoded.report(Diagnostic::DuplicateDebugLine {
                        debug_line: item.debug_line,
                        kept: entry.get().source_line,
                        dropped: item.source_line,
                    });
                }
            }
        }

        decoded.value = by_debug_line.into_values().collect();

        let mut source_index = BTreeMap::new();
        for (i, item) in decoded.value.iter().enumerate() {
            source_index
                .entry((normalize_path(&item.source_path), item.source_line))
                .or_insert(i);
        }

        decoded.map(|items| Self {
            rcode: rcode.as_ref().to_owned(),
            items,
            source_index,
        })
    }

    /// Path of the r-code artifact the map was decoded from.
    pub fn rcode(&self) -> &Path {
        &self.rcode
    }

    pub fn items(&self) -> &[SourceMapItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item for a debug line.
    pub fn get(&self, debug_line: u32) -> Option<&SourceMapItem> {
        self.items
            .binary_search_by_key(&debug_line, |item| item.debug_line)
            .ok()
            .map(|i| &self.items[i])
    }

    /// The item for a source line, preferring the smallest debug line when the
    /// line was compiled more than once.
    pub fn find_source<P: AsRef<Path>>(&self, path: P, line: u32) -> Option<&SourceMapItem> {
        let key = (normalize_path(path.as_ref()), line);
        self.source_index.get(&key).map(|i| &self.items[*i])
    }

    /// Every source path in the map, sorted and unique.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        let paths: BTreeSet<&Path> = self
            .items
            .iter()
            .map(|item| item.source_path.as_path())
            .collect();

        paths.into_iter()
    }

    /// The mapped lines of a source path, sorted and unique.
    pub fn path_lines<P: AsRef<Path>>(&self, path: P) -> Option<impl Iterator<Item = u32>> {
        let path = normalize_path(path.as_ref());

        let lines: BTreeSet<u32> = self
            .source_index
            .keys()
            .filter(|(p, _)| *p == path)
            .map(|(_, line)| *line)
            .collect();

        if lines.is_empty() {
            return None;
        }

        Some(lines.into_iter())
    }

    pub fn translator(&self) -> PositionTranslator<'_> {
        PositionTranslator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(debug_line: u32, source_line: u32, path: &str) -> SourceMapItem {
        SourceMapItem::new(debug_line, source_line, path, "main.p")
    }

    #[test]
    fn orders_by_debug_line() {
        let map = SourceMap::new(
            "main.r",
            vec![item(3, 30, "a.p"), item(1, 10, "a.p"), item(2, 5, "b.i")],
        );

        let lines: Vec<u32> = map.items().iter().map(|i| i.debug_line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(map.rcode(), Path::new("main.r"));
    }

    #[test]
    fn duplicate_debug_line_keeps_smallest_source_line() {
        let decoded = SourceMap::build(
            "main.r",
            vec![item(5, 14, "a.p"), item(5, 12, "b.i"), item(6, 15, "a.p")],
        );

        assert_eq!(decoded.value.len(), 2);
        assert_eq!(decoded.value.get(5), Some(&item(5, 12, "b.i")));
        assert_eq!(
            decoded.diagnostics,
            vec![Diagnostic::DuplicateDebugLine {
                debug_line: 5,
                kept: 12,
                dropped: 14,
            }]
        );
    }

    #[test]
    fn find_source_prefers_smallest_debug_line() {
        let map = SourceMap::new(
            "main.r",
            vec![item(9, 2, "inc.i"), item(4, 2, "inc.i"), item(5, 3, "inc.i")],
        );

        assert_eq!(map.find_source("inc.i", 2).map(|i| i.debug_line), Some(4));
        assert_eq!(map.find_source("inc.i", 7), None);
    }

    #[test]
    fn find_source_normalizes_separators() {
        let map = SourceMap::new("main.r", vec![item(1, 1, r"src\inc\defs.i")]);

        assert!(map.find_source("src/inc/defs.i", 1).is_some());
        assert!(map.find_source(r"src\inc\defs.i", 1).is_some());
    }

    #[test]
    fn paths_and_lines() {
        let map = SourceMap::new(
            "main.r",
            vec![
                item(1, 3, "b.p"),
                item(2, 1, "a.i"),
                item(3, 2, "b.p"),
                item(4, 3, "b.p"),
            ],
        );

        let paths: Vec<&Path> = map.paths().collect();
        assert_eq!(paths, vec![Path::new("a.i"), Path::new("b.p")]);

        let lines: Vec<u32> = map.path_lines("b.p").unwrap().collect();
        assert_eq!(lines, vec![2, 3]);

        assert!(map.path_lines("missing.p").is_none());
    }

    #[test]
    fn json_round_trip_rebuilds_index() {
        let map = SourceMap::new("main.r", vec![item(1, 4, "a.p"), item(2, 5, "a.p")]);

        let json = serde_json::to_string(&map).unwrap();
        let back: SourceMap = serde_json::from_str(&json).unwrap();

        assert_eq!(back, map);
        assert_eq!(back.find_source("a.p", 5).map(|i| i.debug_line), Some(2));
    }
}
