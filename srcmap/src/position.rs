// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::item::{ListingPosition, SourcePosition};
use crate::sourcemap::SourceMap;

/// A position with no counterpart in the other coordinate space.
///
/// Callers are expected to fall back to an unmapped state rather than treat
/// this as fatal.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum UnmappedPositionError {
    #[error("`{}` line {line} is not mapped to a debug line", path.display())]
    Source { path: PathBuf, line: u32 },

    #[error("debug listing line {line} is not mapped to a source line")]
    Listing { line: u32 },
}

/// Translates positions between source files and the debug listing.
///
/// Columns pass through unchanged; the format only maps lines.
#[derive(Clone, Copy, Debug)]
pub struct PositionTranslator<'a> {
    map: &'a SourceMap,
}

impl<'a> PositionTranslator<'a> {
    pub fn new(map: &'a SourceMap) -> Self {
        Self { map }
    }

    /// The listing position of a source position.
    ///
    /// If the source line was compiled more than once (an include expanded
    /// several times), the smallest debug line is returned.
    pub fn to_listing_position<P: AsRef<Path>>(
        &self,
        source_path: P,
        source_line: u32,
        source_column: u32,
    ) -> Result<ListingPosition, UnmappedPositionError> {
        let source_path = source_path.as_ref();

        let item = self
            .map
            .find_source(source_path, source_line)
            .ok_or_else(|| UnmappedPositionError::Source {
                path: source_path.to_owned(),
                line: source_line,
            })?;

        Ok(ListingPosition::new(item.debug_line, source_column))
    }

    /// The source position of a listing position.
    ///
    /// If several source lines shared the debug line, the smallest source
    /// line is returned.
    pub fn to_source_position(
        &self,
        listing_line: u32,
        listing_column: u32,
    ) -> Result<SourcePosition, UnmappedPositionError> {
        let item = self
            .map
            .get(listing_line)
            .ok_or(UnmappedPositionError::Listing { line: listing_line })?;

        Ok(SourcePosition::new(
            &item.source_path,
            item.source_line,
            listing_column,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::SourceMapItem;
    use pretty_assertions::assert_eq;

    fn map() -> SourceMap {
        SourceMap::new(
            "a.r",
            vec![
                SourceMapItem::new(5, 12, "a.p", "a.p"),
                SourceMapItem::new(6, 13, "a.p", "a.p"),
                SourceMapItem::new(7, 1, "inc/b.i", "a.p"),
            ],
        )
    }

    #[test]
    fn round_trip() {
        let map = map();
        let translator = map.translator();

        let listing = translator.to_listing_position("a.p", 12, 3).unwrap();
        assert_eq!(listing, ListingPosition::new(5, 3));

        let source = translator
            .to_source_position(listing.line, listing.column)
            .unwrap();
        assert_eq!(source, SourcePosition::new("a.p", 12, 3));
    }

    #[test]
    fn unmapped_source() {
        let map = map();

        assert_eq!(
            map.translator().to_listing_position("missing.p", 1, 0),
            Err(UnmappedPositionError::Source {
                path: PathBuf::from("missing.p"),
                line: 1,
            })
        );
    }

    #[test]
    fn unmapped_listing() {
        let map = map();

        assert_eq!(
            map.translator().to_source_position(99, 0),
            Err(UnmappedPositionError::Listing { line: 99 })
        );
    }

    #[test]
    fn shared_debug_line_resolves_to_smallest_source_line() {
        let map = SourceMap::new(
            "a.r",
            vec![
                SourceMapItem::new(8, 21, "a.p", "a.p"),
                SourceMapItem::new(8, 20, "a.p", "a.p"),
            ],
        );

        let source = map.translator().to_source_position(8, 4).unwrap();
        assert_eq!(source, SourcePosition::new("a.p", 20, 4));
    }

    #[test]
    fn repeated_source_line_resolves_to_smallest_debug_line() {
        let map = SourceMap::new(
            "a.r",
            vec![
                SourceMapItem::new(30, 2, "inc/b.i", "a.p"),
                SourceMapItem::new(10, 2, "inc/b.i", "a.p"),
            ],
        );

        let listing = map
            .translator()
            .to_listing_position("inc/b.i", 2, 0)
            .unwrap();
        assert_eq!(listing.line, 10);
    }

    #[test]
    fn column_passes_through() {
        let map = map();

        let listing = map
            .translator()
            .to_listing_position("inc/b.i", 1, 17)
            .unwrap();
        assert_eq!(listing, ListingPosition::new(7, 17));
    }
}
