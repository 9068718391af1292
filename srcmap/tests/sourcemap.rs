// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod common;

use std::path::Path;

use anyhow::Result;
use pretty_assertions::assert_eq;
use rcode::fixture::{root, RcodeBuilder};
use rcode::{Diagnostic, RawBytes, RcodeDecoder};
use srcmap::{
    assemble_decoded, ListingPosition, SourceMap, SourcePosition, UnmappedPositionError,
};

fn decode_orders() -> rcode::Decoded<SourceMap> {
    let raw = RawBytes::from_file_bytes(common::orders().build());
    let decoded = RcodeDecoder::default().decode(&raw).unwrap();

    assemble_decoded("build/orders.r", decoded)
}

#[test]
fn items() {
    let map = decode_orders().value;

    let items: Vec<(u32, &Path, u32)> = map
        .items()
        .iter()
        .map(|i| (i.debug_line, i.source_path.as_path(), i.source_line))
        .collect();

    let main = Path::new("src/main.p");
    let defs = Path::new("src/inc/defs.i");
    let top = Path::new("src/inc/top.i");
    let leaf = Path::new("src/inc/leaf.i");

    assert_eq!(
        items,
        vec![
            (1, main, 1),
            (2, main, 2),
            (3, main, 3),
            (4, defs, 1),
            (5, defs, 2),
            (6, main, 4),
            (7, main, 5),
            (8, main, 6),
            (9, top, 1),
            (12, leaf, 2),
        ]
    );

    assert!(map.items().iter().all(|i| i.proc_name == "src/main.p"));
    assert_eq!(map.rcode(), Path::new("build/orders.r"));
}

#[test]
fn diagnostics() {
    let diagnostics = decode_orders().diagnostics;

    assert_eq!(diagnostics.len(), 4);
    assert!(matches!(
        diagnostics[0],
        Diagnostic::UnclassifiedRecord { len: 25, .. }
    ));
    assert_eq!(
        diagnostics[1..].to_vec(),
        vec![
            Diagnostic::UnresolvedRecord {
                debug_num: 7,
                source_num: 10,
            },
            Diagnostic::InvertedRange {
                debug_num: 1,
                line_begin: 5,
                line_end: 2,
            },
            Diagnostic::DuplicateDebugLine {
                debug_line: 3,
                kept: 3,
                dropped: 10,
            },
        ]
    );
}

#[test]
fn paths() {
    let map = decode_orders().value;

    let paths: Vec<&Path> = map.paths().collect();
    assert_eq!(
        paths,
        vec![
            Path::new("src/inc/defs.i"),
            Path::new("src/inc/leaf.i"),
            Path::new("src/inc/top.i"),
            Path::new("src/main.p"),
        ]
    );

    let lines: Vec<u32> = map.path_lines("src/main.p").unwrap().collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 5, 6]);

    // nested.i only claimed a debug line that main.p kept
    assert!(map.path_lines("src/inc/nested.i").is_none());
}

#[test]
fn translate() {
    let map = decode_orders().value;
    let translator = map.translator();

    assert_eq!(
        translator.to_listing_position("src/inc/defs.i", 2, 7),
        Ok(ListingPosition::new(5, 7))
    );
    assert_eq!(
        translator.to_listing_position(r"src\inc\top.i", 1, 0),
        Ok(ListingPosition::new(9, 0))
    );
    assert_eq!(
        translator.to_source_position(7, 3),
        Ok(SourcePosition::new("src/main.p", 5, 3))
    );

    assert_eq!(
        translator.to_source_position(10, 0),
        Err(UnmappedPositionError::Listing { line: 10 })
    );
    assert!(translator.to_listing_position("src/main.p", 7, 0).is_err());
}

#[test]
fn translate_round_trip() {
    let map = decode_orders().value;
    let translator = map.translator();

    for item in map.items() {
        let listing = translator
            .to_listing_position(&item.source_path, item.source_line, 1)
            .unwrap();
        assert_eq!(listing.line, item.debug_line);

        let source = translator.to_source_position(listing.line, 1).unwrap();
        assert_eq!(
            source,
            SourcePosition::new(&item.source_path, item.source_line, 1)
        );
    }
}

#[test]
fn json_round_trip() -> Result<()> {
    let map = decode_orders().value;

    let json = serde_json::to_string_pretty(&map)?;
    let back: SourceMap = serde_json::from_str(&json)?;

    assert_eq!(back, map);
    assert_eq!(
        back.translator().to_listing_position("src/inc/leaf.i", 2, 0),
        Ok(ListingPosition::new(12, 0))
    );

    Ok(())
}

#[test]
fn huge_line_range_is_skipped() {
    let artifact = RcodeBuilder::new()
        .record(1, 1, 20_000_000, 1)
        .record(1, 1, 3, 1)
        .chunk(root(
            1,
            [0x01020304, 0x0a0b0c0d, 0x11121314, 0x21222324],
            "m.p",
        ))
        .build();

    let raw = RawBytes::from_file_bytes(artifact);
    let decoded = RcodeDecoder::default().decode(&raw).unwrap();
    let map = assemble_decoded("m.r", decoded);

    assert_eq!(map.value.len(), 3);
    assert_eq!(
        map.diagnostics,
        vec![Diagnostic::ImplausibleRange {
            debug_num: 1,
            line_begin: 1,
            line_end: 20_000_000,
        }]
    );
}
