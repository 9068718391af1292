// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;
use std::path::Path;

use log::*;
use rcode::{Decoded, DecodedRcode, Diagnostic, FileMapRecord, IncludeRecord, ModuleLines};

use crate::item::SourceMapItem;
use crate::sourcemap::SourceMap;

/// Most debug lines a single artifact may map.
pub const MAX_DEBUG_LINES: usize = 1 << 20;

/// Merge decoded file-map records and include records into a [`SourceMap`].
///
/// Each file-map record covers source lines `line_begin..=line_end` of the
/// include whose debug number matches its own, compiled to consecutive debug
/// lines starting at `source_num`. Records that name no include, whose range
/// is inverted, or whose range would take the map past [`MAX_DEBUG_LINES`]
/// are reported and skipped. A record whose debug lines run past `u32::MAX`
/// is cut off at the overflow.
pub fn assemble<P: AsRef<Path>>(
    rcode: P,
    file_map: &[FileMapRecord],
    module_lines: &ModuleLines,
) -> Decoded<SourceMap> {
    let rcode = rcode.as_ref();
    let mut decoded = Decoded::new(());

    let proc_name = proc_name(rcode, module_lines);

    let includes: BTreeMap<u32, &IncludeRecord> = module_lines
        .includes
        .iter()
        .rev()
        .map(|record| (record.debug_num, record))
        .collect();

    let mut items: Vec<SourceMapItem> = Vec::new();

    for record in file_map {
        let include = match includes.get(&u32::from(record.debug_num)) {
            Some(include) => include,
            None => {
                decoded.report(Diagnostic::UnresolvedRecord {
                    debug_num: record.debug_num,
                    source_num: record.source_num,
                });
                continue;
            }
        };

        if record.line_end < record.line_begin {
            decoded.report(Diagnostic::InvertedRange {
                debug_num: record.debug_num,
                line_begin: record.line_begin,
                line_end: record.line_end,
            });
            continue;
        }

        let span = u64::from(record.line_end - record.line_begin) + 1;
        let remaining = (MAX_DEBUG_LINES - items.len()) as u64;

        if span > remaining {
            decoded.report(Diagnostic::ImplausibleRange {
                debug_num: record.debug_num,
                line_begin: record.line_begin,
                line_end: record.line_end,
            });
            continue;
        }

        for (source_line, offset) in record.lines().zip(0u32..) {
            let debug_line = match record.source_num.checked_add(offset) {
                Some(debug_line) => debug_line,
                None => {
                    decoded.report(Diagnostic::DebugLineOverflow {
                        debug_num: record.debug_num,
                        source_num: record.source_num,
                        source_line,
                    });
                    break;
                }
            };

            items.push(SourceMapItem::new(
                debug_line,
                source_line,
                &include.source_filename,
                &proc_name,
            ));
        }
    }

    let map = decoded.absorb(SourceMap::build(rcode, items));

    debug!(
        "assembled {} source map items for {}",
        map.len(),
        rcode.display()
    );

    decoded.map(|_| map)
}

/// Assemble straight from a decoded artifact.
pub fn assemble_decoded<P: AsRef<Path>>(
    rcode: P,
    decoded: Decoded<DecodedRcode>,
) -> Decoded<SourceMap> {
    let (value, mut diagnostics) = decoded.into_parts();

    let mut map = assemble(rcode, &value.file_map, &value.module_lines);
    diagnostics.append(&mut map.diagnostics);
    map.diagnostics = diagnostics;

    map
}

/// Name of the compiled procedure: the main program's filename, falling back
/// to the artifact name.
fn proc_name(rcode: &Path, module_lines: &ModuleLines) -> String {
    match module_lines.main_program() {
        Some(main) if !main.source_filename.is_empty() => main.source_filename.clone(),
        _ => rcode
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
