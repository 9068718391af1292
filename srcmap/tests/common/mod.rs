// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use rcode::fixture::{file_boundary, inline_ref, root, RcodeBuilder};

/// A main program with three includes, one junk sub-record, and file-map
/// records that exercise every assembly diagnostic.
pub fn orders() -> RcodeBuilder {
    RcodeBuilder::new()
        // main.p 1..=3 -> debug 1..=3
        .record(1, 1, 3, 1)
        // defs.i 1..=2 -> debug 4..=5
        .record(4, 1, 2, 2)
        // main.p 4..=6 -> debug 6..=8
        .record(6, 4, 6, 1)
        // top.i 1 -> debug 9
        .record(9, 1, 1, 3)
        // no include with debug number 7
        .record(10, 1, 1, 7)
        // inverted
        .record(11, 5, 2, 1)
        // leaf.i 2 -> debug 12
        .record(12, 2, 2, 5)
        // nested.i 10 -> debug 3, already claimed by main.p 3
        .record(3, 10, 10, 4)
        .chunk(root(
            1,
            [0x01020304, 0x0a0b0c0d, 0x11121314, 0x21222324],
            "src/main.p",
        ))
        .field(inline_ref(
            2,
            [0x31323334, 0x41424344, 0x51525354, 0x61626364],
            "src/inc/defs.i",
        ))
        .field(file_boundary(
            3,
            [0x71727374, 0x01010101, 0x02020202, 0x03030303],
            29,
            "src/inc/top.i",
        ))
        .chunk(root(
            4,
            [0x04050607, 0x08090a0b, 0x0c0d0e0f, 0x10111213],
            "src/inc/nested.i",
        ))
        .field(std::iter::once(9).chain(1..=24).collect())
        .field(inline_ref(
            5,
            [0x14151617, 0x18191a1b, 0x1c1d1e1f, 0x20212223],
            "src/inc/leaf.i",
        ))
}
