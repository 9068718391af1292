// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! # srcmap
//!
//! srcmap turns the debug information embedded in a compiled r-code artifact
//! into a `SourceMap`: a table correlating each line of the debug listing
//! with the source file and line it was compiled from. The byte-level decoding
//! lives in the `rcode` crate; this crate assembles its output and answers
//! position queries against it.
//!
//! ```text
//!                   ┌──────────────┐   FileMapRecord   ┌────────────┐
//!  orders.r ───────►│ RcodeDecoder │──────────────────►│  assemble  │
//!                   └──────────────┘   IncludeRecord   └─────┬──────┘
//!                                                            │
//!                                                            ▼
//!                 ┌──────────────────────────────────────────────────┐
//!                 │ SourceMap                                        │
//!                 │   debug 1 -> src/orders.p:1                      │
//!                 │   debug 2 -> src/orders.p:2                      │
//!                 │   debug 3 -> src/inc/defs.i:1                    │
//!                 └──────────────────────────────────────────────────┘
//! ```
//!
//! A `PositionTranslator` borrowed from a `SourceMap` converts between the two
//! coordinate spaces:
//!  - source path + line to listing line (smallest debug line wins)
//!  - listing line to source path + line
//!
//! `SourceMapCache` holds one `SourceMap` per artifact path, shares a single
//! decode between concurrent requests, and rebuilds when the artifact's
//! modification time changes.

mod assemble;
mod cache;
mod config;
mod item;
mod position;
mod sourcemap;

pub use crate::assemble::{assemble, assemble_decoded, MAX_DEBUG_LINES};
pub use crate::cache::SourceMapCache;
pub use crate::config::Config;
pub use crate::item::{ListingPosition, SourceMapItem, SourcePosition};
pub use crate::position::{PositionTranslator, UnmappedPositionError};
pub use crate::sourcemap::SourceMap;
