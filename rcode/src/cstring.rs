// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::diagnostic::{Decoded, Diagnostic};
use crate::options::DecodeOptions;
use crate::symbols::symbol;

/// Decodes NUL-terminated strings embedded in r-code records.
///
/// Decoding never fails. A byte outside the accepted range ends the string
/// early with a diagnostic, since a truncated filename is more useful than
/// none.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringDecoder {
    extended: bool,
}

impl StringDecoder {
    pub fn new(options: &DecodeOptions) -> Self {
        Self {
            extended: options.extended_filenames,
        }
    }

    pub fn decode(&self, bytes: &[u8], start: usize) -> Decoded<String> {
        let mut decoded = Decoded::new(String::new());

        for (offset, byte) in bytes.iter().enumerate().skip(start) {
            if *byte == 0 {
                return decoded;
            }

            let sym = symbol(*byte);

            match sym.glyph {
                Some(c) if sym.is_printable() || (self.extended && sym.is_extended()) => {
                    decoded.value.push(c)
                }
                _ => {
                    decoded.report(Diagnostic::InvalidByte {
                        offset,
                        byte: *byte,
                        symbol: sym.name.clone(),
                    });
                    return decoded;
                }
            }
        }

        decoded.report(Diagnostic::UnterminatedString { offset: start });
        decoded
    }
}

/// Decode with the default, printable-ASCII-only policy.
pub fn decode_cstring(bytes: &[u8], start: usize) -> Decoded<String> {
    StringDecoder::default().decode(bytes, start)
}
