// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Byte symbol table for strings embedded in r-code.
//!
//! Every byte value has a symbolic name for diagnostics. High-bit values also
//! carry a glyph from the legacy DOS code page (437) that the compiler's output
//! matches, which is not the Latin-1 reading of the same byte: 194 is `┬`,
//! not `Â`.

use lazy_static::lazy_static;

const CONTROL_NAMES: [&str; 32] = [
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "HT", "LF", "VT", "FF", "CR",
    "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC",
    "FS", "GS", "RS", "US",
];

#[rustfmt::skip]
const HIGH_GLYPHS: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

lazy_static! {
    static ref SYMBOLS: Vec<Symbol> = (0..=u8::MAX).map(Symbol::new).collect();
}

/// One entry of the symbol table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    pub byte: u8,
    pub name: String,

    /// Text the byte stands for, if any. Control bytes have none.
    pub glyph: Option<char>,
}

impl Symbol {
    fn new(byte: u8) -> Self {
        let (name, glyph) = match byte {
            0..=31 => (CONTROL_NAMES[byte as usize].to_owned(), None),
            32 => ("SP".to_owned(), Some(' ')),
            33..=126 => {
                let c = byte as char;
                (format!("'{c}'"), Some(c))
            }
            127 => ("DEL".to_owned(), None),
            128..=255 => {
                let c = HIGH_GLYPHS[(byte - 128) as usize];
                (format!("x{byte:02X} '{c}'"), Some(c))
            }
        };

        Self { byte, name, glyph }
    }

    /// Printable ASCII, the only range accepted in strict string decoding.
    pub fn is_printable(&self) -> bool {
        (32..=126).contains(&self.byte)
    }

    pub fn is_extended(&self) -> bool {
        self.byte >= 128
    }
}

pub fn symbol(byte: u8) -> &'static Symbol {
    &SYMBOLS[byte as usize]
}
