//! Mapping from UTF-8 text to the controller's character codes.
//!
//! The HD44780 character ROM is not UTF-8, so the five accented letters needed for
//! Portuguese text are drawn as custom glyphs in CGRAM slots 0-4 and the matching
//! two-byte UTF-8 sequences are rewritten to those slot numbers. Every other byte is
//! sent to the controller unchanged.

/// UTF-8 lead byte of the two-byte sequences covering U+00C0..U+00FF
pub const UTF8_LATIN1_LEAD: u8 = 0xC3;

/// Number of CGRAM slots the controller provides for custom glyphs
pub const CUSTOM_CHAR_SLOTS: u8 = 8;

/// Bitmaps for á, é, ç, ã and õ, in CGRAM slot order. Each byte is one pixel row,
/// low five bits used.
pub static ACCENTED_GLYPHS: [[u8; 8]; 5] = [
    [0x02, 0x04, 0x0E, 0x01, 0x0F, 0x11, 0x0F, 0x00], // á
    [0x02, 0x04, 0x0E, 0x11, 0x1F, 0x10, 0x0E, 0x00], // é
    [0x00, 0x0F, 0x10, 0x10, 0x0F, 0x02, 0x0E, 0x00], // ç
    [0x0D, 0x12, 0x06, 0x01, 0x0F, 0x11, 0x0F, 0x00], // ã
    [0x0D, 0x12, 0x00, 0x0E, 0x11, 0x11, 0x0E, 0x00], // õ
];

/// Returns the custom glyph slot for a two-byte UTF-8 sequence, or `None` if the
/// sequence is not one of the supported accented letters.
pub fn glyph_for_utf8_pair(lead: u8, continuation: u8) -> Option<u8> {
    if lead != UTF8_LATIN1_LEAD {
        return None;
    }
    match continuation {
        0xA1 => Some(0), // á
        0xA9 => Some(1), // é
        0xA7 => Some(2), // ç
        0xA3 => Some(3), // ã
        0xB5 => Some(4), // õ
        _ => None,
    }
}

/// Converts a character code to the byte sent to the controller. `code` may hold a
/// two-byte UTF-8 sequence as `0xC3XX`; supported accented letters become their glyph
/// slot, anything else is truncated to its low byte.
pub fn remap_character_code(code: u32) -> u8 {
    if code >> 8 == UTF8_LATIN1_LEAD as u32 {
        if let Some(glyph) = glyph_for_utf8_pair(UTF8_LATIN1_LEAD, code as u8) {
            return glyph;
        }
    }
    code as u8
}

/// Iterator over the controller bytes for a UTF-8 encoded byte string.
///
/// Iteration stops at the first NUL byte or at the end of the slice. A `0xC3` lead
/// byte consumes the following byte; if the pair is not a supported accented letter
/// both bytes are dropped.
pub struct Utf8Remap<'a> {
    bytes: core::slice::Iter<'a, u8>,
}

impl<'a> Utf8Remap<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { bytes: text.iter() }
    }
}

impl Iterator for Utf8Remap<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            let byte = *self.bytes.next()?;
            if byte == 0 {
                return None;
            }
            if byte != UTF8_LATIN1_LEAD {
                return Some(byte);
            }
            let continuation = *self.bytes.next()?;
            if continuation == 0 {
                return None;
            }
            if let Some(glyph) = glyph_for_utf8_pair(byte, continuation) {
                return Some(glyph);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::vec::Vec;

    fn remap(text: &[u8]) -> Vec<u8> {
        Utf8Remap::new(text).collect()
    }

    #[test]
    fn test_glyph_lookup() {
        assert_eq!(glyph_for_utf8_pair(0xC3, 0xA1), Some(0));
        assert_eq!(glyph_for_utf8_pair(0xC3, 0xA9), Some(1));
        assert_eq!(glyph_for_utf8_pair(0xC3, 0xA7), Some(2));
        assert_eq!(glyph_for_utf8_pair(0xC3, 0xA3), Some(3));
        assert_eq!(glyph_for_utf8_pair(0xC3, 0xB5), Some(4));
        // ñ is not in the table
        assert_eq!(glyph_for_utf8_pair(0xC3, 0xB1), None);
        // right continuation, wrong lead
        assert_eq!(glyph_for_utf8_pair(0xC2, 0xA1), None);
    }

    #[test]
    fn test_glyph_lookup_matches_str_encoding() {
        for (index, letter) in ["á", "é", "ç", "ã", "õ"].iter().enumerate() {
            let bytes = letter.as_bytes();
            assert_eq!(bytes.len(), 2);
            assert_eq!(glyph_for_utf8_pair(bytes[0], bytes[1]), Some(index as u8));
        }
    }

    #[test]
    fn test_remap_character_code() {
        assert_eq!(remap_character_code(b'A' as u32), b'A');
        assert_eq!(remap_character_code(0xC3A1), 0);
        assert_eq!(remap_character_code(0xC3B5), 4);
        // unsupported accented letter falls back to the low byte
        assert_eq!(remap_character_code(0xC3B1), 0xB1);
        // lead byte only matters in the second byte position
        assert_eq!(remap_character_code(0x01C3A1), 0xA1);
        assert_eq!(remap_character_code(0xC2A1), 0xA1);
    }

    #[test]
    fn test_remap_plain_ascii() {
        assert_eq!(remap(b"Hello, world!"), b"Hello, world!");
    }

    #[test]
    fn test_remap_accented_text() {
        assert_eq!(remap("Olá".as_bytes()), std::vec![b'O', b'l', 0]);
        assert_eq!(
            remap("ação é".as_bytes()),
            std::vec![b'a', 2, 3, b'o', b' ', 1]
        );
        assert_eq!(remap("ãé".as_bytes()), std::vec![3, 1]);
    }

    #[test]
    fn test_remap_drops_unsupported_pairs() {
        // "señor": ñ is dropped entirely
        assert_eq!(remap("señor".as_bytes()), b"seor");
        assert_eq!(remap(&[b'a', 0xC3, 0x80, b'b']), std::vec![b'a', b'b']);
    }

    #[test]
    fn test_remap_stops_at_nul() {
        assert_eq!(remap(b"ab\0cd"), b"ab");
        assert_eq!(remap(&[b'a', 0xC3, 0x00, b'b']), std::vec![b'a']);
        assert!(remap(b"\0").is_empty());
        assert!(remap(b"").is_empty());
    }

    #[test]
    fn test_remap_trailing_lead_byte() {
        assert_eq!(remap(&[b'x', 0xC3]), std::vec![b'x']);
    }

    #[test]
    fn test_other_multibyte_passes_through() {
        // only 0xC3 sequences are interpreted; other lead bytes go out raw
        assert_eq!(remap("°".as_bytes()), std::vec![0xC2, 0xB0]);
    }

    #[test]
    fn test_glyph_rows_fit_5x8_cell() {
        for glyph in ACCENTED_GLYPHS.iter() {
            assert!(glyph.iter().all(|row| row & !0x1F == 0));
        }
    }
}
