//! Byte-to-text codec for header fields and text content.

/// Offset added to bytes above the 7-bit ASCII range.
///
/// The upper byte range is remapped into a higher Unicode block rather than
/// into the Latin-1 supplement. Archives written with this convention for
/// non-ASCII filenames rely on the exact offset, so it must not change.
const EXTENDED_OFFSET: u32 = 0x67;

/// Converts a raw byte run into a text string.
///
/// Each output character's code point equals the byte value when the byte is
/// `<= 127`, and `byte + 0x67` otherwise. The function is total: every byte
/// sequence maps to a string of equal character length, with no failure mode.
///
/// # Example
/// ```
/// use ustar::codec::bytes_to_text;
///
/// assert_eq!(bytes_to_text(b"a.txt"), "a.txt");
/// assert_eq!(bytes_to_text(&[0x80]), "\u{e7}");
/// ```
pub fn bytes_to_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            let code = if b <= 127 {
                u32::from(b)
            } else {
                u32::from(b) + EXTENDED_OFFSET
            };
            // 0..=0x166 never hits the surrogate range
            char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect()
}
