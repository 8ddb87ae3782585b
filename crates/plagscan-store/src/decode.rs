//! Text decoding with a single-byte fallback

/// Encoding that was used to decode a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Valid UTF-8 (a leading BOM is dropped)
    Utf8,
    /// ISO-8859-1; every byte maps to the code point of the same value
    Latin1,
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode raw bytes as UTF-8, falling back to Latin-1
///
/// The fallback never fails, so every byte sequence yields some text.
pub fn decode(bytes: &[u8]) -> (String, TextEncoding) {
    let without_bom = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(without_bom) {
        Ok(text) => (text.to_string(), TextEncoding::Utf8),
        Err(_) => (without_bom.iter().map(|&b| b as char).collect(), TextEncoding::Latin1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8() {
        let (text, encoding) = decode("héllo".as_bytes());
        assert_eq!(text, "héllo");
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_bom_stripped() {
        let (text, encoding) = decode(b"\xEF\xBB\xBFint x;");
        assert_eq!(text, "int x;");
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_latin1_fallback() {
        // 0xE9 alone is invalid UTF-8 but is 'é' in Latin-1
        let (text, encoding) = decode(b"caf\xE9");
        assert_eq!(text, "café");
        assert_eq!(encoding, TextEncoding::Latin1);
    }

    #[test]
    fn test_bom_stripped_before_fallback() {
        let (text, encoding) = decode(b"\xEF\xBB\xBFcaf\xE9");
        assert_eq!(text, "café");
        assert_eq!(encoding, TextEncoding::Latin1);
    }

    #[test]
    fn test_fallback_never_fails() {
        let bytes: Vec<u8> = (0..=255).collect();
        let (text, encoding) = decode(&bytes);
        assert_eq!(encoding, TextEncoding::Latin1);
        assert_eq!(text.chars().count(), 256);
    }
}
