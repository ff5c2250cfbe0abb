//! UTF-8 ⇄ UTF-16 conversion for strings crossing the transport boundary.
//!
//! The engine's client API speaks UTF-16 for variable names, statements and
//! captured streams; everything on the local side is &str. The conversion is
//! owned here so no caller ever handles raw code units.

/// Encode a local string for the engine boundary.
pub fn to_utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// Decode an engine-provided stream or name. Unpaired surrogates are
/// replaced rather than propagated.
pub fn from_utf16(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_round_trip() {
        let s = "y = x * 2";
        assert_eq!(from_utf16(&to_utf16(s)), s);
    }

    #[test]
    fn test_non_bmp_round_trip() {
        // Surrogate pairs survive the round trip.
        let s = "résultat 𝜋 ≈ 3.14159";
        assert_eq!(from_utf16(&to_utf16(s)), s);
    }

    #[test]
    fn test_lone_surrogate_is_replaced() {
        let out = from_utf16(&[0xD800, b'a' as u16]);
        assert_eq!(out, "\u{FFFD}a");
    }
}
