//! Hex and base64url helpers.
//!
//! Keys and `proofValue` signatures travel as hex, optionally `0x`-prefixed.
//! JWT segments and JWK coordinates travel as unpadded base64url; decoding
//! tolerates trailing `=` padding since some issuers emit it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::EncodingError;

/// Strip a leading `0x`/`0X` prefix. Leading zeros of the value are kept.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string, accepting an optional `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, EncodingError> {
    Ok(hex::decode(strip_hex_prefix(s.trim()))?)
}

/// Lowercase hex without prefix.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Unpadded base64url.
pub fn base64url_encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url, with or without padding.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, EncodingError> {
    Ok(URL_SAFE_NO_PAD.decode(s.trim_end_matches('='))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_prefix_keeps_leading_zeros() {
        assert_eq!(strip_hex_prefix("0x00ab"), "00ab");
        assert_eq!(strip_hex_prefix("0X0f"), "0f");
        assert_eq!(strip_hex_prefix("00ab"), "00ab");
    }

    #[test]
    fn decode_hex_with_prefix() {
        assert_eq!(decode_hex("0x0102").unwrap(), vec![1, 2]);
        assert!(decode_hex("0xzz").is_err());
    }

    #[test]
    fn base64url_tolerates_padding() {
        let encoded = base64url_encode([0xfbu8, 0xff]);
        assert_eq!(encoded, "-_8");
        assert_eq!(base64url_decode("-_8=").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(base64url_decode(&encoded).unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn base64url_rejects_standard_alphabet() {
        assert!(base64url_decode("+/8").is_err());
    }
}
