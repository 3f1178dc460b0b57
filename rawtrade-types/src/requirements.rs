//! Encoding of an order's special requirements into the contract's
//! `bytes32 _encryptedSpecialRequirements` argument.
//!
//! The text is cut to its first 31 characters and stored as UTF-8, NUL-padded
//! to 32 bytes; the last byte is always a NUL terminator. Anything after the
//! 31st character is dropped without notice. Whether the contract intended this
//! lossy field or a placeholder for real encryption is unresolved, so the
//! behavior is kept exactly.

use crate::constants::MAX_SPECIAL_REQUIREMENTS_CHARS;
use crate::error::DomainError;
use crate::primitives::B256;

/// First 31 characters of `text`.
pub fn truncate_requirements(text: &str) -> &str {
    match text.char_indices().nth(MAX_SPECIAL_REQUIREMENTS_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// Encode special requirements as a NUL-terminated bytes32 string.
///
/// Fails when the truncated text is still longer than 31 bytes, which only
/// happens with multi-byte characters.
pub fn encode_requirements(text: &str) -> Result<B256, DomainError> {
    let bytes = truncate_requirements(text).as_bytes();
    if bytes.len() > MAX_SPECIAL_REQUIREMENTS_CHARS {
        return Err(DomainError::RequirementsTooLong { len: bytes.len() });
    }
    let mut word = [0u8; 32];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(word))
}

/// Decode a bytes32 string produced by [`encode_requirements`].
pub fn decode_requirements(word: &B256) -> Result<String, DomainError> {
    let bytes = word.as_slice();
    if bytes[31] != 0 {
        return Err(DomainError::InvalidBytes32 {
            reason: "missing NUL terminator".to_string(),
        });
    }
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8(bytes[..end].to_vec()).map_err(|e| DomainError::InvalidBytes32 {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_requirements_encode_to_zero() {
        assert_eq!(encode_requirements("").unwrap(), B256::ZERO);
        assert_eq!(decode_requirements(&B256::ZERO).unwrap(), "");
    }

    #[test]
    fn test_short_text_is_lossless() {
        let word = encode_requirements("Keep dry").unwrap();
        assert_eq!(&word[..8], b"Keep dry");
        assert!(word[8..].iter().all(|b| *b == 0));
        assert_eq!(decode_requirements(&word).unwrap(), "Keep dry");
    }

    #[test]
    fn test_exactly_31_chars_is_lossless() {
        let text = "a".repeat(31);
        let word = encode_requirements(&text).unwrap();
        assert_eq!(word[31], 0);
        assert_eq!(decode_requirements(&word).unwrap(), text);
    }

    #[test]
    fn test_long_text_truncates_silently() {
        let text = "Deliver in sealed drums, palletised, no mixed lots please";
        let word = encode_requirements(text).unwrap();
        let decoded = decode_requirements(&word).unwrap();
        assert_eq!(decoded, &text[..31]);
        assert_eq!(decoded.chars().count(), 31);
    }

    #[test]
    fn test_multibyte_overflow_is_rejected() {
        // 31 characters, 62 bytes.
        let text = "é".repeat(40);
        assert_eq!(
            encode_requirements(&text),
            Err(DomainError::RequirementsTooLong { len: 62 })
        );
    }

    #[test]
    fn test_decode_rejects_unterminated_word() {
        let word = B256::repeat_byte(b'a');
        assert!(decode_requirements(&word).is_err());
    }

    proptest! {
        #[test]
        fn prop_ascii_encodes_its_31_char_prefix(text in "[ -~]{0,80}") {
            let word = encode_requirements(&text).unwrap();
            let decoded = decode_requirements(&word).unwrap();
            let expected: String = text.chars().take(31).collect();
            prop_assert_eq!(decoded, expected);
        }
    }
}
