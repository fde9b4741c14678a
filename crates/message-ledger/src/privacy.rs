//! Privacy codec for phone numbers.
//!
//! Phone numbers are PII. Unregistered senders are logged under a one-way
//! correlation token; operator-facing renders only ever see the masked
//! form. Both functions are pure and total.

use sha2::{Digest, Sha256};

/// Prefix marking a correlation token as distinct from a real user id.
const TOKEN_PREFIX: &str = "unknown_";

/// Placeholder for masked digits.
const MASK: &str = "***-***-";

/// Derive a deterministic, non-reversible correlation token for a phone
/// number. The same phone always yields the same token, so repeated
/// messages from an unknown sender correlate without the number ever
/// being stored.
pub fn correlation_token(phone_number: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(phone_number.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}{}", TOKEN_PREFIX, &digest[..16])
}

/// Whether an identifier is a correlation token rather than a user id.
pub fn is_correlation_token(identifier: &str) -> bool {
    identifier.starts_with(TOKEN_PREFIX)
}

/// Mask a phone number to its last 4 characters.
///
/// Anything shorter than 4 characters yields a fully opaque placeholder,
/// which is also the safest output for malformed input. Counts characters,
/// not bytes, so arbitrary input never slices inside a code point.
pub fn masked_display(phone_number: &str) -> String {
    let Some((start, _)) = phone_number.char_indices().rev().nth(3) else {
        return "***".into();
    };
    format!("{}{}", MASK, &phone_number[start..])
}

/// Validate E.164 format: `+`, a leading 1-9 digit, 2 to 15 digits total.
pub fn is_valid_e164(phone_number: &str) -> bool {
    let Some(digits) = phone_number.strip_prefix('+') else {
        return false;
    };
    if digits.len() < 2 || digits.len() > 15 {
        return false;
    }
    let mut chars = digits.chars();
    matches!(chars.next(), Some('1'..='9')) && chars.all(|c| c.is_ascii_digit())
}

/// Normalize a phone number to E.164 format.
pub fn normalize_phone_number(number: &str) -> Result<String, String> {
    let has_plus = number.starts_with('+');
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Err("Phone number must contain at least one digit".into());
    }

    if digits.len() < 7 {
        return Err("Phone number too short".into());
    }

    if digits.len() > 15 {
        return Err("Phone number too long".into());
    }

    if has_plus || digits.len() >= 10 {
        Ok(format!("+{}", digits))
    } else {
        Err("Phone number must include country code".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_token_deterministic() {
        let a = correlation_token("+14155551234");
        let b = correlation_token("+14155551234");
        let c = correlation_token("+14155551235");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_correlation_token_shape() {
        let token = correlation_token("+14155551234");

        assert!(token.starts_with("unknown_"));
        assert_eq!(token.len(), "unknown_".len() + 16);
        assert!(is_correlation_token(&token));
        assert!(!is_correlation_token("b3e2a1f0-user-id"));
        // The raw number must not survive into the token
        assert!(!token.contains("4155551234"));
    }

    #[test]
    fn test_masked_display_last_four_only() {
        assert_eq!(masked_display("+14155551234"), "***-***-1234");
        assert_eq!(masked_display("+4479460958"), "***-***-0958");
    }

    #[test]
    fn test_masked_display_short_input() {
        assert_eq!(masked_display(""), "***");
        assert_eq!(masked_display("+1"), "***");
        assert_eq!(masked_display("123"), "***");
    }

    #[test]
    fn test_masked_display_multibyte_input() {
        // Garbage from the transport must never panic the codec
        assert_eq!(masked_display("€€"), "***");
        assert_eq!(masked_display("€€€€"), "***-***-€€€€");
        assert_eq!(masked_display("€€€€5678"), "***-***-5678");
    }

    #[test]
    fn test_is_valid_e164() {
        assert!(is_valid_e164("+14155551234"));
        assert!(is_valid_e164("+442079460958"));
        assert!(!is_valid_e164("14155551234"));
        assert!(!is_valid_e164("+0155551234"));
        assert!(!is_valid_e164("+1415555123456789"));
        assert!(!is_valid_e164("+1415abc1234"));
        assert!(!is_valid_e164("+"));
        assert!(!is_valid_e164(""));
    }

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(
            normalize_phone_number("+1 (415) 555-1234"),
            Ok("+14155551234".into())
        );
        assert_eq!(
            normalize_phone_number("14155551234"),
            Ok("+14155551234".into())
        );
        assert!(normalize_phone_number("123").is_err());
        assert!(normalize_phone_number("").is_err());
    }
}
