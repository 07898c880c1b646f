//! Name validation and the tiered price schedule.

use unicode_normalization::UnicodeNormalization;

use crate::config::NamePolicy;
use crate::error::GnsError;
use crate::models::Price;

/// Three-character names.
pub const PRICE_SHORT: Price = Price::from_milli(500);
/// Four-character names.
pub const PRICE_MEDIUM: Price = Price::from_milli(300);
/// Five characters and longer.
pub const PRICE_LONG: Price = Price::from_milli(100);

/// NFC-normalise a candidate name so visually equal names count the same.
pub fn normalize_name(name: &str) -> String {
    name.trim().nfc().collect()
}

/// Length in characters, measured after normalisation.
pub fn name_len(name: &str) -> usize {
    normalize_name(name).chars().count()
}

/// Reject names outside the policy's bounds.
pub fn validate_name(name: &str, policy: &NamePolicy) -> Result<usize, GnsError> {
    let len = name_len(name);
    let too_long = policy.max_len.is_some_and(|max| len > max);
    if len < policy.min_len || too_long {
        return Err(GnsError::InvalidDomainLength {
            len,
            min: policy.min_len,
            max: policy.max_len,
        });
    }
    Ok(len)
}

/// Price of `name` under the fixed schedule.
pub fn price_for(name: &str, policy: &NamePolicy) -> Result<Price, GnsError> {
    let len = validate_name(name, policy)?;
    Ok(match len {
        0..=3 => PRICE_SHORT,
        4 => PRICE_MEDIUM,
        _ => PRICE_LONG,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: NamePolicy = NamePolicy {
        min_len: 3,
        max_len: None,
    };
    const CAPPED: NamePolicy = NamePolicy {
        min_len: 3,
        max_len: Some(5),
    };

    #[test]
    fn test_tiers() {
        assert_eq!(price_for("abc", &OPEN).unwrap().to_string(), "0.5");
        assert_eq!(price_for("abcd", &OPEN).unwrap().to_string(), "0.3");
        assert_eq!(price_for("abcde", &OPEN).unwrap().to_string(), "0.1");
        assert_eq!(price_for("abcdefghij", &OPEN).unwrap(), PRICE_LONG);
    }

    #[test]
    fn test_upper_bound_when_configured() {
        assert_eq!(price_for("abcde", &CAPPED).unwrap(), PRICE_LONG);
        assert_eq!(
            price_for("abcdef", &CAPPED),
            Err(GnsError::InvalidDomainLength {
                len: 6,
                min: 3,
                max: Some(5)
            })
        );
    }

    #[test]
    fn test_too_short() {
        for name in ["", "a", "ab", "  ab  "] {
            assert!(matches!(
                price_for(name, &OPEN),
                Err(GnsError::InvalidDomainLength { .. })
            ));
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // "é" as e + combining acute composes to one character.
        assert_eq!(name_len("cafe\u{301}"), 4);
        assert_eq!(price_for("cafe\u{301}", &OPEN).unwrap(), PRICE_MEDIUM);
        assert_eq!(price_for("日本語", &OPEN).unwrap(), PRICE_SHORT);
    }
}
