//! Chilean RUT (Rol Único Tributario) check-digit validation.
//!
//! A RUT is a numeric body followed by one check character, usually written
//! `12.345.678-5`. The check character is a modulo-11 digest of the body,
//! where a result of 10 is written `K`.

/// Weights cycle 2, 3, 4, 5, 6, 7, 2, ... from the least-significant digit.
const FIRST_WEIGHT: u32 = 2;
const LAST_WEIGHT: u32 = 7;

/// Strip the punctuation people type into a RUT (dots, dashes, spaces).
fn clean(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '.' | '-') && !c.is_whitespace())
        .collect()
}

/// Compute the check character for a RUT body.
///
/// Returns `None` if the body is empty or contains anything but ASCII digits.
pub fn check_digit(body: &str) -> Option<char> {
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = body.bytes().rev().map(|b| u32::from(b - b'0'));
    match 11 - weighted_sum_mod11(digits) {
        11 => Some('0'),
        10 => Some('K'),
        d => char::from_digit(d, 10),
    }
}

/// Weighted digit sum modulo 11, digits given least-significant first.
fn weighted_sum_mod11(digits: impl Iterator<Item = u32>) -> u32 {
    let mut sum = 0;
    let mut weight = FIRST_WEIGHT;
    for digit in digits {
        // Reduced every step: bodies have no length limit
        sum = (sum + digit * weight) % 11;
        weight = if weight == LAST_WEIGHT { FIRST_WEIGHT } else { weight + 1 };
    }
    sum
}

/// Split a cleaned RUT into body and check character.
fn split(cleaned: &str) -> Option<(&str, char)> {
    let check = cleaned.chars().last()?;
    let body = &cleaned[..cleaned.len() - check.len_utf8()];
    Some((body, check))
}

/// Validate a RUT as typed by a user, with or without punctuation.
///
/// The check character is compared case-insensitively, so `k` and `K` are
/// both accepted. Malformed input is simply invalid.
pub fn is_valid_rut(input: &str) -> bool {
    let cleaned = clean(input);
    let Some((body, check)) = split(&cleaned) else {
        return false;
    };

    match check_digit(body) {
        Some(expected) => check.to_ascii_uppercase() == expected,
        None => false,
    }
}

/// Render a valid RUT in canonical `12.345.678-5` form.
///
/// Leading zeros are dropped from the body. Returns `None` if the RUT does
/// not validate.
pub fn format_rut(input: &str) -> Option<String> {
    if !is_valid_rut(input) {
        return None;
    }

    let cleaned = clean(input);
    let (body, check) = split(&cleaned)?;
    let body = body.trim_start_matches('0');
    let body = if body.is_empty() { "0" } else { body };

    // Group from the right in threes
    let mut grouped = String::with_capacity(body.len() + body.len() / 3);
    for (i, c) in body.chars().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    Some(format!("{}-{}", grouped, check.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_digit_known_values() {
        assert_eq!(check_digit("12345678"), Some('5'));
        assert_eq!(check_digit("11111111"), Some('1'));
        assert_eq!(check_digit("10000004"), Some('0'));
        assert_eq!(check_digit("10000013"), Some('K'));
        assert_eq!(check_digit("7654321"), Some('6'));
        assert_eq!(check_digit("6"), Some('K'));
    }

    #[test]
    fn test_check_digit_rejects_malformed_body() {
        assert_eq!(check_digit(""), None);
        assert_eq!(check_digit("12a45678"), None);
        assert_eq!(check_digit("１２"), None);
    }

    #[test]
    fn test_is_valid_rut_formats() {
        assert!(is_valid_rut("12345678-5"));
        assert!(is_valid_rut("12.345.678-5"));
        assert!(is_valid_rut("123456785"));
        assert!(is_valid_rut(" 12.345.678 - 5 "));
        assert!(is_valid_rut("7.654.321-6"));
        assert!(is_valid_rut("10.000.004-0"));
    }

    #[test]
    fn test_is_valid_rut_k_case_insensitive() {
        assert!(is_valid_rut("10.000.013-K"));
        assert!(is_valid_rut("10.000.013-k"));
        assert!(is_valid_rut("6-k"));
    }

    #[test]
    fn test_is_valid_rut_wrong_check_digit() {
        assert!(!is_valid_rut("12.345.678-4"));
        assert!(!is_valid_rut("12.345.678-K"));
        assert!(!is_valid_rut("10.000.013-0"));
    }

    #[test]
    fn test_altering_any_body_digit_flips_result() {
        let body = "12345678";
        for i in 0..body.len() {
            let mut digits: Vec<char> = body.chars().collect();
            let original = digits[i].to_digit(10).unwrap();
            digits[i] = char::from_digit((original + 1) % 10, 10).unwrap();
            let altered: String = digits.into_iter().collect();
            assert!(
                !is_valid_rut(&format!("{}-5", altered)),
                "altered body {} should not validate with check digit 5",
                altered
            );
        }
    }

    #[test]
    fn test_is_valid_rut_malformed() {
        assert!(!is_valid_rut(""));
        assert!(!is_valid_rut("5"));
        assert!(!is_valid_rut("-"));
        assert!(!is_valid_rut("abc-5"));
        assert!(!is_valid_rut("12.345.678-X"));
        assert!(!is_valid_rut("12.345.6a8-5"));
    }

    #[test]
    fn test_long_body_does_not_overflow() {
        // Six nines weigh 9 * (2 + 3 + 4 + 5 + 6 + 7) = 243, which is 1 mod 11
        let nines = std::iter::repeat(9).take(6 * 20_000_000);
        assert_eq!(weighted_sum_mod11(nines), 20_000_000 % 11);

        assert_eq!(check_digit(&"9".repeat(66)), Some('0'));
        assert_eq!(check_digit(&"9".repeat(72)), Some('K'));
        assert!(is_valid_rut(&format!("{}-k", "9".repeat(72))));
        assert!(!is_valid_rut(&format!("{}-0", "9".repeat(1_000_003))));
    }

    #[test]
    fn test_format_rut() {
        assert_eq!(format_rut("123456785").as_deref(), Some("12.345.678-5"));
        assert_eq!(format_rut("7654321-6").as_deref(), Some("7.654.321-6"));
        assert_eq!(format_rut("10000013k").as_deref(), Some("10.000.013-K"));
        assert_eq!(format_rut("6-k").as_deref(), Some("6-K"));
        assert_eq!(format_rut("012.345.678-5").as_deref(), Some("12.345.678-5"));
        assert_eq!(format_rut("12345678-4"), None);
    }
}
