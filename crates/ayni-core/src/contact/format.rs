use std::sync::LazyLock;

use regex::Regex;

/// First run of ten digits, split 2-4-4.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2})([0-9]{4})([0-9]{4})").expect("phone pattern is valid")
});

/// Format a phone number for display.
///
/// The first run of ten consecutive digits is rewritten as `+XX XXXX XXXX`
/// and whatever surrounds it is kept, so the firm's 11-digit
/// `56223456789` shows as `+56 2234 56789`. Input without such a run is
/// returned unchanged.
pub fn format_phone(phone: &str) -> String {
    PHONE_RE.replacen(phone, 1, "+$1 $2 $3").into_owned()
}

/// Keep only the ASCII digits of a phone number, as WhatsApp links expect.
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}
