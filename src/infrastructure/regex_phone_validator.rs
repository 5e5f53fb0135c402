use std::sync::LazyLock;

use regex::Regex;

use crate::domain::services::phone_validator::PhoneValidator;

/// Vietnamese mobile numbers: a leading `0` or `+84`, a mobile prefix digit
/// (3, 5, 7, 8 or 9), then eight digits.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0|\+84)[35789][0-9]{8}$").expect("phone pattern is a valid regex")
});

#[derive(Clone, Default)]
pub struct RegexPhoneValidator;

impl RegexPhoneValidator {
    pub fn new() -> Self {
        Self
    }
}

impl PhoneValidator for RegexPhoneValidator {
    fn is_valid(&self, phone: &str) -> bool {
        PHONE_REGEX.is_match(phone)
    }
}
