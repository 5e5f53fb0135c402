use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{
    models::{
        credential::HashedPassword,
        user::{DEFAULT_GENDER, DEFAULT_REGION, Gender, NewUser, Region},
    },
    services::phone_validator::PhoneValidator,
};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 100;

/// Age as sent by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeInput {
    Years(i64),
    /// `null`, a fraction, a string or anything else that is not a whole number
    Unreadable,
}

/// One unvalidated entry of a bulk registration batch
#[derive(Debug, Clone, Default)]
pub struct RegistrationCandidate {
    pub phone: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub age: Option<AgeInput>,
    pub gender: Option<String>,
    pub region: Option<String>,
}

/// Reads one batch entry leniently so a badly typed field only fails its own item.
///
/// A non-object entry reads as an empty candidate. Non-string phone, password
/// or name read as absent; non-string gender or region codes are kept as text
/// and fail their code check.
impl From<Value> for RegistrationCandidate {
    fn from(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };

        let age = match fields.get("age") {
            None => None,
            Some(age) => Some(
                age.as_i64()
                    .map(AgeInput::Years)
                    .unwrap_or(AgeInput::Unreadable),
            ),
        };

        Self {
            phone: text_field(&fields, "phone"),
            password: text_field(&fields, "password"),
            name: text_field(&fields, "name"),
            age,
            gender: code_field(&fields, "gender"),
            region: code_field(&fields, "region"),
        }
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn code_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(code) => Some(code.clone()),
        other => Some(other.to_string()),
    }
}

/// Why a candidate did not become a user.
/// The display text is the reason reported back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CandidateRejection {
    #[error("phone and password required")]
    MissingCredentials,

    #[error("invalid phone number")]
    InvalidPhone,

    #[error("password too short")]
    PasswordTooShort,

    #[error("age out of range")]
    AgeOutOfRange,

    #[error("invalid gender")]
    InvalidGender,

    #[error("invalid region")]
    InvalidRegion,

    #[error("phone already registered")]
    PhoneTaken,

    #[error("system error while creating user")]
    SystemError,
}

/// A candidate that passed every field rule, with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCandidate {
    pub phone: String,
    pub password: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Gender,
    pub region: Region,
}

impl RegistrationCandidate {
    /// Phone as echoed back in a failure entry
    pub fn display_phone(&self) -> String {
        match self.phone.as_deref() {
            Some(phone) if !phone.is_empty() => phone.to_string(),
            _ => "N/A".to_string(),
        }
    }

    /// Runs the field rules in order and stops at the first one that fails.
    /// Uniqueness is not checked here; that needs the store.
    pub fn validate<V: PhoneValidator>(
        &self,
        phone_validator: &V,
    ) -> Result<ValidatedCandidate, CandidateRejection> {
        let (phone, password) = match (non_empty(&self.phone), non_empty(&self.password)) {
            (Some(phone), Some(password)) => (phone, password),
            _ => return Err(CandidateRejection::MissingCredentials),
        };

        if !phone_validator.is_valid(phone) {
            return Err(CandidateRejection::InvalidPhone);
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CandidateRejection::PasswordTooShort);
        }

        let age = match self.age {
            Some(AgeInput::Years(age)) if (MIN_AGE..=MAX_AGE).contains(&age) => {
                // range checked, always fits
                Some(age as i32)
            }
            Some(_) => return Err(CandidateRejection::AgeOutOfRange),
            None => None,
        };

        let gender = match non_empty(&self.gender) {
            Some(code) => code
                .parse::<Gender>()
                .map_err(|_| CandidateRejection::InvalidGender)?,
            None => DEFAULT_GENDER,
        };

        let region = match non_empty(&self.region) {
            Some(code) => code
                .parse::<Region>()
                .ok()
                .filter(Region::is_selectable)
                .ok_or(CandidateRejection::InvalidRegion)?,
            None => DEFAULT_REGION,
        };

        Ok(ValidatedCandidate {
            phone: phone.to_string(),
            password: password.to_string(),
            name: non_empty(&self.name).map(str::to_string),
            age,
            gender,
            region,
        })
    }
}

impl ValidatedCandidate {
    pub fn into_new_user(self, password_hash: HashedPassword) -> NewUser {
        NewUser {
            phone: self.phone,
            password_hash,
            name: self.name,
            age: self.age,
            gender: self.gender,
            region: self.region,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use rstest::*;
    use serde_json::json;

    use super::*;
    use crate::infrastructure::regex_phone_validator::RegexPhoneValidator;

    fn candidate(phone: &str, password: &str) -> RegistrationCandidate {
        RegistrationCandidate {
            phone: Some(phone.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(None, Some("secret1"))]
    #[case(Some("0912345678"), None)]
    #[case(Some(""), Some("secret1"))]
    #[case(Some("0912345678"), Some(""))]
    fn missing_credentials_are_rejected_first(
        #[case] phone: Option<&str>,
        #[case] password: Option<&str>,
    ) {
        let candidate = RegistrationCandidate {
            phone: phone.map(str::to_string),
            password: password.map(str::to_string),
            // would also fail later rules
            age: Some(AgeInput::Years(500)),
            ..Default::default()
        };
        assert_eq!(
            candidate.validate(&RegexPhoneValidator::new()),
            Err(CandidateRejection::MissingCredentials)
        );
    }

    #[test]
    fn password_length_boundary() {
        let validator = RegexPhoneValidator::new();
        assert_eq!(
            candidate("0912345678", "12345").validate(&validator),
            Err(CandidateRejection::PasswordTooShort)
        );
        assert!(candidate("0912345678", "123456").validate(&validator).is_ok());
    }

    #[test]
    fn invalid_phone_wins_over_short_password() {
        assert_eq!(
            candidate("12ab", "123").validate(&RegexPhoneValidator::new()),
            Err(CandidateRejection::InvalidPhone)
        );
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(100, true)]
    #[case(101, false)]
    fn age_must_be_within_bounds(#[case] age: i64, #[case] accepted: bool) {
        let candidate = RegistrationCandidate {
            age: Some(AgeInput::Years(age)),
            ..candidate("0912345678", "secret1")
        };
        let result = candidate.validate(&RegexPhoneValidator::new());
        if accepted {
            assert_eq!(result.unwrap().age, Some(age as i32));
        } else {
            assert_eq!(result, Err(CandidateRejection::AgeOutOfRange));
        }
    }

    #[test]
    fn unknown_gender_and_region_codes_are_rejected() {
        let validator = RegexPhoneValidator::new();
        let bad_gender = RegistrationCandidate {
            gender: Some("MALE".to_string()),
            region: Some("X".to_string()),
            ..candidate("0912345678", "secret1")
        };
        assert_eq!(
            bad_gender.validate(&validator),
            Err(CandidateRejection::InvalidGender)
        );

        let unspecified_region = RegistrationCandidate {
            region: Some("O".to_string()),
            ..candidate("0912345678", "secret1")
        };
        assert_eq!(
            unspecified_region.validate(&validator),
            Err(CandidateRejection::InvalidRegion)
        );
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let validated = RegistrationCandidate {
            name: Some(String::new()),
            gender: Some(String::new()),
            ..candidate("0912345678", "secret1")
        }
        .validate(&RegexPhoneValidator::new())
        .unwrap();

        assert_eq!(validated.gender, DEFAULT_GENDER);
        assert_eq!(validated.region, DEFAULT_REGION);
        assert_eq!(validated.name, None);
        assert_eq!(validated.age, None);
    }

    #[rstest]
    #[case(json!({"phone": "0912345678", "password": "secret1", "age": "30"}))]
    #[case(json!({"phone": "0912345678", "password": "secret1", "age": 30.5}))]
    #[case(json!({"phone": "0912345678", "password": "secret1", "age": null}))]
    fn unreadable_age_is_out_of_range(#[case] entry: Value) {
        let candidate = RegistrationCandidate::from(entry);
        assert_eq!(candidate.age, Some(AgeInput::Unreadable));
        assert_eq!(
            candidate.validate(&RegexPhoneValidator::new()),
            Err(CandidateRejection::AgeOutOfRange)
        );
    }

    #[test]
    fn unreadable_age_still_loses_to_earlier_rules() {
        let candidate =
            RegistrationCandidate::from(json!({"phone": "12ab", "password": "secret1", "age": "x"}));
        assert_eq!(
            candidate.validate(&RegexPhoneValidator::new()),
            Err(CandidateRejection::InvalidPhone)
        );
    }

    #[rstest]
    #[case(json!(42))]
    #[case(json!(["0912345678", "secret1"]))]
    #[case(json!({"phone": 912345678, "password": "secret1"}))]
    #[case(json!({"phone": "0912345678", "password": 123456}))]
    fn mistyped_credentials_read_as_missing(#[case] entry: Value) {
        let candidate = RegistrationCandidate::from(entry);
        assert_eq!(candidate.display_phone(), "N/A");
        assert_eq!(
            candidate.validate(&RegexPhoneValidator::new()),
            Err(CandidateRejection::MissingCredentials)
        );
    }

    #[test]
    fn mistyped_codes_fail_their_own_rule() {
        let validator = RegexPhoneValidator::new();
        let gender = RegistrationCandidate::from(json!({
            "phone": "0912345678", "password": "secret1", "gender": 1
        }));
        assert_eq!(gender.validate(&validator), Err(CandidateRejection::InvalidGender));

        let region = RegistrationCandidate::from(json!({
            "phone": "0912345678", "password": "secret1", "region": true
        }));
        assert_eq!(region.validate(&validator), Err(CandidateRejection::InvalidRegion));
    }

    #[test]
    fn null_optional_fields_take_defaults() {
        let validated = RegistrationCandidate::from(json!({
            "phone": "0912345678", "password": "secret1",
            "name": null, "gender": null, "region": null
        }))
        .validate(&RegexPhoneValidator::new())
        .unwrap();

        assert_eq!(validated.gender, DEFAULT_GENDER);
        assert_eq!(validated.region, DEFAULT_REGION);
        assert_eq!(validated.name, None);
        assert_eq!(validated.age, None);
    }

    #[test]
    fn display_phone_falls_back_when_missing() {
        assert_eq!(RegistrationCandidate::default().display_phone(), "N/A");
        assert_eq!(candidate("", "x").display_phone(), "N/A");
        assert_eq!(candidate("0912345678", "x").display_phone(), "0912345678");
    }
}
