//! Validation utilities for the Farmer KYC Platform
//!
//! Includes the India-specific formats used by the registration form.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::RegistrationDraft;

/// Reasons a draft is refused before it reaches the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFields(Vec<&'static str>),

    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,

    #[error("Please enter a valid 6-digit pincode")]
    InvalidPincode,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) => "MISSING_FIELDS",
            ValidationError::InvalidPhone => "INVALID_PHONE",
            ValidationError::InvalidPincode => "INVALID_PINCODE",
        }
    }
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"))
}

fn pincode_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{6}$").expect("pincode pattern is valid"))
}

// ============================================================================
// Field Validations
// ============================================================================

/// Indian mobile number: exactly 10 ASCII digits, no separators
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone)
}

/// Indian postal pincode: exactly 6 ASCII digits
pub fn is_valid_pincode(pincode: &str) -> bool {
    pincode_pattern().is_match(pincode)
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

pub fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    if is_valid_pincode(pincode) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPincode)
    }
}

// ============================================================================
// Draft Validation
// ============================================================================

/// Full pre-submission check: completeness, then phone, then pincode.
///
/// Attached documents are not checked here; the backend decides whether an
/// application without them is acceptable.
pub fn validate_registration(draft: &RegistrationDraft) -> Result<(), ValidationError> {
    let missing = draft.missing_required_fields();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    validate_phone(&draft.personal_info.phone)?;
    validate_pincode(&draft.personal_info.pincode)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{District, Experience};
    use proptest::prelude::*;

    fn complete_draft() -> RegistrationDraft {
        let mut draft = RegistrationDraft::default();
        draft.personal_info.full_name = "Suresh Menon".into();
        draft.personal_info.phone = "9876543210".into();
        draft.personal_info.address = "Kottayam Road".into();
        draft.personal_info.pincode = "682001".into();
        draft.personal_info.district = Some(District::Ernakulam);
        draft.farm_info.farm_size = "3 acres".into();
        draft.farm_info.crop_types = "Rice, Coconut".into();
        draft.farm_info.farm_location = "Aluva".into();
        draft.farm_info.experience = Some(Experience::SixToTen);
        draft
    }

    // ========================================================================
    // Field Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert_eq!(validate_phone("12345"), Err(ValidationError::InvalidPhone));
        assert!(validate_phone("98765-43210").is_err());
        assert!(validate_phone("+919876543210").is_err());
        assert!(validate_phone("98765432100").is_err());
    }

    #[test]
    fn test_phone_rejects_non_ascii_digits() {
        // Devanagari digits are Unicode digits but not accepted
        assert!(!is_valid_phone("९८७६५४३२१०"));
    }

    #[test]
    fn test_validate_pincode() {
        assert!(validate_pincode("682001").is_ok());
        assert_eq!(validate_pincode("12345"), Err(ValidationError::InvalidPincode));
        assert!(validate_pincode("6820011").is_err());
        assert!(validate_pincode("68 001").is_err());
    }

    // ========================================================================
    // Draft Validation Tests
    // ========================================================================

    #[test]
    fn test_complete_draft_passes() {
        assert!(validate_registration(&complete_draft()).is_ok());
    }

    #[test]
    fn test_missing_fields_reported_before_format() {
        let mut draft = complete_draft();
        draft.personal_info.phone = "12".into();
        draft.farm_info.crop_types.clear();
        assert_eq!(
            validate_registration(&draft),
            Err(ValidationError::MissingFields(vec!["cropTypes"]))
        );
    }

    #[test]
    fn test_phone_checked_before_pincode() {
        let mut draft = complete_draft();
        draft.personal_info.phone = "12345".into();
        draft.personal_info.pincode = "12345".into();
        assert_eq!(validate_registration(&draft), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn test_email_is_optional() {
        let mut draft = complete_draft();
        draft.personal_info.email.clear();
        assert!(validate_registration(&draft).is_ok());
    }

    #[test]
    fn test_documents_not_enforced() {
        let draft = complete_draft();
        assert!(!draft.missing_required_documents().is_empty());
        assert!(validate_registration(&draft).is_ok());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ValidationError::InvalidPhone.code(), "INVALID_PHONE");
        assert_eq!(ValidationError::MissingFields(vec![]).code(), "MISSING_FIELDS");
    }

    // ========================================================================
    // Property-based Tests
    // ========================================================================

    proptest! {
        #[test]
        fn prop_ten_digits_always_valid_phone(phone in "[0-9]{10}") {
            prop_assert!(is_valid_phone(&phone));
        }

        #[test]
        fn prop_wrong_length_phone_rejected(phone in "[0-9]{0,9}|[0-9]{11,15}") {
            prop_assert!(!is_valid_phone(&phone));
        }

        #[test]
        fn prop_six_digits_always_valid_pincode(pincode in "[0-9]{6}") {
            prop_assert!(is_valid_pincode(&pincode));
        }

        #[test]
        fn prop_pincode_with_non_digit_rejected(
            head in "[0-9]{0,5}",
            bad in "[^0-9]",
            tail in "[0-9]{0,5}",
        ) {
            let pincode = format!("{}{}{}", head, bad, tail);
            prop_assert!(!is_valid_pincode(&pincode));
        }

        #[test]
        fn prop_valid_formats_pass_full_check(phone in "[0-9]{10}", pincode in "[0-9]{6}") {
            let mut draft = complete_draft();
            draft.personal_info.phone = phone;
            draft.personal_info.pincode = pincode;
            prop_assert_eq!(validate_registration(&draft), Ok(()));
        }
    }
}
