//! Farmer KYC registration draft and NGO registration input

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// State pre-filled on every new draft
pub const DEFAULT_STATE: &str = "Kerala";

/// Districts accepted by the registration form.
///
/// Parsed case-insensitively, both from the form and from JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum District {
    Thiruvananthapuram,
    Kollam,
    Pathanamthitta,
    Alappuzha,
    Kottayam,
    Idukki,
    Ernakulam,
    Thrissur,
    Palakkad,
    Malappuram,
    Kozhikode,
    Wayanad,
    Kannur,
    Kasaragod,
}

impl District {
    pub const ALL: [District; 14] = [
        District::Thiruvananthapuram,
        District::Kollam,
        District::Pathanamthitta,
        District::Alappuzha,
        District::Kottayam,
        District::Idukki,
        District::Ernakulam,
        District::Thrissur,
        District::Palakkad,
        District::Malappuram,
        District::Kozhikode,
        District::Wayanad,
        District::Kannur,
        District::Kasaragod,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            District::Thiruvananthapuram => "Thiruvananthapuram",
            District::Kollam => "Kollam",
            District::Pathanamthitta => "Pathanamthitta",
            District::Alappuzha => "Alappuzha",
            District::Kottayam => "Kottayam",
            District::Idukki => "Idukki",
            District::Ernakulam => "Ernakulam",
            District::Thrissur => "Thrissur",
            District::Palakkad => "Palakkad",
            District::Malappuram => "Malappuram",
            District::Kozhikode => "Kozhikode",
            District::Wayanad => "Wayanad",
            District::Kannur => "Kannur",
            District::Kasaragod => "Kasaragod",
        }
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for District {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        District::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChoiceError::new("district", s))
    }
}

impl TryFrom<String> for District {
    type Error = ChoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Years of farming experience, as offered by the form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum Experience {
    #[serde(rename = "0-2")]
    UpToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "10+")]
    MoreThanTen,
}

impl Experience {
    pub const ALL: [Experience; 4] = [
        Experience::UpToTwo,
        Experience::ThreeToFive,
        Experience::SixToTen,
        Experience::MoreThanTen,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Experience::UpToTwo => "0-2",
            Experience::ThreeToFive => "3-5",
            Experience::SixToTen => "6-10",
            Experience::MoreThanTen => "10+",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Experience {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Experience::ALL
            .iter()
            .copied()
            .find(|e| e.label() == s.trim())
            .ok_or_else(|| ChoiceError::new("experience", s))
    }
}

impl TryFrom<String> for Experience {
    type Error = ChoiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A value outside the fixed options of a select field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {field}")]
pub struct ChoiceError {
    pub field: &'static str,
    pub value: String,
}

impl ChoiceError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Step 1 of the wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pincode: String,
    pub state: String,
    #[serde(deserialize_with = "select_choice")]
    pub district: Option<District>,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            pincode: String::new(),
            state: DEFAULT_STATE.to_string(),
            district: None,
        }
    }
}

/// Step 2 of the wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmInfo {
    pub farm_size: String,
    pub crop_types: String,
    pub farm_location: String,
    #[serde(deserialize_with = "select_choice")]
    pub experience: Option<Experience>,
}

/// An unselected `<select>` arrives as `""`; treat it like a missing value.
fn select_choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr<Err = ChoiceError>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    parse_choice(raw.as_deref().unwrap_or("")).map_err(serde::de::Error::custom)
}

/// The four document slots of step 3
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKey {
    Aadhar,
    PanCard,
    LandRecords,
    BankPassbook,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 4] = [
        DocumentKey::Aadhar,
        DocumentKey::PanCard,
        DocumentKey::LandRecords,
        DocumentKey::BankPassbook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKey::Aadhar => "aadhar",
            DocumentKey::PanCard => "panCard",
            DocumentKey::LandRecords => "landRecords",
            DocumentKey::BankPassbook => "bankPassbook",
        }
    }

    /// Marked required in the form. Not enforced on submit.
    pub fn is_marked_required(&self) -> bool {
        matches!(self, DocumentKey::Aadhar | DocumentKey::LandRecords)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKey {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| ChoiceError::new("document", s))
    }
}

/// An uploaded file, carried inline as base64 in the request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub file_name: String,
    pub content_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl DocumentFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Step 3 of the wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Documents {
    pub aadhar: Option<DocumentFile>,
    pub pan_card: Option<DocumentFile>,
    pub land_records: Option<DocumentFile>,
    pub bank_passbook: Option<DocumentFile>,
}

impl Documents {
    pub fn get(&self, key: DocumentKey) -> Option<&DocumentFile> {
        self.slot(key).as_ref()
    }

    pub fn set(&mut self, key: DocumentKey, file: Option<DocumentFile>) {
        *self.slot_mut(key) = file;
    }

    fn slot(&self, key: DocumentKey) -> &Option<DocumentFile> {
        match key {
            DocumentKey::Aadhar => &self.aadhar,
            DocumentKey::PanCard => &self.pan_card,
            DocumentKey::LandRecords => &self.land_records,
            DocumentKey::BankPassbook => &self.bank_passbook,
        }
    }

    fn slot_mut(&mut self, key: DocumentKey) -> &mut Option<DocumentFile> {
        match key {
            DocumentKey::Aadhar => &mut self.aadhar,
            DocumentKey::PanCard => &mut self.pan_card,
            DocumentKey::LandRecords => &mut self.land_records,
            DocumentKey::BankPassbook => &mut self.bank_passbook,
        }
    }
}

/// Fields of the personal section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalField {
    FullName,
    Phone,
    Email,
    Address,
    Pincode,
    State,
    District,
}

/// Fields of the farm section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FarmField {
    FarmSize,
    CropTypes,
    FarmLocation,
    Experience,
}

/// A single editable field of the draft, addressed by section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Personal(PersonalField),
    Farm(FarmField),
}

impl DraftField {
    /// Wire name of the field inside its section
    pub fn name(&self) -> &'static str {
        match self {
            DraftField::Personal(PersonalField::FullName) => "fullName",
            DraftField::Personal(PersonalField::Phone) => "phone",
            DraftField::Personal(PersonalField::Email) => "email",
            DraftField::Personal(PersonalField::Address) => "address",
            DraftField::Personal(PersonalField::Pincode) => "pincode",
            DraftField::Personal(PersonalField::State) => "state",
            DraftField::Personal(PersonalField::District) => "district",
            DraftField::Farm(FarmField::FarmSize) => "farmSize",
            DraftField::Farm(FarmField::CropTypes) => "cropTypes",
            DraftField::Farm(FarmField::FarmLocation) => "farmLocation",
            DraftField::Farm(FarmField::Experience) => "experience",
        }
    }
}

impl From<PersonalField> for DraftField {
    fn from(field: PersonalField) -> Self {
        DraftField::Personal(field)
    }
}

impl From<FarmField> for DraftField {
    fn from(field: FarmField) -> Self {
        DraftField::Farm(field)
    }
}

/// Fields that must be filled before a draft may be submitted, in form order
pub const REQUIRED_FIELDS: [DraftField; 9] = [
    DraftField::Personal(PersonalField::FullName),
    DraftField::Personal(PersonalField::Phone),
    DraftField::Personal(PersonalField::Address),
    DraftField::Personal(PersonalField::Pincode),
    DraftField::Personal(PersonalField::District),
    DraftField::Farm(FarmField::FarmSize),
    DraftField::Farm(FarmField::CropTypes),
    DraftField::Farm(FarmField::FarmLocation),
    DraftField::Farm(FarmField::Experience),
];

/// The in-progress KYC application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationDraft {
    pub personal_info: PersonalInfo,
    pub farm_info: FarmInfo,
    pub documents: Documents,
}

impl RegistrationDraft {
    /// Update exactly one field. Select fields are parsed; an empty value clears them.
    pub fn set_field(&mut self, field: DraftField, value: &str) -> Result<(), ChoiceError> {
        let personal = &mut self.personal_info;
        let farm = &mut self.farm_info;
        match field {
            DraftField::Personal(PersonalField::FullName) => personal.full_name = value.to_string(),
            DraftField::Personal(PersonalField::Phone) => personal.phone = value.to_string(),
            DraftField::Personal(PersonalField::Email) => personal.email = value.to_string(),
            DraftField::Personal(PersonalField::Address) => personal.address = value.to_string(),
            DraftField::Personal(PersonalField::Pincode) => personal.pincode = value.to_string(),
            DraftField::Personal(PersonalField::State) => personal.state = value.to_string(),
            DraftField::Personal(PersonalField::District) => {
                personal.district = parse_choice(value)?;
            }
            DraftField::Farm(FarmField::FarmSize) => farm.farm_size = value.to_string(),
            DraftField::Farm(FarmField::CropTypes) => farm.crop_types = value.to_string(),
            DraftField::Farm(FarmField::FarmLocation) => farm.farm_location = value.to_string(),
            DraftField::Farm(FarmField::Experience) => {
                farm.experience = parse_choice(value)?;
            }
        }
        Ok(())
    }

    /// Whether a field currently holds a non-empty value
    pub fn is_filled(&self, field: DraftField) -> bool {
        let personal = &self.personal_info;
        let farm = &self.farm_info;
        match field {
            DraftField::Personal(PersonalField::FullName) => !personal.full_name.is_empty(),
            DraftField::Personal(PersonalField::Phone) => !personal.phone.is_empty(),
            DraftField::Personal(PersonalField::Email) => !personal.email.is_empty(),
            DraftField::Personal(PersonalField::Address) => !personal.address.is_empty(),
            DraftField::Personal(PersonalField::Pincode) => !personal.pincode.is_empty(),
            DraftField::Personal(PersonalField::State) => !personal.state.is_empty(),
            DraftField::Personal(PersonalField::District) => personal.district.is_some(),
            DraftField::Farm(FarmField::FarmSize) => !farm.farm_size.is_empty(),
            DraftField::Farm(FarmField::CropTypes) => !farm.crop_types.is_empty(),
            DraftField::Farm(FarmField::FarmLocation) => !farm.farm_location.is_empty(),
            DraftField::Farm(FarmField::Experience) => farm.experience.is_some(),
        }
    }

    /// Required fields still empty, in form order
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .filter(|field| !self.is_filled(**field))
            .map(|field| field.name())
            .collect()
    }

    /// Documents marked required in the form that have not been attached
    pub fn missing_required_documents(&self) -> Vec<DocumentKey> {
        DocumentKey::ALL
            .iter()
            .copied()
            .filter(|key| key.is_marked_required() && self.documents.get(*key).is_none())
            .collect()
    }
}

fn parse_choice<T: FromStr<Err = ChoiceError>>(value: &str) -> Result<Option<T>, ChoiceError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Position in the four-step KYC wizard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    Personal,
    Farm,
    Documents,
    Review,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Personal => 1,
            WizardStep::Farm => 2,
            WizardStep::Documents => 3,
            WizardStep::Review => 4,
        }
    }

    /// The following step, saturating at `Review`
    pub fn next(self) -> Self {
        match self {
            WizardStep::Personal => WizardStep::Farm,
            WizardStep::Farm => WizardStep::Documents,
            WizardStep::Documents | WizardStep::Review => WizardStep::Review,
        }
    }

    /// The preceding step, saturating at `Personal`
    pub fn previous(self) -> Self {
        match self {
            WizardStep::Personal | WizardStep::Farm => WizardStep::Personal,
            WizardStep::Documents => WizardStep::Farm,
            WizardStep::Review => WizardStep::Documents,
        }
    }
}

/// Sign-up input for an NGO account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRegistration {
    #[validate(length(min = 2, message = "Organisation name is required"))]
    pub ngo_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(equal = 10, message = "Mobile number must be 10 digits"))]
    pub mobile: String,
    #[validate(length(min = 1, message = "Registration ID is required"))]
    pub registration_id: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}
