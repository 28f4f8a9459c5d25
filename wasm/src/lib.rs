//! WebAssembly module for the Farmer KYC Platform
//!
//! Provides client-side helpers for the registration modal and header:
//! - Draft validation before submit
//! - Phone and pincode format checks
//! - District options
//! - Session inspection over `window.localStorage`

use serde::Serialize;
use shared::{
    decode_persisted, FarmerIdentity, KeyValueStore, OrganizationIdentity, RegistrationDraft,
    SessionKind, StorageError, ValidationError, FARMER_KEY, NGO_KEY, SESSION_KEYS,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// `KeyValueStore` over the browser's local storage
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}

/// Validation failure as handed to JavaScript
#[derive(Debug, Serialize, PartialEq)]
struct DraftProblem {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<&'static str>,
}

impl From<ValidationError> for DraftProblem {
    fn from(err: ValidationError) -> Self {
        let fields = match &err {
            ValidationError::MissingFields(fields) => fields.clone(),
            _ => Vec::new(),
        };
        Self {
            code: err.code(),
            message: err.to_string(),
            fields,
        }
    }
}

fn check_registration(draft_json: &str) -> Result<(), DraftProblem> {
    let draft: RegistrationDraft = serde_json::from_str(draft_json).map_err(|e| DraftProblem {
        code: "INVALID_DRAFT",
        message: format!("Invalid draft JSON: {}", e),
        fields: Vec::new(),
    })?;
    validate_registration(&draft).map_err(DraftProblem::from)
}

/// Same precedence as the native session: a farmer payload wins over an NGO
/// one, and an unreadable farmer payload means signed out.
fn persisted_kind(store: &impl KeyValueStore) -> Option<SessionKind> {
    if let Some(payload) = store.get(FARMER_KEY).ok().flatten() {
        return decode_persisted::<FarmerIdentity>(&payload)
            .is_ok()
            .then_some(SessionKind::Farmer);
    }
    let payload = store.get(NGO_KEY).ok().flatten()?;
    decode_persisted::<OrganizationIdentity>(&payload)
        .is_ok()
        .then_some(SessionKind::Ngo)
}

/// Validate a registration draft; rejects with `{code, message, fields}`
#[wasm_bindgen(js_name = validate_registration)]
pub fn validate_registration_draft(draft_json: &str) -> Result<(), JsValue> {
    check_registration(draft_json).map_err(|problem| {
        let json = serde_json::to_string(&problem).unwrap_or_else(|_| problem.message.clone());
        JsValue::from_str(&json)
    })
}

/// Check a 10-digit mobile number
#[wasm_bindgen(js_name = is_valid_phone)]
pub fn check_phone(phone: &str) -> bool {
    is_valid_phone(phone)
}

/// Check a 6-digit pincode
#[wasm_bindgen(js_name = is_valid_pincode)]
pub fn check_pincode(pincode: &str) -> bool {
    is_valid_pincode(pincode)
}

/// District options for the registration select
#[wasm_bindgen]
pub fn registration_districts() -> js_sys::Array {
    District::ALL
        .iter()
        .map(|d| JsValue::from_str(d.name()))
        .collect()
}

/// Kind of the stored session, if its payload is readable
#[wasm_bindgen]
pub fn current_session_kind() -> Option<String> {
    persisted_kind(&LocalStorage).map(|kind| kind.as_str().to_string())
}

/// Remove every session key from local storage
#[wasm_bindgen]
pub fn clear_session() {
    for key in SESSION_KEYS {
        if let Err(e) = LocalStorage.remove(key) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }
    }
}
