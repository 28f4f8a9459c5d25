//! Persisted session layout in the key-value store
//!
//! Each identity kind has its own payload key. Payloads are wrapped in a
//! versioned envelope so the layout can be migrated later.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identity::SessionKind;

/// Payload key for the farmer identity
pub const FARMER_KEY: &str = "farmer";

/// Payload key for the NGO identity
pub const NGO_KEY: &str = "ngo";

/// Discriminant key holding `farmer` or `ngo`
pub const KIND_KEY: &str = "userType";

/// Bearer token of the organisation auth flow
pub const TOKEN_KEY: &str = "ngoToken";

/// Current version of the persisted identity envelope
pub const SCHEMA_VERSION: u32 = 1;

/// Every key the session owns
pub const SESSION_KEYS: [&str; 4] = [FARMER_KEY, NGO_KEY, KIND_KEY, TOKEN_KEY];

/// Payload key for an identity kind
pub fn payload_key(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Farmer => FARMER_KEY,
        SessionKind::Ngo => NGO_KEY,
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    identity: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    identity: T,
}

/// Why a persisted payload was rejected
#[derive(Error, Debug)]
pub enum PersistedStateError {
    #[error("Malformed persisted identity: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported persisted schema version {0}")]
    UnsupportedVersion(u32),
}

/// Serialize an identity into its versioned envelope
pub fn encode_persisted<T: Serialize>(identity: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        identity,
    })
}

/// Parse a versioned envelope back into an identity
pub fn decode_persisted<T: DeserializeOwned>(raw: &str) -> Result<T, PersistedStateError> {
    let envelope: Envelope<T> = serde_json::from_str(raw)?;
    if envelope.version != SCHEMA_VERSION {
        return Err(PersistedStateError::UnsupportedVersion(envelope.version));
    }
    Ok(envelope.identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FarmerIdentity;

    fn farmer() -> FarmerIdentity {
        FarmerIdentity {
            id: "f-42".into(),
            name: "Lakshmi Nair".into(),
            email: "lakshmi@example.in".into(),
            phone: "9876543210".into(),
            farm_size: "2 acres".into(),
            location: "Wayanad".into(),
            crops: vec!["pepper".into(), "coffee".into()],
            avatar: "LN".into(),
        }
    }

    #[test]
    fn test_encoded_payload_carries_version() {
        let raw = encode_persisted(&farmer()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["identity"]["farmSize"], "2 acres");
    }

    #[test]
    fn test_decode_restores_identity() {
        let raw = encode_persisted(&farmer()).unwrap();
        let restored: FarmerIdentity = decode_persisted(&raw).unwrap();
        assert_eq!(restored, farmer());
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let raw = r#"{"version": 7, "identity": {"id": "x", "name": "y"}}"#;
        let result = decode_persisted::<FarmerIdentity>(raw);
        assert!(matches!(result, Err(PersistedStateError::UnsupportedVersion(7))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_persisted::<FarmerIdentity>("{not json");
        assert!(matches!(result, Err(PersistedStateError::Malformed(_))));
    }

    #[test]
    fn test_payload_key_per_kind() {
        assert_eq!(payload_key(SessionKind::Farmer), FARMER_KEY);
        assert_eq!(payload_key(SessionKind::Ngo), NGO_KEY);
    }
}
