//! Authenticated identities: farmers and NGOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A farmer account as returned by the KYC login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FarmerIdentity {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub farm_size: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub crops: Vec<String>,
    #[serde(default)]
    pub avatar: String,
}

/// An NGO (organisation) account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationIdentity {
    #[serde(alias = "_id")]
    pub id: String,
    pub ngo_name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub registration_id: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Postal address of an organisation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub country: String,
}

/// Public social media links of an organisation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Discriminant of the active identity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Farmer,
    Ngo,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Farmer => "farmer",
            SessionKind::Ngo => "ngo",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(SessionKind::Farmer),
            "ngo" => Ok(SessionKind::Ngo),
            other => Err(format!("unknown session kind: {}", other)),
        }
    }
}

/// The authenticated principal. Exactly one variant is ever active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Farmer(FarmerIdentity),
    Ngo(OrganizationIdentity),
}

impl Identity {
    pub fn kind(&self) -> SessionKind {
        match self {
            Identity::Farmer(_) => SessionKind::Farmer,
            Identity::Ngo(_) => SessionKind::Ngo,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Identity::Farmer(farmer) => &farmer.id,
            Identity::Ngo(ngo) => &ngo.id,
        }
    }

    /// Name shown in the header once signed in
    pub fn display_name(&self) -> &str {
        match self {
            Identity::Farmer(farmer) => &farmer.name,
            Identity::Ngo(ngo) => &ngo.ngo_name,
        }
    }

    pub fn as_farmer(&self) -> Option<&FarmerIdentity> {
        match self {
            Identity::Farmer(farmer) => Some(farmer),
            Identity::Ngo(_) => None,
        }
    }

    pub fn as_ngo(&self) -> Option<&OrganizationIdentity> {
        match self {
            Identity::Ngo(ngo) => Some(ngo),
            Identity::Farmer(_) => None,
        }
    }
}

impl From<FarmerIdentity> for Identity {
    fn from(farmer: FarmerIdentity) -> Self {
        Identity::Farmer(farmer)
    }
}

impl From<OrganizationIdentity> for Identity {
    fn from(ngo: OrganizationIdentity) -> Self {
        Identity::Ngo(ngo)
    }
}

/// Fields an NGO may change on its own profile
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngo_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
}

/// Token and account returned by the organisation login and register endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationAuth {
    pub token: String,
    pub ngo: OrganizationIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_kind_round_trips_through_str() {
        assert_eq!("farmer".parse::<SessionKind>(), Ok(SessionKind::Farmer));
        assert_eq!("ngo".parse::<SessionKind>(), Ok(SessionKind::Ngo));
        assert!("admin".parse::<SessionKind>().is_err());
        assert_eq!(SessionKind::Ngo.to_string(), "ngo");
    }

    #[test]
    fn test_identity_kind_follows_variant() {
        let farmer: Identity = FarmerIdentity {
            id: "f-1".into(),
            name: "Ravi".into(),
            ..Default::default()
        }
        .into();
        assert_eq!(farmer.kind(), SessionKind::Farmer);
        assert_eq!(farmer.display_name(), "Ravi");
        assert!(farmer.as_ngo().is_none());
    }

    #[test]
    fn test_ngo_accepts_mongo_style_id_and_camel_case() {
        let json = r#"{
            "_id": "65a1",
            "ngoName": "Green Fields Trust",
            "email": "info@greenfields.org",
            "focusAreas": ["irrigation", "seeds"],
            "isVerified": true,
            "isActive": true,
            "createdAt": "2024-01-12T10:00:00Z"
        }"#;
        let ngo: OrganizationIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(ngo.id, "65a1");
        assert_eq!(ngo.focus_areas.len(), 2);
        assert!(ngo.is_verified);
        assert!(ngo.created_at.is_some());
        assert!(ngo.last_login.is_none());
    }
}
