//! Backend collaborator integrations
//!
//! The traits are the seams the session and the wizard depend on;
//! [`BackendClient`] implements all of them over HTTP.

pub mod backend;

use async_trait::async_trait;
use shared::{
    ApplicationReceipt, Donation, DonationHistory, FarmerIdentity, OrganizationAuth,
    OrganizationIdentity, OrganizationProfileUpdate, OrganizationRegistration, RegistrationDraft,
};

use crate::error::ClientResult;

pub use backend::BackendClient;

/// KYC application intake
#[async_trait]
pub trait KycApi: Send + Sync {
    /// Create an application from a validated draft
    async fn submit_application(&self, draft: &RegistrationDraft) -> ClientResult<ApplicationReceipt>;
}

/// Farmer and NGO authentication
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn farmer_login(&self, identifier: &str, password: &str) -> ClientResult<FarmerIdentity>;

    async fn ngo_login(&self, email: &str, password: &str) -> ClientResult<OrganizationAuth>;

    async fn ngo_register(
        &self,
        registration: &OrganizationRegistration,
    ) -> ClientResult<OrganizationAuth>;

    async fn ngo_profile(&self, token: &str) -> ClientResult<OrganizationIdentity>;

    async fn update_ngo_profile(
        &self,
        token: &str,
        update: &OrganizationProfileUpdate,
    ) -> ClientResult<OrganizationIdentity>;
}

/// Direct-payment donation feeds
#[async_trait]
pub trait DonationApi: Send + Sync {
    async fn recent_donations(&self, limit: u32) -> ClientResult<Vec<Donation>>;

    async fn donation_history(&self, recipient_id: &str, limit: u32)
        -> ClientResult<DonationHistory>;
}
