//! REST client for the platform backend
//!
//! Every endpoint answers with the `{success, message, data, errors}`
//! envelope; `success == false` is treated as a rejection whatever the
//! HTTP status.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{
    ApiResponse, ApplicationReceipt, Donation, DonationHistory, FarmerIdentity, OrganizationAuth,
    OrganizationIdentity, OrganizationProfileUpdate, OrganizationRegistration, RegistrationDraft,
};

use super::{AuthApi, DonationApi, KycApi};
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};

/// Backend API client
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct FarmerCredentials<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct OrganizationCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Profile endpoints answer either `{ngo: {...}}` or the bare account
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfilePayload {
    Wrapped { ngo: OrganizationIdentity },
    Bare(OrganizationIdentity),
}

impl ProfilePayload {
    fn into_identity(self) -> OrganizationIdentity {
        match self {
            ProfilePayload::Wrapped { ngo } => ngo,
            ProfilePayload::Bare(ngo) => ngo,
        }
    }
}

impl BackendClient {
    /// Create a new BackendClient from configuration
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Configuration(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new BackendClient with custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the response envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Backend request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read backend response: {}", e)))?;

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            ClientError::Transport(format!("Unexpected backend response ({}): {}", status, e))
        })?;

        if !envelope.success {
            tracing::debug!(%status, message = ?envelope.message, "Backend rejected request");
            return Err(ClientError::backend(envelope.message, envelope.errors));
        }

        envelope.data.ok_or_else(|| {
            ClientError::Transport(format!("Backend response ({}) carried no data", status))
        })
    }
}

#[async_trait]
impl KycApi for BackendClient {
    async fn submit_application(&self, draft: &RegistrationDraft) -> ClientResult<ApplicationReceipt> {
        tracing::debug!("POST /kyc/farmer/register");
        let request = self
            .client
            .post(self.endpoint("/kyc/farmer/register"))
            .json(draft);
        self.send(request).await
    }
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn farmer_login(&self, identifier: &str, password: &str) -> ClientResult<FarmerIdentity> {
        tracing::debug!("POST /kyc/login");
        let request = self
            .client
            .post(self.endpoint("/kyc/login"))
            .json(&FarmerCredentials {
                identifier,
                password,
            });
        self.send(request).await
    }

    async fn ngo_login(&self, email: &str, password: &str) -> ClientResult<OrganizationAuth> {
        tracing::debug!("POST /auth/login");
        let request = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(&OrganizationCredentials { email, password });
        self.send(request).await
    }

    async fn ngo_register(
        &self,
        registration: &OrganizationRegistration,
    ) -> ClientResult<OrganizationAuth> {
        tracing::debug!("POST /auth/register");
        let request = self
            .client
            .post(self.endpoint("/auth/register"))
            .json(registration);
        self.send(request).await
    }

    async fn ngo_profile(&self, token: &str) -> ClientResult<OrganizationIdentity> {
        tracing::debug!("GET /auth/profile");
        let request = self
            .client
            .get(self.endpoint("/auth/profile"))
            .bearer_auth(token);
        let payload: ProfilePayload = self.send(request).await?;
        Ok(payload.into_identity())
    }

    async fn update_ngo_profile(
        &self,
        token: &str,
        update: &OrganizationProfileUpdate,
    ) -> ClientResult<OrganizationIdentity> {
        tracing::debug!("PUT /auth/profile");
        let request = self
            .client
            .put(self.endpoint("/auth/profile"))
            .bearer_auth(token)
            .json(update);
        let payload: ProfilePayload = self.send(request).await?;
        Ok(payload.into_identity())
    }
}

#[async_trait]
impl DonationApi for BackendClient {
    async fn recent_donations(&self, limit: u32) -> ClientResult<Vec<Donation>> {
        tracing::debug!(limit, "GET /direct-payment/recent");
        let request = self
            .client
            .get(self.endpoint("/direct-payment/recent"))
            .query(&[("limit", limit)]);
        self.send(request).await
    }

    async fn donation_history(
        &self,
        recipient_id: &str,
        limit: u32,
    ) -> ClientResult<DonationHistory> {
        if recipient_id.trim().is_empty() {
            return Err(ClientError::InvalidInput("recipient id is required".to_string()));
        }

        let mut url = Url::parse(&self.endpoint("/direct-payment/history"))
            .map_err(|e| ClientError::Configuration(format!("Invalid backend URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Configuration("Backend URL cannot take a path".to_string()))?
            .push(recipient_id);

        tracing::debug!(recipient_id, limit, "GET /direct-payment/history");
        let request = self.client.get(url).query(&[("limit", limit)]);
        self.send(request).await
    }
}
