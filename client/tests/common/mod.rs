//! Test doubles for the backend collaborator and the key-value store

#![allow(dead_code)]

use async_trait::async_trait;
use farmer_kyc_client::{AuthApi, ClientError, ClientResult, KycApi};
use shared::{
    ApplicationReceipt, District, Experience, FarmerIdentity, FieldError, KeyValueStore,
    MemoryStore, OrganizationAuth, OrganizationIdentity, OrganizationProfileUpdate,
    OrganizationRegistration, RegistrationDraft, StorageError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn farmer() -> FarmerIdentity {
    FarmerIdentity {
        id: "farmer-001".into(),
        name: "Rajan Pillai".into(),
        email: "rajan@example.in".into(),
        phone: "9876543210".into(),
        farm_size: "4 acres".into(),
        location: "Palakkad".into(),
        crops: vec!["rice".into(), "banana".into()],
        avatar: "RP".into(),
    }
}

pub fn ngo() -> OrganizationIdentity {
    OrganizationIdentity {
        id: "ngo-77".into(),
        ngo_name: "Kerala Harvest Foundation".into(),
        email: "contact@harvest.org".into(),
        mobile: "9447000000".into(),
        registration_id: "KL/TVM/2019/118".into(),
        details: "Supports smallholder paddy farmers".into(),
        focus_areas: vec!["irrigation".into()],
        is_verified: true,
        is_active: true,
        ..Default::default()
    }
}

/// A draft that passes every local check
pub fn valid_draft() -> RegistrationDraft {
    let mut draft = RegistrationDraft::default();
    draft.personal_info.full_name = "Mini Joseph".into();
    draft.personal_info.phone = "9876543210".into();
    draft.personal_info.address = "Near St. Mary's Church, Kalady".into();
    draft.personal_info.pincode = "682001".into();
    draft.personal_info.district = Some(District::Ernakulam);
    draft.farm_info.farm_size = "1.5 acres".into();
    draft.farm_info.crop_types = "Nutmeg, Pepper".into();
    draft.farm_info.farm_location = "Kalady".into();
    draft.farm_info.experience = Some(Experience::ThreeToFive);
    draft
}

/// What the fake backend answers to a submission
#[derive(Clone)]
pub enum Outcome {
    Accept(String),
    Reject(String, Vec<FieldError>),
    Unreachable,
}

/// Scripted backend that records every call
pub struct FakeBackend {
    outcome: Mutex<Outcome>,
    pub submissions: Mutex<Vec<RegistrationDraft>>,
    pub auth_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            submissions: Mutex::new(Vec::new()),
            auth_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Hold every submission until the gate is notified
    pub fn gated(outcome: Outcome, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(outcome)
        }
    }

    pub fn set_outcome(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    fn answer<T>(&self, ok: impl FnOnce(String) -> T) -> ClientResult<T> {
        match self.outcome.lock().unwrap().clone() {
            Outcome::Accept(value) => Ok(ok(value)),
            Outcome::Reject(message, field_errors) => Err(ClientError::Backend {
                message,
                field_errors,
            }),
            Outcome::Unreachable => Err(ClientError::Transport("connection refused".into())),
        }
    }
}

#[async_trait]
impl KycApi for FakeBackend {
    async fn submit_application(&self, draft: &RegistrationDraft) -> ClientResult<ApplicationReceipt> {
        self.submissions.lock().unwrap().push(draft.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.answer(|id| ApplicationReceipt { id })
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn farmer_login(&self, _identifier: &str, _password: &str) -> ClientResult<FarmerIdentity> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.answer(|_| farmer())
    }

    async fn ngo_login(&self, _email: &str, _password: &str) -> ClientResult<OrganizationAuth> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(|token| OrganizationAuth { token, ngo: ngo() })
    }

    async fn ngo_register(
        &self,
        registration: &OrganizationRegistration,
    ) -> ClientResult<OrganizationAuth> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let mut account = ngo();
        account.ngo_name = registration.ngo_name.clone();
        account.email = registration.email.clone();
        self.answer(|token| OrganizationAuth { token, ngo: account })
    }

    async fn ngo_profile(&self, _token: &str) -> ClientResult<OrganizationIdentity> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        self.answer(|_| {
            let mut account = ngo();
            account.details = "Refreshed".into();
            account
        })
    }

    async fn update_ngo_profile(
        &self,
        _token: &str,
        update: &OrganizationProfileUpdate,
    ) -> ClientResult<OrganizationIdentity> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let mut account = ngo();
        if let Some(details) = &update.details {
            account.details = details.clone();
        }
        self.answer(|_| account)
    }
}

/// Memory store whose writes to one key can be made to fail
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing_key: Mutex<Option<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_key: Mutex::new(None),
        }
    }

    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock().unwrap() = Some(key.to_string());
    }

    pub fn heal(&self) {
        *self.failing_key.lock().unwrap() = None;
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_key.lock().unwrap().as_deref() == Some(key) {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                message: "quota exceeded".into(),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
