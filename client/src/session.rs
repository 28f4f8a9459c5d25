//! Session state: who is signed in, persisted across restarts
//!
//! At most one identity is active. It is mirrored in the key-value store
//! under a payload key per kind plus a discriminant key, and published to
//! observers only after the store has been updated.

use serde::de::DeserializeOwned;
use shared::{
    decode_persisted, encode_persisted, payload_key, FarmerIdentity, Identity, KeyValueStore,
    OrganizationIdentity, OrganizationProfileUpdate, OrganizationRegistration, SessionKind,
    StorageError, FARMER_KEY, KIND_KEY, NGO_KEY, SESSION_KEYS, TOKEN_KEY,
};
use std::sync::atomic::AtomicBool;
use tokio::sync::watch;
use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::external::AuthApi;
use crate::guard::InFlight;

/// What the caller signs in with
#[derive(Debug, Clone)]
pub enum LoginInput {
    /// An identity already obtained elsewhere
    Identity(Identity),
    /// Credentials checked by the backend
    Credentials {
        kind: SessionKind,
        identifier: String,
        password: String,
    },
}

impl LoginInput {
    pub fn farmer(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        LoginInput::Credentials {
            kind: SessionKind::Farmer,
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    pub fn ngo(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginInput::Credentials {
            kind: SessionKind::Ngo,
            identifier: email.into(),
            password: password.into(),
        }
    }
}

impl From<Identity> for LoginInput {
    fn from(identity: Identity) -> Self {
        LoginInput::Identity(identity)
    }
}

enum Loaded<T> {
    Absent,
    Present(T),
    Discarded,
}

/// Authenticated session backed by a key-value store
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    state: watch::Sender<Option<Identity>>,
    request_in_flight: AtomicBool,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Open a session from whatever the store holds.
    ///
    /// Never fails: unreadable payloads are removed and the session starts
    /// signed out.
    pub fn initialize(store: S) -> Self {
        let (state, _) = watch::channel(None);
        let session = Self {
            store,
            state,
            request_in_flight: AtomicBool::new(false),
        };

        let identity = match session.load::<FarmerIdentity>(FARMER_KEY) {
            Loaded::Present(farmer) => Some(Identity::Farmer(farmer)),
            Loaded::Discarded => None,
            Loaded::Absent => match session.load::<OrganizationIdentity>(NGO_KEY) {
                Loaded::Present(ngo) => Some(Identity::Ngo(ngo)),
                Loaded::Absent | Loaded::Discarded => None,
            },
        };

        session.reconcile(identity.as_ref());
        if let Some(identity) = &identity {
            tracing::info!(kind = %identity.kind(), id = identity.id(), "Restored session");
        }
        session.state.send_replace(identity);
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn kind(&self) -> Option<SessionKind> {
        self.state.borrow().as_ref().map(Identity::kind)
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    /// Observe every session transition
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    /// Bearer token of the current NGO session, if any
    pub fn token(&self) -> Option<String> {
        if self.kind() != Some(SessionKind::Ngo) {
            return None;
        }
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read session token");
                None
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Make `identity` the active session, replacing any other.
    ///
    /// Persisted before it is published. On a failed write the store is put
    /// back as it was and the in-memory session is unchanged.
    pub fn establish(&self, identity: Identity) -> ClientResult<()> {
        self.commit(identity, None)
    }

    /// Sign in with a ready identity or with credentials
    pub async fn login<A>(&self, input: LoginInput, api: &A) -> ClientResult<SessionKind>
    where
        A: AuthApi + ?Sized,
    {
        match input {
            LoginInput::Identity(identity) => {
                let kind = identity.kind();
                self.establish(identity)?;
                Ok(kind)
            }
            LoginInput::Credentials {
                kind,
                identifier,
                password,
            } => {
                let identifier = identifier.trim();
                if identifier.is_empty() || password.is_empty() {
                    return Err(ClientError::MissingCredentials);
                }

                let _in_flight = InFlight::acquire(&self.request_in_flight)?;
                match kind {
                    SessionKind::Farmer => {
                        let farmer = api.farmer_login(identifier, &password).await?;
                        self.commit(Identity::Farmer(farmer), None)?;
                    }
                    SessionKind::Ngo => {
                        let auth = api.ngo_login(identifier, &password).await?;
                        self.commit(Identity::Ngo(auth.ngo), Some(&auth.token))?;
                    }
                }
                Ok(kind)
            }
        }
    }

    /// Create an NGO account and sign in as it
    pub async fn register_ngo<A>(
        &self,
        registration: &OrganizationRegistration,
        api: &A,
    ) -> ClientResult<OrganizationIdentity>
    where
        A: AuthApi + ?Sized,
    {
        registration.validate()?;

        let _in_flight = InFlight::acquire(&self.request_in_flight)?;
        let auth = api.ngo_register(registration).await?;
        self.commit(Identity::Ngo(auth.ngo.clone()), Some(&auth.token))?;
        Ok(auth.ngo)
    }

    /// Re-read the NGO profile from the backend
    pub async fn refresh_ngo_profile<A>(&self, api: &A) -> ClientResult<OrganizationIdentity>
    where
        A: AuthApi + ?Sized,
    {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        let _in_flight = InFlight::acquire(&self.request_in_flight)?;
        let ngo = api.ngo_profile(&token).await?;
        self.commit(Identity::Ngo(ngo.clone()), Some(&token))?;
        Ok(ngo)
    }

    pub async fn update_ngo_profile<A>(
        &self,
        update: &OrganizationProfileUpdate,
        api: &A,
    ) -> ClientResult<OrganizationIdentity>
    where
        A: AuthApi + ?Sized,
    {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        let _in_flight = InFlight::acquire(&self.request_in_flight)?;
        let ngo = api.update_ngo_profile(&token, update).await?;
        self.commit(Identity::Ngo(ngo.clone()), Some(&token))?;
        Ok(ngo)
    }

    /// Sign out. Removes every session key even when already signed out.
    pub fn logout(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.store.remove(key) {
                tracing::error!(key, error = %e, "Failed to clear session key");
            }
        }
        if self.state.send_replace(None).is_some() {
            tracing::info!("Signed out");
        }
    }

    fn commit(&self, identity: Identity, token: Option<&str>) -> ClientResult<()> {
        let kind = identity.kind();
        let payload = match &identity {
            Identity::Farmer(farmer) => encode_persisted(farmer)?,
            Identity::Ngo(ngo) => encode_persisted(ngo)?,
        };

        let snapshot = self.snapshot()?;
        if let Err(e) = self.write(kind, &payload, token) {
            tracing::error!(kind = %kind, error = %e, "Session write failed, restoring previous state");
            self.rollback(&snapshot);
            return Err(e.into());
        }

        tracing::info!(kind = %kind, id = identity.id(), "Signed in");
        self.state.send_replace(Some(identity));
        Ok(())
    }

    fn write(&self, kind: SessionKind, payload: &str, token: Option<&str>) -> Result<(), StorageError> {
        let other = match kind {
            SessionKind::Farmer => SessionKind::Ngo,
            SessionKind::Ngo => SessionKind::Farmer,
        };
        self.store.set(payload_key(kind), payload)?;
        self.store.set(KIND_KEY, kind.as_str())?;
        self.store.remove(payload_key(other))?;
        match token {
            Some(token) => self.store.set(TOKEN_KEY, token),
            None => self.store.remove(TOKEN_KEY),
        }
    }

    fn snapshot(&self) -> Result<Vec<(&'static str, Option<String>)>, StorageError> {
        SESSION_KEYS
            .iter()
            .map(|key| Ok((*key, self.store.get(key)?)))
            .collect()
    }

    fn rollback(&self, snapshot: &[(&'static str, Option<String>)]) {
        for (key, value) in snapshot {
            let restored = match value {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(e) = restored {
                tracing::error!(key = *key, error = %e, "Failed to restore session key");
            }
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Loaded<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Absent,
            Err(e) => {
                tracing::warn!(key, error = %e, "Could not read persisted session");
                return Loaded::Absent;
            }
        };

        match decode_persisted(&raw) {
            Ok(identity) => Loaded::Present(identity),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding persisted session");
                if let Err(e) = self.store.remove(key) {
                    tracing::warn!(key, error = %e, "Could not remove persisted session");
                }
                Loaded::Discarded
            }
        }
    }

    /// Bring the stored keys in line with the restored identity
    fn reconcile(&self, identity: Option<&Identity>) {
        let result = match identity {
            Some(identity) => {
                let kind = identity.kind();
                self.store
                    .set(KIND_KEY, kind.as_str())
                    .and_then(|_| match kind {
                        SessionKind::Farmer => self
                            .store
                            .remove(NGO_KEY)
                            .and_then(|_| self.store.remove(TOKEN_KEY)),
                        SessionKind::Ngo => self.store.remove(FARMER_KEY),
                    })
            }
            None => SESSION_KEYS
                .iter()
                .try_for_each(|key| self.store.remove(key)),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Could not tidy persisted session keys");
        }
    }
}
