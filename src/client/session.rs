//! Session Manager
//!
//! Single source of truth for who is signed in. The manager is the only
//! writer of [`SessionState`]; views read snapshots or subscribe to changes.
//!
//! Every mutation happens inside the watch channel's critical section, so a
//! subscriber never observes a half-applied update. An epoch counter is bumped
//! by every settled login or restore, by `logout`, and by expiry invalidation;
//! a login or restore that resolves after its epoch was superseded is
//! discarded. Credential I/O runs outside the channel lock and is skipped when
//! the epoch it was issued under is no longer current.
//!
//! Reads through [`SessionManager::state`] sign out an expired session first.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::models::{Credentials, Registration, TokenResponse, User};
use crate::client::credentials::CredentialStore;
use crate::error::{AuthError, ServiceError};
use crate::services::AuthService;

/// Immutable snapshot published to subscribers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub expires_at: Option<DateTime<Utc>>,
    /// An auth check, login, or registration is in flight
    pub loading: bool,
    pub error: Option<AuthError>,
    /// Incremented on every published change
    pub version: u64,
}

/// Outcome of the protected-view gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAccess {
    /// Session check still running, render nothing yet
    Pending,
    Granted(User),
    /// Redirect to sign-in
    Denied,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.user.is_some() && self.expires_at.is_none_or(|exp| exp > now)
    }

    pub fn access(&self) -> ViewAccess {
        match &self.user {
            _ if self.loading => ViewAccess::Pending,
            Some(user) if self.is_authenticated() => ViewAccess::Granted(user.clone()),
            _ => ViewAccess::Denied,
        }
    }

    fn sign_out(&mut self) {
        self.user = None;
        self.expires_at = None;
        self.loading = false;
        self.error = None;
    }
}

pub struct SessionManager {
    auth: Arc<dyn AuthService>,
    credentials: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionState>,
    epoch: AtomicU64,
    /// Serializes credential I/O so each write can be checked against the epoch
    store_lock: Mutex<()>,
}

impl SessionManager {
    /// A new, unauthenticated, idle session
    pub fn new(auth: Arc<dyn AuthService>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            auth,
            credentials,
            state,
            epoch: AtomicU64::new(0),
            store_lock: Mutex::new(()),
        }
    }

    /// Current snapshot. An expired session is dropped before it is returned.
    pub fn state(&self) -> SessionState {
        self.invalidate_if_expired();
        self.state.borrow().clone()
    }

    /// Protected-view gate evaluated against a fresh snapshot
    pub fn access(&self) -> ViewAccess {
        self.state().access()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resume a session from the persisted token. Missing, expired, and
    /// rejected tokens all resolve silently to signed out.
    pub async fn restore_session(&self) -> Option<User> {
        let token = match self.credentials.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored credential, starting signed out");
                return None;
            }
            Err(e) => {
                warn!("Failed to read stored credential: {:#}", e);
                return None;
            }
        };

        let epoch = match self.begin() {
            Ok(epoch) => epoch,
            Err(_) => return self.state().user,
        };

        let outcome = self.auth.current_session(&token).await;
        let mut restored = None;
        let mut discard_token = false;
        let settled = self.settle(epoch, |state| match outcome {
            Ok(info) if info.expires_at > Utc::now() => {
                info!("Restored session for {}", info.user.email);
                restored = Some(info.user.clone());
                state.user = Some(info.user);
                state.expires_at = Some(info.expires_at);
                state.error = None;
            }
            Ok(_) | Err(ServiceError::Unauthorized) => {
                debug!("Stored credential is no longer valid, discarding it");
                discard_token = true;
                state.sign_out();
            }
            Err(e) => {
                debug!("Session restore failed: {}", e);
                state.sign_out();
            }
        });

        if let (Some(epoch), true) = (settled, discard_token) {
            self.with_store_at(epoch, |store| store.clear());
        }
        restored
    }

    pub async fn login(&self, credentials: Credentials) -> Result<User, AuthError> {
        self.validated(credentials.validate())?;
        let epoch = self.begin()?;

        let outcome = self.auth.login(&credentials).await;
        self.complete(epoch, outcome, |e| match e {
            ServiceError::Unauthorized | ServiceError::InvalidInput(_) | ServiceError::Conflict(_) => {
                AuthError::InvalidCredentials
            }
            _ => AuthError::Unavailable,
        })
    }

    /// Register and sign in. The local password checks only give early
    /// feedback; the auth service has the final word.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        self.validated(registration.validate())?;
        let epoch = self.begin()?;

        let outcome = self.auth.register(&registration).await;
        self.complete(epoch, outcome, |e| match e {
            ServiceError::Unauthorized | ServiceError::InvalidInput(_) | ServiceError::Conflict(_) => {
                AuthError::RegistrationRejected
            }
            _ => AuthError::Unavailable,
        })
    }

    /// Clear the session locally, then revoke the token remotely on a best-effort basis.
    /// Never fails and supersedes any login still in flight.
    pub async fn logout(&self) {
        let mut epoch = 0;
        self.state.send_modify(|state| {
            epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            state.sign_out();
            state.version += 1;
        });
        info!("Signed out");

        let mut token = None;
        self.with_store_at(epoch, |store| {
            token = store.load()?;
            store.clear()
        });

        if let Some(token) = token {
            if let Err(e) = self.auth.invalidate(&token).await {
                warn!("Remote token invalidation failed, session already cleared locally: {}", e);
            }
        }
    }

    /// Drop the session when its token has expired. Returns whether it did.
    pub fn invalidate_if_expired(&self) -> bool {
        let now = Utc::now();
        let mut epoch = 0;
        let expired = self.state.send_if_modified(|state| {
            if state.loading || state.user.is_none() || state.is_authenticated_at(now) {
                return false;
            }
            epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            state.sign_out();
            state.version += 1;
            true
        });

        if expired {
            info!("Session expired");
            self.with_store_at(epoch, |store| store.clear());
        }
        expired
    }

    /// Publish a local validation failure unless an operation is in flight.
    fn validated(&self, check: Result<(), crate::error::ValidationError>) -> Result<(), AuthError> {
        let Err(e) = check else {
            return Ok(());
        };
        let err = AuthError::Validation(e);
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            state.error = Some(err.clone());
            state.version += 1;
            true
        });
        Err(err)
    }

    /// Enter the loading state, or fail with `Busy` when already loading
    fn begin(&self) -> Result<u64, AuthError> {
        let mut epoch = None;
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            epoch = Some(self.epoch.load(Ordering::SeqCst));
            state.loading = true;
            state.error = None;
            state.version += 1;
            true
        });
        epoch.ok_or(AuthError::Busy)
    }

    /// Apply `update` and leave the loading state, unless `epoch` was superseded.
    /// Returns the new epoch the applied update established.
    fn settle(&self, epoch: u64, update: impl FnOnce(&mut SessionState)) -> Option<u64> {
        let mut settled = None;
        self.state.send_if_modified(|state| {
            if self
                .epoch
                .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                debug!("Discarding superseded session update");
                return false;
            }
            update(state);
            state.loading = false;
            state.version += 1;
            settled = Some(epoch + 1);
            true
        });
        settled
    }

    fn complete(
        &self,
        epoch: u64,
        outcome: Result<TokenResponse, ServiceError>,
        classify: impl FnOnce(&ServiceError) -> AuthError,
    ) -> Result<User, AuthError> {
        let result = match outcome {
            Ok(response) if response.expires_at <= Utc::now() => {
                debug!("Auth service issued a token that is already expired");
                Err(AuthError::Expired)
            }
            Ok(response) => Ok(response),
            Err(e) => {
                debug!("Auth service call failed: {}", e);
                Err(classify(&e))
            }
        };

        let mut signed_in = None;
        let settled = self.settle(epoch, |state| match result {
            Ok(response) => {
                info!("Signed in as {}", response.user.email);
                state.user = Some(response.user.clone());
                state.expires_at = Some(response.expires_at);
                state.error = None;
                signed_in = Some(Ok(response));
            }
            Err(err) => {
                state.user = None;
                state.expires_at = None;
                state.error = Some(err.clone());
                signed_in = Some(Err(err));
            }
        });

        let (Some(epoch), Some(outcome)) = (settled, signed_in) else {
            return Err(AuthError::Cancelled);
        };
        let response = outcome?;
        self.with_store_at(epoch, |store| store.save(&response.token));
        Ok(response.user)
    }

    /// Run credential I/O unless a later session change superseded `epoch`
    fn with_store_at(
        &self,
        epoch: u64,
        io: impl FnOnce(&dyn CredentialStore) -> anyhow::Result<()>,
    ) {
        let _guard = self.store_lock.lock();
        if self.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Skipping credential update for superseded session");
            return;
        }
        if let Err(e) = io(self.credentials.as_ref()) {
            warn!("Credential store update failed: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::SessionInfo;
    use crate::client::credentials::MemoryCredentialStore;
    use crate::error::ValidationError;
    use async_trait::async_trait;
    use chrono::Duration;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;
    use uuid::Uuid;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".into(),
            email: email.into(),
            is_admin: false,
        }
    }

    fn token_response(email: &str, token: &str) -> TokenResponse {
        TokenResponse {
            user: user(email),
            token: token.into(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    struct FakeAuth {
        login_result: Mutex<Result<TokenResponse, ServiceError>>,
        session_result: Mutex<Result<SessionInfo, ServiceError>>,
        invalidate_fails: bool,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
        invalidated: Mutex<Vec<String>>,
    }

    impl FakeAuth {
        fn new() -> Self {
            Self {
                login_result: Mutex::new(Ok(token_response("alice@example.com", "tok-alice"))),
                session_result: Mutex::new(Err(ServiceError::Unauthorized)),
                invalidate_fails: false,
                gate: None,
                calls: AtomicUsize::new(0),
                invalidated: Mutex::new(Vec::new()),
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }
    }

    #[async_trait]
    impl AuthService for FakeAuth {
        async fn login(&self, _credentials: &Credentials) -> Result<TokenResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.login_result.lock().clone()
        }

        async fn register(&self, _registration: &Registration) -> Result<TokenResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.login_result.lock().clone()
        }

        async fn current_session(&self, _token: &str) -> Result<SessionInfo, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.session_result.lock().clone()
        }

        async fn invalidate(&self, token: &str) -> Result<(), ServiceError> {
            self.invalidated.lock().push(token.to_string());
            if self.invalidate_fails {
                Err(ServiceError::Network("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    fn setup(auth: FakeAuth, store: MemoryCredentialStore) -> (Arc<SessionManager>, Arc<FakeAuth>, Arc<MemoryCredentialStore>) {
        let auth = Arc::new(auth);
        let store = Arc::new(store);
        let manager = Arc::new(SessionManager::new(auth.clone(), store.clone()));
        (manager, auth, store)
    }

    #[tokio::test]
    async fn restore_without_credential_stays_signed_out_quietly() {
        let (manager, auth, _) = setup(FakeAuth::new(), MemoryCredentialStore::new());

        assert_eq!(manager.restore_session().await, None);

        let state = manager.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.is_authenticated());
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn restore_with_valid_token_signs_in() {
        let auth = FakeAuth::new();
        let alice = user("alice@example.com");
        *auth.session_result.lock() = Ok(SessionInfo {
            user: alice.clone(),
            expires_at: Utc::now() + Duration::hours(2),
        });
        let (manager, _, _) = setup(auth, MemoryCredentialStore::with_token("tok"));

        assert_eq!(manager.restore_session().await, Some(alice.clone()));
        let state = manager.state();
        assert!(state.is_authenticated());
        assert!(!state.loading);
        assert_eq!(state.access(), ViewAccess::Granted(alice));
    }

    #[tokio::test]
    async fn restore_with_rejected_token_discards_it_without_error() {
        let (manager, _, store) = setup(FakeAuth::new(), MemoryCredentialStore::with_token("stale"));

        assert_eq!(manager.restore_session().await, None);
        let state = manager.state();
        assert!(state.error.is_none());
        assert!(!state.loading);
        assert_eq!(state.access(), ViewAccess::Denied);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn restore_during_outage_keeps_credential_for_later() {
        let auth = FakeAuth::new();
        *auth.session_result.lock() = Err(ServiceError::Network("down".into()));
        let (manager, _, store) = setup(auth, MemoryCredentialStore::with_token("tok"));

        assert_eq!(manager.restore_session().await, None);
        assert!(manager.state().error.is_none());
        assert_eq!(store.load().unwrap().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn login_success_persists_token_and_notifies() {
        let (manager, _, store) = setup(FakeAuth::new(), MemoryCredentialStore::new());
        let mut rx = manager.subscribe();
        let before = rx.borrow_and_update().version;

        let signed_in = manager
            .login(Credentials::new("alice@example.com", "hunter22"))
            .await
            .unwrap();

        assert_eq!(signed_in.email, "alice@example.com");
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert!(state.version > before);
        assert!(state.is_authenticated());
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-alice"));
    }

    #[tokio::test]
    async fn login_failure_sets_generic_error() {
        let auth = FakeAuth::new();
        *auth.login_result.lock() = Err(ServiceError::Unauthorized);
        let (manager, _, store) = setup(auth, MemoryCredentialStore::new());

        let err = manager
            .login(Credentials::new("mallory@example.com", "guess123"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        let state = manager.state();
        assert_eq!(state.error, Some(AuthError::InvalidCredentials));
        assert!(!state.is_authenticated());
        assert!(!state.loading);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn login_outage_is_reported_as_unavailable() {
        let auth = FakeAuth::new();
        *auth.login_result.lock() = Err(ServiceError::Server {
            status: 500,
            message: "db pool exhausted".into(),
        });
        let (manager, _, _) = setup(auth, MemoryCredentialStore::new());

        let err = manager
            .login(Credentials::new("alice@example.com", "hunter22"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Unavailable);
        assert!(!err.to_string().contains("pool"));
    }

    #[tokio::test]
    async fn login_with_empty_fields_never_calls_service() {
        let (manager, auth, _) = setup(FakeAuth::new(), MemoryCredentialStore::new());

        let err = manager.login(Credentials::new("", "pw")).await.unwrap_err();

        assert_eq!(err, AuthError::Validation(ValidationError::MissingIdentifier));
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert_eq!(manager.state().error, Some(err));
    }

    #[tokio::test]
    async fn second_login_while_pending_is_busy() {
        let gate = Arc::new(Notify::new());
        let (manager, auth, _) = setup(FakeAuth::new().gated(gate.clone()), MemoryCredentialStore::new());

        let first = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .login(Credentials::new("alice@example.com", "hunter22"))
                    .await
            })
        };
        let mut rx = manager.subscribe();
        rx.wait_for(|s| s.loading).await.unwrap();

        let second = manager
            .login(Credentials::new("alice@example.com", "hunter22"))
            .await;
        assert_eq!(second, Err(AuthError::Busy));
        assert!(manager.state().loading);

        gate.notify_one();
        let first = first.await.unwrap();
        assert!(first.is_ok());
        assert!(manager.state().is_authenticated());
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn logout_clears_everything_even_when_remote_invalidation_fails() {
        let mut auth = FakeAuth::new();
        auth.invalidate_fails = true;
        let (manager, auth, store) = setup(auth, MemoryCredentialStore::new());
        manager
            .login(Credentials::new("alice@example.com", "hunter22"))
            .await
            .unwrap();

        manager.logout().await;

        let state = manager.state();
        assert!(!state.is_authenticated());
        assert!(state.user.is_none());
        assert!(state.error.is_none());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(auth.invalidated.lock().as_slice(), ["tok-alice"]);
    }

    #[tokio::test]
    async fn logout_supersedes_pending_login() {
        let gate = Arc::new(Notify::new());
        let (manager, _, store) = setup(FakeAuth::new().gated(gate.clone()), MemoryCredentialStore::new());

        let pending = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .login(Credentials::new("alice@example.com", "hunter22"))
                    .await
            })
        };
        manager.subscribe().wait_for(|s| s.loading).await.unwrap();

        manager.logout().await;
        gate.notify_one();

        assert_eq!(pending.await.unwrap(), Err(AuthError::Cancelled));
        let state = manager.state();
        assert!(!state.is_authenticated());
        assert!(!state.loading);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn register_rejects_mismatched_confirmation_locally() {
        let (manager, auth, _) = setup(FakeAuth::new(), MemoryCredentialStore::new());

        let err = manager
            .register(Registration {
                name: "Bob".into(),
                email: "bob@example.com".into(),
                password: "password1".into(),
                confirm_password: "password2".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::Validation(ValidationError::PasswordMismatch));
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn register_conflict_is_generic() {
        let auth = FakeAuth::new();
        *auth.login_result.lock() = Err(ServiceError::Conflict("email bob@example.com exists".into()));
        let (manager, _, _) = setup(auth, MemoryCredentialStore::new());

        let err = manager
            .register(Registration {
                name: "Bob".into(),
                email: "bob@example.com".into(),
                password: "password1".into(),
                confirm_password: "password1".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::RegistrationRejected);
        assert!(!err.to_string().contains("bob@example.com"));
    }

    #[tokio::test]
    async fn login_with_already_expired_token_stays_signed_out() {
        let auth = FakeAuth::new();
        *auth.login_result.lock() = Ok(TokenResponse {
            user: user("alice@example.com"),
            token: "short-lived".into(),
            expires_at: Utc::now() - Duration::seconds(1),
        });
        let (manager, _, store) = setup(auth, MemoryCredentialStore::new());

        let err = manager
            .login(Credentials::new("alice@example.com", "hunter22"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::Expired);
        let state = manager.state();
        assert!(state.user.is_none() || state.is_authenticated());
        assert!(state.user.is_none());
        assert_eq!(state.access(), ViewAccess::Denied);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn restore_with_expired_session_discards_token() {
        let auth = FakeAuth::new();
        *auth.session_result.lock() = Ok(SessionInfo {
            user: user("alice@example.com"),
            expires_at: Utc::now() - Duration::minutes(5),
        });
        let (manager, _, store) = setup(auth, MemoryCredentialStore::with_token("old"));

        assert_eq!(manager.restore_session().await, None);
        assert!(manager.state().user.is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn session_that_expires_later_is_dropped_on_next_read() {
        let (manager, _, store) = setup(FakeAuth::new(), MemoryCredentialStore::new());
        manager
            .login(Credentials::new("alice@example.com", "hunter22"))
            .await
            .unwrap();
        assert!(manager.state().is_authenticated());
        let rx = manager.subscribe();

        // Token lifetime runs out while the session is idle
        manager.state.send_modify(|state| {
            state.expires_at = Some(Utc::now() - Duration::seconds(1));
        });

        let state = manager.state();
        assert!(state.user.is_none());
        assert!(!state.is_authenticated());
        assert_eq!(manager.access(), ViewAccess::Denied);
        assert!(rx.borrow().user.is_none());
        assert_eq!(store.load().unwrap(), None);
        assert!(!manager.invalidate_if_expired());
    }

    /// Records what subscribers could see at the moment the token was written
    struct ObservingStore {
        inner: MemoryCredentialStore,
        view: Mutex<Option<watch::Receiver<SessionState>>>,
        user_visible_on_save: Mutex<Option<bool>>,
    }

    impl CredentialStore for ObservingStore {
        fn save(&self, token: &str) -> anyhow::Result<()> {
            // Would block forever if the watch channel were still locked here
            let visible = self
                .view
                .lock()
                .as_ref()
                .map(|rx| rx.borrow().user.is_some());
            *self.user_visible_on_save.lock() = visible;
            self.inner.save(token)
        }

        fn load(&self) -> anyhow::Result<Option<String>> {
            self.inner.load()
        }

        fn clear(&self) -> anyhow::Result<()> {
            self.inner.clear()
        }
    }

    #[tokio::test]
    async fn token_is_persisted_after_the_session_is_published() {
        let store = Arc::new(ObservingStore {
            inner: MemoryCredentialStore::new(),
            view: Mutex::new(None),
            user_visible_on_save: Mutex::new(None),
        });
        let manager = SessionManager::new(Arc::new(FakeAuth::new()), store.clone());
        *store.view.lock() = Some(manager.subscribe());

        manager
            .login(Credentials::new("alice@example.com", "hunter22"))
            .await
            .unwrap();

        assert_eq!(*store.user_visible_on_save.lock(), Some(true));
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-alice"));
    }

    #[test]
    fn access_is_pending_while_loading() {
        let state = SessionState {
            loading: true,
            ..SessionState::default()
        };
        assert_eq!(state.access(), ViewAccess::Pending);
        assert_eq!(SessionState::default().access(), ViewAccess::Denied);
    }
}
