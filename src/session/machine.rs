//! Session manager: startup protocol and the public auth operations.
//!
//! ARCHITECTURE
//! ============
//! The manager owns the only `watch::Sender<Session>`. Every change goes
//! through `dispatch`, which folds one `SessionAction` into the current value
//! with `reduce`. Readers take snapshots or subscribe for change
//! notifications.
//!
//! Successful operations write the token store before dispatching, so a
//! reader that sees an authenticated session can always reload it.
//!
//! CONCURRENCY
//! ===========
//! Each operation takes a sequence number when it starts. A completion
//! whose number is no longer the latest is stale: it still returns its
//! result to its own caller, and a stale sign-in or restore grants nothing.
//! The most recently issued operation therefore decides the final state,
//! whatever order the network calls finish in.
//!
//! Clearing is the exception. A sign-out, or a restore the authority
//! rejected, clears credentials even when stale, unless a newer sign-in has
//! been applied in the meantime. The credential epoch counts applied sign-ins
//! and is only read or bumped under its lock, together with the store write.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::state::{Session, SessionAction, SessionPhase, reduce};
use crate::api::{AuthError, AuthSuccess, SessionApi, SignInCredentials, SignUpCredentials, User};
use crate::store::TokenStore;

/// Sequence number of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpStamp(u64);

pub struct SessionManager {
    api: Arc<dyn SessionApi>,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    sequence: AtomicU64,
    started: AtomicBool,
    epoch: Mutex<u64>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: Arc<dyn SessionApi>, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            api,
            store,
            state,
            sequence: AtomicU64::new(0),
            started: AtomicBool::new(false),
            epoch: Mutex::new(0),
        }
    }

    /// Current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified after every dispatch.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    // =========================================================================
    // STARTUP
    // =========================================================================

    /// Restore the persisted session, revalidating it with the authority.
    ///
    /// Runs once per manager; later calls return the current phase without
    /// doing anything. A stored session that fails to refresh for any reason,
    /// including the network being unreachable, is discarded.
    pub async fn initialize(&self) -> SessionPhase {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("session already initialized");
            return self.snapshot().phase();
        }
        let op = self.next_stamp();
        let since = self.current_epoch();

        let Some(stored) = self.store.load() else {
            if self.is_current(op) {
                self.dispatch(SessionAction::SetLoading(false));
            }
            tracing::info!("no stored session");
            return self.snapshot().phase();
        };

        match self.api.refresh().await {
            Ok(outcome) => {
                if !self.is_current(op) {
                    tracing::debug!("dropping stale session refresh");
                    return self.snapshot().phase();
                }
                match outcome.token {
                    Some(rotated) if rotated != stored.token => self.grant(stored.user, rotated, true),
                    _ => self.grant(stored.user, stored.token, false),
                }
                tracing::info!("stored session restored");
            }
            Err(e) => {
                tracing::info!(error = %e, status = e.status_code(), "stored session rejected; signing out");
                self.revoke(op, since);
            }
        }
        self.snapshot().phase()
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Create an account and sign into it.
    ///
    /// # Errors
    ///
    /// Returns the failure after also recording it in the session.
    pub async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<AuthSuccess, AuthError> {
        let op = self.begin();
        let result = match credentials.validate() {
            Ok(()) => self.api.register(credentials).await,
            Err(e) => Err(e),
        };
        self.settle(op, result)
    }

    /// Sign into an existing account.
    ///
    /// # Errors
    ///
    /// Returns the failure after also recording it in the session.
    pub async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSuccess, AuthError> {
        let op = self.begin();
        let result = match credentials.validate() {
            Ok(()) => self.api.login(credentials).await,
            Err(e) => Err(e),
        };
        self.settle(op, result)
    }

    /// Sign out locally, telling the authority on a best-effort basis.
    ///
    /// A sign-out overtaken by a later operation still clears the session,
    /// unless that later operation signed someone in first.
    pub async fn sign_out(&self) {
        let op = self.begin();
        let since = self.current_epoch();
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "sign-out request failed; clearing local session anyway");
        }
        self.revoke(op, since);
    }

    pub fn clear_error(&self) {
        self.dispatch(SessionAction::ClearError);
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn next_stamp(&self) -> OpStamp {
        OpStamp(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_current(&self, op: OpStamp) -> bool {
        self.sequence.load(Ordering::SeqCst) == op.0
    }

    fn begin(&self) -> OpStamp {
        let op = self.next_stamp();
        self.dispatch(SessionAction::SetLoading(true));
        self.dispatch(SessionAction::ClearError);
        op
    }

    fn settle(&self, op: OpStamp, result: Result<AuthSuccess, AuthError>) -> Result<AuthSuccess, AuthError> {
        if !self.is_current(op) {
            tracing::debug!(ok = result.is_ok(), "dropping stale auth completion");
            return result;
        }
        match &result {
            Ok(auth) => self.grant(auth.user.clone(), auth.token.clone(), true),
            Err(e) => {
                tracing::debug!(code = e.error_code(), status = e.status_code(), "auth operation failed");
                self.dispatch(SessionAction::SetError(e.clone()));
            }
        }
        result
    }

    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_epoch(&self) -> u64 {
        *self.lock_epoch()
    }

    /// Apply a sign-in, optionally persisting it first.
    fn grant(&self, user: User, token: String, persist: bool) {
        let mut epoch = self.lock_epoch();
        if persist {
            self.persist(&token, &user);
        }
        self.dispatch(SessionAction::LoginSuccess { user, token });
        *epoch += 1;
    }

    /// Clear credentials on behalf of operation `op`, started at epoch `since`.
    fn revoke(&self, op: OpStamp, since: u64) {
        let epoch = self.lock_epoch();
        if *epoch != since {
            tracing::debug!("newer sign-in applied; keeping it");
            return;
        }
        self.forget();
        if self.is_current(op) {
            self.dispatch(SessionAction::Logout);
            return;
        }

        // A newer operation owns the loading flag and error; keep them.
        let (in_flight, error) = {
            let session = self.state.borrow();
            (session.is_loading(), session.error().cloned())
        };
        tracing::debug!(in_flight, "clearing credentials for superseded operation");
        self.dispatch(SessionAction::Logout);
        if in_flight {
            self.dispatch(SessionAction::SetLoading(true));
        } else if let Some(error) = error {
            self.dispatch(SessionAction::SetError(error));
        }
    }

    fn persist(&self, token: &str, user: &User) {
        if let Err(e) = self.store.save(token, user) {
            tracing::warn!(error = %e, "failed to persist session; it will not survive a restart");
        }
    }

    fn forget(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
    }

    fn dispatch(&self, action: SessionAction) {
        let kind = action.kind();
        self.state.send_modify(|session| {
            let previous = std::mem::take(session);
            *session = reduce(previous, action);
        });
        tracing::debug!(action = kind, phase = self.state.borrow().phase().as_str(), "session transition");
    }
}

#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;
