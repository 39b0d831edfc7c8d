//! Single-flight renewal of the access credential.
//!
//! Every request remembers the credential generation it was sent with. When it
//! comes back unauthorized, it calls [`RefreshCoordinator::renew`] with that
//! generation. Only one renewal runs at a time; a caller that finds the
//! generation already advanced retries straight away, and a caller whose
//! generation already failed to renew gives up without asking again.

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
    Failed,
}

/// How a successful [`RefreshCoordinator::renew`] call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renewal {
    /// This caller performed the renewal.
    Renewed,
    /// Someone else renewed (or logged in again) since the caller's request was sent.
    AlreadyRenewed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenewalError {
    /// This caller's renewal attempt was rejected. The caller owns the logout.
    #[error("credential renewal failed")]
    Failed,
    /// An earlier renewal for the same generation was rejected.
    #[error("credential renewal already failed for this session")]
    FailedEarlier,
}

#[derive(Debug)]
struct Inner {
    state: RefreshState,
    generation: u64,
    failed_generation: Option<u64>,
    attempts: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            state: RefreshState::Idle,
            generation: 0,
            failed_generation: None,
            attempts: 0,
        }
    }
}

#[derive(Default)]
pub struct RefreshCoordinator {
    gate: futures::lock::Mutex<()>,
    inner: Mutex<Inner>,
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("inner", &*self.lock())
            .finish()
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the credential currently in use.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn state(&self) -> RefreshState {
        self.lock().state
    }

    /// Number of renewals actually performed.
    pub fn attempts(&self) -> u64 {
        self.lock().attempts
    }

    /// Renews the credential unless the generation `observed` by the caller
    /// has already been renewed or has already failed.
    pub async fn renew<F, Fut>(&self, observed: u64, refresh: F) -> Result<Renewal, RenewalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let _gate = self.gate.lock().await;
        {
            let mut inner = self.lock();
            if inner.generation != observed {
                return Ok(Renewal::AlreadyRenewed);
            }
            if inner.failed_generation == Some(observed) {
                return Err(RenewalError::FailedEarlier);
            }
            inner.state = RefreshState::Refreshing;
            inner.attempts += 1;
        }

        let outcome = refresh().await;

        let mut inner = self.lock();
        match outcome {
            Ok(()) => {
                inner.generation += 1;
                inner.state = RefreshState::Idle;
                tracing::debug!(generation = inner.generation, "credential renewed");
                Ok(Renewal::Renewed)
            }
            Err(err) => {
                inner.failed_generation = Some(observed);
                inner.state = RefreshState::Failed;
                tracing::warn!(error = %err, "credential renewal failed");
                Err(RenewalError::Failed)
            }
        }
    }

    /// Returns to `Idle` once the forced logout that followed a failure is done.
    pub fn finish_logout(&self) {
        let mut inner = self.lock();
        if inner.state == RefreshState::Failed {
            inner.state = RefreshState::Idle;
        }
    }

    /// A new credential was obtained outside of renewal (login or logout).
    pub fn credential_replaced(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.failed_generation = None;
        inner.state = RefreshState::Idle;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
