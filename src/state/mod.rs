//! Shared state.
//!
//! This module contains the shared credential handle, the busy guard that
//! keeps uploads from overlapping, and the manager that loads and persists
//! the credentials.

mod busy;
mod manager;

use std::sync::{Arc, Mutex, MutexGuard};
use crate::types::CredentialState;

pub use busy::BusyGuard;
pub use manager::AppStateManager;

/// Credential state shared by the token manager and the uploader.
///
/// Locks are held only for short, synchronous sections, never across a
/// network call.
pub type SharedCredentials = Arc<Mutex<CredentialState>>;

pub fn shared_credentials(state: CredentialState) -> SharedCredentials {
    Arc::new(Mutex::new(state))
}

/// Lock the credentials, recovering the data if a previous holder panicked.
pub fn lock_credentials(credentials: &SharedCredentials) -> MutexGuard<'_, CredentialState> {
    credentials.lock().unwrap_or_else(|e| e.into_inner())
}
