//! Single-flag guard against overlapping uploads.

use std::sync::Arc;
use crate::errors::UploadError;
use super::{lock_credentials, SharedCredentials};

/// Holds `is_busy` for as long as it lives.
///
/// Dropping the guard clears the flag, so every exit path (success, error,
/// early return, or a cancelled future) releases it.
#[derive(Debug)]
pub struct BusyGuard {
    credentials: SharedCredentials,
}

impl BusyGuard {
    pub fn acquire(credentials: &SharedCredentials) -> Result<Self, UploadError> {
        let mut state = lock_credentials(credentials);
        if state.is_busy {
            return Err(UploadError::AlreadyInProgress);
        }
        state.is_busy = true;
        Ok(Self {
            credentials: Arc::clone(credentials),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        lock_credentials(&self.credentials).is_busy = false;
    }
}
