//! Session/identity holder.
//!
//! A [`Session`] holds at most one authenticated subject and mirrors it into a durable slot, so a
//! session restored from the same slot picks up where the previous one left off.
//!
//! ## States
//!
//! ```text
//! Anonymous ──sign_in ok──▶ Authenticated(subject)
//!     ▲                        │   ▲
//!     └───────sign_out─────────┘   └── sign_in ok (replaces subject)
//! ```
//!
//! A failed sign-in leaves the state unchanged. Sessions are explicit values passed to whoever
//! needs them; there is no process-wide current user.

use crate::access::AccessControl;
use crate::error::{AccessError, AccessResult};
use crate::evaluator;
use crate::session::slot::SessionSlot;
use crate::subject::Subject;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Subject),
}

/// One client's session, persisted through the slot `S`.
#[derive(Debug)]
pub struct Session<S> {
    access: Arc<AccessControl>,
    slot: S,
    state: SessionState,
}

impl<S: SessionSlot> Session<S> {
    /// Starts a session from whatever the slot holds.
    ///
    /// An empty slot starts `Anonymous`. A slot that cannot be read or decoded is logged and also
    /// starts `Anonymous`; it is left in place for inspection and overwritten on the next sign-in.
    pub fn restore(access: Arc<AccessControl>, slot: S) -> Self {
        let state = match slot.load() {
            Ok(Some(subject)) => {
                tracing::debug!(subject = %subject.id, "restored session from slot");
                SessionState::Authenticated(subject)
            }
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                tracing::warn!("ignoring unreadable session slot: {}", e);
                SessionState::Anonymous
            }
        };

        Self {
            access,
            slot,
            state,
        }
    }

    /// Authenticates and replaces the held subject.
    ///
    /// The subject is written to the slot before the in-memory state changes, so a slot failure
    /// leaves the previous state intact.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AuthenticationFailed` for unknown accounts or wrong secrets, or a
    /// slot error if the subject cannot be persisted.
    pub fn sign_in(&mut self, email: &str, secret: &str) -> AccessResult<&Subject> {
        let subject = self.access.authenticate(email, secret)?;
        self.slot.store(&subject)?;
        self.state = SessionState::Authenticated(subject);
        self.current_subject().ok_or(AccessError::AuthenticationFailed)
    }

    /// Boolean form of [`Session::sign_in`].
    pub fn try_sign_in(&mut self, email: &str, secret: &str) -> bool {
        match self.sign_in(email, secret) {
            Ok(_) => true,
            Err(AccessError::AuthenticationFailed) => false,
            Err(e) => {
                tracing::error!("sign-in could not be persisted: {}", e);
                false
            }
        }
    }

    /// Returns to `Anonymous` and empties the slot. Safe to call when already anonymous.
    ///
    /// # Errors
    ///
    /// Returns a slot error if the slot cannot be cleared. The in-memory state is anonymous
    /// regardless.
    pub fn sign_out(&mut self) -> AccessResult<()> {
        if let SessionState::Authenticated(subject) = &self.state {
            tracing::info!(subject = %subject.id, "signed out");
        }
        self.state = SessionState::Anonymous;
        self.slot.clear()
    }

    pub fn current_subject(&self) -> Option<&Subject> {
        match &self.state {
            SessionState::Authenticated(subject) => Some(subject),
            SessionState::Anonymous => None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        evaluator::has_capability(self.current_subject(), capability)
    }

    pub fn has_any_capability<I, T>(&self, capabilities: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        evaluator::has_any_capability(self.current_subject(), capabilities)
    }

    /// Gives back the slot, ending the session without clearing it.
    pub fn into_slot(self) -> S {
        self.slot
    }
}
