//! Server-side sessions keyed by opaque token.
//!
//! Each signed-in client gets its own [`Session`] with an in-memory slot, so concurrent requests
//! never share a current subject. Unknown tokens behave exactly like an anonymous session.
//!
//! Sessions expire a fixed lifetime after sign-in. An expired entry is treated as missing and
//! dropped when it is next looked up; every `open` also sweeps out all expired entries, so the
//! table only holds sessions that are still live.

use crate::access::AccessControl;
use crate::error::AccessResult;
use crate::session::holder::Session;
use crate::session::slot::MemorySlot;
use crate::subject::Subject;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Result of a successful [`SessionTable::open`].
#[derive(Debug, Clone)]
pub struct OpenedSession {
    pub token: String,
    pub subject: Subject,
    pub opened_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    session: Session<MemorySlot>,
    opened_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Token → session map shared by request handlers.
#[derive(Debug)]
pub struct SessionTable {
    access: Arc<AccessControl>,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SessionTable {
    /// Creates an empty table whose sessions last `ttl` after sign-in.
    pub fn new(access: Arc<AccessControl>, ttl: Duration) -> Self {
        Self {
            access,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Authenticates and registers a new session under a fresh token.
    ///
    /// Expired sessions are removed before the new one is stored.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AuthenticationFailed` if the credentials are rejected.
    pub fn open(&self, email: &str, secret: &str) -> AccessResult<OpenedSession> {
        let mut session = Session::restore(self.access.clone(), MemorySlot::new());
        let subject = session.sign_in(email, secret)?.clone();

        let token = Uuid::new_v4().simple().to_string();
        let opened_at = Utc::now();
        let expires_at = opened_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(opened_at));
        let pruned = before - entries.len();
        if pruned > 0 {
            tracing::debug!(pruned, "dropped expired sessions");
        }
        entries.insert(
            token.clone(),
            Entry {
                session,
                opened_at,
                expires_at,
            },
        );

        Ok(OpenedSession {
            token,
            subject,
            opened_at,
            expires_at,
        })
    }

    /// Signs out and forgets `token`. Returns `false` if the token was not open or had expired.
    pub fn close(&self, token: &str) -> bool {
        let Some(mut entry) = self.lock().remove(token) else {
            return false;
        };
        if let Err(e) = entry.session.sign_out() {
            tracing::warn!("failed to clear session slot: {}", e);
        }
        !entry.is_expired(Utc::now())
    }

    pub fn subject(&self, token: &str) -> Option<Subject> {
        self.with_live(token, |entry| entry.session.current_subject().cloned())
            .flatten()
    }

    pub fn opened_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.with_live(token, |entry| entry.opened_at)
    }

    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.with_live(token, |entry| entry.expires_at)
    }

    pub fn has_capability(&self, token: &str, capability: &str) -> bool {
        self.with_live(token, |entry| entry.session.has_capability(capability))
            .unwrap_or(false)
    }

    pub fn has_any_capability<I, T>(&self, token: &str, capabilities: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.with_live(token, |entry| entry.session.has_any_capability(capabilities))
            .unwrap_or(false)
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Runs `f` on the live entry for `token`. An expired entry is removed and yields `None`.
    fn with_live<R>(&self, token: &str, f: impl FnOnce(&Entry) -> R) -> Option<R> {
        let now = Utc::now();
        let mut entries = self.lock();
        if entries.get(token)?.is_expired(now) {
            entries.remove(token);
            tracing::debug!("session expired");
            return None;
        }
        entries.get(token).map(f)
    }

    // A panic while holding the lock cannot leave an entry half-updated, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessError;
    use crate::vocabulary;

    fn table() -> SessionTable {
        table_with_ttl(Duration::try_hours(1).unwrap())
    }

    fn table_with_ttl(ttl: Duration) -> SessionTable {
        SessionTable::new(Arc::new(AccessControl::demo().unwrap()), ttl)
    }

    #[test]
    fn open_issues_distinct_tokens() {
        let table = table();
        let a = table.open("admin@hospital.com", "password").unwrap();
        let b = table.open("admin@hospital.com", "password").unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!(a.token.len(), 32);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn sessions_are_isolated_by_token() {
        let table = table();
        let nurse = table.open("nurse@hospital.com", "password").unwrap();
        let tech = table.open("tech@hospital.com", "password").unwrap();

        assert!(table.has_capability(&nurse.token, vocabulary::WARDS_CREATE));
        assert!(!table.has_capability(&tech.token, vocabulary::WARDS_CREATE));
        assert!(table.has_capability(&tech.token, vocabulary::LABORATORY_CREATE));
        assert!(!table.has_capability(&nurse.token, vocabulary::LABORATORY_CREATE));
    }

    #[test]
    fn rejected_credentials_open_nothing() {
        let table = table();
        let err = table.open("admin@hospital.com", "wrong").unwrap_err();
        assert!(matches!(err, AccessError::AuthenticationFailed));
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_token_is_denied() {
        let table = table();
        assert!(!table.has_capability("missing", "*"));
        assert!(!table.has_any_capability("missing", [vocabulary::DASHBOARD_VIEW]));
        assert!(table.subject("missing").is_none());
    }

    #[test]
    fn close_is_idempotent() {
        let table = table();
        let opened = table.open("doctor@hospital.com", "password").unwrap();
        assert_eq!(table.opened_at(&opened.token), Some(opened.opened_at));
        assert_eq!(table.expires_at(&opened.token), Some(opened.expires_at));
        assert_eq!(opened.expires_at - opened.opened_at, table.ttl());

        assert!(table.close(&opened.token));
        assert!(!table.close(&opened.token));
        assert!(table.subject(&opened.token).is_none());
        assert!(!table.has_capability(&opened.token, vocabulary::PATIENTS_READ));
    }

    #[test]
    fn expired_token_is_denied_and_removed() {
        let table = table_with_ttl(Duration::zero());
        let opened = table.open("admin@hospital.com", "password").unwrap();
        assert_eq!(table.len(), 1);

        assert!(!table.has_capability(&opened.token, "*"));
        assert_eq!(table.len(), 0);
        assert!(table.subject(&opened.token).is_none());
        assert!(!table.close(&opened.token));
    }

    #[test]
    fn open_sweeps_expired_sessions() {
        let table = table_with_ttl(Duration::zero());
        for _ in 0..50 {
            table.open("admin@hospital.com", "password").unwrap();
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn live_sessions_are_kept_when_sweeping() {
        let table = table();
        let first = table.open("nurse@hospital.com", "password").unwrap();
        table.open("doctor@hospital.com", "password").unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_capability(&first.token, vocabulary::WARDS_READ));
    }
}
