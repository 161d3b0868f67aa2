//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handlers and commands never read environment variables
//! themselves; binaries collect the raw values and hand them to the helpers here.

use crate::access::AccessControl;
use crate::constants::{DEFAULT_SESSION_DIR, DEFAULT_SESSION_TTL_SECS, DEMO_SHARED_SECRET};
use crate::directory::{SharedSecretVerifier, StaffDirectory};
use crate::error::{AccessError, AccessResult};
use crate::registry::RoleRegistry;
use chrono::Duration;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    session_dir: PathBuf,
    role_registry_path: Option<PathBuf>,
    demo_secret: String,
    session_ttl: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        session_dir: PathBuf,
        role_registry_path: Option<PathBuf>,
        demo_secret: String,
        session_ttl: Duration,
    ) -> Self {
        Self {
            session_dir,
            role_registry_path,
            demo_secret,
            session_ttl,
        }
    }

    /// Builds a configuration from optional raw values, typically environment variables.
    ///
    /// Missing or blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidInput` if the session lifetime is not a positive number of
    /// seconds.
    pub fn from_values(
        session_dir: Option<String>,
        role_registry_path: Option<String>,
        demo_secret: Option<String>,
        session_ttl: Option<String>,
    ) -> AccessResult<Self> {
        Ok(Self::new(
            session_dir_from_value(session_dir),
            role_registry_path_from_value(role_registry_path),
            demo_secret_from_value(demo_secret),
            session_ttl_from_value(session_ttl)?,
        ))
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn role_registry_path(&self) -> Option<&Path> {
        self.role_registry_path.as_deref()
    }

    pub fn demo_secret(&self) -> &str {
        &self.demo_secret
    }

    /// How long a server-side session stays valid after sign-in.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Loads the configured registry, or the built-in table when none is configured.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`RoleRegistry::load`].
    pub fn role_registry(&self) -> AccessResult<RoleRegistry> {
        match &self.role_registry_path {
            Some(path) => RoleRegistry::load(path),
            None => Ok(RoleRegistry::builtin()),
        }
    }

    /// Assembles the [`AccessControl`] used by sessions: configured registry, demo directory,
    /// shared-secret verifier.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`CoreConfig::role_registry`], or `AccessError::InvalidInput` for a
    /// blank secret.
    pub fn access_control(&self) -> AccessResult<AccessControl> {
        Ok(AccessControl::new(
            self.role_registry()?,
            StaffDirectory::demo(),
            Box::new(SharedSecretVerifier::new(self.demo_secret.clone())?),
        ))
    }
}

/// `Some` only when the value holds something other than whitespace. The value is not altered.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Session directory from an optional value; defaults to `.hms`.
pub fn session_dir_from_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(|v| PathBuf::from(v.trim()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR))
}

/// Registry document path from an optional value; `None` selects the built-in table.
pub fn role_registry_path_from_value(value: Option<String>) -> Option<PathBuf> {
    non_blank(value).map(|v| PathBuf::from(v.trim()))
}

/// Demo secret from an optional value; defaults to the shared demo literal.
///
/// A non-blank value is kept exactly as given, surrounding whitespace included.
pub fn demo_secret_from_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEMO_SHARED_SECRET.to_string())
}

/// Session lifetime from an optional number of seconds; defaults to eight hours.
///
/// # Errors
///
/// Returns `AccessError::InvalidInput` unless the value is a positive whole number of seconds.
pub fn session_ttl_from_value(value: Option<String>) -> AccessResult<Duration> {
    let invalid = |v: &str| {
        AccessError::InvalidInput(format!(
            "session lifetime must be a positive number of seconds, got {v:?}"
        ))
    };

    let seconds = match non_blank(value) {
        None => DEFAULT_SESSION_TTL_SECS,
        Some(v) => v
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| invalid(&v))?,
    };

    Duration::try_seconds(seconds).ok_or_else(|| invalid(&seconds.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = CoreConfig::from_values(
            Some("  ".into()),
            Some(String::new()),
            Some(" ".into()),
            None,
        )
        .unwrap();
        assert_eq!(cfg.session_dir(), Path::new(".hms"));
        assert!(cfg.role_registry_path().is_none());
        assert_eq!(cfg.demo_secret(), "password");
        assert_eq!(cfg.session_ttl(), Duration::try_hours(8).unwrap());
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = CoreConfig::from_values(
            Some("/var/lib/hms".into()),
            Some("roles.yaml".into()),
            Some("s3cret".into()),
            Some("900".into()),
        )
        .unwrap();
        assert_eq!(cfg.session_dir(), Path::new("/var/lib/hms"));
        assert_eq!(cfg.role_registry_path(), Some(Path::new("roles.yaml")));
        assert_eq!(cfg.demo_secret(), "s3cret");
        assert_eq!(cfg.session_ttl(), Duration::try_minutes(15).unwrap());
    }

    #[test]
    fn demo_secret_is_not_trimmed() {
        assert_eq!(demo_secret_from_value(Some(" pw ".into())), " pw ");
    }

    #[test]
    fn session_ttl_must_be_positive_seconds() {
        for bad in ["0", "-5", "eight hours", "1.5"] {
            assert!(
                matches!(
                    session_ttl_from_value(Some(bad.into())),
                    Err(AccessError::InvalidInput(_))
                ),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn access_control_uses_configured_secret_and_registry() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("roles.yaml");
        std::fs::write(
            &path,
            "version: 1\nroles:\n  admin: [\"*\"]\n  nurse: [\"wards:read\"]\n",
        )
        .unwrap();

        let cfg = CoreConfig::new(
            temp_dir.path().to_path_buf(),
            Some(path),
            "letmein".to_string(),
            Duration::try_hours(1).unwrap(),
        );
        let access = cfg.access_control().unwrap();

        assert!(access.authenticate("nurse@hospital.com", "password").is_err());
        let nurse = access.authenticate("nurse@hospital.com", "letmein").unwrap();
        assert_eq!(nurse.effective_capabilities.len(), 1);

        // Doctor role is absent from this registry, so the account signs in with nothing.
        let doctor = access.authenticate("doctor@hospital.com", "letmein").unwrap();
        assert!(doctor.effective_capabilities.is_empty());
    }
}
