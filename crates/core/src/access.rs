//! Authentication against the staff directory.

use crate::directory::{CredentialVerifier, SharedSecretVerifier, StaffDirectory};
use crate::error::{AccessError, AccessResult};
use crate::registry::RoleRegistry;
use crate::subject::Subject;
use hms_types::EmailAddress;

/// Everything a session needs to turn credentials into a [`Subject`].
///
/// Built once at startup and shared (behind an `Arc`) by every session.
pub struct AccessControl {
    registry: RoleRegistry,
    directory: StaffDirectory,
    verifier: Box<dyn CredentialVerifier>,
}

impl AccessControl {
    pub fn new(
        registry: RoleRegistry,
        directory: StaffDirectory,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            registry,
            directory,
            verifier,
        }
    }

    /// Built-in registry, demo directory and the shared demo secret.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidInput` only if the demo secret constant were blank.
    pub fn demo() -> AccessResult<Self> {
        Ok(Self::new(
            RoleRegistry::builtin(),
            StaffDirectory::demo(),
            Box::new(SharedSecretVerifier::demo()?),
        ))
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn directory(&self) -> &StaffDirectory {
        &self.directory
    }

    /// Checks `email`/`secret` and materialises the matching subject.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AuthenticationFailed` for a malformed or unknown email and for a
    /// rejected secret. The caller cannot tell the three cases apart.
    pub fn authenticate(&self, email: &str, secret: &str) -> AccessResult<Subject> {
        let Ok(email) = EmailAddress::parse(email) else {
            tracing::warn!("sign-in rejected: malformed email");
            return Err(AccessError::AuthenticationFailed);
        };

        let Some(account) = self.directory.find_by_email(&email) else {
            tracing::warn!(%email, "sign-in rejected: unknown account");
            return Err(AccessError::AuthenticationFailed);
        };

        if !self.verifier.verify(account, secret) {
            tracing::warn!(%email, "sign-in rejected: bad credentials");
            return Err(AccessError::AuthenticationFailed);
        }

        let subject = Subject::materialise(account, &self.registry);
        tracing::info!(%email, role = %subject.role, "signed in");
        Ok(subject)
    }
}

impl std::fmt::Debug for AccessControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControl")
            .field("registry", &self.registry)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}
