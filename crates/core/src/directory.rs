//! Staff directory and credential verification.
//!
//! The directory is the closed list of accounts that may sign in. Credential checking sits
//! behind [`CredentialVerifier`] so the demo rule (one shared secret for every account) can be
//! replaced by real credential storage without touching the session code.

use crate::constants::{
    DEMO_SHARED_SECRET, ROLE_ADMIN, ROLE_DOCTOR, ROLE_NURSE, ROLE_PHARMACIST, ROLE_RECEPTIONIST,
    ROLE_TECHNICIAN,
};
use crate::error::{AccessError, AccessResult};
use crate::role::RoleName;
use hms_types::{EmailAddress, NonEmptyText};
use std::collections::HashSet;

/// A staff member who may sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAccount {
    pub id: NonEmptyText,
    pub display_name: NonEmptyText,
    pub email: EmailAddress,
    pub role: RoleName,
    pub department: Option<String>,
    pub avatar: Option<String>,
}

/// Closed list of staff accounts, unique by identifier and by email.
#[derive(Debug, Clone)]
pub struct StaffDirectory {
    accounts: Vec<StaffAccount>,
}

impl StaffDirectory {
    /// # Errors
    ///
    /// Returns `AccessError::DuplicateAccountId` or `AccessError::DuplicateAccountEmail` if two
    /// accounts share an identifier or an email address.
    pub fn new(accounts: Vec<StaffAccount>) -> AccessResult<Self> {
        let mut ids = HashSet::new();
        let mut emails = HashSet::new();
        for account in &accounts {
            if !ids.insert(account.id.as_str()) {
                return Err(AccessError::DuplicateAccountId(account.id.to_string()));
            }
            if !emails.insert(account.email.as_str()) {
                return Err(AccessError::DuplicateAccountEmail(account.email.to_string()));
            }
        }
        Ok(Self { accounts })
    }

    /// The six demo accounts, one per built-in role.
    pub fn demo() -> Self {
        let seed: [(&str, &str, &str, &str, &str); 6] = [
            ("1", "Dr. Admin", "admin@hospital.com", ROLE_ADMIN, "Administration"),
            ("2", "Dr. Sarah Wilson", "doctor@hospital.com", ROLE_DOCTOR, "Cardiology"),
            ("3", "Nurse Johnson", "nurse@hospital.com", ROLE_NURSE, "Emergency"),
            (
                "4",
                "Mary Receptionist",
                "reception@hospital.com",
                ROLE_RECEPTIONIST,
                "Front Desk",
            ),
            ("5", "Tech Anderson", "tech@hospital.com", ROLE_TECHNICIAN, "Laboratory"),
            ("6", "Pharmacist Smith", "pharmacy@hospital.com", ROLE_PHARMACIST, "Pharmacy"),
        ];

        let accounts = seed
            .into_iter()
            .filter_map(|(id, name, email, role, department)| {
                Some(StaffAccount {
                    id: NonEmptyText::new(id).ok()?,
                    display_name: NonEmptyText::new(name).ok()?,
                    email: EmailAddress::parse(email).ok()?,
                    role: RoleName::new(role).ok()?,
                    department: Some(department.to_owned()),
                    avatar: None,
                })
            })
            .collect();

        Self { accounts }
    }

    pub fn find_by_email(&self, email: &EmailAddress) -> Option<&StaffAccount> {
        self.accounts.iter().find(|a| &a.email == email)
    }

    pub fn accounts(&self) -> &[StaffAccount] {
        &self.accounts
    }
}

/// Decides whether a supplied secret proves the caller owns an account.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, account: &StaffAccount, secret: &str) -> bool;
}

/// Demo verifier: every account shares one literal secret.
///
/// Only suitable for the demo directory. Deployments holding real staff must supply a verifier
/// backed by per-account credential storage.
#[derive(Debug, Clone)]
pub struct SharedSecretVerifier {
    secret: String,
}

impl SharedSecretVerifier {
    /// The secret is kept exactly as given, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidInput` if the secret is empty or only whitespace.
    pub fn new(secret: impl Into<String>) -> AccessResult<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AccessError::InvalidInput(
                "shared secret must not be blank".to_owned(),
            ));
        }
        Ok(Self { secret })
    }

    pub fn demo() -> AccessResult<Self> {
        Self::new(DEMO_SHARED_SECRET)
    }
}

impl CredentialVerifier for SharedSecretVerifier {
    fn verify(&self, _account: &StaffAccount, secret: &str) -> bool {
        secret == self.secret
    }
}
