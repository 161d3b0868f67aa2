//! The authenticated subject held by a session.

use crate::capability::CapabilitySet;
use crate::directory::StaffAccount;
use crate::registry::RoleRegistry;
use crate::role::RoleName;
use hms_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};

/// A signed-in staff member.
///
/// `effective_capabilities` is a copy of the role's grants taken at sign-in. It is stored with the
/// subject (and in the durable slot) rather than recomputed per check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: NonEmptyText,
    pub display_name: NonEmptyText,
    pub email: EmailAddress,
    pub role: RoleName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub effective_capabilities: CapabilitySet,
}

impl Subject {
    /// Builds a subject for `account`, copying its role's grants out of `registry`.
    ///
    /// An account whose role is missing from the registry gets no capabilities.
    pub fn materialise(account: &StaffAccount, registry: &RoleRegistry) -> Self {
        let effective_capabilities = registry.capabilities_for_role(account.role.as_str());
        if effective_capabilities.is_empty() {
            tracing::warn!(
                account = %account.id,
                role = %account.role,
                "account role grants no capabilities"
            );
        }

        Self {
            id: account.id.clone(),
            display_name: account.display_name.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
            department: account.department.clone(),
            avatar: account.avatar.clone(),
            effective_capabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaffDirectory;

    #[test]
    fn materialise_copies_role_grants() {
        let registry = RoleRegistry::builtin();
        let directory = StaffDirectory::demo();
        let nurse = directory
            .find_by_email(&EmailAddress::parse("nurse@hospital.com").unwrap())
            .unwrap();

        let subject = Subject::materialise(nurse, &registry);
        assert_eq!(subject.role.as_str(), "nurse");
        assert_eq!(
            subject.effective_capabilities,
            registry.capabilities_for_role("nurse")
        );
    }

    #[test]
    fn account_with_unregistered_role_gets_nothing() {
        let registry = RoleRegistry::builtin();
        let account = StaffAccount {
            id: NonEmptyText::new("99").unwrap(),
            display_name: NonEmptyText::new("Porter").unwrap(),
            email: EmailAddress::parse("porter@hospital.com").unwrap(),
            role: RoleName::new("porter").unwrap(),
            department: None,
            avatar: None,
        };
        assert!(Subject::materialise(&account, &registry)
            .effective_capabilities
            .is_empty());
    }

    #[test]
    fn json_form_omits_absent_optionals() {
        let registry = RoleRegistry::builtin();
        let mut account = StaffDirectory::demo().accounts()[4].clone();
        account.department = None;
        let subject = Subject::materialise(&account, &registry);

        let json = serde_json::to_value(&subject).unwrap();
        assert!(json.get("department").is_none());
        assert!(json.get("avatar").is_none());
        assert_eq!(json["role"], "technician");

        let back: Subject = serde_json::from_value(json).unwrap();
        assert_eq!(back, subject);
    }
}
