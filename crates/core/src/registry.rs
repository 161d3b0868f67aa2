//! Role registry: the fixed mapping from role to granted capabilities.
//!
//! The registry is built once at process start, either from the compiled-in table
//! ([`RoleRegistry::builtin`]) or from a versioned YAML document ([`RoleRegistry::from_yaml_str`],
//! [`RoleRegistry::load`]). It exposes lookups only; nothing mutates it afterwards.
//!
//! ## Document format
//!
//! ```yaml
//! version: 1
//! roles:
//!   admin: ["*"]
//!   receptionist:
//!     - dashboard:view
//!     - billing:create
//! ```

use crate::capability::{Capability, CapabilitySet};
use crate::constants::{
    REGISTRY_VERSION, ROLE_ADMIN, ROLE_DOCTOR, ROLE_NURSE, ROLE_PHARMACIST, ROLE_RECEPTIONIST,
    ROLE_TECHNICIAN,
};
use crate::error::{AccessError, AccessResult};
use crate::role::RoleName;
use crate::vocabulary::{self as v};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryDocument {
    version: u32,
    roles: BTreeMap<RoleName, CapabilitySet>,
}

/// Immutable role → capability-set table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    version: u32,
    roles: BTreeMap<RoleName, CapabilitySet>,
}

impl RoleRegistry {
    /// Creates a registry from an explicit table.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AdminWithoutWildcard` if the table defines `admin` without `*`.
    pub fn new(roles: BTreeMap<RoleName, CapabilitySet>) -> AccessResult<Self> {
        let registry = Self {
            version: REGISTRY_VERSION,
            roles,
        };
        registry.validate()?;
        Ok(registry)
    }

    /// The compiled-in table used by the demo deployment.
    pub fn builtin() -> Self {
        let table: [(&str, &[&str]); 6] = [
            (ROLE_ADMIN, ADMIN_GRANTS),
            (ROLE_DOCTOR, DOCTOR_GRANTS),
            (ROLE_NURSE, NURSE_GRANTS),
            (ROLE_RECEPTIONIST, RECEPTIONIST_GRANTS),
            (ROLE_TECHNICIAN, TECHNICIAN_GRANTS),
            (ROLE_PHARMACIST, PHARMACIST_GRANTS),
        ];

        let roles = table
            .into_iter()
            .filter_map(|(name, grants)| {
                let name = RoleName::new(name).ok()?;
                let set = grants
                    .iter()
                    .filter_map(|g| Capability::parse(g).ok())
                    .collect::<CapabilitySet>();
                Some((name, set))
            })
            .collect();

        Self {
            version: REGISTRY_VERSION,
            roles,
        }
    }

    /// Parses a registry document from YAML text.
    ///
    /// Parse failures report the path of the offending field (e.g. `roles.doctor[2]`).
    ///
    /// # Errors
    ///
    /// Returns `AccessError` if:
    /// - the YAML does not match the document schema or a capability is malformed,
    /// - the document version is not supported,
    /// - `admin` is defined without the wildcard.
    pub fn from_yaml_str(yaml_text: &str) -> AccessResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let document = match serde_path_to_error::deserialize::<_, RegistryDocument>(deserializer)
        {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_owned()
                } else {
                    path
                };
                return Err(AccessError::RegistryParse { path, source });
            }
        };

        if document.version != REGISTRY_VERSION {
            return Err(AccessError::UnsupportedRegistryVersion {
                found: document.version,
                supported: REGISTRY_VERSION,
            });
        }

        let registry = Self {
            version: document.version,
            roles: document.roles,
        };
        registry.validate()?;
        registry.warn_unknown_capabilities();
        Ok(registry)
    }

    /// Reads and parses a registry document from disk.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::RegistryRead` if the file cannot be read, otherwise the errors of
    /// [`RoleRegistry::from_yaml_str`].
    pub fn load(path: &Path) -> AccessResult<Self> {
        let text = std::fs::read_to_string(path).map_err(AccessError::RegistryRead)?;
        let registry = Self::from_yaml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            roles = registry.roles.len(),
            "loaded role registry"
        );
        Ok(registry)
    }

    /// Granted capabilities for `role`.
    ///
    /// Unknown or malformed role names yield an empty set: no access, not an error.
    pub fn capabilities_for_role(&self, role: &str) -> CapabilitySet {
        RoleName::new(role)
            .ok()
            .and_then(|name| self.roles.get(&name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains_role(&self, role: &RoleName) -> bool {
        self.roles.contains_key(role)
    }

    /// Role names in sorted order.
    pub fn role_names(&self) -> impl Iterator<Item = &RoleName> {
        self.roles.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, &CapabilitySet)> {
        self.roles.iter()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn validate(&self) -> AccessResult<()> {
        let admin = RoleName::new(ROLE_ADMIN)?;
        match self.roles.get(&admin) {
            Some(grants) if !grants.has_wildcard() => Err(AccessError::AdminWithoutWildcard),
            _ => Ok(()),
        }
    }

    fn warn_unknown_capabilities(&self) {
        for (role, grants) in &self.roles {
            for grant in grants {
                if grant.is_wildcard() {
                    continue;
                }
                let text = grant.to_string();
                if !v::is_known(&text) {
                    tracing::warn!(
                        %role,
                        capability = %text,
                        "role grants a capability no caller checks"
                    );
                }
            }
        }
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// BUILT-IN TABLE
// ============================================================================

const ADMIN_GRANTS: &[&str] = &[
    "*",
    v::DASHBOARD_VIEW,
    v::PATIENTS_CREATE,
    v::PATIENTS_READ,
    v::PATIENTS_UPDATE,
    v::PATIENTS_DELETE,
    v::DOCTORS_CREATE,
    v::DOCTORS_READ,
    v::DOCTORS_UPDATE,
    v::DOCTORS_DELETE,
    v::STAFF_CREATE,
    v::STAFF_READ,
    v::STAFF_UPDATE,
    v::STAFF_DELETE,
    v::APPOINTMENTS_CREATE,
    v::APPOINTMENTS_READ,
    v::APPOINTMENTS_UPDATE,
    v::APPOINTMENTS_DELETE,
    v::MEDICAL_RECORDS_CREATE,
    v::MEDICAL_RECORDS_READ,
    v::MEDICAL_RECORDS_UPDATE,
    v::MEDICAL_RECORDS_DELETE,
    v::BILLING_CREATE,
    v::BILLING_READ,
    v::BILLING_UPDATE,
    v::BILLING_DELETE,
    v::PHARMACY_CREATE,
    v::PHARMACY_READ,
    v::PHARMACY_UPDATE,
    v::PHARMACY_DELETE,
    v::LABORATORY_CREATE,
    v::LABORATORY_READ,
    v::LABORATORY_UPDATE,
    v::LABORATORY_DELETE,
    v::WARDS_CREATE,
    v::WARDS_READ,
    v::WARDS_UPDATE,
    v::WARDS_DELETE,
    v::INVENTORY_CREATE,
    v::INVENTORY_READ,
    v::INVENTORY_UPDATE,
    v::INVENTORY_DELETE,
    v::REPORTS_CREATE,
    v::REPORTS_READ,
    v::REPORTS_UPDATE,
    v::REPORTS_DELETE,
    v::BLOGS_CREATE,
    v::BLOGS_READ,
    v::BLOGS_UPDATE,
    v::BLOGS_DELETE,
    v::SETTINGS_READ,
    v::SETTINGS_UPDATE,
    v::USERS_CREATE,
    v::USERS_READ,
    v::USERS_UPDATE,
    v::USERS_DELETE,
];

const DOCTOR_GRANTS: &[&str] = &[
    v::DASHBOARD_VIEW,
    v::PATIENTS_CREATE,
    v::PATIENTS_READ,
    v::PATIENTS_UPDATE,
    v::APPOINTMENTS_CREATE,
    v::APPOINTMENTS_READ,
    v::APPOINTMENTS_UPDATE,
    v::MEDICAL_RECORDS_CREATE,
    v::MEDICAL_RECORDS_READ,
    v::MEDICAL_RECORDS_UPDATE,
    v::PRESCRIPTIONS_CREATE,
    v::PRESCRIPTIONS_READ,
    v::PRESCRIPTIONS_UPDATE,
    v::LABORATORY_READ,
    v::LABORATORY_UPDATE,
    v::REPORTS_READ,
    v::BLOGS_READ,
];

const NURSE_GRANTS: &[&str] = &[
    v::DASHBOARD_VIEW,
    v::PATIENTS_READ,
    v::PATIENTS_UPDATE,
    v::APPOINTMENTS_READ,
    v::APPOINTMENTS_UPDATE,
    v::MEDICAL_RECORDS_READ,
    v::MEDICAL_RECORDS_UPDATE,
    v::WARDS_CREATE,
    v::WARDS_READ,
    v::WARDS_UPDATE,
    v::PHARMACY_READ,
    v::LABORATORY_READ,
    v::REPORTS_READ,
    v::BLOGS_READ,
];

const RECEPTIONIST_GRANTS: &[&str] = &[
    v::DASHBOARD_VIEW,
    v::PATIENTS_CREATE,
    v::PATIENTS_READ,
    v::PATIENTS_UPDATE,
    v::APPOINTMENTS_CREATE,
    v::APPOINTMENTS_READ,
    v::APPOINTMENTS_UPDATE,
    v::APPOINTMENTS_DELETE,
    v::BILLING_CREATE,
    v::BILLING_READ,
    v::BILLING_UPDATE,
    v::REPORTS_READ,
    v::BLOGS_READ,
];

const TECHNICIAN_GRANTS: &[&str] = &[
    v::DASHBOARD_VIEW,
    v::PATIENTS_READ,
    v::LABORATORY_CREATE,
    v::LABORATORY_READ,
    v::LABORATORY_UPDATE,
    v::INVENTORY_READ,
    v::INVENTORY_UPDATE,
    v::REPORTS_READ,
    v::BLOGS_READ,
];

const PHARMACIST_GRANTS: &[&str] = &[
    v::DASHBOARD_VIEW,
    v::PATIENTS_READ,
    v::PRESCRIPTIONS_READ,
    v::PRESCRIPTIONS_UPDATE,
    v::PHARMACY_CREATE,
    v::PHARMACY_READ,
    v::PHARMACY_UPDATE,
    v::INVENTORY_CREATE,
    v::INVENTORY_READ,
    v::INVENTORY_UPDATE,
    v::REPORTS_READ,
    v::BLOGS_READ,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defines_the_six_demo_roles() {
        let registry = RoleRegistry::builtin();
        let names: Vec<&str> = registry.role_names().map(RoleName::as_str).collect();
        assert_eq!(
            names,
            vec!["admin", "doctor", "nurse", "pharmacist", "receptionist", "technician"]
        );
    }

    #[test]
    fn builtin_grant_counts_match_the_table() {
        let registry = RoleRegistry::builtin();
        let expected = [
            (ROLE_ADMIN, ADMIN_GRANTS.len()),
            (ROLE_DOCTOR, DOCTOR_GRANTS.len()),
            (ROLE_NURSE, NURSE_GRANTS.len()),
            (ROLE_RECEPTIONIST, RECEPTIONIST_GRANTS.len()),
            (ROLE_TECHNICIAN, TECHNICIAN_GRANTS.len()),
            (ROLE_PHARMACIST, PHARMACIST_GRANTS.len()),
        ];
        for (role, count) in expected {
            assert_eq!(registry.capabilities_for_role(role).len(), count, "{role}");
        }
    }

    #[test]
    fn only_admin_holds_the_wildcard() {
        let registry = RoleRegistry::builtin();
        for (role, grants) in registry.iter() {
            assert_eq!(grants.has_wildcard(), role.as_str() == ROLE_ADMIN, "{role}");
        }
    }

    #[test]
    fn receptionist_bills_but_does_not_create_lab_tests() {
        let grants = RoleRegistry::builtin().capabilities_for_role(ROLE_RECEPTIONIST);
        assert!(grants.grants(v::BILLING_CREATE));
        assert!(!grants.grants(v::LABORATORY_CREATE));
    }

    #[test]
    fn unknown_role_has_no_capabilities() {
        let registry = RoleRegistry::builtin();
        assert!(registry.capabilities_for_role("janitor").is_empty());
        assert!(registry.capabilities_for_role("").is_empty());
        assert!(registry.capabilities_for_role("ward nurse").is_empty());
    }

    #[test]
    fn role_lookup_is_case_insensitive() {
        let registry = RoleRegistry::builtin();
        assert_eq!(
            registry.capabilities_for_role("Nurse"),
            registry.capabilities_for_role("nurse")
        );
    }

    #[test]
    fn yaml_document_loads() {
        let yaml = r#"
version: 1
roles:
  admin: ["*"]
  porter:
    - wards:read
    - wards:read
    - inventory:read
"#;
        let registry = RoleRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(registry.version(), 1);
        let porter = registry.capabilities_for_role("porter");
        assert_eq!(porter.len(), 2);
        assert!(porter.grants(v::WARDS_READ));
        assert!(!porter.grants(v::WARDS_UPDATE));
    }

    #[test]
    fn yaml_parse_error_names_the_offending_path() {
        let yaml = r#"
version: 1
roles:
  nurse:
    - wards:read
    - "wards:*"
"#;
        let err = RoleRegistry::from_yaml_str(yaml).unwrap_err();
        match err {
            AccessError::RegistryParse { path, .. } => {
                assert!(path.contains("nurse"), "unexpected path {path}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn yaml_rejects_unsupported_version() {
        let err = RoleRegistry::from_yaml_str("version: 2\nroles: {}\n").unwrap_err();
        assert!(matches!(
            err,
            AccessError::UnsupportedRegistryVersion { found: 2, supported: 1 }
        ));
    }

    #[test]
    fn admin_without_wildcard_is_rejected() {
        let yaml = "version: 1\nroles:\n  admin: [\"patients:read\"]\n";
        assert!(matches!(
            RoleRegistry::from_yaml_str(yaml),
            Err(AccessError::AdminWithoutWildcard)
        ));

        let mut roles = BTreeMap::new();
        roles.insert(
            RoleName::new("admin").unwrap(),
            CapabilitySet::parse_all(["patients:read"]).unwrap(),
        );
        assert!(matches!(
            RoleRegistry::new(roles),
            Err(AccessError::AdminWithoutWildcard)
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("roles.yaml");
        std::fs::write(&path, "version: 1\nroles:\n  clerk: [\"billing:read\"]\n").unwrap();

        let registry = RoleRegistry::load(&path).unwrap();
        assert!(registry.capabilities_for_role("clerk").grants(v::BILLING_READ));

        let missing = RoleRegistry::load(&dir.path().join("absent.yaml"));
        assert!(matches!(missing, Err(AccessError::RegistryRead(_))));
    }
}
