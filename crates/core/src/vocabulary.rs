//! Capability strings referenced by the dashboard.
//!
//! Callers may test any string against the evaluator; this list exists so code can use
//! constants instead of literals and so registry loading can flag entries nobody asks for.

// =============================================================================
// Dashboard
// =============================================================================

pub const DASHBOARD_VIEW: &str = "dashboard:view";

// =============================================================================
// Patients
// =============================================================================

pub const PATIENTS_CREATE: &str = "patients:create";
pub const PATIENTS_READ: &str = "patients:read";
pub const PATIENTS_UPDATE: &str = "patients:update";
pub const PATIENTS_DELETE: &str = "patients:delete";

// =============================================================================
// Clinical staff and scheduling
// =============================================================================

pub const DOCTORS_CREATE: &str = "doctors:create";
pub const DOCTORS_READ: &str = "doctors:read";
pub const DOCTORS_UPDATE: &str = "doctors:update";
pub const DOCTORS_DELETE: &str = "doctors:delete";

pub const STAFF_CREATE: &str = "staff:create";
pub const STAFF_READ: &str = "staff:read";
pub const STAFF_UPDATE: &str = "staff:update";
pub const STAFF_DELETE: &str = "staff:delete";

pub const APPOINTMENTS_CREATE: &str = "appointments:create";
pub const APPOINTMENTS_READ: &str = "appointments:read";
pub const APPOINTMENTS_UPDATE: &str = "appointments:update";
pub const APPOINTMENTS_DELETE: &str = "appointments:delete";

pub const MEDICAL_RECORDS_CREATE: &str = "medical-records:create";
pub const MEDICAL_RECORDS_READ: &str = "medical-records:read";
pub const MEDICAL_RECORDS_UPDATE: &str = "medical-records:update";
pub const MEDICAL_RECORDS_DELETE: &str = "medical-records:delete";

pub const PRESCRIPTIONS_CREATE: &str = "prescriptions:create";
pub const PRESCRIPTIONS_READ: &str = "prescriptions:read";
pub const PRESCRIPTIONS_UPDATE: &str = "prescriptions:update";

// =============================================================================
// Operations
// =============================================================================

pub const BILLING_CREATE: &str = "billing:create";
pub const BILLING_READ: &str = "billing:read";
pub const BILLING_UPDATE: &str = "billing:update";
pub const BILLING_DELETE: &str = "billing:delete";

pub const PHARMACY_CREATE: &str = "pharmacy:create";
pub const PHARMACY_READ: &str = "pharmacy:read";
pub const PHARMACY_UPDATE: &str = "pharmacy:update";
pub const PHARMACY_DELETE: &str = "pharmacy:delete";

pub const LABORATORY_CREATE: &str = "laboratory:create";
pub const LABORATORY_READ: &str = "laboratory:read";
pub const LABORATORY_UPDATE: &str = "laboratory:update";
pub const LABORATORY_DELETE: &str = "laboratory:delete";

pub const WARDS_CREATE: &str = "wards:create";
pub const WARDS_READ: &str = "wards:read";
pub const WARDS_UPDATE: &str = "wards:update";
pub const WARDS_DELETE: &str = "wards:delete";

pub const INVENTORY_CREATE: &str = "inventory:create";
pub const INVENTORY_READ: &str = "inventory:read";
pub const INVENTORY_UPDATE: &str = "inventory:update";
pub const INVENTORY_DELETE: &str = "inventory:delete";

pub const REPORTS_CREATE: &str = "reports:create";
pub const REPORTS_READ: &str = "reports:read";
pub const REPORTS_UPDATE: &str = "reports:update";
pub const REPORTS_DELETE: &str = "reports:delete";

// =============================================================================
// Content and communication
// =============================================================================

pub const BLOGS_CREATE: &str = "blogs:create";
pub const BLOGS_READ: &str = "blogs:read";
pub const BLOGS_UPDATE: &str = "blogs:update";
pub const BLOGS_DELETE: &str = "blogs:delete";

pub const DEPARTMENTS_CREATE: &str = "departments:create";
pub const DEPARTMENTS_READ: &str = "departments:read";
pub const DEPARTMENTS_UPDATE: &str = "departments:update";
pub const DEPARTMENTS_DELETE: &str = "departments:delete";

pub const SERVICES_CREATE: &str = "services:create";
pub const SERVICES_READ: &str = "services:read";
pub const SERVICES_UPDATE: &str = "services:update";
pub const SERVICES_DELETE: &str = "services:delete";

pub const MESSAGES_CREATE: &str = "messages:create";
pub const MESSAGES_READ: &str = "messages:read";
pub const MESSAGES_UPDATE: &str = "messages:update";
pub const MESSAGES_DELETE: &str = "messages:delete";

// =============================================================================
// Administration
// =============================================================================

pub const SETTINGS_READ: &str = "settings:read";
pub const SETTINGS_UPDATE: &str = "settings:update";

pub const USERS_CREATE: &str = "users:create";
pub const USERS_READ: &str = "users:read";
pub const USERS_UPDATE: &str = "users:update";
pub const USERS_DELETE: &str = "users:delete";

/// Every named capability above.
pub const ALL: &[&str] = &[
    DASHBOARD_VIEW,
    PATIENTS_CREATE,
    PATIENTS_READ,
    PATIENTS_UPDATE,
    PATIENTS_DELETE,
    DOCTORS_CREATE,
    DOCTORS_READ,
    DOCTORS_UPDATE,
    DOCTORS_DELETE,
    STAFF_CREATE,
    STAFF_READ,
    STAFF_UPDATE,
    STAFF_DELETE,
    APPOINTMENTS_CREATE,
    APPOINTMENTS_READ,
    APPOINTMENTS_UPDATE,
    APPOINTMENTS_DELETE,
    MEDICAL_RECORDS_CREATE,
    MEDICAL_RECORDS_READ,
    MEDICAL_RECORDS_UPDATE,
    MEDICAL_RECORDS_DELETE,
    PRESCRIPTIONS_CREATE,
    PRESCRIPTIONS_READ,
    PRESCRIPTIONS_UPDATE,
    BILLING_CREATE,
    BILLING_READ,
    BILLING_UPDATE,
    BILLING_DELETE,
    PHARMACY_CREATE,
    PHARMACY_READ,
    PHARMACY_UPDATE,
    PHARMACY_DELETE,
    LABORATORY_CREATE,
    LABORATORY_READ,
    LABORATORY_UPDATE,
    LABORATORY_DELETE,
    WARDS_CREATE,
    WARDS_READ,
    WARDS_UPDATE,
    WARDS_DELETE,
    INVENTORY_CREATE,
    INVENTORY_READ,
    INVENTORY_UPDATE,
    INVENTORY_DELETE,
    REPORTS_CREATE,
    REPORTS_READ,
    REPORTS_UPDATE,
    REPORTS_DELETE,
    BLOGS_CREATE,
    BLOGS_READ,
    BLOGS_UPDATE,
    BLOGS_DELETE,
    DEPARTMENTS_CREATE,
    DEPARTMENTS_READ,
    DEPARTMENTS_UPDATE,
    DEPARTMENTS_DELETE,
    SERVICES_CREATE,
    SERVICES_READ,
    SERVICES_UPDATE,
    SERVICES_DELETE,
    MESSAGES_CREATE,
    MESSAGES_READ,
    MESSAGES_UPDATE,
    MESSAGES_DELETE,
    SETTINGS_READ,
    SETTINGS_UPDATE,
    USERS_CREATE,
    USERS_READ,
    USERS_UPDATE,
    USERS_DELETE,
];

/// Returns `true` if `capability` is one of the strings the dashboard asks about.
pub fn is_known(capability: &str) -> bool {
    ALL.contains(&capability)
}
