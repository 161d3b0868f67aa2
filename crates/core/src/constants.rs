//! Constants used throughout the HMS core crate.
//!
//! Role names, slot naming and configuration defaults live here so the binaries and the
//! library agree on them.

/// Text form of the grant-all capability.
pub const WILDCARD: &str = "*";

/// Separator between the resource and action halves of a named capability.
pub const CAPABILITY_SEPARATOR: char = ':';

/// Well-known key of the durable slot holding the signed-in subject.
pub const SESSION_SLOT_KEY: &str = "hospital_user";

/// Default directory for the file-backed session slot.
pub const DEFAULT_SESSION_DIR: &str = ".hms";

/// Default lifetime of a server-side session, in seconds (one eight-hour shift).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 8 * 60 * 60;

/// Shared secret accepted for every demo account when no override is configured.
pub const DEMO_SHARED_SECRET: &str = "password";

/// Role registry document version understood by this build.
pub const REGISTRY_VERSION: u32 = 1;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_DOCTOR: &str = "doctor";
pub const ROLE_NURSE: &str = "nurse";
pub const ROLE_RECEPTIONIST: &str = "receptionist";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_PHARMACIST: &str = "pharmacist";
