//! # HMS Core
//!
//! Access control for the hospital administration dashboard.
//!
//! This crate contains the pure access-control logic:
//! - Capabilities (`*` or `resource:action`) and capability sets
//! - The role registry mapping each role to its granted capabilities
//! - The staff directory and credential verification
//! - Sessions holding the signed-in subject, persisted through a durable slot
//! - The permission evaluator (`has_capability`, `has_any_capability`)
//! - A token-keyed session table for server-side enforcement
//!
//! **No API concerns**: HTTP servers and wire types belong in `api-rest` or `api-shared`.

pub mod access;
pub mod capability;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod evaluator;
pub mod registry;
pub mod role;
pub mod session;
pub mod subject;
pub mod vocabulary;

pub use access::AccessControl;
pub use capability::{Capability, CapabilitySet};
pub use config::CoreConfig;
pub use directory::{CredentialVerifier, SharedSecretVerifier, StaffAccount, StaffDirectory};
pub use error::{AccessError, AccessResult};
pub use evaluator::{has_any_capability, has_capability};
pub use registry::RoleRegistry;
pub use role::RoleName;
pub use session::{
    FileSlot, MemorySlot, OpenedSession, Session, SessionSlot, SessionState, SessionTable,
};
pub use subject::Subject;

pub use hms_types::{EmailAddress, NonEmptyText, TextError};
