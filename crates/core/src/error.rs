#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid capability {value:?}: {reason}")]
    InvalidCapability { value: String, reason: &'static str },
    #[error("invalid role name {0:?}")]
    InvalidRoleName(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("failed to read role registry: {0}")]
    RegistryRead(std::io::Error),
    #[error("failed to parse role registry at {path}: {source}")]
    RegistryParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported role registry version {found} (supported: {supported})")]
    UnsupportedRegistryVersion { found: u32, supported: u32 },
    #[error("role registry defines admin without the wildcard capability")]
    AdminWithoutWildcard,

    #[error("duplicate staff account identifier: {0}")]
    DuplicateAccountId(String),
    #[error("duplicate staff account email: {0}")]
    DuplicateAccountEmail(String),

    #[error("failed to create session directory: {0}")]
    SlotDirCreation(std::io::Error),
    #[error("failed to read session slot: {0}")]
    SlotRead(std::io::Error),
    #[error("failed to write session slot: {0}")]
    SlotWrite(std::io::Error),
    #[error("failed to remove session slot: {0}")]
    SlotRemove(std::io::Error),
    #[error("failed to serialize subject: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize subject: {0}")]
    Deserialization(serde_json::Error),
}

pub type AccessResult<T> = std::result::Result<T, AccessError>;

impl From<hms_types::TextError> for AccessError {
    fn from(err: hms_types::TextError) -> Self {
        AccessError::InvalidInput(err.to_string())
    }
}
