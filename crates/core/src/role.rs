//! Role identifiers.

use crate::error::{AccessError, AccessResult};
use std::fmt;

/// Stable identifier of a role, e.g. `admin` or `receptionist`.
///
/// Names are trimmed and ASCII-lowercased on construction and may not contain whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleName(String);

impl RoleName {
    /// # Errors
    ///
    /// Returns `AccessError::InvalidRoleName` for blank names or names containing whitespace.
    pub fn new(input: impl AsRef<str>) -> AccessResult<Self> {
        let normalised = input.as_ref().trim().to_ascii_lowercase();
        if normalised.is_empty() || normalised.chars().any(char::is_whitespace) {
            return Err(AccessError::InvalidRoleName(input.as_ref().to_owned()));
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for RoleName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for RoleName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RoleName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_are_normalised() {
        assert_eq!(RoleName::new(" Receptionist ").unwrap().as_str(), "receptionist");
    }

    #[test]
    fn role_names_reject_blank_and_spaced_input() {
        assert!(RoleName::new("  ").is_err());
        assert!(RoleName::new("ward nurse").is_err());
    }
}
