//! Capability grants and capability sets.
//!
//! A capability is either the grant-all [`Capability::Wildcard`] or a named `resource:action`
//! pair. Keeping the wildcard as its own variant means a caller asking for the literal string
//! `"*"` is never confused with holding the wildcard: requests are plain strings, grants are
//! typed.
//!
//! There is no hierarchy. `patients:*` is not a valid grant, and holding `patients:read` says
//! nothing about `patients:update`.

use crate::constants::{CAPABILITY_SEPARATOR, WILDCARD};
use crate::error::{AccessError, AccessResult};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A single granted capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Grants every capability, including ones no caller has defined yet.
    Wildcard,
    /// Grants exactly one `resource:action` pair.
    Named { resource: String, action: String },
}

impl Capability {
    /// Builds a named capability after validating both halves.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidCapability` if either half is empty, contains whitespace or
    /// the separator, or is itself the wildcard.
    pub fn named(resource: impl Into<String>, action: impl Into<String>) -> AccessResult<Self> {
        let resource = resource.into();
        let action = action.into();
        let rendered = format!("{resource}{CAPABILITY_SEPARATOR}{action}");

        validate_part(&rendered, &resource, "resource")?;
        validate_part(&rendered, &action, "action")?;

        Ok(Self::Named { resource, action })
    }

    /// Parses the text form of a grant: `*` or `resource:action`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidCapability` for anything else, including hierarchical forms
    /// such as `patients:*`.
    pub fn parse(input: &str) -> AccessResult<Self> {
        let trimmed = input.trim();
        if trimmed == WILDCARD {
            return Ok(Self::Wildcard);
        }

        let (resource, action) =
            trimmed
                .split_once(CAPABILITY_SEPARATOR)
                .ok_or_else(|| AccessError::InvalidCapability {
                    value: input.to_owned(),
                    reason: "expected `resource:action` or `*`",
                })?;

        Self::named(resource, action)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Returns `true` if this grant is a named capability whose text form equals `requested`.
    ///
    /// Never matches for the wildcard; use [`CapabilitySet::grants`] for the full rule.
    fn names(&self, requested: &str) -> bool {
        match self {
            Self::Wildcard => false,
            Self::Named { resource, action } => requested
                .split_once(CAPABILITY_SEPARATOR)
                .is_some_and(|(r, a)| r == resource && a == action),
        }
    }
}

fn validate_part(rendered: &str, part: &str, which: &'static str) -> AccessResult<()> {
    let reason = if part.is_empty() {
        match which {
            "resource" => "resource must not be empty",
            _ => "action must not be empty",
        }
    } else if part == WILDCARD {
        "hierarchical wildcards are not supported"
    } else if part.contains(CAPABILITY_SEPARATOR) {
        "only one `:` separator is allowed"
    } else if part.chars().any(char::is_whitespace) {
        "capabilities must not contain whitespace"
    } else {
        return Ok(());
    };

    Err(AccessError::InvalidCapability {
        value: rendered.to_owned(),
        reason,
    })
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Named { resource, action } => {
                write!(f, "{resource}{CAPABILITY_SEPARATOR}{action}")
            }
        }
    }
}

impl FromStr for Capability {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Capability::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An unordered set of granted capabilities. Duplicates collapse on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a list of capability strings into a set.
    ///
    /// # Errors
    ///
    /// Returns the first `AccessError::InvalidCapability` encountered.
    pub fn parse_all<I, S>(values: I) -> AccessResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .map(|v| Capability::parse(v.as_ref()))
            .collect()
    }

    /// Adds a capability. Returns `false` if it was already present.
    pub fn insert(&mut self, capability: Capability) -> bool {
        self.0.insert(capability)
    }

    pub fn contains(&self, capability: &Capability) -> bool {
        self.0.contains(capability)
    }

    pub fn has_wildcard(&self) -> bool {
        self.0.contains(&Capability::Wildcard)
    }

    /// Decides whether this set grants the requested capability string.
    ///
    /// The wildcard grants everything. Otherwise the request must equal one named grant exactly;
    /// a request for the literal `"*"` or for a malformed string is simply not granted.
    pub fn grants(&self, requested: &str) -> bool {
        self.has_wildcard() || self.0.iter().any(|grant| grant.names(requested))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text forms of every grant, wildcard first.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a Capability;
    type IntoIter = std::collections::btree_set::Iter<'a, Capability>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
