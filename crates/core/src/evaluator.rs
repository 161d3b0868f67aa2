//! Permission evaluation.
//!
//! Both predicates fail closed: no subject means no access, and neither ever errors. Any string
//! may be asked about; strings no role grants are simply denied.

use crate::subject::Subject;

/// May `subject` perform `capability`?
///
/// Returns `false` when there is no subject, even for the literal `"*"`. Otherwise the subject's
/// effective capabilities decide: the wildcard grants everything, named grants must match exactly.
pub fn has_capability(subject: Option<&Subject>, capability: &str) -> bool {
    subject.is_some_and(|s| s.effective_capabilities.grants(capability))
}

/// May `subject` perform at least one of `capabilities`?
///
/// Stops at the first granted entry. An empty sequence is never granted, not even to a holder of
/// the wildcard.
pub fn has_any_capability<I, S>(subject: Option<&Subject>, capabilities: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(subject) = subject else {
        return false;
    };
    capabilities
        .into_iter()
        .any(|c| subject.effective_capabilities.grants(c.as_ref()))
}
