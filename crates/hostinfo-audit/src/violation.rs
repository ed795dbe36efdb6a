//! Audit findings.

use hostinfo_catalog::RestrictedValueSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a value was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value is not in the key's legal set.
    NotAllowed {
        /// The legal set at audit time.
        allowed: RestrictedValueSet,
    },
    /// A single-valued key holds a comma-separated list.
    MultipleValues,
    /// A parent lists a host that does not name any parent. The violation's
    /// key is the parent list key and its value the listed host.
    PhantomChild {
        /// Key the listed host should hold.
        child_key: String,
    },
    /// A host listed by a parent names a different parent, or several.
    ParentMismatch {
        /// The parent that lists the host.
        parent: String,
        /// The parent's list key.
        parent_key: String,
    },
    /// A host names a parent whose list leaves it out. The violation's value
    /// is the named parent.
    UnlistedChild {
        /// The parent's list key.
        parent_key: String,
    },
}

/// One non-conforming `(host, key, value)` triple.
///
/// # Example
///
/// ```rust
/// use hostinfo_audit::{Violation, ViolationKind};
/// use hostinfo_catalog::RestrictedValueSet;
///
/// let violation = Violation::not_allowed(
///     "alpha",
///     "class",
///     "qa",
///     RestrictedValueSet::from_iter(["dev", "prod"]),
/// );
/// assert_eq!(violation.to_string(), "alpha class=qa not in {dev,prod}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Offending host.
    pub host: String,
    /// Attribute key.
    pub key: String,
    /// Offending value.
    pub value: String,
    /// Which check failed.
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    /// A value outside the legal set.
    pub fn not_allowed(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        allowed: RestrictedValueSet,
    ) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            kind: ViolationKind::NotAllowed { allowed },
        }
    }

    /// A list value on a single-valued key.
    pub fn multiple_values(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            kind: ViolationKind::MultipleValues,
        }
    }

    /// `parent` lists `child` under `parent_key`, but `child` has no
    /// `child_key`.
    pub fn phantom_child(
        parent: impl Into<String>,
        parent_key: impl Into<String>,
        child: impl Into<String>,
        child_key: impl Into<String>,
    ) -> Self {
        Self {
            host: parent.into(),
            key: parent_key.into(),
            value: child.into(),
            kind: ViolationKind::PhantomChild {
                child_key: child_key.into(),
            },
        }
    }

    /// `child` holds `value` under `child_key`, which is not just `parent`.
    pub fn parent_mismatch(
        child: impl Into<String>,
        child_key: impl Into<String>,
        value: impl Into<String>,
        parent: impl Into<String>,
        parent_key: impl Into<String>,
    ) -> Self {
        Self {
            host: child.into(),
            key: child_key.into(),
            value: value.into(),
            kind: ViolationKind::ParentMismatch {
                parent: parent.into(),
                parent_key: parent_key.into(),
            },
        }
    }

    /// `child` names `parent`, whose `parent_key` list leaves it out.
    pub fn unlisted_child(
        child: impl Into<String>,
        child_key: impl Into<String>,
        parent: impl Into<String>,
        parent_key: impl Into<String>,
    ) -> Self {
        Self {
            host: child.into(),
            key: child_key.into(),
            value: parent.into(),
            kind: ViolationKind::UnlistedChild {
                parent_key: parent_key.into(),
            },
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}={} ", self.host, self.key, self.value)?;
        match &self.kind {
            ViolationKind::NotAllowed { allowed } => write!(f, "not in {}", allowed),
            ViolationKind::MultipleValues => f.write_str("has multiple values"),
            ViolationKind::PhantomChild { child_key } => {
                write!(f, "is a phantom child, {} has no {}", self.value, child_key)
            }
            ViolationKind::ParentMismatch { parent, parent_key } => {
                write!(f, "but {} lists it in {}", parent, parent_key)
            }
            ViolationKind::UnlistedChild { parent_key } => {
                write!(f, "not listed in {} {}", self.value, parent_key)
            }
        }
    }
}
