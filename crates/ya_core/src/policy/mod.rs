//! Ownership-based access policy.
//!
//! # Responsibility
//! - Decide whether a requester may list, create, read, edit or delete an
//!   owned record.
//! - Keep the decision out of view/service code so it can be tested alone.
//!
//! # Invariants
//! - Anonymous requesters never get `Allow` on an owned-record action.
//! - Read/edit/delete is `Allow` iff `record.author_id == requester`.
//! - A missing record and a foreign record produce the same `Deny`, so
//!   callers cannot tell them apart.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Records that carry an owning user.
pub trait Owned {
    fn author_id(&self) -> UserId;
}

/// Who is asking. Mirrors the session layer's "current user or anonymous".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requester {
    Anonymous,
    User(UserId),
}

impl Requester {
    pub fn user_id(self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::User(_))
    }
}

impl From<Option<UserId>> for Requester {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::User)
    }
}

/// Operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// List the requester's own records.
    List,
    /// Create a record owned by the requester.
    Create,
    Read,
    Edit,
    Delete,
}

impl Action {
    /// Whether the action targets one existing record.
    pub fn targets_record(self) -> bool {
        matches!(self, Self::Read | Self::Edit | Self::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Read => "read",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

/// Tri-state policy outcome.
///
/// `Deny` is reported to clients as "not found"; `RequireAuth` as a redirect
/// to the login entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Allow,
    Deny,
    RequireAuth,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::RequireAuth => "require_auth",
        }
    }
}

/// Decides access for `requester` performing `action` on `record`.
///
/// `record` is `None` for collection actions (`List`, `Create`) and for
/// lookups that found nothing.
pub fn can_access<R>(requester: Requester, record: Option<&R>, action: Action) -> Access
where
    R: Owned + ?Sized,
{
    let Some(user_id) = requester.user_id() else {
        return Access::RequireAuth;
    };

    if !action.targets_record() {
        return Access::Allow;
    }

    match record {
        Some(record) if record.author_id() == user_id => Access::Allow,
        _ => Access::Deny,
    }
}

/// Returns the author scope for list views, or `None` for anonymous callers.
///
/// List queries must filter on exactly this id; there is no cross-user
/// visibility.
pub fn list_scope(requester: Requester) -> Option<UserId> {
    requester.user_id()
}
