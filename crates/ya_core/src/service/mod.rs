//! Core use-case services.
//!
//! # Responsibility
//! - Combine policy, validation and repositories into use-case APIs.
//! - Translate policy outcomes into service errors the web layer maps to
//!   HTTP (not found, login redirect, form errors).
//!
//! # Invariants
//! - Authorization runs before validation and before any write.
//! - A returned error means the store was not modified by this call.

use crate::policy::{can_access, Access, Action, Owned, Requester};
use crate::repo::RepoError;
use crate::validation::slug::duplicate_slug_error;
use crate::validation::ValidationError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod news_service;
pub mod note_service;

/// Service error shared by note and news use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Anonymous requester on a protected action.
    LoginRequired,
    /// Record missing or owned by someone else.
    NotFound,
    /// Form input rejected; field errors in submission order.
    Validation(Vec<ValidationError>),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back did not find the record.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Field errors when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginRequired => write!(f, "login required"),
            Self::NotFound => write!(f, "not found"),
            Self::Validation(errors) => {
                write!(f, "validation failed:")?;
                for err in errors {
                    write!(f, " [{err}]")?;
                }
                Ok(())
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { .. } => Self::NotFound,
            RepoError::DuplicateSlug(slug) => Self::Validation(vec![duplicate_slug_error(&slug)]),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(vec![value])
    }
}

/// Runs the access policy and converts a non-`Allow` outcome to an error.
pub(crate) fn authorize<R>(
    module: &'static str,
    requester: Requester,
    record: Option<&R>,
    action: Action,
) -> Result<(), ServiceError>
where
    R: Owned + ?Sized,
{
    match can_access(requester, record, action) {
        Access::Allow => Ok(()),
        decision => {
            info!(
                "event=access_check module={module} status=denied action={} decision={}",
                action.as_str(),
                decision.as_str()
            );
            match decision {
                Access::RequireAuth => Err(ServiceError::LoginRequired),
                _ => Err(ServiceError::NotFound),
            }
        }
    }
}
