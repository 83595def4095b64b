//! User identity record.
//!
//! Users carry no role: authorization is ownership only.

use serde::{Deserialize, Serialize};

/// Stable user identifier.
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}
