//! User directory types
//!
//! Registration records for the identities that own wallets. Credentials,
//! sessions, and tokens are handled by an external collaborator; the
//! directory only keeps the contact facts and the suspension flag the
//! admin layer toggles.

use serde::{Deserialize, Serialize};

/// Identity (user) identifier
pub type UserId = u64;

/// Account standing of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

/// A registered identity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user ID
    pub user_id: UserId,

    /// Display name
    pub full_name: String,

    /// Contact email, unique across the directory
    pub email: String,

    /// Contact phone, unique across the directory
    pub phone: String,

    /// Current standing, toggled only by the admin layer
    pub status: UserStatus,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}
