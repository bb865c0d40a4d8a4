//! User directory
//!
//! Registration records for wallet owners, with uniqueness on email and
//! phone. Authentication is an external collaborator; the directory only
//! stores the contact facts and the suspension flag the admin layer
//! toggles.

use crate::types::{User, UserId, UserStatus, WalletError};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent directory of registered users
#[derive(Debug)]
pub struct UserDirectory {
    users: DashMap<UserId, User>,
    by_email: DashMap<String, UserId>,
    by_phone: DashMap<String, UserId>,
    next_id: AtomicU64,
}

impl UserDirectory {
    /// Create an empty directory; ids are assigned sequentially from 1
    pub fn new() -> Self {
        UserDirectory {
            users: DashMap::new(),
            by_email: DashMap::new(),
            by_phone: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new user
    ///
    /// Email and phone are claimed through atomic insert-if-absent on the
    /// uniqueness indexes; a phone conflict releases the email claim, so
    /// a failed registration leaves no trace.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken` or `PhoneTaken` on a uniqueness conflict.
    pub fn register(&self, full_name: &str, email: &str, phone: &str) -> Result<User, WalletError> {
        if self.by_email.contains_key(email) {
            return Err(WalletError::email_taken(email));
        }
        if self.by_phone.contains_key(phone) {
            return Err(WalletError::phone_taken(phone));
        }

        let user_id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // Atomic insert-if-absent on both indexes; losing the phone race
        // releases the email claim made a moment earlier.
        let claimed = *self.by_email.entry(email.to_string()).or_insert(user_id);
        if claimed != user_id {
            return Err(WalletError::email_taken(email));
        }
        let claimed = *self.by_phone.entry(phone.to_string()).or_insert(user_id);
        if claimed != user_id {
            self.by_email.remove(email);
            return Err(WalletError::phone_taken(phone));
        }

        let user = User {
            user_id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            status: UserStatus::Active,
        };
        self.users.insert(user_id, user.clone());
        Ok(user)
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the id is unknown.
    pub fn get(&self, user_id: UserId) -> Result<User, WalletError> {
        self.users
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| WalletError::user_not_found(user_id))
    }

    /// Set a user's standing; used only by the admin layer
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if the id is unknown.
    pub fn set_status(&self, user_id: UserId, status: UserStatus) -> Result<User, WalletError> {
        let mut entry = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| WalletError::user_not_found(user_id))?;
        entry.status = status;
        Ok(entry.clone())
    }

    /// All users, sorted by id
    pub fn all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by_key(|user| user.user_id);
        users
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_sequential_ids() {
        let directory = UserDirectory::new();

        let ada = directory
            .register("Ada Obi", "ada@example.com", "0801")
            .unwrap();
        let ben = directory
            .register("Ben Eze", "ben@example.com", "0802")
            .unwrap();

        assert_eq!(ada.user_id, 1);
        assert_eq!(ben.user_id, 2);
        assert_eq!(ada.status, UserStatus::Active);
    }

    #[test]
    fn test_register_duplicate_email_fails() {
        let directory = UserDirectory::new();
        directory
            .register("Ada Obi", "ada@example.com", "0801")
            .unwrap();

        let result = directory.register("Impostor", "ada@example.com", "0899");
        assert!(matches!(result, Err(WalletError::EmailTaken { .. })));
    }

    #[test]
    fn test_register_duplicate_phone_fails_and_releases_email() {
        let directory = UserDirectory::new();
        directory
            .register("Ada Obi", "ada@example.com", "0801")
            .unwrap();

        let result = directory.register("Impostor", "new@example.com", "0801");
        assert!(matches!(result, Err(WalletError::PhoneTaken { .. })));

        // The email claimed by the failed registration is free again.
        assert!(directory
            .register("Cleo Ma", "new@example.com", "0803")
            .is_ok());
    }

    #[test]
    fn test_get_unknown_user_fails() {
        let directory = UserDirectory::new();
        assert!(matches!(
            directory.get(9),
            Err(WalletError::UserNotFound { user: 9 })
        ));
    }

    #[test]
    fn test_set_status_suspends_and_reactivates() {
        let directory = UserDirectory::new();
        let ada = directory
            .register("Ada Obi", "ada@example.com", "0801")
            .unwrap();

        let suspended = directory
            .set_status(ada.user_id, UserStatus::Suspended)
            .unwrap();
        assert_eq!(suspended.status, UserStatus::Suspended);

        let active = directory
            .set_status(ada.user_id, UserStatus::Active)
            .unwrap();
        assert_eq!(active.status, UserStatus::Active);
    }

    #[test]
    fn test_all_sorted_by_id() {
        let directory = UserDirectory::new();
        directory
            .register("Ada Obi", "ada@example.com", "0801")
            .unwrap();
        directory
            .register("Ben Eze", "ben@example.com", "0802")
            .unwrap();

        let ids: Vec<UserId> = directory.all().iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
