use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use hearth_auth::{DirectoryError, UserDirectory, UserRecord};

use super::{NewUser, UserStore, UserStoreError, UserUpdate};

/// In-memory user store for development and tests.
#[derive(Debug)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<i64, UserRecord>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self
            .users
            .read()
            .expect("user map lock poisoned")
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self
            .users
            .read()
            .expect("user map lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, UserStoreError> {
        let mut users: Vec<UserRecord> = self
            .users
            .read()
            .expect("user map lock poisoned")
            .values()
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
        let mut users = self.users.write().expect("user map lock poisoned");
        if users.values().any(|u| u.email == user.email) {
            return Err(UserStoreError::DuplicateEmail);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = UserRecord {
            id,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
        };
        users.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, changes: UserUpdate) -> Result<UserRecord, UserStoreError> {
        let mut users = self.users.write().expect("user map lock poisoned");

        if let Some(email) = &changes.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(UserStoreError::DuplicateEmail);
            }
        }

        let record = users.get_mut(&id).ok_or(UserStoreError::NotFound)?;
        if let Some(email) = changes.email {
            record.email = email;
        }
        if let Some(role) = changes.role {
            record.role = role;
        }
        if let Some(password_hash) = changes.password_hash {
            record.password_hash = password_hash;
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), UserStoreError> {
        self.users
            .write()
            .expect("user map lock poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or(UserStoreError::NotFound)
    }
}
