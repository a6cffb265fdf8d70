//! User repository over a single JSON array.

use shipdesk_shared::constants::KEY_USERS;
use shipdesk_shared::repository::UserRepository;
use shipdesk_shared::{ShipdeskError, ShipdeskResult, User};

use crate::kv::KeyValueStore;

pub struct StoredUserRepository<K> {
    store: K,
}

impl<K: KeyValueStore> StoredUserRepository<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    fn load(&self) -> ShipdeskResult<Vec<User>> {
        Ok(self.store.get_json(KEY_USERS)?.unwrap_or_default())
    }

    fn persist(&self, users: &[User]) -> ShipdeskResult<()> {
        self.store.set_json(KEY_USERS, users)?;
        Ok(())
    }
}

/// Next numeric id: one past the largest numeric id in use.
fn next_id(users: &[User]) -> String {
    let max = users
        .iter()
        .filter_map(|u| u.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

impl<K: KeyValueStore> UserRepository for StoredUserRepository<K> {
    async fn find_by_username(&self, username: &str) -> ShipdeskResult<Option<User>> {
        Ok(self.load()?.into_iter().find(|u| u.username == username))
    }

    async fn find_by_id(&self, id: &str) -> ShipdeskResult<Option<User>> {
        Ok(self.load()?.into_iter().find(|u| u.id == id))
    }

    async fn save(&self, mut user: User) -> ShipdeskResult<User> {
        let mut users = self.load()?;

        if user.id.is_empty() {
            user.id = next_id(&users);
        }

        users.push(user.clone());
        self.persist(&users)?;

        tracing::debug!(id = %user.id, username = %user.username, "user saved");
        Ok(user)
    }

    async fn update(&self, user: User) -> ShipdeskResult<User> {
        let mut users = self.load()?;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| ShipdeskError::user_not_found(&user.id))?;
        *slot = user.clone();
        self.persist(&users)?;

        Ok(user)
    }

    async fn find_all(&self) -> ShipdeskResult<Vec<User>> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.into(),
            username: username.into(),
            email: format!("{username}@example.com"),
            first_name: None,
            last_name: None,
            roles: vec![],
        }
    }

    #[tokio::test]
    async fn test_save_assigns_next_numeric_id() {
        let repo = StoredUserRepository::new(MemoryStore::new());
        repo.save(user("1", "admin")).await.unwrap();
        repo.save(user("7", "owner")).await.unwrap();
        repo.save(user("legacy-x", "old")).await.unwrap();

        let created = repo.save(user("", "fresh")).await.unwrap();
        assert_eq!(created.id, "8");

        let first = StoredUserRepository::new(MemoryStore::new())
            .save(user("", "first"))
            .await
            .unwrap();
        assert_eq!(first.id, "1");
    }

    #[tokio::test]
    async fn test_lookups() {
        let repo = StoredUserRepository::new(MemoryStore::new());
        repo.save(user("1", "admin")).await.unwrap();
        repo.save(user("2", "customer")).await.unwrap();

        assert_eq!(
            repo.find_by_username("customer").await.unwrap().unwrap().id,
            "2"
        );
        assert!(repo.find_by_username("Customer").await.unwrap().is_none());
        assert_eq!(repo.find_by_id("1").await.unwrap().unwrap().username, "admin");
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let repo = StoredUserRepository::new(MemoryStore::new());
        repo.save(user("1", "admin")).await.unwrap();

        let mut changed = user("1", "admin");
        changed.email = "root@example.com".into();
        repo.update(changed).await.unwrap();

        let reloaded = repo.find_by_id("1").await.unwrap().unwrap();
        assert_eq!(reloaded.email, "root@example.com");

        let err = repo.update(user("99", "nobody")).await.unwrap_err();
        assert!(matches!(err, ShipdeskError::NotFound { .. }));
    }
}
