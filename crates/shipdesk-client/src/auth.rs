//! Authentication and user administration.
//!
//! Login only checks that the username exists; the password is not verified
//! and the token is opaque. The session is mirrored to the key/value store
//! so it survives a restart, and restored from it without re-validation.

use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use shipdesk_shared::constants::{
    DEFAULT_PERMISSION_NAME, DEFAULT_ROLE_NAME, KEY_AUTH_TOKEN, KEY_CURRENT_USER,
    RESOURCE_SHIPMENT, RESOURCE_USER,
};
use shipdesk_shared::permission::has_permission;
use shipdesk_shared::repository::UserRepository;
use shipdesk_shared::{
    Action, NewUser, Permission, Role, ShipdeskError, ShipdeskResult, User,
};
use shipdesk_store::KeyValueStore;

use crate::session::{Session, SessionHandle};

pub struct AuthService<U, K> {
    users: U,
    store: K,
    session: watch::Sender<Option<Session>>,
}

impl<U: UserRepository, K: KeyValueStore> AuthService<U, K> {
    /// Build the service, restoring any session persisted by a previous run.
    pub fn new(users: U, store: K) -> Self {
        let restored = restore_session(&store);
        if let Some(session) = &restored {
            info!(username = %session.user.username, "session restored");
        }

        let (session, _rx) = watch::channel(restored);
        Self {
            users,
            store,
            session,
        }
    }

    pub fn subscribe(&self) -> SessionHandle {
        SessionHandle::new(self.session.subscribe())
    }

    pub async fn login(&self, username: &str, password: &str) -> ShipdeskResult<Session> {
        if password.is_empty() {
            warn!(username, "login rejected: empty password");
            return Err(ShipdeskError::InvalidCredentials);
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(username, "login rejected: unknown user");
            return Err(ShipdeskError::InvalidCredentials);
        };

        let session = Session {
            user,
            token: generate_token(),
        };
        self.persist(&session)?;
        self.session.send_replace(Some(session.clone()));

        info!(username, "logged in");
        Ok(session)
    }

    pub async fn logout(&self) -> ShipdeskResult<()> {
        self.store.remove(KEY_CURRENT_USER)?;
        self.store.remove(KEY_AUTH_TOKEN)?;

        let previous = self.session.send_replace(None);

        if let Some(session) = previous {
            info!(username = %session.user.username, "logged out");
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn has_permission(&self, action: Action, resource: &str) -> bool {
        let session = self.session.borrow();
        has_permission(session.as_ref().map(|s| &s.user), action, resource)
    }

    fn require(&self, action: Action, resource: &str) -> ShipdeskResult<()> {
        if self.has_permission(action, resource) {
            return Ok(());
        }
        let user = self
            .current_user()
            .map(|u| u.username)
            .unwrap_or_else(|| "<anonymous>".to_string());
        warn!(
            %user,
            %action,
            resource,
            "permission denied"
        );
        Err(ShipdeskError::not_authorized(action, resource))
    }

    pub async fn get_all_users(&self) -> ShipdeskResult<Vec<User>> {
        self.require(Action::Read, RESOURCE_USER)?;
        self.users.find_all().await
    }

    /// Replace the permission set of the user's primary role wholesale.
    ///
    /// Additional roles are left untouched, and a user with no role at all
    /// is saved unchanged.
    pub async fn update_user_permissions(
        &self,
        user_id: &str,
        permissions: Vec<Permission>,
    ) -> ShipdeskResult<User> {
        self.require(Action::Update, RESOURCE_USER)?;

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ShipdeskError::user_not_found(user_id))?;

        let count = permissions.len();
        if let Some(role) = user.roles.first_mut() {
            role.permissions = permissions;
        }

        let updated = self.users.update(user).await?;
        info!(user_id, username = %updated.username, permissions = count, "user permissions replaced");

        self.refresh_if_current(&updated)?;
        Ok(updated)
    }

    pub async fn create_user(&self, data: NewUser) -> ShipdeskResult<User> {
        self.require(Action::Update, RESOURCE_USER)?;

        let username = data
            .username
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ShipdeskError::Validation("Username is required".to_string()))?;

        if self.users.find_by_username(&username).await?.is_some() {
            warn!(%username, "user creation rejected: duplicate username");
            return Err(ShipdeskError::DuplicateUsername(username));
        }

        let email = data
            .email
            .unwrap_or_else(|| format!("{username}@example.com"));

        let user = User {
            id: String::new(),
            username,
            email,
            first_name: data.first_name,
            last_name: data.last_name,
            roles: vec![Role {
                id: short_id(),
                name: DEFAULT_ROLE_NAME.to_string(),
                permissions: vec![Permission::new(
                    short_id(),
                    DEFAULT_PERMISSION_NAME,
                    RESOURCE_SHIPMENT,
                    Action::Read,
                )],
            }],
        };

        let created = self.users.save(user).await?;
        info!(id = %created.id, username = %created.username, "user created");
        Ok(created)
    }

    fn refresh_if_current(&self, updated: &User) -> ShipdeskResult<()> {
        let refreshed = {
            let current = self.session.borrow();
            match current.as_ref() {
                Some(session) if session.user.id == updated.id => Some(Session {
                    user: updated.clone(),
                    token: session.token.clone(),
                }),
                _ => None,
            }
        };

        if let Some(session) = refreshed {
            self.store.set_json(KEY_CURRENT_USER, &session.user)?;
            self.session.send_replace(Some(session));
        }
        Ok(())
    }

    fn persist(&self, session: &Session) -> ShipdeskResult<()> {
        self.store.set_json(KEY_CURRENT_USER, &session.user)?;
        self.store.set(KEY_AUTH_TOKEN, &session.token)?;
        Ok(())
    }
}

/// Load `currentUser` + `authToken`; a corrupt record clears both.
fn restore_session<K: KeyValueStore>(store: &K) -> Option<Session> {
    let token = match store.get(KEY_AUTH_TOKEN) {
        Ok(Some(token)) => token,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "could not read persisted token");
            return None;
        }
    };

    match store.get_json::<User>(KEY_CURRENT_USER) {
        Ok(Some(user)) => Some(Session { user, token }),
        Ok(None) => None,
        Err(e) => {
            error!(error = %e, "failed to restore session, clearing it");
            for key in [KEY_CURRENT_USER, KEY_AUTH_TOKEN] {
                if let Err(e) = store.remove(key) {
                    warn!(key, error = %e, "could not clear corrupt session entry");
                }
            }
            None
        }
    }
}

fn generate_token() -> String {
    format!("session-{}", hex::encode(rand::random::<[u8; 16]>()))
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..9].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipdesk_store::seed::demo_users;
    use shipdesk_store::{MemoryStore, StoredUserRepository};
    use shipdesk_shared::constants::KEY_USERS;

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use shipdesk_store::StoreError;

    /// Memory store whose removals can be switched to fail.
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_remove: Arc<AtomicBool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> shipdesk_store::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> shipdesk_store::Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> shipdesk_store::Result<()> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(StoreError::Poisoned);
            }
            self.inner.remove(key)
        }
    }

    fn service() -> (AuthService<StoredUserRepository<MemoryStore>, MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        store.set_json(KEY_USERS, &demo_users()).unwrap();
        let auth = AuthService::new(StoredUserRepository::new(store.clone()), store.clone());
        (auth, store)
    }

    #[tokio::test]
    async fn test_login_any_password_for_known_user() {
        let (auth, store) = service();
        let session = auth.login("owner", "whatever").await.unwrap();

        assert_eq!(session.user.username, "owner");
        assert!(session.token.starts_with("session-"));
        assert!(auth.is_authenticated());
        assert_eq!(store.get(KEY_AUTH_TOKEN).unwrap(), Some(session.token));
        assert!(store.get(KEY_CURRENT_USER).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (auth, _) = service();
        assert!(matches!(
            auth.login("nobody", "pw").await,
            Err(ShipdeskError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("admin", "").await,
            Err(ShipdeskError::InvalidCredentials)
        ));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_store() {
        let (auth, store) = service();
        auth.login("admin", "pw").await.unwrap();
        auth.logout().await.unwrap();

        assert!(auth.current_user().is_none());
        assert!(store.get(KEY_CURRENT_USER).unwrap().is_none());
        assert!(store.get(KEY_AUTH_TOKEN).unwrap().is_none());
        assert!(!auth.has_permission(Action::Read, "shipment"));
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_session_consistent_with_store() {
        let store = FlakyStore::default();
        store.set_json(KEY_USERS, &demo_users()).unwrap();
        let auth = AuthService::new(StoredUserRepository::new(store.clone()), store.clone());
        auth.login("admin", "pw").await.unwrap();

        store.fail_remove.store(true, Ordering::SeqCst);
        assert!(matches!(auth.logout().await, Err(ShipdeskError::Storage(_))));

        // Still signed in, matching what a restart would restore.
        assert!(auth.is_authenticated());
        assert!(store.get(KEY_AUTH_TOKEN).unwrap().is_some());

        store.fail_remove.store(false, Ordering::SeqCst);
        auth.logout().await.unwrap();
        assert!(!auth.is_authenticated());
        assert!(store.get(KEY_AUTH_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_session_ignored_even_if_it_cannot_be_cleared() {
        let store = FlakyStore::default();
        store.set(KEY_AUTH_TOKEN, "tok").unwrap();
        store.set(KEY_CURRENT_USER, "{broken").unwrap();
        store.fail_remove.store(true, Ordering::SeqCst);

        let auth = AuthService::new(StoredUserRepository::new(store.clone()), store.clone());
        assert!(!auth.is_authenticated());
        assert_eq!(store.get(KEY_AUTH_TOKEN).unwrap().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let (auth, store) = service();
        let session = auth.login("customer", "pw").await.unwrap();
        drop(auth);

        let restored = AuthService::new(StoredUserRepository::new(store.clone()), store);
        assert_eq!(restored.current_session(), Some(session));
        assert!(restored.has_permission(Action::Read, "shipment"));
    }

    #[tokio::test]
    async fn test_corrupt_persisted_session_is_cleared() {
        let store = MemoryStore::new();
        store.set(KEY_AUTH_TOKEN, "tok").unwrap();
        store.set(KEY_CURRENT_USER, "{broken").unwrap();

        let auth = AuthService::new(StoredUserRepository::new(store.clone()), store.clone());
        assert!(!auth.is_authenticated());
        assert!(store.get(KEY_AUTH_TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_users_requires_read_user() {
        let (auth, _) = service();
        auth.login("customer", "pw").await.unwrap();
        assert!(matches!(
            auth.get_all_users().await,
            Err(ShipdeskError::NotAuthorized { .. })
        ));

        auth.login("admin", "pw").await.unwrap();
        assert_eq!(auth.get_all_users().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let (auth, _) = service();
        auth.login("admin", "pw").await.unwrap();
        let err = auth
            .create_user(NewUser::with_username("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShipdeskError::DuplicateUsername(name) if name == "admin"));
    }

    #[tokio::test]
    async fn test_create_user_requires_username() {
        let (auth, _) = service();
        auth.login("admin", "pw").await.unwrap();
        assert!(matches!(
            auth.create_user(NewUser::default()).await,
            Err(ShipdeskError::Validation(_))
        ));
        assert!(matches!(
            auth.create_user(NewUser::with_username("  ")).await,
            Err(ShipdeskError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_user_defaults() {
        let (auth, _) = service();
        auth.login("owner", "pw").await.unwrap();
        let created = auth
            .create_user(NewUser::with_username("dispatcher"))
            .await
            .unwrap();

        assert_eq!(created.id, "5");
        assert_eq!(created.email, "dispatcher@example.com");
        assert_eq!(created.roles.len(), 1);
        assert_eq!(created.roles[0].name, "USER");
        let perms = created.primary_permissions();
        assert_eq!(perms.len(), 1);
        assert!(perms[0].matches(Action::Read, "shipment"));
    }

    #[tokio::test]
    async fn test_create_user_requires_update_user() {
        let (auth, _) = service();
        auth.login("newuser", "pw").await.unwrap();
        assert!(matches!(
            auth.create_user(NewUser::with_username("sneaky")).await,
            Err(ShipdeskError::NotAuthorized { .. })
        ));

        auth.logout().await.unwrap();
        assert!(matches!(
            auth.create_user(NewUser::with_username("anon")).await,
            Err(ShipdeskError::NotAuthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_permissions_unauthorized_leaves_target_unchanged() {
        let (auth, store) = service();
        auth.login("customer", "pw").await.unwrap();

        let err = auth
            .update_user_permissions("4", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ShipdeskError::NotAuthorized { .. }));

        let users = StoredUserRepository::new(store);
        let target = users.find_by_id("4").await.unwrap().unwrap();
        assert_eq!(target.primary_permissions().len(), 1);
    }

    #[tokio::test]
    async fn test_update_permissions_replaces_primary_role() {
        let (auth, _) = service();
        auth.login("admin", "pw").await.unwrap();

        let grants = vec![
            Permission::new("30", "Update Shipment", "shipment", Action::Update),
            Permission::new("31", "Manage B2B Service", "service:b2b", Action::Update),
        ];
        let updated = auth.update_user_permissions("4", grants.clone()).await.unwrap();
        assert_eq!(updated.primary_permissions(), grants.as_slice());

        assert!(matches!(
            auth.update_user_permissions("404", vec![]).await,
            Err(ShipdeskError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_updating_self_refreshes_session() {
        let (auth, store) = service();
        auth.login("admin", "pw").await.unwrap();
        let mut handle = auth.subscribe();

        // admin strips their own user-management rights
        let only_read = vec![Permission::new("2", "View", "shipment", Action::Read)];
        auth.update_user_permissions("1", only_read).await.unwrap();

        assert!(handle.changed().await);
        assert!(!handle.has_permission(Action::Update, "user"));
        assert!(handle.has_permission(Action::Read, "shipment"));

        let persisted: User = store.get_json(KEY_CURRENT_USER).unwrap().unwrap();
        assert_eq!(persisted.primary_permissions().len(), 1);

        assert!(matches!(
            auth.update_user_permissions("1", vec![]).await,
            Err(ShipdeskError::NotAuthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_subscribers_see_login_and_logout() {
        let (auth, _) = service();
        let mut handle = auth.subscribe();
        assert!(!handle.is_authenticated());

        auth.login("owner", "pw").await.unwrap();
        assert!(handle.changed().await);
        assert_eq!(handle.current_user().unwrap().username, "owner");

        auth.logout().await.unwrap();
        assert!(handle.changed().await);
        assert!(handle.current().is_none());
    }
}
