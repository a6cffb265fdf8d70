//! The explicit session object.
//!
//! The auth service is the single writer; everything else holds a
//! [`SessionHandle`] and reads the current value or waits for changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use shipdesk_shared::permission::has_permission;
use shipdesk_shared::{Action, User};

/// An authenticated user plus the opaque token issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Read side of the current session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionHandle {
    pub(crate) fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.rx.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Evaluate `(action, resource)` against whoever is signed in right now.
    pub fn has_permission(&self, action: Action, resource: &str) -> bool {
        let session = self.rx.borrow();
        has_permission(session.as_ref().map(|s| &s.user), action, resource)
    }

    /// Wait for the next login, logout or session refresh.
    ///
    /// Returns `false` once the owning auth service has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
