//! Route admission for the dashboard's pages.

use tracing::debug;

use shipdesk_shared::Action;
use shipdesk_store::KeyValueStore;

use crate::session::SessionHandle;
use crate::settings::ServiceSettings;

pub const LOGIN_PATH: &str = "/login";
pub const SETTINGS_PATH: &str = "/settings";
pub const SERVICE_SELECTOR_PATH: &str = "/service-selector";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// A permission a route demands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    pub action: Action,
    pub resource: String,
}

impl RouteRequirement {
    pub fn new(action: Action, resource: impl Into<String>) -> Self {
        Self {
            action,
            resource: resource.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    /// Signed in but no service is active yet.
    RedirectToSettings,
    RedirectToUnauthorized,
}

impl RouteDecision {
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToSettings => Some(SETTINGS_PATH),
            Self::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }
}

pub struct RouteGuard<K> {
    session: SessionHandle,
    settings: ServiceSettings<K>,
}

impl<K: KeyValueStore> RouteGuard<K> {
    pub fn new(session: SessionHandle, settings: ServiceSettings<K>) -> Self {
        Self { session, settings }
    }

    /// Unauthenticated visitors go to login. Routes without a requirement
    /// send users with no active service to settings; routes with one
    /// admit only users holding it.
    pub fn check(&self, path: &str, requirement: Option<&RouteRequirement>) -> RouteDecision {
        let decision = if !self.session.is_authenticated() {
            RouteDecision::RedirectToLogin
        } else {
            match requirement {
                Some(req) if self.session.has_permission(req.action, &req.resource) => {
                    RouteDecision::Allow
                }
                Some(_) => RouteDecision::RedirectToUnauthorized,
                None if path != SETTINGS_PATH && !self.settings.has_active_services() => {
                    RouteDecision::RedirectToSettings
                }
                None => RouteDecision::Allow,
            }
        };

        debug!(path, ?decision, "route checked");
        decision
    }

    /// Where to go right after login when no page was requested.
    pub fn landing_path(&self) -> &'static str {
        if self.settings.has_active_services() {
            SERVICE_SELECTOR_PATH
        } else {
            SETTINGS_PATH
        }
    }
}
