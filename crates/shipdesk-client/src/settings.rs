//! Which service types the signed-in user has switched on.
//!
//! Activation is a per-installation preference stored under
//! `activeServices`; toggling a service requires `(update, service:<id>)`.

use serde::Serialize;
use tracing::{error, info, warn};

use shipdesk_shared::constants::KEY_ACTIVE_SERVICES;
use shipdesk_shared::{Action, ServiceType, ShipdeskError, ShipdeskResult};
use shipdesk_store::KeyValueStore;

use crate::session::SessionHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub service_type: ServiceType,
    pub active: bool,
    /// Whether the current user may toggle it.
    pub manageable: bool,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings<K> {
    store: K,
}

impl<K: KeyValueStore> ServiceSettings<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Active services in display order. Unreadable data counts as none.
    pub fn active_services(&self) -> Vec<ServiceType> {
        let ids: Vec<String> = match self.store.get_json(KEY_ACTIVE_SERVICES) {
            Ok(ids) => ids.unwrap_or_default(),
            Err(e) => {
                error!(error = %e, "failed to read active services");
                return Vec::new();
            }
        };

        ServiceType::ALL
            .into_iter()
            .filter(|st| ids.iter().any(|id| id == st.service_id()))
            .collect()
    }

    pub fn has_active_services(&self) -> bool {
        !self.active_services().is_empty()
    }

    pub fn is_active(&self, service_type: ServiceType) -> bool {
        self.active_services().contains(&service_type)
    }

    pub fn set_active(
        &self,
        session: &SessionHandle,
        service_type: ServiceType,
        active: bool,
    ) -> ShipdeskResult<Vec<ServiceType>> {
        let resource = service_type.permission_resource();
        if !session.has_permission(Action::Update, &resource) {
            warn!(%service_type, "service toggle rejected");
            return Err(ShipdeskError::not_authorized(Action::Update, resource));
        }

        let mut services = self.active_services();
        services.retain(|st| *st != service_type);
        if active {
            services.push(service_type);
        }
        let ids: Vec<&str> = ServiceType::ALL
            .iter()
            .filter(|st| services.contains(*st))
            .map(|st| st.service_id())
            .collect();

        self.store.set_json(KEY_ACTIVE_SERVICES, &ids)?;
        info!(%service_type, active, "service activation changed");
        Ok(self.active_services())
    }

    /// Flip one service; returns its new state.
    pub fn toggle(&self, session: &SessionHandle, service_type: ServiceType) -> ShipdeskResult<bool> {
        let active = !self.is_active(service_type);
        self.set_active(session, service_type, active)?;
        Ok(active)
    }

    /// Every service type with its activation and whether the current user
    /// may change it.
    pub fn overview(&self, session: &SessionHandle) -> Vec<ServiceStatus> {
        let active = self.active_services();
        ServiceType::ALL
            .into_iter()
            .map(|service_type| ServiceStatus {
                service_type,
                active: active.contains(&service_type),
                manageable: session
                    .has_permission(Action::Update, &service_type.permission_resource()),
            })
            .collect()
    }

    /// May manage at least one service but has none switched on yet.
    pub fn is_new_user(&self, session: &SessionHandle) -> bool {
        let can_manage_any = ServiceType::ALL
            .iter()
            .any(|st| session.has_permission(Action::Update, &st.permission_resource()));
        can_manage_any && !self.has_active_services()
    }
}
