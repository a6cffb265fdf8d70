//! Application state shared by every dashboard surface.
//!
//! [`AppState`] wires the key/value store into the repositories, services
//! and settings, seeding demo data first when configured to.

use std::sync::Arc;

use tracing::info;

use shipdesk_shared::{ServiceType, ShipdeskResult};
use shipdesk_store::seed::{seed_demo_data, SeedMode};
use shipdesk_store::{ApiLatency, KeyValueStore, StoredShipmentRepository, StoredUserRepository};

use crate::auth::AuthService;
use crate::config::ClientConfig;
use crate::guard::RouteGuard;
use crate::listing::ListingController;
use crate::scroll::NearEndTrigger;
use crate::session::SessionHandle;
use crate::settings::ServiceSettings;
use crate::shipments::ShipmentService;

pub type Auth<K> = AuthService<StoredUserRepository<K>, K>;
pub type Shipments<K> = ShipmentService<StoredShipmentRepository<K>>;
pub type Listing<K> = ListingController<StoredShipmentRepository<K>>;

pub struct AppState<K> {
    pub store: K,
    pub auth: Arc<Auth<K>>,
    pub shipments: Arc<Shipments<K>>,
    pub settings: ServiceSettings<K>,
    config: ClientConfig,
}

impl<K: KeyValueStore + Clone + 'static> AppState<K> {
    pub fn new(store: K, config: ClientConfig) -> ShipdeskResult<Self> {
        let mode = if config.reset_on_start {
            Some(SeedMode::Reset)
        } else if config.seed_demo_data {
            Some(SeedMode::IfMissing)
        } else {
            None
        };
        if let Some(mode) = mode {
            seed_demo_data(&store, mode)?;
        }

        let latency = if config.simulate_latency {
            ApiLatency::Simulated
        } else {
            ApiLatency::None
        };
        let repo = StoredShipmentRepository::new(store.clone()).with_latency(latency);
        let shipments = ShipmentService::new(repo).with_tracking_prefix(config.tracking_prefix.clone());

        let auth = AuthService::new(StoredUserRepository::new(store.clone()), store.clone());

        info!(
            page_size = config.page_size,
            ?latency,
            authenticated = auth.is_authenticated(),
            "application state ready"
        );

        Ok(Self {
            settings: ServiceSettings::new(store.clone()),
            auth: Arc::new(auth),
            shipments: Arc::new(shipments),
            store,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> SessionHandle {
        self.auth.subscribe()
    }

    /// A fresh listing for `service_type`; call `open` to load page 1.
    pub fn listing(&self, service_type: ServiceType) -> Arc<Listing<K>> {
        Arc::new(ListingController::new(
            Arc::clone(&self.shipments),
            self.session(),
            service_type,
            self.config.page_size,
        ))
    }

    pub fn route_guard(&self) -> RouteGuard<K> {
        RouteGuard::new(self.session(), self.settings.clone())
    }

    pub fn near_end_trigger(&self) -> NearEndTrigger {
        NearEndTrigger::new(self.config.near_end_px, self.config.scroll_debounce)
    }
}
