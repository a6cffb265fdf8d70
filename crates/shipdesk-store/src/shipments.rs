//! Shipment repository over a single JSON array.
//!
//! Every mutation reads the whole collection, modifies it and writes it back.
//! There is no optimistic-concurrency check: two writers working from stale
//! copies silently overwrite each other (last write wins).

use std::time::Duration;

use tracing::debug;

use shipdesk_shared::constants::KEY_SHIPMENTS;
use shipdesk_shared::pagination::{paginate, Page, PageRequest};
use shipdesk_shared::repository::ShipmentRepository;
use shipdesk_shared::{ServiceType, Shipment, ShipdeskError, ShipdeskResult};

use crate::kv::KeyValueStore;

/// Whether repository calls pause like a remote API would.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiLatency {
    #[default]
    None,
    Simulated,
}

impl ApiLatency {
    async fn pause(self, millis: u64) {
        if self == Self::Simulated {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    /// Later pages take a little longer, capped at +700ms.
    fn page_delay_ms(page: u32) -> u64 {
        let base = if page == 1 { 500 } else { 300 };
        base + (u64::from(page.saturating_sub(1)) * 100).min(700)
    }
}

pub struct StoredShipmentRepository<K> {
    store: K,
    latency: ApiLatency,
}

impl<K: KeyValueStore> StoredShipmentRepository<K> {
    pub fn new(store: K) -> Self {
        Self {
            store,
            latency: ApiLatency::None,
        }
    }

    pub fn with_latency(mut self, latency: ApiLatency) -> Self {
        self.latency = latency;
        self
    }

    fn load(&self) -> ShipdeskResult<Vec<Shipment>> {
        Ok(self.store.get_json(KEY_SHIPMENTS)?.unwrap_or_default())
    }

    fn persist(&self, shipments: &[Shipment]) -> ShipdeskResult<()> {
        self.store.set_json(KEY_SHIPMENTS, shipments)?;
        Ok(())
    }

    fn matching(&self, service_type: ServiceType) -> ShipdeskResult<Vec<Shipment>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|s| s.service_type == service_type)
            .collect())
    }
}

impl<K: KeyValueStore> ShipmentRepository for StoredShipmentRepository<K> {
    async fn save(&self, shipment: Shipment) -> ShipdeskResult<Shipment> {
        debug!(endpoint = %shipment.service_type.api_path(), "POST shipment");
        self.latency.pause(300).await;

        let mut shipments = self.load()?;
        shipments.push(shipment.clone());
        self.persist(&shipments)?;

        Ok(shipment)
    }

    async fn find_by_id(&self, id: &str) -> ShipdeskResult<Option<Shipment>> {
        let found = self.load()?.into_iter().find(|s| s.id == id);

        if let Some(shipment) = &found {
            debug!(endpoint = %shipment.service_type.api_path(), id, "GET shipment");
            self.latency.pause(200).await;
        }

        Ok(found)
    }

    async fn find_by_service_type(
        &self,
        service_type: ServiceType,
    ) -> ShipdeskResult<Vec<Shipment>> {
        debug!(endpoint = %service_type.api_path(), "GET shipments");
        self.latency.pause(500).await;

        self.matching(service_type)
    }

    async fn find_by_service_type_paginated(
        &self,
        service_type: ServiceType,
        request: PageRequest,
    ) -> ShipdeskResult<Page<Shipment>> {
        request.validate()?;

        debug!(
            endpoint = %service_type.api_path(),
            page = request.page,
            limit = request.limit,
            "GET shipments page"
        );
        self.latency.pause(ApiLatency::page_delay_ms(request.page)).await;

        let page = paginate(self.matching(service_type)?, request)?;

        debug!(
            returned = page.data.len(),
            total = page.total_count,
            has_more = page.has_more,
            "page sliced"
        );
        Ok(page)
    }

    async fn update(&self, shipment: Shipment) -> ShipdeskResult<Shipment> {
        debug!(endpoint = %shipment.service_type.api_path(), id = %shipment.id, "PUT shipment");
        self.latency.pause(400).await;

        let mut shipments = self.load()?;
        let slot = shipments
            .iter_mut()
            .find(|s| s.id == shipment.id)
            .ok_or_else(|| ShipdeskError::shipment_not_found(&shipment.id))?;
        *slot = shipment.clone();
        self.persist(&shipments)?;

        Ok(shipment)
    }
}
