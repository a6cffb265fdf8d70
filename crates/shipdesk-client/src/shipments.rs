//! Shipment creation, lookup and status updates on top of a repository.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shipdesk_shared::constants::{INITIAL_STATUS, LIVE_TRACKING_PREFIX};
use shipdesk_shared::repository::ShipmentRepository;
use shipdesk_shared::tracking::generate_tracking_number;
use shipdesk_shared::{
    Item, NewShipment, Page, PageRequest, ServiceType, Shipment, ShipdeskError, ShipdeskResult,
};

/// How tracking numbers are prefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingPrefix {
    /// One prefix for every service type (`DEL` unless configured).
    Fixed(String),
    /// `B2B`, `B2C` or `INT` depending on the shipment's service type.
    PerServiceType,
}

impl Default for TrackingPrefix {
    fn default() -> Self {
        Self::Fixed(LIVE_TRACKING_PREFIX.to_string())
    }
}

impl TrackingPrefix {
    pub fn for_service(&self, service_type: ServiceType) -> &str {
        match self {
            Self::Fixed(prefix) => prefix,
            Self::PerServiceType => service_type.tracking_prefix(),
        }
    }

    /// `per-service` selects [`TrackingPrefix::PerServiceType`]; any other
    /// non-empty value is used verbatim.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value {
            "" => None,
            "per-service" | "per_service" => Some(Self::PerServiceType),
            other => Some(Self::Fixed(other.to_string())),
        }
    }
}

pub struct ShipmentService<R> {
    repo: R,
    tracking_prefix: TrackingPrefix,
}

impl<R: ShipmentRepository> ShipmentService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            tracking_prefix: TrackingPrefix::default(),
        }
    }

    pub fn with_tracking_prefix(mut self, prefix: TrackingPrefix) -> Self {
        self.tracking_prefix = prefix;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn create_shipment(&self, data: NewShipment) -> ShipdeskResult<Shipment> {
        let tracking_number = generate_tracking_number(
            self.tracking_prefix.for_service(data.service_type),
            &mut rand::thread_rng(),
        );
        let now = Utc::now();

        let items = data
            .items
            .into_iter()
            .map(|item| Item {
                id: Uuid::new_v4().to_string(),
                name: item.name,
                weight: item.weight,
                dimensions: item.dimensions,
                value: item.value,
            })
            .collect();

        let shipment = Shipment {
            id: Uuid::new_v4().to_string(),
            tracking_number,
            service_type: data.service_type,
            status: INITIAL_STATUS.to_string(),
            origin: data.origin,
            destination: data.destination,
            items,
            created_at: now,
            updated_at: now,
        };

        let saved = self.repo.save(shipment).await?;
        info!(
            id = %saved.id,
            tracking = %saved.tracking_number,
            service_type = %saved.service_type,
            "shipment created"
        );
        Ok(saved)
    }

    pub async fn get_shipment_by_id(&self, id: &str) -> ShipdeskResult<Option<Shipment>> {
        self.repo.find_by_id(id).await
    }

    pub async fn get_shipments_by_service_type(
        &self,
        service_type: ServiceType,
    ) -> ShipdeskResult<Vec<Shipment>> {
        self.repo.find_by_service_type(service_type).await
    }

    pub async fn get_shipments_by_service_type_paginated(
        &self,
        service_type: ServiceType,
        request: PageRequest,
    ) -> ShipdeskResult<Page<Shipment>> {
        let page = self
            .repo
            .find_by_service_type_paginated(service_type, request)
            .await?;
        debug!(
            %service_type,
            page = request.page,
            returned = page.data.len(),
            total = page.total_count,
            "page fetched"
        );
        Ok(page)
    }

    /// Any status string is accepted; callers pick from the canonical set.
    pub async fn update_shipment_status(&self, id: &str, status: &str) -> ShipdeskResult<Shipment> {
        let mut shipment = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShipdeskError::shipment_not_found(id))?;

        let previous = std::mem::replace(&mut shipment.status, status.to_string());
        shipment.updated_at = Utc::now();

        let updated = self.repo.update(shipment).await?;
        info!(id, from = %previous, to = status, "shipment status changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipdesk_shared::{Address, Dimensions, NewItem};
    use shipdesk_store::{MemoryStore, StoredShipmentRepository};

    fn address(city: &str) -> Address {
        Address {
            street: "1 Main St".into(),
            city: city.into(),
            state: "CA".into(),
            zip_code: "90001".into(),
            country: "USA".into(),
        }
    }

    fn new_shipment(service_type: ServiceType) -> NewShipment {
        NewShipment {
            service_type,
            origin: address("Los Angeles"),
            destination: address("Portland"),
            items: vec![NewItem {
                name: "Widget".into(),
                weight: 2.5,
                dimensions: Dimensions {
                    length: 10.0,
                    width: 5.0,
                    height: 3.0,
                },
                value: 40.0,
            }],
        }
    }

    fn service() -> ShipmentService<StoredShipmentRepository<MemoryStore>> {
        ShipmentService::new(StoredShipmentRepository::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_assigns_identity_and_status() {
        let service = service();
        let created = service
            .create_shipment(new_shipment(ServiceType::B2c))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.status, "CREATED");
        assert_eq!(created.created_at, created.updated_at);
        assert!(created.tracking_number.starts_with("DEL"));
        assert_eq!(created.tracking_number.len(), 10);
        assert!(!created.items[0].id.is_empty());

        let found = service.get_shipment_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_per_service_tracking_prefix() {
        let service = service().with_tracking_prefix(TrackingPrefix::PerServiceType);
        let created = service
            .create_shipment(new_shipment(ServiceType::International))
            .await
            .unwrap();
        assert!(created.tracking_number.starts_with("INT"));
    }

    #[tokio::test]
    async fn test_update_status() {
        let service = service();
        let created = service
            .create_shipment(new_shipment(ServiceType::B2b))
            .await
            .unwrap();

        let updated = service
            .update_shipment_status(&created.id, "IN_TRANSIT")
            .await
            .unwrap();
        assert_eq!(updated.status, "IN_TRANSIT");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);

        let listed = service
            .get_shipments_by_service_type(ServiceType::B2b)
            .await
            .unwrap();
        assert_eq!(listed[0].status, "IN_TRANSIT");
    }

    #[tokio::test]
    async fn test_update_status_unknown_id() {
        let err = service()
            .update_shipment_status("missing", "DELIVERED")
            .await
            .unwrap_err();
        assert!(matches!(err, ShipdeskError::NotFound { entity: "Shipment", .. }));
    }

    #[tokio::test]
    async fn test_paginated_passthrough() {
        let service = service();
        for _ in 0..3 {
            service
                .create_shipment(new_shipment(ServiceType::B2b))
                .await
                .unwrap();
        }
        let page = service
            .get_shipments_by_service_type_paginated(ServiceType::B2b, PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total_count, 3);
        assert!(page.has_more);
    }

    #[test]
    fn test_tracking_prefix_parse() {
        assert_eq!(TrackingPrefix::parse("per-service"), Some(TrackingPrefix::PerServiceType));
        assert_eq!(
            TrackingPrefix::parse("SHP"),
            Some(TrackingPrefix::Fixed("SHP".into()))
        );
        assert_eq!(TrackingPrefix::parse("  "), None);
    }
}
