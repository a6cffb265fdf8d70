//! Repository ports.
//!
//! All operations are async so adapters are free to simulate network
//! latency. Implementations live in `shipdesk-store`; tests may provide their
//! own.

use std::future::Future;

use crate::error::ShipdeskResult;
use crate::models::{Shipment, User};
use crate::pagination::{Page, PageRequest};
use crate::types::ServiceType;

pub trait ShipmentRepository: Send + Sync {
    /// Append a new shipment.
    fn save(&self, shipment: Shipment) -> impl Future<Output = ShipdeskResult<Shipment>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = ShipdeskResult<Option<Shipment>>> + Send;

    /// Every shipment of `service_type`, in storage order.
    fn find_by_service_type(
        &self,
        service_type: ServiceType,
    ) -> impl Future<Output = ShipdeskResult<Vec<Shipment>>> + Send;

    /// One page of [`Self::find_by_service_type`].
    fn find_by_service_type_paginated(
        &self,
        service_type: ServiceType,
        request: PageRequest,
    ) -> impl Future<Output = ShipdeskResult<Page<Shipment>>> + Send;

    /// Replace the stored record with the same id. `NotFound` if absent.
    fn update(&self, shipment: Shipment)
        -> impl Future<Output = ShipdeskResult<Shipment>> + Send;
}

pub trait UserRepository: Send + Sync {
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = ShipdeskResult<Option<User>>> + Send;

    fn find_by_id(&self, id: &str) -> impl Future<Output = ShipdeskResult<Option<User>>> + Send;

    /// Append a new user. An empty id is replaced by the next numeric id.
    fn save(&self, user: User) -> impl Future<Output = ShipdeskResult<User>> + Send;

    /// Replace the stored record with the same id. `NotFound` if absent.
    fn update(&self, user: User) -> impl Future<Output = ShipdeskResult<User>> + Send;

    fn find_all(&self) -> impl Future<Output = ShipdeskResult<Vec<User>>> + Send;
}
