//! Paginated, append-on-scroll shipment listing for one service type.
//!
//! A controller owns one listing at a time. Selecting a service type starts
//! a new listing session: the accumulated rows are dropped, paging restarts
//! at 1 and every response that belongs to an older session is discarded.
//! Within a session at most one page request is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use shipdesk_shared::constants::RESOURCE_SHIPMENT;
use shipdesk_shared::repository::ShipmentRepository;
use shipdesk_shared::{
    Action, PageRequest, ServiceType, Shipment, ShipdeskError, ShipdeskResult,
};

use crate::session::SessionHandle;
use crate::shipments::ShipmentService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    /// Nothing requested yet, or the first page failed.
    Idle,
    LoadingFirstPage,
    LoadingMore,
    Loaded { has_more: bool },
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        page: u32,
        received: usize,
        has_more: bool,
    },
    /// Another request of this session was already in flight.
    Skipped,
    /// The listing has no more pages.
    Exhausted,
    /// The service type changed while the request was running.
    Stale,
    /// The request failed; rows and paging are unchanged.
    Failed(ShipdeskError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub service_type: ServiceType,
    pub phase: ListingPhase,
    pub shipments: Vec<Shipment>,
    pub current_page: u32,
    pub has_more: bool,
    pub total_count: Option<usize>,
    pub can_update_status: bool,
    /// Page whose last request failed, until a later page load succeeds.
    pub failed_page: Option<u32>,
}

struct Inner {
    generation: u64,
    service_type: ServiceType,
    phase: ListingPhase,
    shipments: Vec<Shipment>,
    current_page: u32,
    has_more: bool,
    total_count: Option<usize>,
    can_update_status: bool,
    failed_page: Option<u32>,
    in_flight: Arc<AtomicBool>,
}

impl Inner {
    fn new(service_type: ServiceType, generation: u64) -> Self {
        Self {
            generation,
            service_type,
            phase: ListingPhase::Idle,
            shipments: Vec::new(),
            current_page: 0,
            has_more: true,
            total_count: None,
            can_update_status: false,
            failed_page: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    fn settled_phase(&self) -> ListingPhase {
        if self.current_page == 0 {
            ListingPhase::Idle
        } else {
            ListingPhase::Loaded {
                has_more: self.has_more,
            }
        }
    }
}

/// Clears the session's in-flight flag when the request finishes, however
/// it finishes.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A claimed request slot within one listing session.
struct Ticket {
    _guard: InFlight,
    generation: u64,
    service_type: ServiceType,
}

pub struct ListingController<R> {
    service: Arc<ShipmentService<R>>,
    session: SessionHandle,
    page_size: u32,
    inner: Mutex<Inner>,
}

impl<R: ShipmentRepository> ListingController<R> {
    pub fn new(
        service: Arc<ShipmentService<R>>,
        session: SessionHandle,
        service_type: ServiceType,
        page_size: u32,
    ) -> Self {
        Self {
            service,
            session,
            page_size,
            inner: Mutex::new(Inner::new(service_type, 0)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn service_type(&self) -> ServiceType {
        self.lock().service_type
    }

    pub fn phase(&self) -> ListingPhase {
        self.lock().phase
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        let inner = self.lock();
        ListingSnapshot {
            service_type: inner.service_type,
            phase: inner.phase,
            shipments: inner.shipments.clone(),
            current_page: inner.current_page,
            has_more: inner.has_more,
            total_count: inner.total_count,
            can_update_status: inner.can_update_status,
            failed_page: inner.failed_page,
        }
    }

    /// Start a fresh listing session for `service_type`.
    ///
    /// Any request still running for the previous session will have its
    /// response discarded.
    pub fn reset(&self, service_type: ServiceType) {
        let mut inner = self.lock();
        let generation = inner.generation + 1;
        *inner = Inner::new(service_type, generation);
        debug!(%service_type, generation, "listing reset");
    }

    /// Reset to `service_type` and fetch its first page.
    pub async fn open(&self, service_type: ServiceType) -> LoadOutcome {
        self.reset(service_type);
        self.load_page(1, false).await
    }

    /// Fetch `page` and either replace or extend the accumulated rows.
    pub async fn load_page(&self, page: u32, append: bool) -> LoadOutcome {
        let Some(ticket) = self.claim(page) else {
            return LoadOutcome::Skipped;
        };
        self.run(ticket, page, append).await
    }

    /// Fetch the page after the last one received.
    pub async fn load_more(&self) -> LoadOutcome {
        let (ticket, next) = {
            let mut inner = self.lock();
            if !inner.has_more {
                return LoadOutcome::Exhausted;
            }
            let next = inner.current_page + 1;
            let Some(ticket) = Self::claim_locked(&mut inner, next) else {
                return LoadOutcome::Skipped;
            };
            (ticket, next)
        };
        self.run(ticket, next, true).await
    }

    fn claim(&self, page: u32) -> Option<Ticket> {
        let mut inner = self.lock();
        Self::claim_locked(&mut inner, page)
    }

    fn claim_locked(inner: &mut Inner, page: u32) -> Option<Ticket> {
        let flag = Arc::clone(&inner.in_flight);
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(page, "page request already in flight, skipping");
            return None;
        }

        inner.phase = if page == 1 {
            ListingPhase::LoadingFirstPage
        } else {
            ListingPhase::LoadingMore
        };

        Some(Ticket {
            _guard: InFlight(flag),
            generation: inner.generation,
            service_type: inner.service_type,
        })
    }

    async fn run(&self, ticket: Ticket, page: u32, append: bool) -> LoadOutcome {
        let service_type = ticket.service_type;
        let result = self
            .service
            .get_shipments_by_service_type_paginated(
                service_type,
                PageRequest::new(page, self.page_size),
            )
            .await;

        // Evaluated against whoever is signed in when the first page lands.
        let can_update = (page == 1)
            .then(|| self.session.has_permission(Action::Update, RESOURCE_SHIPMENT));

        let mut inner = self.lock();
        if inner.generation != ticket.generation {
            debug!(%service_type, page, "discarding response from a previous listing");
            return LoadOutcome::Stale;
        }

        let page_data = match result {
            Ok(page_data) => page_data,
            Err(e) => {
                warn!(%service_type, page, error = %e, "failed to load shipments");
                inner.phase = inner.settled_phase();
                inner.failed_page = Some(page);
                return LoadOutcome::Failed(e);
            }
        };

        let received = page_data.data.len();
        if append {
            inner.shipments.extend(page_data.data);
        } else {
            inner.shipments = page_data.data;
        }
        inner.current_page = page;
        inner.failed_page = None;
        inner.has_more = page_data.has_more;
        inner.total_count = Some(page_data.total_count);
        if let Some(can_update) = can_update {
            inner.can_update_status = can_update;
        }
        inner.phase = ListingPhase::Loaded {
            has_more: page_data.has_more,
        };

        info!(
            %service_type,
            page,
            received,
            total = page_data.total_count,
            has_more = page_data.has_more,
            "shipments loaded"
        );
        LoadOutcome::Loaded {
            page,
            received,
            has_more: page_data.has_more,
        }
    }

    /// Change one listed shipment's status and patch the accumulated row.
    pub async fn update_status(&self, id: &str, status: &str) -> ShipdeskResult<Shipment> {
        let (allowed, generation) = {
            let inner = self.lock();
            (inner.can_update_status, inner.generation)
        };
        if !allowed {
            warn!(id, "status update rejected: listing is read-only");
            return Err(ShipdeskError::not_authorized(Action::Update, RESOURCE_SHIPMENT));
        }

        let updated = self.service.update_shipment_status(id, status).await?;

        let mut inner = self.lock();
        if inner.generation == generation {
            if let Some(row) = inner.shipments.iter_mut().find(|s| s.id == updated.id) {
                *row = updated.clone();
            }
        }
        Ok(updated)
    }
}
