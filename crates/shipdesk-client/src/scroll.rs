//! Near-end detection for infinite scroll.
//!
//! Two independent signals can ask for the next page: the end-of-list
//! sentinel becoming visible, and a scroll position within the threshold of
//! the document end. Both feed one debounced trigger.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

use shipdesk_shared::repository::ShipmentRepository;

use crate::listing::{ListingController, LoadOutcome};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn distance_to_end(&self) -> f64 {
        self.document_height - (self.scroll_y + self.viewport_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollSignal {
    SentinelVisible,
    Scrolled(ScrollMetrics),
}

#[derive(Debug, Clone)]
pub struct NearEndTrigger {
    threshold_px: f64,
    debounce: Duration,
    last_fired: Option<Instant>,
}

impl NearEndTrigger {
    pub fn new(threshold_px: f64, debounce: Duration) -> Self {
        Self {
            threshold_px,
            debounce,
            last_fired: None,
        }
    }

    pub fn is_near_end(&self, signal: &ScrollSignal) -> bool {
        match signal {
            ScrollSignal::SentinelVisible => true,
            ScrollSignal::Scrolled(metrics) => metrics.distance_to_end() < self.threshold_px,
        }
    }

    /// Returns true when `signal` should request the next page.
    pub fn observe(&mut self, signal: &ScrollSignal, now: Instant) -> bool {
        if !self.is_near_end(signal) {
            return false;
        }
        if let Some(last) = self.last_fired {
            if now.saturating_duration_since(last) < self.debounce {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }
}

/// Feed scroll signals into `controller` until the sender side closes.
///
/// Loads run on their own tasks so a slow page never blocks signal
/// intake; the controller's in-flight guard drops the overlapping ones.
pub fn spawn_near_end_driver<R>(
    controller: Arc<ListingController<R>>,
    mut signals: mpsc::Receiver<ScrollSignal>,
    mut trigger: NearEndTrigger,
) -> JoinHandle<()>
where
    R: ShipmentRepository + 'static,
{
    tokio::spawn(async move {
        while let Some(signal) = signals.recv().await {
            if !controller.has_more() {
                trace!("listing exhausted, ignoring scroll");
                continue;
            }
            if !trigger.observe(&signal, Instant::now()) {
                continue;
            }

            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                match controller.load_more().await {
                    LoadOutcome::Loaded { page, .. } => debug!(page, "near end, loaded next page"),
                    outcome => trace!(?outcome, "near end, nothing loaded"),
                }
            });
        }
        debug!("scroll driver stopped");
    })
}
