//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the dashboard starts with zero
//! configuration against a local SQLite file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use shipdesk_shared::constants::{DEFAULT_PAGE_SIZE, NEAR_END_DEBOUNCE_MS, NEAR_END_THRESHOLD_PX};
use shipdesk_store::{Database, MemoryStore, StoreBackend, StoreError};

use crate::shipments::TrackingPrefix;

/// Which key/value backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Directory holding `shipdesk.db`.
    /// Env: `SHIPDESK_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Env: `SHIPDESK_STORE` (`sqlite` or `memory`)
    pub store: StoreKind,

    /// Listing page size.
    /// Env: `SHIPDESK_PAGE_SIZE`
    /// Default: `10`
    pub page_size: u32,

    /// Seed demo users and shipments when the store has none.
    /// Env: `SHIPDESK_SEED_DEMO_DATA` (true/false)
    pub seed_demo_data: bool,

    /// Overwrite existing users and shipments with fresh demo data.
    /// Env: `SHIPDESK_RESET_ON_START` (true/false)
    pub reset_on_start: bool,

    /// Emulate API round-trip delays in the shipment repository.
    /// Env: `SHIPDESK_SIMULATE_LATENCY` (true/false)
    pub simulate_latency: bool,

    /// Env: `SHIPDESK_TRACKING_PREFIX` (a literal prefix or `per-service`)
    /// Default: `DEL`
    pub tracking_prefix: TrackingPrefix,

    /// Env: `SHIPDESK_SCROLL_DEBOUNCE_MS`
    pub scroll_debounce: Duration,

    /// Env: `SHIPDESK_NEAR_END_PX`
    pub near_end_px: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store: StoreKind::Sqlite,
            page_size: DEFAULT_PAGE_SIZE,
            seed_demo_data: true,
            reset_on_start: false,
            simulate_latency: false,
            tracking_prefix: TrackingPrefix::default(),
            scroll_debounce: Duration::from_millis(NEAR_END_DEBOUNCE_MS),
            near_end_px: NEAR_END_THRESHOLD_PX,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("SHIPDESK_DATA_DIR").filter(|d| !d.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(kind) = lookup("SHIPDESK_STORE") {
            match kind.to_ascii_lowercase().as_str() {
                "sqlite" => config.store = StoreKind::Sqlite,
                "memory" => config.store = StoreKind::Memory,
                _ => tracing::warn!(value = %kind, "Invalid SHIPDESK_STORE, using sqlite"),
            }
        }

        if let Some(val) = lookup("SHIPDESK_PAGE_SIZE") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.page_size = n,
                _ => tracing::warn!(value = %val, "Invalid SHIPDESK_PAGE_SIZE, using default"),
            }
        }

        flag_var(&lookup, "SHIPDESK_SEED_DEMO_DATA", &mut config.seed_demo_data);
        flag_var(&lookup, "SHIPDESK_RESET_ON_START", &mut config.reset_on_start);
        flag_var(&lookup, "SHIPDESK_SIMULATE_LATENCY", &mut config.simulate_latency);

        if let Some(prefix) = lookup("SHIPDESK_TRACKING_PREFIX").and_then(|v| TrackingPrefix::parse(&v))
        {
            config.tracking_prefix = prefix;
        }

        if let Some(val) = lookup("SHIPDESK_SCROLL_DEBOUNCE_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.scroll_debounce = Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid SHIPDESK_SCROLL_DEBOUNCE_MS, using default")
                }
            }
        }

        if let Some(val) = lookup("SHIPDESK_NEAR_END_PX") {
            match val.parse::<f64>() {
                Ok(px) if px.is_finite() && px >= 0.0 => config.near_end_px = px,
                _ => tracing::warn!(value = %val, "Invalid SHIPDESK_NEAR_END_PX, using default"),
            }
        }

        config
    }

    /// Open the configured backend.
    pub fn open_store(&self) -> Result<StoreBackend, StoreError> {
        let backend = match self.store {
            StoreKind::Memory => StoreBackend::Memory(MemoryStore::new()),
            StoreKind::Sqlite => {
                let db = match &self.data_dir {
                    Some(dir) => Database::open_in(dir)?,
                    None => Database::open_default()?,
                };
                StoreBackend::Sqlite(Arc::new(db))
            }
        };
        Ok(backend)
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Overwrite `target` when `key` holds a recognised boolean; warn otherwise.
fn flag_var(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut bool) {
    let Some(val) = lookup(key) else {
        return;
    };
    match parse_flag(&val) {
        Some(on) => *target = on,
        None => tracing::warn!(key, value = %val, "Invalid boolean, using default"),
    }
}
