/// Application name
pub const APP_NAME: &str = "Shipdesk";

/// Persisted key holding the JSON-serialized session user
pub const KEY_CURRENT_USER: &str = "currentUser";

/// Persisted key holding the opaque session token
pub const KEY_AUTH_TOKEN: &str = "authToken";

/// Persisted key holding the JSON array of activated service ids
pub const KEY_ACTIVE_SERVICES: &str = "activeServices";

/// Persisted key holding every user record
pub const KEY_USERS: &str = "logistics_users";

/// Persisted key holding every shipment record
pub const KEY_SHIPMENTS: &str = "logistics_shipments_api";

/// Status assigned to every new shipment
pub const INITIAL_STATUS: &str = "CREATED";

/// Tracking prefix used by the live shipment service
pub const LIVE_TRACKING_PREFIX: &str = "DEL";

/// Number of random digits after the tracking prefix
pub const TRACKING_DIGITS: usize = 7;

/// Default listing page size
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Distance from the document end (px) that counts as "near the end"
pub const NEAR_END_THRESHOLD_PX: f64 = 300.0;

/// Debounce window for the near-end trigger (ms)
pub const NEAR_END_DEBOUNCE_MS: u64 = 150;

/// Resource name guarding shipments
pub const RESOURCE_SHIPMENT: &str = "shipment";

/// Resource name guarding user administration
pub const RESOURCE_USER: &str = "user";

/// Role given to users created through user administration
pub const DEFAULT_ROLE_NAME: &str = "USER";

/// Name of the single permission granted to newly created users
pub const DEFAULT_PERMISSION_NAME: &str = "View Any Shipment";

/// Demo seed sizes per service type
pub const SEED_B2B_SHIPMENTS: usize = 30;
pub const SEED_B2C_SHIPMENTS: usize = 35;
pub const SEED_INTERNATIONAL_SHIPMENTS: usize = 25;
