//! Shipment dashboard client core: session, services, listing and routing.

pub mod auth;
pub mod config;
pub mod guard;
pub mod listing;
pub mod scroll;
pub mod session;
pub mod settings;
pub mod shipments;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use auth::AuthService;
pub use config::ClientConfig;
pub use listing::{ListingController, ListingPhase, ListingSnapshot, LoadOutcome};
pub use session::{Session, SessionHandle};
pub use shipments::{ShipmentService, TrackingPrefix};
pub use state::AppState;

const DEFAULT_LOG_DIRECTIVES: &str = "shipdesk_client=info,shipdesk_store=info,warn";

/// Install the global `tracing` subscriber on stderr, leaving stdout for
/// command output. `RUST_LOG` overrides the default directives.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
