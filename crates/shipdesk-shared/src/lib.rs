//! # shipdesk-shared
//!
//! Domain types shared by every Shipdesk crate: shipments, users and their
//! role/permission sets, the permission evaluator, pagination, repository
//! ports and the common error taxonomy.

pub mod constants;
pub mod error;
pub mod models;
pub mod pagination;
pub mod permission;
pub mod repository;
pub mod status;
pub mod tracking;
pub mod types;

pub use error::{ShipdeskError, ShipdeskResult};
pub use models::*;
pub use pagination::{Page, PageRequest};
pub use types::{Action, ServiceType};
