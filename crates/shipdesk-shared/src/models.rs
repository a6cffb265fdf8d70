//! Domain records persisted by the store and handed to the UI layer.
//!
//! Field names serialize in camelCase so persisted JSON matches the layout
//! the dashboard has always stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Action, ServiceType};

// ---------------------------------------------------------------------------
// Shipment
// ---------------------------------------------------------------------------

/// Plain postal address. Not validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// A line item inside a shipment. Zero or negative values are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    /// `<prefix><7 digits>`; not guaranteed unique.
    pub tracking_number: String,
    pub service_type: ServiceType,
    /// Open vocabulary, see [`crate::status`] for the canonical values.
    pub status: String,
    pub origin: Address,
    pub destination: Address,
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item payload of a shipment creation request (no id yet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub value: f64,
}

/// Shipment creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub service_type: ServiceType,
    pub origin: Address,
    pub destination: Address,
    #[serde(default)]
    pub items: Vec<NewItem>,
}

// ---------------------------------------------------------------------------
// Users, roles, permissions
// ---------------------------------------------------------------------------

/// Grants exactly one `(action, resource)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub resource: String,
    pub action: Action,
}

impl Permission {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource: resource.into(),
            action,
        }
    }

    /// Exact match on both halves. No wildcards, no hierarchy.
    pub fn matches(&self, action: Action, resource: &str) -> bool {
        self.action == action && self.resource == resource
    }
}

/// A named permission set, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub roles: Vec<Role>,
}

impl User {
    /// Permissions of the primary role, the only role user administration edits.
    pub fn primary_permissions(&self) -> &[Permission] {
        self.roles
            .first()
            .map(|r| r.permissions.as_slice())
            .unwrap_or_default()
    }
}

/// User creation request. Every field is optional on the wire; a missing
/// username is rejected by the auth service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl NewUser {
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}
