use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShipdeskError;

/// Shipment channel. Each one has its own listing and dashboard context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "B2B")]
    B2b,
    #[serde(rename = "B2C")]
    B2c,
    #[serde(rename = "INTERNATIONAL")]
    International,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [Self::B2b, Self::B2c, Self::International];

    /// Wire name, as stored in shipment records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::B2b => "B2B",
            Self::B2c => "B2C",
            Self::International => "INTERNATIONAL",
        }
    }

    /// Lower-case id used in `activeServices` and service permission resources.
    pub fn service_id(&self) -> &'static str {
        match self {
            Self::B2b => "b2b",
            Self::B2c => "b2c",
            Self::International => "international",
        }
    }

    pub fn from_service_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.service_id() == id)
    }

    /// Tracking prefix used by the demo data generator.
    pub fn tracking_prefix(&self) -> &'static str {
        match self {
            Self::B2b => "B2B",
            Self::B2c => "B2C",
            Self::International => "INT",
        }
    }

    /// Resource that must be updatable to activate this service.
    pub fn permission_resource(&self) -> String {
        format!("service:{}", self.service_id())
    }

    pub fn api_path(&self) -> String {
        format!("/api/shipments/{}", self.service_id())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::B2b => "B2B Service",
            Self::B2c => "B2C Service",
            Self::International => "International Service",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ShipdeskError;

    /// Accepts either the wire name (`B2B`) or the service id (`b2b`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.service_id() == s)
            .ok_or_else(|| ShipdeskError::InvalidArgument(format!("unknown service type: {s}")))
    }
}

/// The verb half of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ShipdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(ShipdeskError::InvalidArgument(format!(
                "unknown action: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_wire_format() {
        let json = serde_json::to_string(&ServiceType::International).unwrap();
        assert_eq!(json, "\"INTERNATIONAL\"");
        let parsed: ServiceType = serde_json::from_str("\"B2C\"").unwrap();
        assert_eq!(parsed, ServiceType::B2c);
    }

    #[test]
    fn test_service_type_from_str_accepts_both_spellings() {
        assert_eq!("B2B".parse::<ServiceType>().unwrap(), ServiceType::B2b);
        assert_eq!(
            "international".parse::<ServiceType>().unwrap(),
            ServiceType::International
        );
        assert!("freight".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_permission_resource() {
        assert_eq!(ServiceType::B2b.permission_resource(), "service:b2b");
        assert_eq!(
            ServiceType::from_service_id("international"),
            Some(ServiceType::International)
        );
    }

    #[test]
    fn test_action_round_trip_through_str() {
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert_eq!(serde_json::to_string(&Action::Update).unwrap(), "\"update\"");
    }
}
