//! Canonical shipment statuses and their presentation.
//!
//! Status is an open string: any value is accepted on update. These helpers
//! only describe the eight values the dashboard offers.

pub const CREATED: &str = "CREATED";
pub const PROCESSING: &str = "PROCESSING";
pub const IN_TRANSIT: &str = "IN_TRANSIT";
pub const OUT_FOR_DELIVERY: &str = "OUT_FOR_DELIVERY";
pub const PICKED_UP: &str = "PICKED_UP";
pub const DELIVERED: &str = "DELIVERED";
pub const FAILED_DELIVERY: &str = "FAILED_DELIVERY";
pub const CANCELED: &str = "CANCELED";

/// The statuses offered by the status editor, in display order.
pub const CANONICAL: [&str; 8] = [
    CREATED,
    PROCESSING,
    IN_TRANSIT,
    OUT_FOR_DELIVERY,
    PICKED_UP,
    DELIVERED,
    FAILED_DELIVERY,
    CANCELED,
];

pub fn is_canonical(status: &str) -> bool {
    CANONICAL.contains(&status)
}

/// Human label, falling back to the raw status for unknown values.
pub fn display_label(status: &str) -> &str {
    match status {
        CREATED => "Created",
        PROCESSING => "Processing",
        IN_TRANSIT => "In Transit",
        OUT_FOR_DELIVERY => "Out For Delivery",
        PICKED_UP => "Picked Up",
        DELIVERED => "Delivered",
        FAILED_DELIVERY => "Failed Delivery",
        CANCELED => "Canceled",
        other => other,
    }
}

/// `IN_TRANSIT` -> `in-transit`
pub fn css_class(status: &str) -> String {
    status.to_lowercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(display_label(OUT_FOR_DELIVERY), "Out For Delivery");
        assert_eq!(display_label("LOST_AT_SEA"), "LOST_AT_SEA");
    }

    #[test]
    fn test_css_class() {
        assert_eq!(css_class(FAILED_DELIVERY), "failed-delivery");
        assert_eq!(css_class(DELIVERED), "delivered");
    }

    #[test]
    fn test_canonical_set() {
        assert_eq!(CANONICAL.len(), 8);
        assert!(is_canonical(PICKED_UP));
        assert!(!is_canonical("delivered"));
    }
}
