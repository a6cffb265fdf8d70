//! Demo data: the four built-in users and ninety generated shipments.

use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use shipdesk_shared::constants::{
    KEY_SHIPMENTS, KEY_USERS, SEED_B2B_SHIPMENTS, SEED_B2C_SHIPMENTS,
    SEED_INTERNATIONAL_SHIPMENTS,
};
use shipdesk_shared::status;
use shipdesk_shared::tracking::generate_tracking_number;
use shipdesk_shared::{
    Action, Address, Dimensions, Item, Permission, Role, ServiceType, Shipment, User,
};

use crate::error::Result;
use crate::kv::KeyValueStore;

/// Statuses the generator draws from.
const SEED_STATUSES: [&str; 6] = [
    status::CREATED,
    status::PICKED_UP,
    status::IN_TRANSIT,
    status::OUT_FOR_DELIVERY,
    status::DELIVERED,
    status::FAILED_DELIVERY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Only write collections that are not stored yet.
    IfMissing,
    /// Overwrite both collections with fresh demo data.
    Reset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_written: usize,
    pub shipments_written: usize,
}

/// Write the demo users and shipments according to `mode`.
pub fn seed_demo_data<K: KeyValueStore>(store: &K, mode: SeedMode) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if mode == SeedMode::Reset || store.get(KEY_USERS)?.is_none() {
        let users = demo_users();
        store.set_json(KEY_USERS, &users)?;
        report.users_written = users.len();
    }

    if mode == SeedMode::Reset || store.get(KEY_SHIPMENTS)?.is_none() {
        let shipments = generate_mock_shipments(&mut rand::thread_rng());
        store.set_json(KEY_SHIPMENTS, &shipments)?;
        report.shipments_written = shipments.len();
    }

    info!(
        ?mode,
        users = report.users_written,
        shipments = report.shipments_written,
        "demo data seeded"
    );
    Ok(report)
}

fn perm(id: &str, name: &str, resource: &str, action: Action) -> Permission {
    Permission::new(id, name, resource, action)
}

fn demo_user(id: &str, username: &str, role: &str, permissions: Vec<Permission>) -> User {
    User {
        id: id.into(),
        username: username.into(),
        email: format!("{username}@example.com"),
        first_name: None,
        last_name: None,
        roles: vec![Role {
            id: id.into(),
            name: role.into(),
            permissions,
        }],
    }
}

/// admin, owner, customer and newuser with their fixed permission sets.
pub fn demo_users() -> Vec<User> {
    use Action::{Create, Delete, Read, Update};

    vec![
        demo_user(
            "1",
            "admin",
            "ADMIN",
            vec![
                perm("1", "Create B2B Shipment", "shipment", Create),
                perm("2", "View B2B Shipment", "shipment", Read),
                perm("3", "Update B2B Shipment", "shipment", Update),
                perm("4", "Delete B2B Shipment", "shipment", Delete),
                perm("20", "Manage B2B Service", "service:b2b", Update),
                perm("21", "Manage B2C Service", "service:b2c", Update),
                perm("22", "Manage International Service", "service:international", Update),
                perm("23", "Manage Users", "user", Update),
                perm("24", "Read Users", "user", Read),
            ],
        ),
        demo_user(
            "2",
            "owner",
            "OWNER",
            vec![
                perm("5", "Create B2C Shipment", "shipment", Create),
                perm("6", "View B2C Shipment", "shipment", Read),
                perm("7", "Update B2C Shipment", "shipment", Update),
                perm("8", "Delete B2C Shipment", "shipment", Delete),
                perm("9", "Create International Shipment", "shipment", Create),
                perm("10", "View International Shipment", "shipment", Read),
                perm("11", "Manage B2C Service", "service:b2c", Update),
                perm("20", "Manage B2B Service", "service:b2b", Update),
                perm("12", "Manage International Service", "service:international", Update),
                perm("13", "Manage Users", "user", Update),
                perm("15", "Read Users", "user", Read),
            ],
        ),
        demo_user(
            "3",
            "customer",
            "CUSTOMER",
            vec![perm("14", "View Any Shipment", "shipment", Read)],
        ),
        demo_user(
            "4",
            "newuser",
            "USER",
            vec![perm("16", "View Any Shipment", "shipment", Read)],
        ),
    ]
}

fn address(street: &str, city: &str, state: &str, zip: &str, country: &str) -> Address {
    Address {
        street: street.into(),
        city: city.into(),
        state: state.into(),
        zip_code: zip.into(),
        country: country.into(),
    }
}

fn origins() -> Vec<Address> {
    vec![
        address("123 Industrial Blvd", "Delhi", "Delhi", "110001", "India"),
        address("456 Business Park", "Mumbai", "Maharashtra", "400001", "India"),
        address("789 Tech Center", "Bangalore", "Karnataka", "560001", "India"),
        address("101 Logistics Hub", "Ahmedabad", "Gujarat", "380001", "India"),
        address("202 Shipping Center", "Jaipur", "Rajasthan", "302001", "India"),
    ]
}

fn domestic_destinations() -> Vec<Address> {
    vec![
        address("101 Main St", "Chennai", "Tamil Nadu", "600001", "India"),
        address("202 Market Rd", "Kolkata", "West Bengal", "700001", "India"),
        address("303 Retail Ave", "Hyderabad", "Telangana", "500001", "India"),
        address("404 Commercial Blvd", "Pune", "Maharashtra", "411001", "India"),
        address("505 Shopping Lane", "Lucknow", "Uttar Pradesh", "226001", "India"),
    ]
}

fn international_destinations() -> Vec<Address> {
    vec![
        address("111 Broadway", "New York", "NY", "10001", "USA"),
        address("222 Oxford St", "London", "England", "W1D 1BS", "UK"),
        address("333 Orchard Rd", "Singapore", "Singapore", "238867", "Singapore"),
        address("444 King George St", "Sydney", "NSW", "2000", "Australia"),
        address("555 Ginza", "Tokyo", "Tokyo", "104-0061", "Japan"),
    ]
}

fn generate_items<R: Rng + ?Sized>(rng: &mut R) -> Vec<Item> {
    let count = rng.gen_range(1..=5);
    (0..count)
        .map(|i| Item {
            id: Uuid::new_v4().to_string(),
            name: format!("Item {}", i + 1),
            weight: rng.gen_range(0.1..20.1),
            dimensions: Dimensions {
                length: rng.gen_range(5.0..55.0),
                width: rng.gen_range(5.0..45.0),
                height: rng.gen_range(5.0..35.0),
            },
            value: rng.gen_range(10.0..1010.0),
        })
        .collect()
}

fn generate_for<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    service_type: ServiceType,
    origins: &[Address],
    destinations: &[Address],
) -> Vec<Shipment> {
    let now = Utc::now();
    (0..count)
        .map(|_| {
            let age_days = rng.gen_range(0..30);
            Shipment {
                id: Uuid::new_v4().to_string(),
                tracking_number: generate_tracking_number(service_type.tracking_prefix(), rng),
                service_type,
                status: pick(rng, &SEED_STATUSES).to_string(),
                origin: pick(rng, origins).clone(),
                destination: pick(rng, destinations).clone(),
                items: generate_items(rng),
                created_at: now - Duration::days(age_days),
                updated_at: now,
            }
        })
        .collect()
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, options: &'a [T]) -> &'a T {
    &options[rng.gen_range(0..options.len())]
}

/// 30 B2B, 35 B2C and 25 international shipments, in that order.
pub fn generate_mock_shipments<R: Rng + ?Sized>(rng: &mut R) -> Vec<Shipment> {
    let origins = origins();
    let domestic = domestic_destinations();
    let international = international_destinations();

    let mut shipments = generate_for(rng, SEED_B2B_SHIPMENTS, ServiceType::B2b, &origins, &domestic);
    shipments.extend(generate_for(
        rng,
        SEED_B2C_SHIPMENTS,
        ServiceType::B2c,
        &origins,
        &domestic,
    ));
    shipments.extend(generate_for(
        rng,
        SEED_INTERNATIONAL_SHIPMENTS,
        ServiceType::International,
        &origins,
        &international,
    ));
    shipments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shipdesk_shared::permission::user_has_permission;

    #[test]
    fn test_mock_shipment_counts_and_prefixes() {
        let shipments = generate_mock_shipments(&mut StdRng::seed_from_u64(42));
        assert_eq!(shipments.len(), 90);

        for (service_type, expected, prefix) in [
            (ServiceType::B2b, 30, "B2B"),
            (ServiceType::B2c, 35, "B2C"),
            (ServiceType::International, 25, "INT"),
        ] {
            let of_type: Vec<_> = shipments
                .iter()
                .filter(|s| s.service_type == service_type)
                .collect();
            assert_eq!(of_type.len(), expected);
            assert!(of_type.iter().all(|s| s.tracking_number.starts_with(prefix)));
        }

        assert!(shipments.iter().all(|s| (1..=5).contains(&s.items.len())));
        assert!(shipments.iter().all(|s| status::is_canonical(&s.status)));
        assert!(shipments
            .iter()
            .filter(|s| s.service_type == ServiceType::International)
            .all(|s| s.destination.country != "India"));
    }

    #[test]
    fn test_demo_users_permissions() {
        let users = demo_users();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["admin", "owner", "customer", "newuser"]);

        let admin = &users[0];
        assert!(user_has_permission(admin, Action::Update, "user"));
        assert!(user_has_permission(admin, Action::Update, "service:international"));

        let customer = &users[2];
        assert!(user_has_permission(customer, Action::Read, "shipment"));
        assert!(!user_has_permission(customer, Action::Update, "shipment"));
    }

    #[test]
    fn test_seed_if_missing_keeps_existing() {
        let store = MemoryStore::new();
        let first = seed_demo_data(&store, SeedMode::IfMissing).unwrap();
        assert_eq!(first.users_written, 4);
        assert_eq!(first.shipments_written, 90);

        let second = seed_demo_data(&store, SeedMode::IfMissing).unwrap();
        assert_eq!(second, SeedReport::default());

        let reset = seed_demo_data(&store, SeedMode::Reset).unwrap();
        assert_eq!(reset.shipments_written, 90);
    }
}
