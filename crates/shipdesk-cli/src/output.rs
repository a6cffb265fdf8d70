//! Plain-text rendering for terminal output.

use serde::Serialize;

use shipdesk_client::settings::ServiceStatus;
use shipdesk_shared::status::display_label;
use shipdesk_shared::{Shipment, User};

pub fn print_shipments(shipments: &[Shipment]) {
    for s in shipments {
        println!(
            "{:<12} {:<18} {:<14} -> {:<14} {}",
            s.tracking_number,
            display_label(&s.status),
            s.origin.city,
            s.destination.city,
            s.created_at.format("%Y-%m-%d"),
        );
    }
}

pub fn print_user(user: &User) {
    let name = match (&user.first_name, &user.last_name) {
        (Some(first), Some(last)) => format!(" ({first} {last})"),
        (Some(first), None) => format!(" ({first})"),
        _ => String::new(),
    };
    let role = user.roles.first().map(|r| r.name.as_str()).unwrap_or("-");
    println!("#{} {}{} <{}> [{}]", user.id, user.username, name, user.email, role);
    for p in user.primary_permissions() {
        println!("    {:<8} {:<24} {}", p.action.as_str(), p.resource, p.name);
    }
}

pub fn print_services(services: &[ServiceStatus]) {
    for s in services {
        println!(
            "{:<14} {:<8} {}",
            s.service_type.display_name(),
            if s.active { "active" } else { "inactive" },
            if s.manageable { "" } else { "(read-only)" },
        );
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
