//! # shipdesk
//!
//! Command-line front end for the shipment dashboard core.
//!
//! Every invocation opens the configured store (SQLite by default), seeds the
//! demo data if it is missing and restores the persisted session, so
//! `shipdesk login admin` followed by `shipdesk list b2b` behaves like a
//! browser tab that survived a reload.

mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;

use shipdesk_client::config::StoreKind;
use shipdesk_client::guard::RouteRequirement;
use shipdesk_client::scroll::{spawn_near_end_driver, ScrollSignal};
use shipdesk_client::{AppState, ClientConfig, ListingPhase, ListingSnapshot, TrackingPrefix};
use shipdesk_shared::constants::{APP_NAME, RESOURCE_USER};
use shipdesk_shared::{Action, NewShipment, NewUser, PageRequest, Permission, ServiceType};
use shipdesk_store::seed::{seed_demo_data, SeedMode};
use shipdesk_store::StoreBackend;

#[derive(Debug, Parser)]
#[command(name = "shipdesk", version, about = "Shipment dashboard")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct StoreArgs {
    /// Directory holding shipdesk.db (overrides SHIPDESK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    memory: bool,

    /// Emulate API round-trip delays
    #[arg(long, global = true)]
    simulate_latency: bool,

    /// Tracking prefix for new shipments, or `per-service`
    #[arg(long, global = true)]
    tracking_prefix: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the demo users and shipments
    Seed {
        /// Overwrite existing data
        #[arg(long)]
        reset: bool,
    },
    /// Sign in as an existing user
    Login {
        username: String,
        #[arg(long, default_value = "demo")]
        password: String,
    },
    Logout,
    /// Show the signed-in user and their permissions
    Whoami,
    /// Print one page of a service type's shipments
    List {
        service: ServiceType,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Scroll through a service type until every page is loaded
    Browse { service: ServiceType },
    /// Show one shipment as JSON
    Show { id: String },
    /// Create a shipment from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Change a shipment's status
    SetStatus { id: String, status: String },
    /// List every user
    Users,
    CreateUser(CreateUserArgs),
    /// Replace a user's permissions with `action:resource[:name]` grants
    SetPermissions {
        user_id: String,
        #[arg(long = "grant")]
        grants: Vec<String>,
    },
    /// Show or change which service types are active
    Services {
        #[arg(long, conflicts_with_all = ["disable", "toggle"])]
        enable: Option<ServiceType>,
        #[arg(long, conflicts_with = "toggle")]
        disable: Option<ServiceType>,
        #[arg(long)]
        toggle: Option<ServiceType>,
    },
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    username: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shipdesk_client::init_tracing();

    let cli = Cli::parse();
    let config = build_config(&cli.store);
    info!(store = ?config.store, data_dir = ?config.data_dir, "{} starting", APP_NAME);

    let store = config.open_store().context("failed to open store")?;
    let state = AppState::new(store, config)?;

    run(&state, cli.command).await
}

fn build_config(args: &StoreArgs) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if args.memory {
        config.store = StoreKind::Memory;
    }
    if args.simulate_latency {
        config.simulate_latency = true;
    }
    if let Some(prefix) = args.tracking_prefix.as_deref().and_then(TrackingPrefix::parse) {
        config.tracking_prefix = prefix;
    }
    config
}

async fn run(state: &AppState<StoreBackend>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Seed { reset } => {
            let mode = if reset { SeedMode::Reset } else { SeedMode::IfMissing };
            let report = seed_demo_data(&state.store, mode)?;
            println!(
                "seeded {} users, {} shipments",
                report.users_written, report.shipments_written
            );
        }

        Command::Login { username, password } => {
            let session = state.auth.login(&username, &password).await?;
            println!(
                "signed in as {}, continue at {}",
                session.user.username,
                state.route_guard().landing_path()
            );
        }

        Command::Logout => {
            state.auth.logout().await?;
            println!("signed out");
        }

        Command::Whoami => match state.auth.current_user() {
            Some(user) => output::print_user(&user),
            None => println!("not signed in"),
        },

        Command::List {
            service,
            page,
            limit,
        } => {
            require_route(state, &listing_path(service), None)?;
            let limit = limit.unwrap_or(state.config().page_size);
            let page = state
                .shipments
                .get_shipments_by_service_type_paginated(service, PageRequest::new(page, limit))
                .await?;
            output::print_shipments(&page.data);
            println!(
                "{} of {} shipments{}",
                page.data.len(),
                page.total_count,
                if page.has_more { ", more available" } else { "" }
            );
        }

        Command::Browse { service } => {
            require_route(state, &listing_path(service), None)?;
            browse(state, service).await?;
        }

        Command::Show { id } => {
            let shipment = state
                .shipments
                .get_shipment_by_id(&id)
                .await?
                .with_context(|| format!("no shipment with id {id}"))?;
            require_route(state, &listing_path(shipment.service_type), None)?;
            output::print_json(&shipment)?;
        }

        Command::Create { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let data: NewShipment =
                serde_json::from_str(&raw).context("invalid shipment JSON")?;
            require_route(state, &listing_path(data.service_type), None)?;
            let shipment = state.shipments.create_shipment(data).await?;
            println!("{} {}", shipment.id, shipment.tracking_number);
        }

        Command::SetStatus { id, status } => {
            let shipment = state
                .shipments
                .get_shipment_by_id(&id)
                .await?
                .with_context(|| format!("no shipment with id {id}"))?;

            let listing = state.listing(shipment.service_type);
            listing.open(shipment.service_type).await;
            let updated = listing.update_status(&id, &status).await?;
            println!(
                "{} is now {}",
                updated.tracking_number,
                shipdesk_shared::status::display_label(&updated.status)
            );
        }

        Command::Users => {
            let requirement = RouteRequirement::new(Action::Read, RESOURCE_USER);
            require_route(state, "/users", Some(&requirement))?;
            for user in state.auth.get_all_users().await? {
                output::print_user(&user);
            }
        }

        Command::CreateUser(args) => {
            let user = state
                .auth
                .create_user(NewUser {
                    username: Some(args.username),
                    email: args.email,
                    first_name: args.first_name,
                    last_name: args.last_name,
                })
                .await?;
            println!("created user {} ({})", user.username, user.id);
        }

        Command::SetPermissions { user_id, grants } => {
            let permissions = grants
                .iter()
                .enumerate()
                .map(|(i, grant)| parse_grant(i, grant))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let user = state
                .auth
                .update_user_permissions(&user_id, permissions)
                .await?;
            output::print_user(&user);
        }

        Command::Services {
            enable,
            disable,
            toggle,
        } => {
            let session = state.session();
            if let Some(service) = enable {
                state.settings.set_active(&session, service, true)?;
            } else if let Some(service) = disable {
                state.settings.set_active(&session, service, false)?;
            } else if let Some(service) = toggle {
                state.settings.toggle(&session, service)?;
            }
            output::print_services(&state.settings.overview(&session));
            if state.settings.is_new_user(&session) {
                println!("no service is active yet, enable one with --enable <service>");
            }
        }
    }

    Ok(())
}

fn listing_path(service: ServiceType) -> String {
    format!("/shipments/{}", service.service_id())
}

fn require_route(
    state: &AppState<StoreBackend>,
    path: &str,
    requirement: Option<&RouteRequirement>,
) -> anyhow::Result<()> {
    let decision = state.route_guard().check(path, requirement);
    match decision.redirect_path() {
        None => Ok(()),
        Some(target) => bail!("{path} is not available ({decision:?}, see {target})"),
    }
}

async fn browse(state: &AppState<StoreBackend>, service: ServiceType) -> anyhow::Result<()> {
    let listing = state.listing(service);
    listing.open(service).await;

    let (tx, rx) = mpsc::channel(16);
    let driver = spawn_near_end_driver(listing.clone(), rx, state.near_end_trigger());
    let pause = state.config().scroll_debounce + Duration::from_millis(10);

    let mut shown = 0;
    loop {
        let snapshot = listing.snapshot();
        if snapshot.shipments.len() > shown {
            output::print_shipments(&snapshot.shipments[shown..]);
            shown = snapshot.shipments.len();
        }
        if browse_finished(&snapshot)? {
            break;
        }
        if !listing.is_loading() {
            tx.send(ScrollSignal::SentinelVisible).await?;
        }
        tokio::time::sleep(pause).await;
    }

    drop(tx);
    driver.await?;
    println!("{shown} shipments, {} pages", listing.snapshot().current_page);
    Ok(())
}

/// Whether browsing is done. A failed page ends the run instead of being
/// requested again on the next pass.
fn browse_finished(snapshot: &ListingSnapshot) -> anyhow::Result<bool> {
    let service = snapshot.service_type;
    if let Some(page) = snapshot.failed_page {
        bail!(
            "failed to load page {page} of {service} shipments, {} shown so far",
            snapshot.shipments.len()
        );
    }
    match snapshot.phase {
        ListingPhase::Loaded { has_more } => Ok(!has_more),
        ListingPhase::Idle => bail!("failed to load {service} shipments"),
        ListingPhase::LoadingFirstPage | ListingPhase::LoadingMore => Ok(false),
    }
}

fn parse_grant(index: usize, grant: &str) -> anyhow::Result<Permission> {
    let mut parts = grant.splitn(3, ':');
    let action: Action = parts
        .next()
        .unwrap_or_default()
        .parse()
        .with_context(|| format!("invalid action in grant {grant:?}"))?;
    let resource = parts
        .next()
        .filter(|r| !r.is_empty())
        .with_context(|| format!("missing resource in grant {grant:?}"))?;

    // `service:b2b` itself contains a colon
    let (resource, name) = match (resource, parts.next()) {
        ("service", Some(rest)) => match rest.split_once(':') {
            Some((id, name)) => (format!("service:{id}"), Some(name.to_string())),
            None => (format!("service:{rest}"), None),
        },
        (resource, name) => (resource.to_string(), name.map(str::to_string)),
    };

    let name = name.unwrap_or_else(|| format!("{action} {resource}"));
    Ok(Permission::new(format!("cli-{}", index + 1), name, resource, action))
}
