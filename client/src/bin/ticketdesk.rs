//! Ticketdesk command-line client.
//!
//! Drives the same client the front end uses against a running backend:
//!
//! ```bash
//! ticketdesk login user@example.com secret
//! ticketdesk events jazz
//! ticketdesk tickets
//! ticketdesk calendar
//! ticketdesk route /account/tickets
//! ticketdesk places "Тверская 1"
//! ticketdesk logout
//! ```
//!
//! Configuration comes from the environment (and a `.env` file, if present);
//! see `ClientConfig::from_env`. The session survives between invocations in
//! `TICKETDESK_STORAGE_PATH`.

use anyhow::{Context, bail};
use ticketdesk_client::metrics::describe_metrics;
use ticketdesk_client::{AppContext, ClientConfig, Navigation, RequestOptions};
use ticketdesk_core::format::{format_currency, format_date_time};
use ticketdesk_core::types::{EventFilterRequest, EventSearchRequest, LoginRequest, PaginationRequest};
use ticketdesk_maps::SearchOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: ticketdesk <login EMAIL PASSWORD | logout | whoami | events [TITLE] | tickets | calendar | route PATH | places QUERY>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ticketdesk_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    describe_metrics();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let app = AppContext::from_config(ClientConfig::from_env()).context("initializing client")?;
    let result = run(&app, command, rest).await;

    for notification in app.notifications().notifications() {
        eprintln!("[{}] {}", notification.kind.as_str(), notification.message);
    }
    app.shutdown();
    result
}

async fn run(app: &AppContext, command: &str, args: &[String]) -> anyhow::Result<()> {
    match (command, args) {
        ("login", [email, password]) => {
            let response = app
                .auth
                .login(&LoginRequest::new(email, password), RequestOptions::new())
                .await?;
            if response.is_some() {
                println!("Signed in as {}", app.auth.role().map_or("unknown", |role| role.as_str()));
            }
        },
        ("logout", []) => {
            app.auth.logout()?;
            println!("Signed out");
        },
        ("whoami", []) => {
            if !app.auth.is_authenticated() {
                println!("Not signed in");
                return Ok(());
            }
            if let Some(user) = app.users.me(RequestOptions::new()).await? {
                println!("{} <{}> ({})", user.full_name, user.email, user.role);
            }
        },
        ("events", title) => {
            let filter = EventFilterRequest {
                title: title.to_vec(),
                is_active: Some(true),
                ..EventFilterRequest::default()
            };
            let request = EventSearchRequest::new(filter).with_pagination(PaginationRequest::new(1, 20));
            if let Some(page) = app.events.search(&request, RequestOptions::new()).await? {
                println!("{} events", page.total_count);
                for event in page.items {
                    println!(
                        "{}  {}  {}  {}",
                        event.id,
                        format_date_time(&event.start_time, false),
                        format_currency(event.price, "RUB"),
                        event.title
                    );
                }
            }
        },
        ("tickets", []) => {
            let page = app
                .tickets
                .my_tickets(PaginationRequest::default(), RequestOptions::new())
                .await?;
            for ticket in page.map(|page| page.items).unwrap_or_default() {
                let status = ticket.status.map_or_else(|| "-".to_string(), |status| format!("{status:?}"));
                println!("{}  event {}  {status}", ticket.id, ticket.event_id);
            }
        },
        ("calendar", []) => {
            if let Some(calendar) = app.calendar.my_calendar(RequestOptions::new()).await? {
                println!("Calendar of {}", calendar.user.full_name);
                for entry in calendar.events {
                    println!(
                        "{}  {}",
                        format_date_time(&entry.event.start_time, false),
                        entry.event.title
                    );
                }
            }
        },
        ("route", [path]) => match app.navigate(path) {
            Navigation::Render { route, params } => {
                println!("render {} ({})", route.name(), route.path());
                for (key, value) in params {
                    println!("  {key} = {value}");
                }
            },
            Navigation::Redirect(to) => println!("redirect {to}"),
        },
        ("places", [query]) => {
            app.maps.load().await?;
            let results = app.maps.search(query, SearchOptions::default().with_limit(5)).await;
            for result in results {
                let at = result
                    .coordinates()
                    .map_or_else(String::new, |c| format!("  ({:.5}, {:.5})", c.lat(), c.lng()));
                println!("{}, {}{at}", result.properties.name, result.properties.description);
            }
        },
        _ => bail!(USAGE),
    }
    Ok(())
}
