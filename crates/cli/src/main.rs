//! Ecom Market CLI - smoke tool for the storefront client.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! em-cli catalog list --search "brake"
//! em-cli catalog show 15
//!
//! # Manage the cart (works signed in or as a guest)
//! em-cli cart add 15 --quantity 2
//! em-cli cart show
//!
//! # Favorites (guest favorites live in a local file until login)
//! em-cli favorites toggle 15
//!
//! # Account
//! em-cli account login --email user@example.com --password ...
//! em-cli orders create --first-name Ivan --last-name Ivanov ...
//! ```
//!
//! # Environment Variables
//!
//! - `ECOM_API_BASE_URL` - Base URL of the store API (required)
//! - `SENTRY_DSN` - Optional error tracking DSN
//! - `RUST_LOG` - Tracing filter (default: `ecom_market=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecom_market_storefront::config::StorefrontConfig;
use ecom_market_storefront::session::StoreSession;

mod commands;

#[derive(Parser)]
#[command(name = "em-cli")]
#[command(author, version, about = "Ecom Market storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: commands::favorites::FavoritesAction,
    },
    /// Account operations
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
    /// Order history and checkout
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrdersAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecom_market=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let session = StoreSession::from_config(&config).expect("Failed to build API client");

    // Resolve auth up front so favorites pick the right backing store.
    session.refresh_auth().await;

    let result = match cli.command {
        Commands::Catalog { action } => commands::catalog::run(&session, action).await,
        Commands::Cart { action } => commands::cart::run(&session, action).await,
        Commands::Favorites { action } => commands::favorites::run(&session, action).await,
        Commands::Account { action } => commands::account::run(&session, action).await,
        Commands::Orders { action } => commands::orders::run(&session, action).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
