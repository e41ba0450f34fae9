//! Shopdesk CLI - catalog, order and store tools for operators.
//!
//! # Usage
//!
//! ```bash
//! # List categories whose name contains "sho"
//! shopdesk categories list --search sho
//!
//! # Products in category 3, cheapest first
//! shopdesk products list --category 3 --sort asc
//!
//! # Pending orders
//! shopdesk orders list --status pending
//!
//! # Mark an order delivered
//! shopdesk orders set-status 1717000000000 delivered
//!
//! # Headline counts and revenue
//! shopdesk stats
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_URL` - Base URL of the hosted store
//! - `STORE_API_KEY` - Store API key

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopdesk_admin::store::Direction;
use shopdesk_core::{CategoryId, OrderStatus};

mod commands;

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(author, version, about = "Shopdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse and update orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Show order, user and product counts with total revenue
    Stats,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List {
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only products in this category
        #[arg(short, long)]
        category: Option<CategoryId>,

        /// Sort by price (`asc` or `desc`); newest first when omitted
        #[arg(long)]
        sort: Option<Direction>,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, newest first
    List {
        /// Case-insensitive product name search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only orders with this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Change the status of one order
    SetStatus {
        /// Order ID
        id: String,

        /// New status (`pending`, `processing`, `delivered`, `cancelled`)
        status: OrderStatus,
    },
}

#[tokio::main]
async fn main() {
    // Command output goes through tracing; info level unless RUST_LOG says otherwise
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopdesk_cli=info,shopdesk_admin=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let collections = commands::connect()?;

    match cli.command {
        Commands::Categories { action } => match action {
            CategoryAction::List { search } => {
                commands::catalog::list_categories(&collections, search).await?;
            }
        },
        Commands::Products { action } => match action {
            ProductAction::List {
                search,
                category,
                sort,
            } => {
                commands::catalog::list_products(&collections, search, category, sort).await?;
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::List { search, status } => {
                commands::orders::list(&collections, search, status).await?;
            }
            OrderAction::SetStatus { id, status } => {
                commands::orders::set_status(&collections, &id, status).await?;
            }
        },
        Commands::Stats => commands::stats::show(&collections).await?,
    }
    Ok(())
}
