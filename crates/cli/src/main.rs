//! Tidepool CLI - the storefront in a terminal.
//!
//! Each invocation is one page load: it builds the page's controller over a
//! bag kept in a JSON file, performs one action and prints the result.
//!
//! # Usage
//!
//! ```bash
//! # Browse marine fish, cheapest first
//! tidepool catalog --category marine --sort low-high
//!
//! # Add the card shown as [5] to the bag
//! tidepool add 5
//!
//! # Show the bag, then change or remove lines by position
//! tidepool bag
//! tidepool increase 0
//! tidepool decrease 0
//! tidepool remove 0
//!
//! # Review and place the order
//! tidepool checkout --review
//! tidepool checkout --first-name Asha --last-name Rao --email asha@example.com \
//!     --phone 9876543210 --address "12 Lake Road" --city Kochi --pincode 682001 \
//!     --payment-method upi
//! ```
//!
//! # Environment Variables
//!
//! - `TIDEPOOL_BAG_FILE` - Bag file (default: .tidepool/bag.json)
//! - `CATALOG_PATH` - Product catalog JSON (default: bundled catalog)
//! - `ORDER_RELAY_URL` - Relay endpoint, needed to place orders
//! - `ORDER_RELAY_TIMEOUT_SECS` - Relay request timeout (default: 30)
//! - `CHECKOUT_PROCESSING_DELAY_MS` - Simulated payment delay (default: 2000)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::checkout::CheckoutArgs;

#[derive(Parser)]
#[command(name = "tidepool")]
#[command(author, version, about = "Tidepool storefront in the terminal")]
struct Cli {
    /// Bag file
    #[arg(
        long,
        global = true,
        env = "TIDEPOOL_BAG_FILE",
        default_value = ".tidepool/bag.json"
    )]
    bag_file: PathBuf,

    /// Product catalog JSON (defaults to the bundled catalog)
    #[arg(long, global = true, env = "CATALOG_PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Catalog {
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category (`all` for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Price range (`all` for every range)
        #[arg(short, long, default_value = "all")]
        price: String,

        /// Sort order (`default`, `low-high`, `high-low`, `name`)
        #[arg(long, default_value = "default")]
        sort: String,
    },
    /// Add a catalog card to the bag
    Add {
        /// Card number shown by `catalog`
        card: usize,
    },
    /// Show the bag
    Bag,
    /// Increase the quantity of a bag line by one
    Increase {
        /// Line position shown by `bag`
        index: usize,
    },
    /// Decrease the quantity of a bag line by one, removing it at zero
    Decrease {
        /// Line position shown by `bag`
        index: usize,
    },
    /// Remove a bag line
    Remove {
        /// Line position shown by `bag`
        index: usize,
    },
    /// Review the order or place it
    Checkout(CheckoutArgs),
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let catalog = cli.catalog.as_deref();
    let bag_file = cli.bag_file.as_path();

    match cli.command {
        Commands::Catalog {
            search,
            category,
            price,
            sort,
        } => commands::catalog::list(catalog, bag_file, &search, &category, &price, &sort)?,
        Commands::Add { card } => commands::catalog::add(catalog, bag_file, card).await?,
        Commands::Bag => commands::bag::show(bag_file).await?,
        Commands::Increase { index } => commands::bag::adjust(bag_file, index, 1).await?,
        Commands::Decrease { index } => commands::bag::adjust(bag_file, index, -1).await?,
        Commands::Remove { index } => commands::bag::remove(bag_file, index).await?,
        Commands::Checkout(args) => commands::checkout::run(bag_file, args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_catalog_defaults() {
        let cli = Cli::try_parse_from(["tidepool", "catalog"]).unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Catalog {
                search,
                category,
                price,
                sort,
            } => {
                assert_eq!(search, "");
                assert_eq!(category, "all");
                assert_eq!(price, "all");
                assert_eq!(sort, "default");
            }
            _ => panic!("expected catalog command"),
        }
    }

    #[test]
    fn test_global_bag_file_after_subcommand() {
        let cli = Cli::try_parse_from(["tidepool", "bag", "--bag-file", "/tmp/x.json"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.bag_file, PathBuf::from("/tmp/x.json"));
    }
}
