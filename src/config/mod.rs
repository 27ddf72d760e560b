pub mod store_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "whatsapp-orders")]
#[command(about = "Parse WhatsApp shop orders and turn them into sale drafts")]
pub struct CliConfig {
    /// Path to TOML store configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines (for log collectors)
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Parse an order message and print the extracted fields as JSON
    Parse {
        /// Message file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Resolve line items against this catalog JSON file
        #[arg(long)]
        catalog: Option<String>,
    },

    /// Build a sale draft (`POST /api/ventas` payload) from an order message
    Draft {
        #[arg(short, long, default_value = "-")]
        input: String,

        #[arg(long, conflicts_with = "catalog_url")]
        catalog: Option<String>,

        /// Admin products endpoint, e.g. https://shop/api/products
        #[arg(long)]
        catalog_url: Option<String>,

        /// Bearer token for the admin API
        #[arg(long, requires = "catalog_url")]
        token: Option<String>,

        /// Also export the resolved lines as CSV
        #[arg(long)]
        csv: Option<String>,
    },

    /// Build the storefront WhatsApp message and wa.me link for a cart
    Message {
        /// Cart JSON file: [{"id", "name", "price", "emoji", "quantity"}]
        #[arg(long)]
        cart: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(long, default_value = "")]
        notes: String,
    },
}
