pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::command_line::{CliConfig, Command};

#[cfg(feature = "cli")]
mod command_line {
    use crate::core::notify::DEFAULT_CAPACITY;
    use crate::core::table::DEFAULT_DEBOUNCE;
    use crate::core::{ConfigProvider, Resource};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::{Parser, Subcommand};
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "admin-console")]
    #[command(about = "Headless admin console for the marketplace backend")]
    pub struct CliConfig {
        #[arg(long, env = "ADMIN_API_URL", default_value = "http://localhost:8080/api")]
        pub base_url: String,

        #[arg(long, env = "ADMIN_API_TOKEN", hide_env_values = true)]
        pub token: Option<String>,

        /// TOML configuration file; replaces the connection flags when given
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, default_value = "30")]
        pub timeout_seconds: u64,

        #[arg(long, default_value = "10")]
        pub page_size: usize,

        #[arg(long, default_value = "./exports")]
        pub export_dir: String,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Fetch one page of a collection and print it as a table
        List {
            resource: Resource,
            #[arg(long)]
            search: Option<String>,
            #[arg(long, default_value = "1")]
            page: u32,
            #[arg(long)]
            per_page: Option<u32>,
            /// Client-side filter applied over the fetched rows
            #[arg(long)]
            filter: Option<String>,
            /// Write the filtered rows as CSV into the export directory
            #[arg(long)]
            export: Option<String>,
        },
        /// Look up buyers by phone or name
        Buyers { query: String },
        /// Enter a call order through the four-step wizard
        CallOrder {
            #[arg(long)]
            query: String,
            /// Zero-based index of the buyer to pick from the lookup results
            #[arg(long, default_value = "0")]
            pick: usize,
            #[arg(long)]
            product: String,
            #[arg(long)]
            quantity: String,
            #[arg(long)]
            unit_price: String,
            #[arg(long)]
            address: String,
            #[arg(long, default_value = "")]
            notes: String,
        },
    }

    impl ConfigProvider for CliConfig {
        fn base_url(&self) -> &str {
            &self.base_url
        }

        fn auth_token(&self) -> Option<&str> {
            self.token.as_deref()
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(self.timeout_seconds)
        }

        fn page_size(&self) -> usize {
            self.page_size
        }

        fn filter_debounce(&self) -> Duration {
            DEFAULT_DEBOUNCE
        }

        fn breadcrumb_max_items(&self) -> usize {
            4
        }

        fn toast_capacity(&self) -> usize {
            DEFAULT_CAPACITY
        }

        fn export_dir(&self) -> &str {
            &self.export_dir
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("base_url", &self.base_url)?;
            validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
            validation::validate_range("page_size", self.page_size, 1, 500)?;
            validation::validate_non_empty_string("export_dir", &self.export_dir)?;
            Ok(())
        }
    }

}
