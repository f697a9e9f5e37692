//! order-insights: run one analytical query and print the result as JSON.
//!
//! ## Configuration
//! - `--config PATH` or ORDER_INSIGHTS_CONFIG: YAML config file
//! - ORDER_INSIGHTS__STORAGE__MONGODB__URI / __DATABASE: store location
//! - ORDER_INSIGHTS_LOG: log filter (default: info), written to stderr
//!
//! The store connection is opened once at startup and closed before exit.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use order_insights::config::Config;
use order_insights::storage::init_storage;
use order_insights::utils::bootstrap::init_tracing;
use order_insights::{AnalyticsService, QueryError};

/// order-insights - analytical queries over the order store
#[derive(Parser, Debug)]
#[command(name = "order-insights")]
#[command(version, about = "Run an analytical query against the order store")]
struct Args {
    /// YAML configuration file
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Total spent, average order value, and last order date for a customer
    Spending {
        /// Customer UUID
        #[arg(long)]
        customer_id: String,
    },

    /// Best-selling products over completed orders
    TopProducts {
        /// Number of products to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Revenue and category breakdown for completed orders in a date range
    Sales {
        /// Range start (inclusive), e.g. 2024-01-01 or 2024-01-01T00:00:00Z
        #[arg(long)]
        start: String,

        /// Range end (inclusive)
        #[arg(long)]
        end: String,
    },

    /// One page of a customer's orders, newest first
    CustomerOrders {
        /// Customer UUID
        #[arg(long)]
        customer_id: String,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,

        /// Orders per page (defaults to query.default_page_size)
        #[arg(long)]
        limit: Option<u32>,
    },
}

/// Failures of one CLI invocation after the store is open.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Failed to encode result as JSON: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    fn is_retryable(&self) -> bool {
        matches!(self, CliError::Query(e) if e.is_retryable())
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn run(
    service: &AnalyticsService,
    config: &Config,
    command: Commands,
) -> Result<String, CliError> {
    match command {
        Commands::Spending { customer_id } => {
            to_json(&service.get_customer_spending(&customer_id).await?)
        }
        Commands::TopProducts { limit } => {
            to_json(&service.get_top_selling_products(limit).await)
        }
        Commands::Sales { start, end } => {
            to_json(&service.get_sales_analytics(&start, &end).await?)
        }
        Commands::CustomerOrders {
            customer_id,
            page,
            limit,
        } => {
            let limit = limit.unwrap_or(config.query.default_page_size);
            to_json(&service.get_customer_orders(&customer_id, page, limit).await?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let stores = match init_storage(&config.storage).await {
        Ok(stores) => stores,
        Err(e) => {
            error!(error = %e, "Failed to connect to store");
            return ExitCode::FAILURE;
        }
    };
    info!("order-insights connected");

    let service = AnalyticsService::new(stores.clone(), &config.query);
    let outcome = run(&service, &config, args.command).await;
    stores.shutdown().await;

    match outcome {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, retryable = e.is_retryable(), "Query failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_failure_is_its_own_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CliError::from(json_err);

        assert!(matches!(err, CliError::Output(_)));
        assert!(!err.is_retryable());
        assert!(err.to_string().starts_with("Failed to encode result as JSON"));
    }

    #[test]
    fn test_query_errors_pass_through() {
        let err = CliError::from(QueryError::InvalidDate {
            input: "someday".to_string(),
        });

        assert_eq!(err.to_string(), "Invalid date: \"someday\"");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_customer_orders_limit_is_optional() {
        let args = Args::try_parse_from([
            "order-insights",
            "customer-orders",
            "--customer-id",
            "7d444840-9dc0-11d1-b245-5ffdce74fad2",
        ])
        .unwrap();

        match args.command {
            Commands::CustomerOrders { page, limit, .. } => {
                assert_eq!(page, 1);
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
