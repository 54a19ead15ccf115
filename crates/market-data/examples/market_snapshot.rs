//! Prints a quick market snapshot.
//!
//! ```text
//! cargo run -p nse-market-data --example market_snapshot -- INFY
//! ```
//!
//! Settings come from the `NSE_*` environment variables (or a `.env` file).
//! `RUST_LOG` controls verbosity and `NSE_LOG_FORMAT=json` switches to JSON logs.

use nse_market_data::render::to_json_pretty;
use nse_market_data::{Movers, NseClient, NseConfig, DEFAULT_INDEX};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let log_format = std::env::var("NSE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let code = std::env::args().nth(1).unwrap_or_else(|| "INFY".to_string());
    let client = NseClient::from_config(NseConfig::from_env()?).await?;
    tracing::info!("{}", client);

    if !client.is_valid_symbol(&code).await? {
        tracing::warn!("{} is not a listed equity symbol", code);
        return Ok(());
    }

    let name = client.company_name(&code).await?;
    let quote = client.quote(&code, false).await?;
    println!("{} ({}) quote:\n{}", name, code, to_json_pretty(&quote)?);

    let breadth = client.advances_declines(DEFAULT_INDEX).await?;
    println!("{} breadth:\n{}", DEFAULT_INDEX, to_json_pretty(&breadth)?);

    if let Movers::Category(rows) = client.top_gainers(Some("NIFTY")).await? {
        for row in rows.iter().take(5) {
            println!("{} {}", row["symbol"], row["ltp"]);
        }
    }

    if let Some(lot) = client.fno_lot_sizes(true).await?.get(&code.to_uppercase()) {
        println!("{} lot size: {}", code, lot);
    }

    Ok(())
}
