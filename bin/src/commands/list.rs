//! List command implementation.

use crate::EndpointArgs;
use anyhow::{Context, Result};
use qhp_lib::prelude::*;

/// Print every security the quote store knows, one per line.
pub(crate) async fn list_securities(endpoint: &EndpointArgs) -> Result<()> {
    let mut client = QuoteClient::connect(&endpoint.config())?;
    let tickers = client
        .security_list()
        .await
        .context("Failed to get security list")?;

    if tickers.is_empty() {
        println!("No securities found.");
        return Ok(());
    }

    for ticker in &tickers {
        println!("{ticker}");
    }
    tracing::info!(count = tickers.len(), "listed securities");
    Ok(())
}
