use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;

pub fn execute(config: &Config) -> Result<()> {
    let table = config
        .route_table()
        .context("Route table is invalid")?;

    if table.is_empty() {
        println!("{}", "⚠ No routes configured".yellow());
        return Ok(());
    }

    println!(
        "{} {} routes from {} handlers, no conflicts",
        "✓".green().bold(),
        table.len(),
        config.handler_count()
    );

    Ok(())
}
