use anyhow::{Context, Result};
use colored::Colorize;
use pathway_router::RouteRegistry;
use serde::Serialize;

use crate::config::Config;

/// One row of `pathway list`
#[derive(Debug, PartialEq, Serialize)]
pub struct RouteRow {
    pub template: String,
    pub handler: String,
    pub unused: Vec<String>,
}

pub fn execute(config: &Config, json: bool) -> Result<()> {
    let table = config
        .route_table()
        .context("Route table is invalid")?;
    let rows = rows(&table);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No routes configured".yellow());
        return Ok(());
    }

    let width = rows.iter().map(|r| r.template.len()).max().unwrap_or(0);
    for (idx, row) in rows.iter().enumerate() {
        let template = format!("{:<width$}", row.template, width = width);
        let mut line = format!("{:>3}. {}  {}", idx + 1, template.cyan(), row.handler.bold());
        if !row.unused.is_empty() {
            line.push_str(&format!("  (null: {})", row.unused.join(", ")).dimmed().to_string());
        }
        println!("{}", line);
    }

    Ok(())
}

/// Routes in lookup order
pub fn rows(table: &RouteRegistry<String>) -> Vec<RouteRow> {
    table
        .entries()
        .iter()
        .map(|entry| RouteRow {
            template: entry.template().text().to_string(),
            handler: entry.handler().clone(),
            unused: entry.unused_parameter_names().to_vec(),
        })
        .collect()
}
