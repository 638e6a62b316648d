use anyhow::{Context, Result};
use colored::Colorize;
use pathway_router::{RouteRegistry, RouteValue};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Config;

/// Outcome of looking up one location
#[derive(Debug, PartialEq, Serialize)]
pub struct LookupReport {
    pub location: String,
    pub path: String,
    pub matched: bool,
    pub handler: Option<String>,
    pub template: Option<String>,
    pub params: BTreeMap<String, Option<RouteValue>>,
}

pub fn execute(config: &Config, locations: &[String], json: bool) -> Result<()> {
    let table = config
        .route_table()
        .context("Route table is invalid")?;

    let reports: Vec<LookupReport> = locations
        .iter()
        .map(|location| lookup(config, &table, location))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        print_report(report);
    }

    Ok(())
}

/// Looks one location up the way a navigation layer would
pub fn lookup(config: &Config, table: &RouteRegistry<String>, location: &str) -> LookupReport {
    let path = config.lookup_path(location);
    let found = table.try_match(&path);

    LookupReport {
        location: location.to_string(),
        path: path.into_owned(),
        matched: found.is_some(),
        handler: found.as_ref().map(|m| m.handler().clone()),
        template: found.as_ref().map(|m| m.template().text().to_string()),
        params: found
            .map(|m| m.params.into_inner().into_iter().collect())
            .unwrap_or_default(),
    }
}

fn print_report(report: &LookupReport) {
    let (handler, template) = match (&report.handler, &report.template) {
        (Some(handler), Some(template)) => (handler, template),
        _ => {
            println!("{} {}", report.location.bold(), "no match".yellow());
            return;
        }
    };

    println!(
        "{} {} {} ({})",
        report.location.bold(),
        "→".green(),
        handler.green().bold(),
        template.cyan()
    );
    for (name, value) in &report.params {
        match value {
            Some(value) => println!("    {} = {} [{}]", name, value, value.kind().dimmed()),
            None => println!("    {} = {}", name, "null".dimmed()),
        }
    }
}
