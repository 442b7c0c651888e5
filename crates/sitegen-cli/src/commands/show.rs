//! Show command - Display a single website

use super::{html_warnings, print_detail, Session, Target};
use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use sitegen_core::classify;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

pub async fn run(target: Target, format: OutputFormat, offline: bool) -> Result<()> {
    let session = Session::open(offline)?;
    let website = session.artifact(&target, true).await?;

    match format {
        OutputFormat::Text => {
            print_detail(&website);
            let warnings = html_warnings(&website);
            if !warnings.is_empty() {
                println!();
                println!("{}", "HTML checks:".yellow().bold());
                for warning in warnings {
                    println!("  {} {}", "!".yellow(), warning.dimmed());
                }
            }
            if classify(&website).is_structured() {
                println!();
                println!("  Run `sitegen files {}` to browse the project.", website.id);
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&website).context("Failed to serialize website")?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&website).context("Failed to serialize website")?;
            print!("{}", yaml);
        }
    }
    Ok(())
}
