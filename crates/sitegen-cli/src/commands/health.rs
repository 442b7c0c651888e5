//! Health command - Report generation service status

use super::{user_error, Session};
use anyhow::Result;
use colored::Colorize;

pub async fn run() -> Result<()> {
    let mut session = Session::open(false)?;
    let health = session.dashboard.health().await.map_err(user_error)?;

    println!("{}", "Service Health".bold().underline());
    println!();

    let status = if health.is_healthy() {
        health.status.green()
    } else {
        health.status.red()
    };
    println!("  Status:  {}", status);
    println!("  Server:  {}", session.settings.server_url.dimmed());
    println!("  Uptime:  {}", format_uptime(health.uptime));
    if let Some(timestamp) = &health.timestamp {
        println!("  Checked: {}", timestamp.dimmed());
    }

    if let Some(services) = &health.services {
        println!();
        println!("{}", "Services:".cyan().bold());
        println!("  Database: {}", colour_status(&services.database));
        println!("  AI:       {}", colour_status(&services.ai));
    }

    println!();
    println!("{}", "Memory:".cyan().bold());
    println!(
        "  {:.1} MB of {:.1} MB ({:.1}%)",
        health.memory.used, health.memory.total, health.memory.percentage
    );

    let stats = &health.stats;
    println!();
    println!("{}", "Generation:".cyan().bold());
    println!(
        "  Websites:     {} ({} public, {} private)",
        stats.total_websites, stats.public_websites, stats.private_websites
    );
    println!("  Success rate: {:.1}%", stats.generation_success_rate);
    println!("  Average time: {:.1}s", stats.average_generation_time);

    Ok(())
}

fn colour_status(status: &str) -> colored::ColoredString {
    match status {
        "healthy" | "ok" | "connected" => status.green(),
        "unhealthy" | "disconnected" => status.red(),
        _ => status.yellow(),
    }
}

fn format_uptime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let minutes = rest / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, total % 60)
    }
}
