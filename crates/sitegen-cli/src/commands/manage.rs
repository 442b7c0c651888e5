//! Update and delete commands

use super::{print_summary, user_error, Session};
use anyhow::Result;
use colored::Colorize;
use sitegen_types::WebsiteUpdate;

pub async fn update(id: &str, update: WebsiteUpdate) -> Result<()> {
    let mut session = Session::open(false)?;

    let updated = session
        .dashboard
        .update(id, &update)
        .await
        .map_err(user_error)?;
    session.store.save(&updated)?;

    println!("{} Website updated", "✓".green());
    print_summary(&updated);

    session.close()
}

pub async fn delete(id: &str, yes: bool) -> Result<()> {
    let mut session = Session::open(false)?;

    if !yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete website '{}'? This cannot be undone.", id))
            .default(false)
            .interact()?;

        if !confirm {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let ack = session.dashboard.delete(id).await.map_err(user_error)?;
    session.store.remove(id)?;

    let message = if ack.message.is_empty() {
        "Website deleted".to_string()
    } else {
        ack.message
    };
    println!("{} {}", "✓".green(), message);

    session.close()
}
