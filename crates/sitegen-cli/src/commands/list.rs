//! List commands - Browse generated websites

use super::{print_summary, user_error, Session};
use anyhow::Result;
use colored::Colorize;
use sitegen_types::{Artifact, VisibilityFilter};

pub struct ListOptions {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub filter: Option<VisibilityFilter>,
}

pub async fn run(options: ListOptions, offline: bool) -> Result<()> {
    let mut session = Session::open(offline)?;

    {
        let state = session.dashboard.state_mut();
        if let Some(search) = options.search {
            state.set_search_query(search);
        }
        if let Some(filter) = options.filter {
            state.set_filter(filter);
        }
    }

    let filter = session.dashboard.state().preferences.filter;
    let search = session.dashboard.state().search().map(str::to_string);

    let heading = match &search {
        Some(search) => format!("Websites ({}, matching \"{}\")", filter, search),
        None => format!("Websites ({})", filter),
    };
    println!("{}", heading.cyan().bold());

    if session.offline {
        let stored = session.store.list()?;
        let matching = filter_local(stored, filter, search.as_deref());
        print_page(&matching);
        println!();
        println!("  {}", format!("{} stored locally", matching.len()).dimmed());
        return session.close();
    }

    let listing = session
        .dashboard
        .list(options.page.max(1), options.limit.max(1))
        .await
        .map_err(user_error)?;

    for website in &listing.websites {
        session.store.save(website)?;
    }

    print_page(&listing.websites);
    println!();
    let state = session.dashboard.state();
    println!(
        "  {}",
        format!(
            "Page {} of {} · {} total",
            state.current_page, state.total_pages, listing.total
        )
        .dimmed()
    );

    session.close()
}

/// Recently generated or viewed websites, newest first
pub async fn recent(limit: usize, offline: bool) -> Result<()> {
    let session = Session::open(offline)?;
    let recent = &session.dashboard.state().recent;

    println!("{}", "Recent websites".cyan().bold());
    if recent.is_empty() {
        println!("  {}", "No websites generated yet".dimmed());
        return Ok(());
    }

    for website in recent.iter().take(limit) {
        print_summary(website);
    }
    Ok(())
}

fn print_page(websites: &[Artifact]) {
    if websites.is_empty() {
        println!("  {}", "No websites found".dimmed());
        return;
    }
    for website in websites {
        print_summary(website);
    }
}

/// Apply the visibility filter and search to locally stored websites
fn filter_local(
    websites: Vec<Artifact>,
    filter: VisibilityFilter,
    search: Option<&str>,
) -> Vec<Artifact> {
    let needle = search.map(str::to_lowercase);
    websites
        .into_iter()
        .filter(|w| filter.admits(w))
        .filter(|w| match &needle {
            Some(needle) => {
                w.title.to_lowercase().contains(needle)
                    || w.description.to_lowercase().contains(needle)
                    || w.prompt.to_lowercase().contains(needle)
            }
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn website(id: &str, title: &str, is_public: bool) -> Artifact {
        Artifact {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            prompt: String::new(),
            html_content: String::new(),
            css_content: String::new(),
            is_public,
            created_at: chrono::Utc::now(),
            metadata: None,
        }
    }

    #[test]
    fn test_filter_local() {
        let websites = vec![
            website("a", "Corner Bakery", true),
            website("b", "Bakery Admin", false),
            website("c", "Photo Studio", false),
        ];

        let ids = |v: Vec<Artifact>| v.into_iter().map(|w| w.id).collect::<Vec<_>>();

        assert_eq!(
            ids(filter_local(websites.clone(), VisibilityFilter::All, Some("bakery"))),
            vec!["a", "b"]
        );
        assert_eq!(
            ids(filter_local(websites.clone(), VisibilityFilter::PrivateOnly, None)),
            vec!["b", "c"]
        );
        assert_eq!(
            ids(filter_local(websites, VisibilityFilter::PublicOnly, Some("studio"))),
            Vec::<String>::new()
        );
    }
}
