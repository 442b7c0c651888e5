//! Sitegen CLI
//!
//! Generate websites from a prompt, browse them, preview them locally and
//! export them as ready-to-run projects.

mod api;
mod commands;
mod config;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use commands::show::OutputFormat;
use commands::Target;
use sitegen_core::SingleFile;
use sitegen_types::{Theme, VisibilityFilter, WebsiteUpdate};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "sitegen")]
#[command(author, version, about = "Sitegen - Generate websites from a prompt", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Work from locally stored websites only
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a website from a prompt
    Generate {
        /// What the website should be about (at least 10 characters)
        prompt: String,

        /// Website title
        #[arg(short, long)]
        title: Option<String>,

        /// Short description
        #[arg(short, long)]
        description: Option<String>,

        /// Make the website public
        #[arg(long)]
        public: bool,

        /// Do not open the preview in a browser
        #[arg(long)]
        no_open: bool,
    },

    /// List generated websites
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long, default_value_t = 12)]
        limit: u32,

        /// Search text; saved for later listings, pass "" to clear
        #[arg(short, long)]
        search: Option<String>,

        /// Visibility filter; saved for later listings
        #[arg(short, long, value_enum)]
        filter: Option<FilterArg>,
    },

    /// Show recently generated websites
    Recent {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show a website's details
    Show {
        #[command(flatten)]
        target: Target,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Render a live preview document
    Preview {
        #[command(flatten)]
        target: Target,

        /// Where to write the preview (defaults to ~/.sitegen/previews/)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Open the preview in a browser
        #[arg(long)]
        open: bool,
    },

    /// Show a website's file tree
    Files {
        #[command(flatten)]
        target: Target,

        /// Expand a folder
        #[arg(long)]
        expand: Vec<String>,

        /// Collapse a folder
        #[arg(long)]
        collapse: Vec<String>,

        /// Highlight a file
        #[arg(long)]
        select: Option<String>,
    },

    /// Print one source file
    Code {
        #[command(flatten)]
        target: Target,

        /// File path inside the project (defaults to the first file)
        #[arg(short, long)]
        path: Option<String>,

        /// Save the file into this directory instead of printing it
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Download a website as a ZIP archive
    Export {
        #[command(flatten)]
        target: Target,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Download only the raw HTML or CSS
        #[arg(long, value_enum)]
        single: Option<SingleArg>,
    },

    /// Check the generation service
    Health,

    /// Change a website's title, description or visibility
    Update {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long, conflicts_with = "private")]
        public: bool,

        #[arg(long)]
        private: bool,
    },

    /// Delete a website
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the generation service URL
    SetServer {
        /// Server URL (e.g., http://localhost:3001)
        url: String,
    },
    /// Set the request timeout in seconds
    SetTimeout { secs: u64 },
    /// Set or toggle the colour theme
    Theme {
        #[arg(value_enum)]
        mode: ThemeArg,
    },
    /// Set the listing visibility filter
    Filter {
        #[arg(value_enum)]
        filter: FilterArg,
    },
    /// Save a listing search, or clear it
    Search { text: Option<String> },
    /// Open or close the sidebar
    Sidebar {
        #[arg(value_enum)]
        state: SidebarArg,
    },
    /// Reset configuration to defaults
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Public,
    Private,
}

impl From<FilterArg> for VisibilityFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => VisibilityFilter::All,
            FilterArg::Public => VisibilityFilter::PublicOnly,
            FilterArg::Private => VisibilityFilter::PrivateOnly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

#[derive(Clone, Copy, ValueEnum)]
enum SidebarArg {
    Open,
    Closed,
}

#[derive(Clone, Copy, ValueEnum)]
enum SingleArg {
    Html,
    Css,
}

impl From<SingleArg> for SingleFile {
    fn from(arg: SingleArg) -> Self {
        match arg {
            SingleArg::Html => SingleFile::Html,
            SingleArg::Css => SingleFile::Css,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "sitegen_cli=debug,sitegen_core=debug"
    } else {
        "sitegen_cli=info"
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Sitegen v{}", env!("CARGO_PKG_VERSION"));

    let offline = cli.offline;
    let result = match cli.command {
        Commands::Generate {
            prompt,
            title,
            description,
            public,
            no_open,
        } => {
            commands::generate::run(
                commands::generate::GenerateOptions {
                    prompt,
                    title,
                    description,
                    public,
                    open: !no_open,
                },
                offline,
            )
            .await
        }
        Commands::List {
            page,
            limit,
            search,
            filter,
        } => {
            commands::list::run(
                commands::list::ListOptions {
                    page,
                    limit,
                    search,
                    filter: filter.map(Into::into),
                },
                offline,
            )
            .await
        }
        Commands::Recent { limit } => commands::list::recent(limit, offline).await,
        Commands::Show { target, format } => commands::show::run(target, format, offline).await,
        Commands::Preview { target, out, open } => {
            commands::preview::run(target, out, open, offline).await
        }
        Commands::Files {
            target,
            expand,
            collapse,
            select,
        } => commands::files::tree(target, expand, collapse, select, offline).await,
        Commands::Code { target, path, save } => {
            commands::files::code(target, path, save, offline).await
        }
        Commands::Export {
            target,
            out_dir,
            single,
        } => commands::export::run(target, out_dir, single.map(Into::into), offline).await,
        Commands::Health => commands::health::run().await,
        Commands::Update {
            id,
            title,
            description,
            public,
            private,
        } => {
            let update = WebsiteUpdate {
                title,
                description,
                is_public: match (public, private) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                ..Default::default()
            };
            commands::manage::update(&id, update).await
        }
        Commands::Delete { id, yes } => commands::manage::delete(&id, yes).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show().await,
            ConfigAction::SetServer { url } => commands::config::set_server(&url).await,
            ConfigAction::SetTimeout { secs } => commands::config::set_timeout(secs).await,
            ConfigAction::Theme { mode } => {
                let theme = match mode {
                    ThemeArg::Light => Some(Theme::Light),
                    ThemeArg::Dark => Some(Theme::Dark),
                    ThemeArg::Toggle => None,
                };
                commands::config::theme(theme).await
            }
            ConfigAction::Filter { filter } => commands::config::filter(filter.into()).await,
            ConfigAction::Search { text } => commands::config::search(text).await,
            ConfigAction::Sidebar { state } => {
                commands::config::sidebar(matches!(state, SidebarArg::Open)).await
            }
            ConfigAction::Reset => commands::config::reset().await,
        },
    };

    if let Err(ref e) = result {
        error!("Command failed: {}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
