use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newshub::app::AppContext;
use newshub::cli::{commands, BookmarkAction, Cli, Commands, ThemeAction};
use newshub::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config, cli.db)?;

    match cli.command {
        Commands::Headlines {
            category,
            country,
            paging,
        } => {
            commands::headlines(&ctx, category, &country, paging.pages).await?;
        }
        Commands::Search {
            query,
            sort,
            paging,
        } => {
            commands::search(&ctx, &query, sort, paging.pages).await?;
        }
        Commands::Sources { category, country } => {
            commands::sources(&ctx, category, country.as_deref()).await?;
        }
        Commands::Bookmarks { action } => match action.unwrap_or(BookmarkAction::List) {
            BookmarkAction::List => commands::list_bookmarks(&ctx)?,
            BookmarkAction::Add { url, title } => {
                commands::add_bookmark(&ctx, &url, title.as_deref())?
            }
            BookmarkAction::Remove { key } => commands::remove_bookmark(&ctx, &key)?,
            BookmarkAction::Clear => commands::clear_bookmarks(&ctx)?,
        },
        Commands::Share { key } => {
            commands::share(&ctx, &key)?;
        }
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => commands::show_theme(&ctx)?,
            ThemeAction::Toggle => commands::toggle_theme(&ctx)?,
        },
        Commands::Reset => {
            commands::reset(&ctx)?;
        }
        Commands::Tui => {
            newshub::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}
