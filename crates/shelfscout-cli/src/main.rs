use clap::Parser;
use shelfscout_cache::QueryCache;
use shelfscout_core::{
    categorize, models::parse_published_date, Book, BookDraft, Config, Library, RemoteStore,
    WriteOutcome,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelfscout")]
#[command(version, about = "Terminal bookshelf browser for a hosted books collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a book to the collection
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Publication date, YYYY-MM-DD or RFC 3339
        #[arg(long)]
        published: String,
        #[arg(long)]
        genre: Option<String>,
    },
    /// Update a book, sending the full record
    Update {
        /// Record id
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Publication date, YYYY-MM-DD or RFC 3339
        #[arg(long)]
        published: String,
        #[arg(long)]
        genre: Option<String>,
    },
    /// Delete a book by id
    Remove {
        /// Record id
        id: i64,
    },
    /// Print the shelf grouped by genre
    List,
    /// Write a starter config file to the default location
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfscout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load()?;
    tracing::debug!(
        "config loaded, backend configured: {}",
        config.backend.is_some()
    );
    let store = Arc::new(RemoteStore::from_config(&config));
    let library = Library::new(store, Arc::new(QueryCache::new()));

    match cli.command {
        None => {
            let app = shelfscout_tui::App::new();
            shelfscout_tui::run_tui(app, library, config.ui.mouse_enabled).await?;
        }
        Some(Commands::Add {
            title,
            author,
            published,
            genre,
        }) => {
            let draft = BookDraft {
                title,
                author,
                published_date: published,
                genre,
            };
            report("add", &library.create(&draft).await);
        }
        Some(Commands::Update {
            id,
            title,
            author,
            published,
            genre,
        }) => {
            let book = Book {
                id: Some(id),
                title,
                author,
                published_date: parse_published_date(&published)?,
                genre,
            };
            report("update", &library.update(&book).await);
        }
        Some(Commands::Remove { id }) => {
            report("remove", &library.delete(id).await);
        }
        Some(Commands::Init) => {
            config.save()?;
            println!("Wrote config to {}", Config::config_path()?.display());
        }
        Some(Commands::List) => {
            let snapshot = library.books().fetch().await;
            if let Some(err) = snapshot.error {
                anyhow::bail!("{}", err);
            }

            let books = snapshot.data.unwrap_or_default();
            let shelf = categorize(&books);
            if shelf.is_empty() {
                println!("No books to show");
            }
            for (genre, bucket) in shelf.iter() {
                println!("{}:", genre);
                for book in bucket {
                    println!(
                        "  [{}] {} - {} ({})",
                        book.id.map_or_else(|| "?".to_string(), |id| id.to_string()),
                        book.title,
                        book.author,
                        book.published_date_display(),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Write results are outcomes, not errors; print them either way
fn report(op: &str, outcome: &WriteOutcome) {
    match &outcome.error {
        None => println!("{} ok (status {})", op, outcome.status),
        Some(err) => println!("{} failed (status {}): {}", op, outcome.status, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_init_subcommand_parses() {
        let cli = Cli::try_parse_from(["shelfscout", "init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init)));
    }

    #[test]
    fn test_add_requires_title() {
        assert!(Cli::try_parse_from([
            "shelfscout",
            "add",
            "--author",
            "Frank Herbert",
            "--published",
            "1965-08-01",
        ])
        .is_err());
    }
}
