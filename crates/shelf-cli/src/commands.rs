use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use shelf_query::{BookFilter, SortKey};
use shelf_sdk::{BookDraft, BookPatch, BookStatus, Library};
use shelf_server::ShelfServer;
use tracing::debug;

use crate::cli::*;
use crate::config::ShelfConfig;
use crate::output::{print_book, print_books, print_change, print_stats};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = ShelfConfig::resolve(&cli)?;
    debug!(
        data_path = %config.library.data_path.display(),
        timeout_ms = config.library.write_timeout_ms,
        "configuration resolved"
    );
    let library = Library::open(&config.library)
        .with_context(|| format!("opening library {}", config.library.data_path.display()))?;
    let format = cli.format;

    match cli.command {
        Command::Add(args) => cmd_add(&library, args, format).await,
        Command::Remove(args) => cmd_remove(&library, args, format).await,
        Command::Show(args) => {
            let book = library.resolve(&args.identifier).await?;
            print_book(&book, format)
        }
        Command::Edit(args) => cmd_edit(&library, args, format).await,
        Command::Status(args) => {
            let book = library.resolve(&args.identifier).await?;
            let book = library.set_status(book.id, args.status).await?;
            print_change("Marked", &book, format)
        }
        Command::Search(args) => {
            let filter = build_filter(args.filter)?;
            let books = library.search(&args.query, &filter).await?;
            print_books(&books, format)
        }
        Command::List(args) => {
            let sort: SortKey = args.sort.parse()?;
            let filter = build_filter(args.filter)?;
            let books = library.list(&filter, sort, args.limit).await?;
            print_books(&books, format)
        }
        Command::Stats(args) => {
            let stats = library.stats().await?;
            let stats = shelf_sdk::Statistics::clone(&stats).limit_top(args.top);
            print_stats(&stats, format)
        }
        Command::Serve(args) => {
            let mut server_config = config.server;
            if let Some(bind) = args.bind {
                server_config.bind_addr = bind;
            }
            println!(
                "{} serving {} on {}",
                "✓".green().bold(),
                library.name().bold(),
                server_config.bind_addr.to_string().cyan()
            );
            ShelfServer::new(server_config, Arc::new(library))
                .serve()
                .await?;
            Ok(())
        }
    }
}

async fn cmd_add(library: &Library, args: AddArgs, format: OutputFormat) -> anyhow::Result<()> {
    let draft = BookDraft {
        title: args.title,
        author: args.author,
        isbn: args.isbn,
        genre: args.genre,
        publication_year: args.year,
        status: args.status,
        notes: args.notes,
    };
    let book = library.add(draft).await?;
    print_change("Added", &book, format)
}

async fn cmd_remove(library: &Library, args: IdentArgs, format: OutputFormat) -> anyhow::Result<()> {
    let book = library.resolve(&args.identifier).await?;
    let removed = library.delete(book.id).await?;
    print_change("Removed", &removed, format)
}

async fn cmd_edit(library: &Library, args: EditArgs, format: OutputFormat) -> anyhow::Result<()> {
    let book = library.resolve(&args.identifier).await?;
    let patch = build_patch(&args);
    if patch.is_empty() {
        bail!("nothing to change: pass at least one field option");
    }
    let book = library.update(book.id, patch).await?;
    print_change("Updated", &book, format)
}

fn build_patch(args: &EditArgs) -> BookPatch {
    BookPatch {
        title: args.title.clone(),
        author: args.author.clone(),
        isbn: args.isbn.clone(),
        genre: args.genre.clone(),
        publication_year: if args.clear_year {
            Some(None)
        } else {
            args.year.map(Some)
        },
        status: args.status.clone(),
        notes: args.notes.clone(),
    }
}

fn build_filter(args: FilterArgs) -> anyhow::Result<BookFilter> {
    let status = args
        .status
        .map(|s| s.parse::<BookStatus>())
        .transpose()?;
    Ok(BookFilter {
        status,
        genre: args.genre,
        author: args.author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use shelf_sdk::LibraryConfig;
    use std::path::Path;

    async fn run(library: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["shelf", "--library", library.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap()).await
    }

    fn reopen(path: &Path) -> Library {
        Library::open(&LibraryConfig {
            data_path: path.to_path_buf(),
            ..LibraryConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn add_status_edit_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        run(&path, &["add", "Dune", "Frank Herbert", "--year", "1965"]).await.unwrap();
        run(&path, &["status", "dune", "Reading"]).await.unwrap();
        run(&path, &["edit", "Dune", "--clear-year", "--genre", "Science Fiction"]).await.unwrap();

        let books = reopen(&path)
            .list(&BookFilter::default(), SortKey::Insertion, None)
            .await
            .unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].status, BookStatus::Reading);
        assert_eq!(books[0].publication_year, None);
        assert_eq!(books[0].genre.as_deref(), Some("Science Fiction"));

        run(&path, &["--format", "json", "remove", "Dune"]).await.unwrap();
        assert!(reopen(&path).list(&BookFilter::default(), SortKey::Insertion, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_commands_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        run(&path, &["add", "Emma", "Jane Austen", "--status", "Read"]).await.unwrap();

        run(&path, &["list", "--sort", "title", "--status", "read"]).await.unwrap();
        run(&path, &["list", "--sort", "recent", "--limit", "1"]).await.unwrap();
        run(&path, &["search", "austen"]).await.unwrap();
        run(&path, &["show", "Emma"]).await.unwrap();
        run(&path, &["stats", "--top", "3"]).await.unwrap();
        run(&path, &["--format", "json", "stats"]).await.unwrap();
    }

    #[tokio::test]
    async fn failures_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        assert!(run(&path, &["add", "", "Nobody"]).await.is_err());
        assert!(run(&path, &["show", "Neuromancer"]).await.is_err());
        assert!(run(&path, &["list", "--sort", "rating"]).await.is_err());
        assert!(run(&path, &["list", "--status", "Lost"]).await.is_err());

        run(&path, &["add", "Emma", "Jane Austen"]).await.unwrap();
        assert!(run(&path, &["edit", "Emma"]).await.is_err());
        assert!(run(&path, &["status", "Emma", "Finished"]).await.is_err());
    }

    #[test]
    fn patch_from_edit_flags() {
        let cli = Cli::try_parse_from(["shelf", "edit", "Dune", "--year", "1965"]).unwrap();
        let Command::Edit(args) = cli.command else { panic!("wrong command") };
        let patch = build_patch(&args);
        assert_eq!(patch.publication_year, Some(Some(1965)));
        assert!(patch.title.is_none());

        let cli = Cli::try_parse_from(["shelf", "edit", "Dune", "--clear-year"]).unwrap();
        let Command::Edit(args) = cli.command else { panic!("wrong command") };
        assert_eq!(build_patch(&args).publication_year, Some(None));
    }
}
