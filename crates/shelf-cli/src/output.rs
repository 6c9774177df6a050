use colored::{ColoredString, Colorize};
use serde::Serialize;
use shelf_sdk::{Book, BookStatus, Statistics};

use crate::cli::OutputFormat;

const TITLE_WIDTH: usize = 32;
const AUTHOR_WIDTH: usize = 22;

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn status_label(status: BookStatus) -> ColoredString {
    let padded = format!("{:<9}", status.as_str());
    match status {
        BookStatus::Available => padded.normal(),
        BookStatus::Reading => padded.cyan(),
        BookStatus::Read => padded.green(),
        BookStatus::Borrowed => padded.yellow(),
        BookStatus::Wishlist => padded.magenta(),
    }
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{s:<width$}")
    } else {
        let cut: String = s.chars().take(width - 1).collect();
        format!("{cut}…")
    }
}

pub fn print_books(books: &[Book], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(books);
    }
    if books.is_empty() {
        println!("{}", "No books.".dimmed());
        return Ok(());
    }
    println!(
        "{}",
        format!(
            "{:<8}  {:<tw$}  {:<aw$}  {:<4}  {:<9}",
            "ID",
            "TITLE",
            "AUTHOR",
            "YEAR",
            "STATUS",
            tw = TITLE_WIDTH,
            aw = AUTHOR_WIDTH,
        )
        .bold()
    );
    for book in books {
        let year = book
            .publication_year
            .map_or_else(|| "-".to_string(), |y| y.to_string());
        println!(
            "{}  {}  {}  {:<4}  {}",
            book.id.short_id().dimmed(),
            clip(&book.title, TITLE_WIDTH),
            clip(&book.author, AUTHOR_WIDTH),
            year,
            status_label(book.status),
        );
    }
    println!("{}", format!("{} book(s)", books.len()).dimmed());
    Ok(())
}

pub fn print_book(book: &Book, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(book);
    }
    println!("{}", book.to_string().bold());
    println!("  {:<10} {}", "id:", book.id);
    println!("  {:<10} {}", "status:", status_label(book.status));
    if let Some(isbn) = &book.isbn {
        println!("  {:<10} {}", "isbn:", isbn);
    }
    if let Some(genre) = &book.genre {
        println!("  {:<10} {}", "genre:", genre);
    }
    if let Some(notes) = &book.notes {
        println!("  {:<10} {}", "notes:", notes);
    }
    println!("  {:<10} {}", "added:", book.created_at.format("%Y-%m-%d %H:%M"));
    println!("  {:<10} {}", "updated:", book.updated_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

/// Confirmation line for a mutation.
pub fn print_change(verb: &str, book: &Book, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(book);
    }
    println!("{} {} {}", "✓".green().bold(), verb, book.to_string().bold());
    Ok(())
}

pub fn print_stats(stats: &Statistics, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(stats);
    }
    println!("{} {}", "Total books:".bold(), stats.total_books);
    for (status, count) in &stats.status_counts {
        println!("  {} {count}", status_label(*status));
    }
    println!("{} {}", "Currently reading:".bold(), stats.currently_reading);
    println!(
        "{} {} this year, {} last year",
        "Read:".bold(),
        stats.books_read_this_year,
        stats.books_read_last_year
    );
    if let Some(genre) = &stats.top_genre {
        println!("{} {genre}", "Top genre:".bold());
    }
    if let Some(author) = &stats.top_author {
        println!("{} {author}", "Top author:".bold());
    }
    if !stats.top_genres.is_empty() {
        println!("{}", "Top genres:".bold());
        for entry in &stats.top_genres {
            println!("  {:<24} {}", entry.name, entry.count);
        }
    }
    if !stats.top_authors.is_empty() {
        println!("{}", "Top authors:".bold());
        for entry in &stats.top_authors {
            println!("  {:<24} {}", entry.name, entry.count);
        }
    }
    if let (Some(first), Some(last)) = (
        stats.publication_years.keys().next(),
        stats.publication_years.keys().next_back(),
    ) {
        println!("{} {first}–{last}", "Published:".bold());
    }
    Ok(())
}
