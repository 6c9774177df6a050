use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelf: keep track of the books you own, read and want",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Library file (overrides `data_path` from the config file)
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a book
    Add(AddArgs),
    /// Remove a book by id, title or ISBN
    Remove(IdentArgs),
    /// Show one book
    Show(IdentArgs),
    /// Change fields of a book
    Edit(EditArgs),
    /// Change the status of a book
    Status(StatusArgs),
    /// Search titles, authors, genres and ISBNs
    Search(SearchArgs),
    /// List books
    List(ListArgs),
    /// Show collection statistics
    Stats(StatsArgs),
    /// Serve the library over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct AddArgs {
    pub title: String,
    pub author: String,
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct IdentArgs {
    /// Book id (or unique id prefix), title or ISBN
    pub identifier: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub identifier: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long, conflicts_with = "clear_year")]
    pub year: Option<i32>,
    /// Forget the publication year
    #[arg(long)]
    pub clear_year: bool,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    pub identifier: String,
    /// Available, Reading, Read, Borrowed or Wishlist
    pub status: String,
}

#[derive(Args, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    pub query: String,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct ListArgs {
    /// title, author, year, added, recent or insertion
    #[arg(long, default_value = "insertion")]
    pub sort: String,
    /// Show at most this many books
    #[arg(long)]
    pub limit: Option<usize>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct StatsArgs {
    /// How many genres and authors to rank
    #[arg(long, default_value = "5")]
    pub top: usize,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides `[server] bind_addr`)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}
