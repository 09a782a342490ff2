use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context;
use biblio_catalog::{schema, Book, BookId, GENRES, STATUSES};
use biblio_client::{filter, ApiError, CatalogApi, CatalogBrowser, Filters, HttpCatalogApi, Nav, PageView};
use biblio_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "biblio", about = "Browse and edit a BIBLIO book catalog")]
struct Cli {
    /// Server base URL; defaults to the configured client.base_url
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List one page of the catalog, optionally filtered
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Records per page; defaults to the configured page size
        #[arg(long)]
        limit: Option<u32>,
        /// Case-insensitive search over title and author
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Add a book to the catalog
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, help = genre_help())]
        genre: String,
        /// Publication year
        #[arg(long)]
        year: String,
        #[arg(long, help = status_help())]
        status: String,
        /// Cover image URL
        #[arg(long)]
        image: String,
    },
    /// Edit a book, replacing all of its fields
    Update {
        #[arg(long)]
        id: BookId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, help = genre_help())]
        genre: String,
        /// Publication year
        #[arg(long)]
        year: String,
        #[arg(long, help = status_help())]
        status: String,
        /// Cover image URL
        #[arg(long)]
        image: String,
    },
    /// Delete a book by id
    Delete {
        #[arg(long)]
        id: BookId,
    },
    /// Interactively page through the catalog
    Browse {
        /// Records per page; defaults to the configured page size
        #[arg(long)]
        limit: Option<u32>,
    },
}

fn genre_help() -> String {
    format!("Genre, conventionally one of: {}", GENRES.join(", "))
}

fn status_help() -> String {
    format!("Status, conventionally one of: {}", STATUSES.join(", "))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load BIBLIO settings")?;
    let base_url = cli.server.unwrap_or(settings.client.base_url);
    let api = Arc::new(HttpCatalogApi::new(base_url));

    match cli.command {
        Command::List {
            page,
            limit,
            search,
            genre,
            status,
        } => {
            let limit = limit.unwrap_or(settings.catalog.page_size);
            let result = api
                .fetch_page(page.max(1), limit.max(1))
                .await
                .map_err(report_api_error)?;

            let filters = Filters {
                search: search.unwrap_or_default(),
                genre,
                status,
            };
            let books = filter::apply(&result.books, &filters);

            print_books(&books);
            println!(
                "page {} of {} ({} books total)",
                result.config.page, result.config.total_pages, result.config.total
            );
            if !filters.is_empty() {
                println!("note: filters match within the fetched page only");
            }
        }
        Command::Add {
            title,
            author,
            genre,
            year,
            status,
            image,
        } => {
            let body = serde_json::json!({
                "title": title,
                "author": author,
                "genre": genre,
                "publishedYear": year,
                "status": status,
                "image": image,
            });
            let payload = schema::parse_payload(&body).map_err(report_validation_errors)?;

            let book = api.create_book(&payload).await.map_err(report_api_error)?;
            println!("created book {}: {}", book.id, book.title);
        }
        Command::Update {
            id,
            title,
            author,
            genre,
            year,
            status,
            image,
        } => {
            let body = serde_json::json!({
                "id": id,
                "title": title,
                "author": author,
                "genre": genre,
                "publishedYear": year,
                "status": status,
                "image": image,
            });
            let update = schema::parse_update(&body).map_err(report_validation_errors)?;

            let book = api.update_book(&update).await.map_err(report_api_error)?;
            println!("updated book {}: {}", book.id, book.title);
        }
        Command::Delete { id } => {
            api.delete_book(id).await.map_err(report_api_error)?;
            println!("deleted book {id}");
        }
        Command::Browse { limit } => {
            let limit = limit.unwrap_or(settings.catalog.page_size).max(1);
            browse(api, limit).await?;
        }
    }

    Ok(())
}

/// Surface validation failures inline, one line per offending field.
fn report_validation_errors(errors: schema::ValidationErrors) -> anyhow::Error {
    for error in &errors.0 {
        eprintln!("  {}: {}", error.field, error.message);
    }
    anyhow::anyhow!("{errors}")
}

fn report_api_error(error: ApiError) -> anyhow::Error {
    if let ApiError::Validation(fields) = &error {
        for field in fields {
            eprintln!("  {}: {}", field.field, field.message);
        }
    }
    anyhow::anyhow!(error)
}

fn print_books(books: &[Book]) {
    if books.is_empty() {
        println!("(no books)");
        return;
    }
    for book in books {
        println!(
            "{:>4}  {:<32} {:<24} {:<16} {:>5}  {}",
            book.id, book.title, book.author, book.genre, book.published_year, book.status
        );
    }
}

const BROWSE_HELP: &str = "\
commands:
  n              next page
  p              previous page
  g <n>          go to page n
  s <text>       search by title or author (empty to clear)
  genre <name>   filter by genre (empty to clear)
  status <name>  filter by status (empty to clear)
  clear          clear all filters
  rm <id>        delete a book
  r              refresh the current page
  q              quit";

/// Interactive pager over the catalog.
async fn browse(api: Arc<HttpCatalogApi>, limit: u32) -> anyhow::Result<()> {
    let mut browser = CatalogBrowser::new(api, limit);

    println!("{BROWSE_HELP}");
    match browser.current_view().await {
        Ok(view) => print_view(&view, &browser),
        Err(error) => eprintln!("failed to load catalog: {error}"),
    }

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "q" => break,
            "n" => match browser.next_page() {
                Nav::AtLastPage => println!("There is no next page"),
                _ => render_current(&mut browser).await,
            },
            "p" => match browser.previous_page() {
                Nav::AtFirstPage => println!("There is no previous page"),
                _ => render_current(&mut browser).await,
            },
            "g" => match rest.parse::<u32>() {
                Ok(page) => {
                    browser.go_to_page(page);
                    render_current(&mut browser).await;
                }
                Err(_) => println!("usage: g <page>"),
            },
            "s" => {
                browser.set_search(rest);
                render_current(&mut browser).await;
            }
            "genre" => {
                browser.set_genre((!rest.is_empty()).then(|| rest.to_string()));
                render_current(&mut browser).await;
            }
            "status" => {
                browser.set_status((!rest.is_empty()).then(|| rest.to_string()));
                render_current(&mut browser).await;
            }
            "clear" => {
                browser.clear_filters();
                render_current(&mut browser).await;
            }
            "rm" => match rest.parse::<BookId>() {
                Ok(id) => match browser.delete_book(id).await {
                    Ok(()) => {
                        println!("deleted book {id}");
                        match browser.refresh().await {
                            Ok(view) => print_view(&view, &browser),
                            Err(error) => eprintln!("refresh failed: {error}"),
                        }
                    }
                    Err(error) => eprintln!("delete failed: {error}"),
                },
                Err(_) => println!("usage: rm <id>"),
            },
            "r" => match browser.refresh().await {
                Ok(view) => print_view(&view, &browser),
                Err(error) => eprintln!("refresh failed: {error}"),
            },
            _ => println!("{BROWSE_HELP}"),
        }
    }

    Ok(())
}

/// Render the current page, keeping the previous output on a read failure.
async fn render_current(browser: &mut CatalogBrowser) {
    match browser.current_view().await {
        Ok(view) => print_view(&view, browser),
        Err(error) => eprintln!("failed to load page: {error} (showing last known data)"),
    }
}

fn print_view(view: &PageView, browser: &CatalogBrowser) {
    print_books(&view.books);
    println!(
        "page {} of {} ({} books total)",
        view.config.page, view.config.total_pages, view.config.total
    );
    if !browser.filters().is_empty() {
        println!("note: filters match within the fetched page only");
    }
}
