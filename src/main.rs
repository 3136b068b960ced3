use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, error, LevelFilter};

use bookshelf::{
    config::Config,
    error::Result,
    logging,
    models::{Book, BookDetails, BookStatus, CatalogBook, ShelfEntry, SignupForm},
    openlibrary::OpenLibrary,
    session::{FileStore, Session},
    shelf::Shelf,
    transport::HttpTransport,
    BookshelfClient,
};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Manage your bookshelf from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Bookshelf service url
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// File holding the saved key and secret
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new user and save the issued credentials
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        key: String,
        #[arg(long, env = "BOOKSHELF_SECRET", hide_env_values = true)]
        secret: String,
    },
    /// Check a key/secret pair against the service and save it
    Login {
        #[arg(long)]
        key: String,
        #[arg(long, env = "BOOKSHELF_SECRET", hide_env_values = true)]
        secret: String,
    },
    /// Forget the saved credentials
    Logout,
    /// Show the logged in user
    Whoami,
    /// List the books on your shelf
    Books,
    /// Search the catalogue by title
    Search { title: String },
    /// Look up book details by ISBN on Open Library
    Lookup { isbn: String },
    /// Add a book to your shelf by ISBN
    Add { isbn: String },
    /// Change the reading status of a book (new, reading, finished)
    Status { id: u64, status: BookStatus },
    /// Remove a book from your shelf
    Delete { id: u64 },
}

fn print_entry(entry: &ShelfEntry) {
    println!("[{:>9}] {}", entry.status.to_string(), describe(&entry.book));
}

fn describe(book: &Book) -> String {
    let mut line = format!(
        "#{} {}",
        book.id,
        book.title.as_deref().unwrap_or("(untitled)")
    );
    if let Some(author) = &book.author {
        line.push_str(&format!(" by {}", author));
    }
    if let Some(published) = book.published {
        line.push_str(&format!(" ({})", published));
    }
    if let Some(pages) = book.pages {
        line.push_str(&format!(", {} pages", pages));
    }
    if let Some(isbn) = &book.isbn {
        line.push_str(&format!(", ISBN {}", isbn));
    }
    line
}

fn describe_hit(hit: &CatalogBook) -> String {
    let mut line = format!(
        "ISBN {} {}",
        hit.isbn,
        hit.title.as_deref().unwrap_or("(untitled)")
    );
    if let Some(author) = &hit.author {
        line.push_str(&format!(" by {}", author));
    }
    if let Some(published) = hit.published {
        line.push_str(&format!(" ({})", published));
    }
    if let Some(id) = hit.id {
        line.push_str(&format!(", on shelf as #{}", id));
    }
    line
}

fn print_details(details: &BookDetails) {
    println!("{}", details.title);
    if !details.authors.is_empty() {
        println!("  Authors: {}", details.authors.join(", "));
    }
    if let Some(published) = &details.published {
        println!("  Published: {}", published);
    }
    if let Some(pages) = details.pages {
        println!("  Pages: {}", pages);
    }
    if let Some(cover) = &details.cover {
        println!("  Cover: {}", cover);
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let session = Session::load(FileStore::new(&config.credentials_path))?;
    let mut client = BookshelfClient::new(HttpTransport::new(&config.api_url)?, session);

    match cli.command {
        Command::Signup {
            name,
            email,
            key,
            secret,
        } => {
            let user = client
                .signup(SignupForm {
                    name,
                    email,
                    key,
                    secret,
                })
                .await?;
            println!("Registered {}, credentials saved.", user.key);
        }
        Command::Login { key, secret } => {
            let user = client.login(&key, &secret).await?;
            println!(
                "Logged in as {}.",
                user.name.as_deref().unwrap_or(user.key.as_str())
            );
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out.");
        }
        Command::Whoami => {
            let user = client.myself().await?;
            println!("Key: {}", user.key);
            if let Some(name) = &user.name {
                println!("Name: {}", name);
            }
            if let Some(email) = &user.email {
                println!("Email: {}", email);
            }
        }
        Command::Books => {
            let mut shelf = Shelf::new();
            shelf.refresh(&client).await?;
            if shelf.entries().is_empty() {
                println!("No books available.");
            }
            shelf.entries().iter().for_each(print_entry);
        }
        Command::Search { title } => {
            let books = client.search_books(&title).await?;
            if books.is_empty() {
                println!("No book found.");
            }
            for hit in &books {
                println!("{}", describe_hit(hit));
            }
        }
        Command::Add { isbn } => {
            let mut shelf = Shelf::new();
            match shelf.add(&client, &isbn).await? {
                Some(entry) => print_entry(entry),
                None => println!("Book added successfully!"),
            }
        }
        Command::Status { id, status } => {
            if let Some(entry) = client.edit_book(id, status).await? {
                print_entry(&entry);
            } else {
                println!("Book #{} marked as {}.", id, status);
            }
        }
        Command::Delete { id } => {
            client.delete_book(id).await?;
            println!("Book #{} removed.", id);
        }
        Command::Lookup { isbn } => {
            let library = OpenLibrary::new(&config.openlibrary_url)?;
            match library.lookup(&isbn).await? {
                Some(details) => print_details(&details),
                None => println!("No book found with this ISBN."),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(path) = &cli.credentials {
        config.credentials_path = path.clone();
    }
    config.log_level = match cli.verbose {
        0 => config.log_level,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    if let Err(err) = logging::init(config.log_level) {
        eprintln!("Failed to initialize logging: {}", err);
    }
    debug!("{:?}", config);

    if let Err(err) = run(cli, config).await {
        error!("{:?}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
