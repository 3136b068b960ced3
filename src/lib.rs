pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod openlibrary;
pub mod session;
pub mod shelf;
pub mod sign;
pub mod transport;

pub use client::BookshelfClient;
pub use error::{BookshelfError, Result};
pub use models::{
    Book, BookDetails, BookStatus, CatalogBook, Credentials, ShelfEntry, SignupForm, UserInfo,
};
pub use session::{CredentialStore, FileStore, MemoryStore, Session};
pub use shelf::Shelf;
