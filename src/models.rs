use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key/secret pair identifying a user of the service.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// A pair with an empty half is unusable for signing.
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Response wrapper used by every endpoint of the service.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(rename = "isOk")]
    pub is_ok: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub key: String,
    pub secret: String,
}

#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub key: String,
    pub secret: String,
}

impl UserInfo {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.key.clone(), self.secret.clone())
    }
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: u64,
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub published: Option<u32>,
    pub pages: Option<u32>,
}

/// A title search hit. Catalogue records are not on anyone's shelf yet, so
/// they are identified by ISBN and usually carry no shelf id.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogBook {
    pub id: Option<u64>,
    pub isbn: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub published: Option<u32>,
    pub pages: Option<u32>,
}

/// Reading progress, sent as `0`, `1` or `2` on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum BookStatus {
    #[default]
    New,
    Reading,
    Finished,
}

impl TryFrom<u8> for BookStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BookStatus::New),
            1 => Ok(BookStatus::Reading),
            2 => Ok(BookStatus::Finished),
            other => Err(format!("unknown book status: {}", other)),
        }
    }
}

impl From<BookStatus> for u8 {
    fn from(status: BookStatus) -> Self {
        match status {
            BookStatus::New => 0,
            BookStatus::Reading => 1,
            BookStatus::Finished => 2,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookStatus::New => write!(f, "new"),
            BookStatus::Reading => write!(f, "reading"),
            BookStatus::Finished => write!(f, "finished"),
        }
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "new" | "0" => Ok(BookStatus::New),
            "reading" | "1" => Ok(BookStatus::Reading),
            "finished" | "2" => Ok(BookStatus::Finished),
            other => Err(format!(
                "unknown status '{}', expected one of: new, reading, finished",
                other
            )),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShelfEntry {
    pub book: Book,
    pub status: BookStatus,
}

/// Book metadata looked up by ISBN before adding it to the shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub title: String,
    pub authors: Vec<String>,
    pub cover: Option<String>,
    pub published: Option<String>,
    pub pages: Option<u32>,
}
