use log::info;

use crate::{
    client::BookshelfClient,
    error::Result,
    models::{BookStatus, ShelfEntry},
    session::CredentialStore,
    transport::Transport,
};

/// Local copy of the user's books, as last fetched from the service.
///
/// Entries only change after the service confirms a write, so a failed call
/// leaves the shelf exactly as it was.
#[derive(Debug, Default)]
pub struct Shelf {
    entries: Vec<ShelfEntry>,
}

impl Shelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ShelfEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&ShelfEntry> {
        self.entries.iter().find(|entry| entry.book.id == id)
    }

    pub async fn refresh<T: Transport, S: CredentialStore>(
        &mut self,
        client: &BookshelfClient<T, S>,
    ) -> Result<()> {
        self.entries = client.fetch_books().await?;
        info!("Shelf holds {} books", self.entries.len());
        Ok(())
    }

    pub async fn add<T: Transport, S: CredentialStore>(
        &mut self,
        client: &BookshelfClient<T, S>,
        isbn: &str,
    ) -> Result<Option<&ShelfEntry>> {
        match client.add_book(isbn).await? {
            Some(entry) => {
                self.entries.retain(|existing| existing.book.id != entry.book.id);
                self.entries.push(entry);
                Ok(self.entries.last())
            }
            None => Ok(None),
        }
    }

    pub async fn set_status<T: Transport, S: CredentialStore>(
        &mut self,
        client: &BookshelfClient<T, S>,
        id: u64,
        status: BookStatus,
    ) -> Result<()> {
        let updated = client.edit_book(id, status).await?;
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.book.id == id) {
            match updated {
                Some(updated) => *entry = updated,
                None => entry.status = status,
            }
        }
        Ok(())
    }

    pub async fn delete<T: Transport, S: CredentialStore>(
        &mut self,
        client: &BookshelfClient<T, S>,
        id: u64,
    ) -> Result<()> {
        client.delete_book(id).await?;
        self.entries.retain(|entry| entry.book.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookshelfError;
    use crate::models::Credentials;
    use crate::session::{MemoryStore, Session};
    use crate::transport::testing::StubTransport;

    const TWO_BOOKS: &str = r#"{"isOk":true,"data":[
        {"book":{"id":5,"title":"Dune"},"status":1},
        {"book":{"id":6,"title":"Emma"},"status":0}
    ]}"#;

    fn client(transport: StubTransport) -> BookshelfClient<StubTransport, MemoryStore> {
        let store = MemoryStore::with_credentials(Credentials::new("abc", "xyz"));
        BookshelfClient::new(transport, Session::load(store).unwrap())
    }

    #[tokio::test]
    async fn failed_delete_leaves_shelf_unchanged() {
        let client = client(
            StubTransport::new()
                .respond(200, TWO_BOOKS)
                .respond(200, r#"{"isOk":false,"message":"not found"}"#),
        );
        let mut shelf = Shelf::new();
        shelf.refresh(&client).await.unwrap();
        let before = shelf.entries().to_vec();

        let err = shelf.delete(&client, 5).await.unwrap_err();

        assert_eq!(err.to_string(), "not found");
        assert_eq!(shelf.entries(), before.as_slice());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_entry() {
        let client = client(
            StubTransport::new()
                .respond(200, TWO_BOOKS)
                .respond(200, r#"{"isOk":true,"data":[]}"#),
        );
        let mut shelf = Shelf::new();
        shelf.refresh(&client).await.unwrap();

        shelf.delete(&client, 5).await.unwrap();

        assert!(shelf.get(5).is_none());
        assert!(shelf.get(6).is_some());
    }

    #[tokio::test]
    async fn status_change_applies_after_confirmation() {
        let client = client(
            StubTransport::new()
                .respond(200, TWO_BOOKS)
                .respond(200, r#"{"isOk":true,"data":{"book":{"id":6,"title":"Emma"},"status":2}}"#),
        );
        let mut shelf = Shelf::new();
        shelf.refresh(&client).await.unwrap();

        shelf.set_status(&client, 6, BookStatus::Finished).await.unwrap();

        assert_eq!(shelf.get(6).unwrap().status, BookStatus::Finished);
    }

    #[tokio::test]
    async fn add_appends_returned_entry() {
        let client = client(StubTransport::new().respond(
            200,
            r#"{"isOk":true,"data":{"book":{"id":7,"isbn":"9780441013593"},"status":0}}"#,
        ));
        let mut shelf = Shelf::new();

        let added = shelf.add(&client, "9780441013593").await.unwrap();

        assert_eq!(added.map(|entry| entry.book.id), Some(7));
        assert_eq!(shelf.entries().len(), 1);
    }

    #[tokio::test]
    async fn refresh_without_credentials_keeps_entries() {
        let client = BookshelfClient::new(
            StubTransport::new(),
            Session::load(MemoryStore::new()).unwrap(),
        );
        let mut shelf = Shelf::new();

        assert!(matches!(
            shelf.refresh(&client).await,
            Err(BookshelfError::MissingCredentials)
        ));
        assert!(shelf.entries().is_empty());
    }
}
