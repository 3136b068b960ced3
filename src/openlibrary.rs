//! ISBN lookups against the public Open Library books API.

use std::collections::HashMap;

use anyhow::Context;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{
    error::{BookshelfError, Result},
    models::BookDetails,
};

pub const DEFAULT_OPENLIBRARY_URL: &str = "https://openlibrary.org";

#[derive(Deserialize, Debug)]
struct Author {
    name: String,
}

#[derive(Deserialize, Debug, Default)]
struct Cover {
    small: Option<String>,
    medium: Option<String>,
    large: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Record {
    title: String,
    #[serde(default)]
    authors: Vec<Author>,
    cover: Option<Cover>,
    publish_date: Option<String>,
    number_of_pages: Option<u32>,
}

impl From<Record> for BookDetails {
    fn from(record: Record) -> Self {
        let cover = record
            .cover
            .and_then(|cover| cover.large.or(cover.medium).or(cover.small));
        BookDetails {
            title: record.title,
            authors: record.authors.into_iter().map(|author| author.name).collect(),
            cover,
            published: record.publish_date,
            pages: record.number_of_pages,
        }
    }
}

pub struct OpenLibrary {
    client: Client,
    base_url: Url,
}

impl OpenLibrary {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url
                .parse()
                .with_context(|| format!("invalid base url: {}", base_url))?,
        })
    }

    pub async fn lookup(&self, isbn: &str) -> Result<Option<BookDetails>> {
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(BookshelfError::validation("Please enter an ISBN."));
        }

        let url = self
            .base_url
            .join("api/books")
            .context("invalid endpoint: api/books")?;
        let bibkey = format!("ISBN:{}", isbn);
        debug!("Looking up {} on {}", bibkey, url);

        let response = self
            .client
            .get(url)
            .query(&[("bibkeys", bibkey.as_str()), ("format", "json"), ("jscmd", "data")])
            .send()
            .await?;

        response.error_for_status_ref()?;

        parse_lookup(&response.text().await?, isbn)
    }
}

fn parse_lookup(body: &str, isbn: &str) -> Result<Option<BookDetails>> {
    let mut records: HashMap<String, Record> = serde_json::from_str(body)?;
    Ok(records
        .remove(&format!("ISBN:{}", isbn))
        .map(BookDetails::from))
}
