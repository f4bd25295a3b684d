//! ISBN resolution against the Open Library search API. The only upstream
//! that is queried directly, without the CORS relay.

use super::Source;
use crate::config::AppConfig;
use crate::constants::OPEN_LIBRARY_SEARCH_URL;
use crate::error::{CiteError, Result};
use crate::types::{authors_from_free_text, parse_instant, CitationRecord, IdentifierKind, StructuredDate};
use serde::Deserialize;
use tracing::debug;

pub struct OpenLibrarySource {
    config: AppConfig,
}

impl OpenLibrarySource {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchDoc {
    title: Option<String>,
    number_of_pages_median: Option<u64>,
    author_name: Option<Vec<String>>,
    editions: Option<Editions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Editions {
    docs: Vec<EditionDoc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EditionDoc {
    publisher: Vec<String>,
    publish_place: Vec<String>,
    isbn: Vec<String>,
    publish_date: Vec<String>,
}

fn record_from_response(response: SearchResponse, isbn: &str) -> Result<CitationRecord> {
    let mut docs = response.docs;
    if docs.is_empty() {
        return Err(CiteError::MissingField(format!("no search results for isbn:{isbn}")));
    }
    let doc = docs.swap_remove(0);

    let authors = doc
        .author_name
        .ok_or_else(|| CiteError::MissingField("author_name".to_string()))?;

    let edition = doc
        .editions
        .and_then(|editions| editions.docs.into_iter().next())
        .unwrap_or_default();

    let issued = edition
        .publish_date
        .first()
        .and_then(|date| parse_instant(date))
        .map(StructuredDate::from_date);

    Ok(CitationRecord {
        record_type: "book".to_string(),
        title: doc.title,
        number_of_pages: doc.number_of_pages_median,
        author: Some(authors_from_free_text(authors)),
        publisher: edition.publisher.into_iter().next(),
        publisher_place: edition.publish_place.into_iter().next(),
        isbn: edition
            .isbn
            .into_iter()
            .next()
            .or_else(|| Some(isbn.to_string())),
        issued,
        accessed: StructuredDate::today(),
        ..Default::default()
    })
}

#[async_trait::async_trait]
impl Source for OpenLibrarySource {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Isbn
    }

    async fn fetch(&self, value: &str) -> Result<CitationRecord> {
        debug!(isbn = value, "querying Open Library");
        let url = format!(
            "{OPEN_LIBRARY_SEARCH_URL}?q=isbn:{value}&mode=everything&fields=*,editions"
        );
        let response: SearchResponse = self.config.get_json(&url).await?;
        record_from_response(response, value)
    }
}
