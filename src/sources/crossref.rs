//! DOI resolution against the Crossref works API.

use super::{map_upstream_authors, url_or_doi_link, Source, UpstreamAuthor};
use crate::config::AppConfig;
use crate::constants::CROSSREF_WORKS_URL;
use crate::error::Result;
use crate::types::{de, CitationRecord, IdentifierKind, StructuredDate};
use serde::Deserialize;
use tracing::debug;

pub struct CrossrefSource {
    config: AppConfig,
}

impl CrossrefSource {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefWork,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CrossrefWork {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "ISSN", deserialize_with = "de::opt_string_list")]
    issn: Option<Vec<String>>,
    // Crossref wraps titles and container titles in arrays.
    #[serde(deserialize_with = "de::opt_first_string")]
    title: Option<String>,
    #[serde(rename = "container-title", deserialize_with = "de::opt_first_string")]
    container_title: Option<String>,
    #[serde(deserialize_with = "de::opt_stringlike")]
    issue: Option<String>,
    issued: Option<StructuredDate>,
    #[serde(deserialize_with = "de::opt_stringlike")]
    page: Option<String>,
    #[serde(rename = "publisher-place")]
    publisher_place: Option<String>,
    source: Option<String>,
    #[serde(deserialize_with = "de::opt_stringlike")]
    volume: Option<String>,
    #[serde(rename = "type")]
    work_type: Option<String>,
    author: Vec<UpstreamAuthor>,
}

fn record_from_work(work: CrossrefWork) -> CitationRecord {
    let url = url_or_doi_link(work.url, work.doi.as_deref());

    // Crossref's "journal-article" is "article-journal" in CSL vocabulary.
    let record_type = match work.work_type {
        Some(kind) if kind == "journal-article" => "article-journal".to_string(),
        Some(kind) => kind,
        None => "article-journal".to_string(),
    };

    CitationRecord {
        record_type,
        title: work.title,
        author: map_upstream_authors(work.author),
        container_title: work.container_title,
        doi: work.doi,
        url,
        issn: work.issn,
        issue: work.issue,
        issued: work.issued,
        page: work.page,
        publisher_place: work.publisher_place,
        source: work.source,
        volume: work.volume,
        accessed: StructuredDate::today(),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl Source for CrossrefSource {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Doi
    }

    async fn fetch(&self, value: &str) -> Result<CitationRecord> {
        debug!(doi = value, "querying Crossref");
        let url = self.config.proxied(&format!("{CROSSREF_WORKS_URL}/{value}"));
        let response: CrossrefResponse = self.config.get_json(&url).await?;
        Ok(record_from_work(response.message))
    }
}
