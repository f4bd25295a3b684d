//! URL resolution by scraping standard metadata out of the target page.

use super::Source;
use crate::config::AppConfig;
use crate::error::Result;
use crate::types::{parse_instant, AuthorName, CitationRecord, IdentifierKind, StructuredDate};
use scraper::{Html, Selector};
use tracing::debug;

pub struct WebpageSource {
    config: AppConfig,
}

impl WebpageSource {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

/// First element matching `selector`: the named attribute when present,
/// otherwise the element's text. Empty string when nothing matches.
fn extract_content(document: &Html, selector: &str, attr: Option<&str>) -> String {
    let selector = Selector::parse(selector).unwrap();
    let Some(element) = document.select(&selector).next() else {
        return String::new();
    };
    match attr {
        Some(attr) => element
            .value()
            .attr(attr)
            .map(str::to_string)
            .unwrap_or_else(|| element.text().collect()),
        None => element.text().collect(),
    }
}

/// Byline candidates in page order: a rel=author element, author meta tags,
/// then the byline spans some news sites use. Blanks dropped, exact
/// duplicates removed keeping the first occurrence.
fn extract_authors(document: &Html) -> Vec<AuthorName> {
    let mut candidates = Vec::new();

    let author_selector = Selector::parse(r#".author[rel="author"]"#).unwrap();
    if let Some(element) = document.select(&author_selector).next() {
        candidates.push(element.text().collect::<String>());
    }

    let meta_selector =
        Selector::parse(r#"meta[name="author"], meta[name="article:author"]"#).unwrap();
    for meta in document.select(&meta_selector) {
        candidates.push(meta.value().attr("content").unwrap_or_default().to_string());
    }

    let byline_selector =
        Selector::parse(r#"span.css-1baulvz.last-byline[itemprop="name"]"#).unwrap();
    for span in document.select(&byline_selector) {
        candidates.push(span.text().collect::<String>().trim().to_string());
    }

    let mut names: Vec<String> = Vec::new();
    for candidate in candidates {
        if !candidate.trim().is_empty() && !names.contains(&candidate) {
            names.push(candidate);
        }
    }

    names
        .iter()
        .map(|name| AuthorName::from_free_text(name))
        .collect()
}

fn extract_issued(document: &Html) -> Option<StructuredDate> {
    let probes: [(&str, Option<&str>); 8] = [
        (r#"meta[name="date"]"#, Some("content")),
        (r#"meta[name="article:published_time"]"#, Some("content")),
        (r#"meta[property="article:published_time"]"#, Some("content")),
        (r#"meta[name="article:modified_time"]"#, Some("content")),
        (r#"meta[property="article:modified_time"]"#, Some("content")),
        (r#"meta[name="og:updated_time"]"#, Some("content")),
        (r#"meta[property="og:updated_time"]"#, Some("content")),
        (".publication-date", None),
    ];

    probes
        .iter()
        .map(|(selector, attr)| extract_content(document, selector, *attr))
        .find(|value| !value.is_empty())
        .and_then(|value| parse_instant(&value))
        .map(StructuredDate::from_date)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Builds a webpage record from raw HTML. Pure so it can be exercised
/// without the network.
pub fn extract_record(html: &str, input_url: &str) -> CitationRecord {
    let document = Html::parse_document(html);

    let authors = extract_authors(&document);

    let url = [
        extract_content(&document, r#"meta[property="og:url"]"#, Some("content")),
        extract_content(&document, r#"meta[name="url"]"#, Some("content")),
        extract_content(&document, r#"link[rel="canonical"]"#, Some("href")),
    ]
    .into_iter()
    .find(|value| !value.is_empty())
    .unwrap_or_else(|| input_url.to_string());

    CitationRecord {
        record_type: "webpage".to_string(),
        title: non_empty(extract_content(&document, "title", None)),
        author: if authors.is_empty() { None } else { Some(authors) },
        container_title: non_empty(extract_content(
            &document,
            r#"meta[property="og:site_name"]"#,
            Some("content"),
        )),
        publisher: non_empty(extract_content(
            &document,
            r#"meta[property="article:publisher"]"#,
            Some("content"),
        )),
        issued: extract_issued(&document),
        url: Some(url),
        accessed: StructuredDate::today(),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl Source for WebpageSource {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Url
    }

    async fn fetch(&self, value: &str) -> Result<CitationRecord> {
        debug!(url = value, "fetching webpage");
        let url = self.config.proxied(value);
        let html = self.config.get_text(&url).await?;
        Ok(extract_record(&html, value))
    }
}
