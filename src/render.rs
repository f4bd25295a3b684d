//! Bibliography rendering. The CSL style and locale definitions are fetched
//! by name from the upstream citation-style-language repositories, then the
//! record batch is handed to hayagriva. The whole step succeeds or fails as
//! one unit; individual records are never dropped here.

use crate::config::AppConfig;
use crate::constants::{LOCALES_REPO_URL, STYLES_REPO_URL};
use crate::error::{CiteError, Result};
use crate::types::CitationRecord;
use hayagriva::citationberg::{IndependentStyle, Locale, LocaleFile};
use hayagriva::io::from_yaml_str;
use hayagriva::{
    BibliographyDriver, BibliographyRequest, BufWriteFormat, CitationItem, CitationRequest,
};
use serde_json::{json, Map, Value};
use tracing::debug;

pub struct Renderer {
    config: AppConfig,
}

impl Renderer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    async fn fetch_style(&self, style: &str) -> Result<String> {
        let url = self.config.proxied(&format!("{STYLES_REPO_URL}/{style}.csl"));
        debug!(style, "fetching style definition");
        self.config.get_text(&url).await
    }

    async fn fetch_locale(&self, locale: &str) -> Result<String> {
        let url = self
            .config
            .proxied(&format!("{LOCALES_REPO_URL}/locales-{locale}.xml"));
        debug!(locale, "fetching locale definition");
        self.config.get_text(&url).await
    }

    /// Renders the batch into plain-text bibliography lines.
    pub async fn bibliography(
        &self,
        records: &[CitationRecord],
        style: &str,
        locale: &str,
    ) -> Result<String> {
        let style_xml = self.fetch_style(style).await?;
        let locale_xml = self.fetch_locale(locale).await?;

        let style = IndependentStyle::from_xml(&style_xml)
            .map_err(|err| CiteError::Render(format!("invalid style definition: {err}")))?;
        let locale: Locale = LocaleFile::from_xml(&locale_xml)
            .map_err(|err| CiteError::Render(format!("invalid locale definition: {err}")))?
            .into();
        let locales = [locale];

        let yaml = library_yaml(records)?;
        let library = from_yaml_str(&yaml)
            .map_err(|err| CiteError::Render(format!("record conversion failed: {err}")))?;

        let mut driver = BibliographyDriver::new();
        for entry in library.iter() {
            driver.citation(CitationRequest::from_items(
                vec![CitationItem::with_entry(entry)],
                &style,
                &locales,
            ));
        }

        let rendered = driver.finish(BibliographyRequest {
            style: &style,
            locale: None,
            locale_files: &locales,
        });

        let bibliography = rendered
            .bibliography
            .ok_or_else(|| CiteError::Render("style produced no bibliography".to_string()))?;

        let mut output = String::new();
        for item in bibliography.items {
            let mut line = String::new();
            if let Some(first) = &item.first_field {
                first
                    .write_buf(&mut line, BufWriteFormat::Plain)
                    .map_err(|err| CiteError::Render(err.to_string()))?;
                line.push(' ');
            }
            item.content
                .write_buf(&mut line, BufWriteFormat::Plain)
                .map_err(|err| CiteError::Render(err.to_string()))?;
            output.push_str(line.trim());
            output.push('\n');
        }
        Ok(output)
    }
}

/// The engine's entry type for a CSL type, plus the parent type carrying the
/// container title when the CSL type implies one.
fn entry_types(record_type: &str) -> (&'static str, Option<&'static str>) {
    match record_type {
        "article-journal" => ("article", Some("periodical")),
        "article-magazine" => ("article", Some("periodical")),
        "article-newspaper" => ("article", Some("newspaper")),
        "paper-conference" => ("article", Some("proceedings")),
        "chapter" => ("chapter", Some("book")),
        "webpage" => ("web", Some("web")),
        "book" => ("book", None),
        "thesis" => ("thesis", None),
        "report" => ("report", None),
        _ => ("misc", None),
    }
}

fn date_value(parts: &[i32]) -> Option<Value> {
    match parts {
        [year] => Some(json!(year)),
        [year, month] => Some(json!(format!("{year:04}-{month:02}"))),
        [year, month, day, ..] => Some(json!(format!("{year:04}-{month:02}-{day:02}"))),
        _ => None,
    }
}

/// Converts one record into an entry of hayagriva's library format.
pub fn entry_value(record: &CitationRecord) -> Value {
    let (entry_type, parent_type) = entry_types(&record.record_type);
    let mut entry = Map::new();
    entry.insert("type".to_string(), json!(entry_type));

    if let Some(title) = &record.title {
        entry.insert("title".to_string(), json!(title));
    }

    if let Some(authors) = &record.author {
        let names: Vec<String> = authors
            .iter()
            .map(|author| {
                if author.family.is_empty() {
                    author.given.clone()
                } else if author.given.is_empty() {
                    author.family.clone()
                } else {
                    format!("{}, {}", author.family, author.given)
                }
            })
            .filter(|name| !name.is_empty())
            .collect();
        if !names.is_empty() {
            entry.insert("author".to_string(), json!(names));
        }
    }

    if let Some(date) = record
        .issued
        .as_ref()
        .and_then(|issued| issued.first_parts())
        .and_then(date_value)
    {
        entry.insert("date".to_string(), date);
    }

    if let Some(url) = &record.url {
        let accessed = record.accessed.first_parts().and_then(date_value);
        let value = match accessed {
            Some(date) => json!({ "value": url, "date": date }),
            None => json!(url),
        };
        entry.insert("url".to_string(), value);
    }

    let mut serial = Map::new();
    if let Some(doi) = &record.doi {
        serial.insert("doi".to_string(), json!(doi));
    }
    if let Some(isbn) = &record.isbn {
        serial.insert("isbn".to_string(), json!(isbn));
    }
    if let Some(issn) = record.issn.as_ref().and_then(|issn| issn.first()) {
        serial.insert("issn".to_string(), json!(issn));
    }
    if let Some(pmid) = &record.pmid {
        serial.insert("pmid".to_string(), json!(pmid));
    }
    if let Some(pmcid) = &record.pmcid {
        serial.insert("pmcid".to_string(), json!(pmcid));
    }
    if !serial.is_empty() {
        entry.insert("serial-number".to_string(), Value::Object(serial));
    }

    if let Some(page) = &record.page {
        entry.insert("page-range".to_string(), json!(page));
    }
    if let Some(pages) = record.number_of_pages {
        entry.insert("page-total".to_string(), json!(pages));
    }
    if let Some(publisher) = &record.publisher {
        entry.insert("publisher".to_string(), json!(publisher));
    }
    if let Some(place) = &record.publisher_place {
        entry.insert("location".to_string(), json!(place));
    }

    match parent_type {
        Some(parent_type) => {
            let mut parent = Map::new();
            parent.insert("type".to_string(), json!(parent_type));
            if let Some(container) = &record.container_title {
                parent.insert("title".to_string(), json!(container));
            }
            if let Some(volume) = &record.volume {
                parent.insert("volume".to_string(), json!(volume));
            }
            if let Some(issue) = &record.issue {
                parent.insert("issue".to_string(), json!(issue));
            }
            // A parent with nothing but a type says nothing.
            if parent.len() > 1 {
                entry.insert("parent".to_string(), Value::Object(parent));
            }
        }
        None => {
            if let Some(volume) = &record.volume {
                entry.insert("volume".to_string(), json!(volume));
            }
        }
    }

    Value::Object(entry)
}

/// Serializes the batch as a hayagriva YAML library, keyed `ref-001..`.
/// Keys are zero-padded because the map sorts lexically; unpadded keys would
/// reorder batches of ten or more.
pub fn library_yaml(records: &[CitationRecord]) -> Result<String> {
    let mut library = Map::new();
    for (index, record) in records.iter().enumerate() {
        library.insert(format!("ref-{:03}", index + 1), entry_value(record));
    }
    serde_yaml::to_string(&Value::Object(library))
        .map_err(|err| CiteError::Render(format!("library serialization failed: {err}")))
}
