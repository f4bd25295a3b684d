//! PMID and PMCID resolution against the NCBI literature citation exporter,
//! which already speaks CSL.

use super::{map_upstream_authors, url_or_doi_link, Source, UpstreamAuthor};
use crate::config::AppConfig;
use crate::constants::NCBI_CTXP_URL;
use crate::error::Result;
use crate::types::{de, CitationRecord, IdentifierKind, StructuredDate};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CtxpItem {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "ISSN", deserialize_with = "de::opt_string_list")]
    issn: Option<Vec<String>>,
    #[serde(rename = "PMID", deserialize_with = "de::opt_stringlike")]
    pmid: Option<String>,
    #[serde(rename = "PMCID", deserialize_with = "de::opt_stringlike")]
    pmcid: Option<String>,
    #[serde(rename = "container-title", deserialize_with = "de::opt_first_string")]
    container_title: Option<String>,
    #[serde(deserialize_with = "de::opt_first_string")]
    title: Option<String>,
    #[serde(deserialize_with = "de::opt_stringlike")]
    issue: Option<String>,
    issued: Option<StructuredDate>,
    #[serde(deserialize_with = "de::opt_stringlike")]
    page: Option<String>,
    #[serde(rename = "publisher-place")]
    publisher_place: Option<String>,
    source: Option<String>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    #[serde(deserialize_with = "de::opt_stringlike")]
    volume: Option<String>,
    author: Vec<UpstreamAuthor>,
}

fn record_from_item(item: CtxpItem) -> CitationRecord {
    let url = url_or_doi_link(item.url, item.doi.as_deref());

    CitationRecord {
        record_type: item.item_type.unwrap_or_else(|| "article-journal".to_string()),
        title: item.title,
        author: map_upstream_authors(item.author),
        container_title: item.container_title,
        doi: item.doi,
        url,
        issn: item.issn,
        pmid: item.pmid,
        pmcid: item.pmcid,
        issue: item.issue,
        issued: item.issued,
        page: item.page,
        publisher_place: item.publisher_place,
        source: item.source,
        volume: item.volume,
        accessed: StructuredDate::today(),
        ..Default::default()
    }
}

async fn fetch_ctxp(config: &AppConfig, endpoint: &str, id: &str) -> Result<CitationRecord> {
    let url = config.proxied(&format!("{NCBI_CTXP_URL}/{endpoint}/?format=csl&id={id}"));
    let item: CtxpItem = config.get_json(&url).await?;
    Ok(record_from_item(item))
}

pub struct PubmedSource {
    config: AppConfig,
}

impl PubmedSource {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl Source for PubmedSource {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Pmid
    }

    async fn fetch(&self, value: &str) -> Result<CitationRecord> {
        debug!(pmid = value, "querying NCBI pubmed exporter");
        fetch_ctxp(&self.config, "pubmed", value).await
    }
}

pub struct PmcSource {
    config: AppConfig,
}

impl PmcSource {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

/// PMC ids are sent without their `PMC` prefix.
fn pmc_numeric_id(value: &str) -> &str {
    value.strip_prefix("PMC").unwrap_or(value)
}

#[async_trait::async_trait]
impl Source for PmcSource {
    fn kind(&self) -> IdentifierKind {
        IdentifierKind::Pmcid
    }

    async fn fetch(&self, value: &str) -> Result<CitationRecord> {
        debug!(pmcid = value, "querying NCBI pmc exporter");
        fetch_ctxp(&self.config, "pmc", pmc_numeric_id(value)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_pmc_prefix_once() {
        assert_eq!(pmc_numeric_id("PMC8675309"), "8675309");
        assert_eq!(pmc_numeric_id("8675309"), "8675309");
    }

    #[test]
    fn maps_csl_item_fields() {
        let item: CtxpItem = serde_json::from_value(json!({
            "DOI": "10.1093/nar/gkaa1100",
            "ISSN": "1362-4962",
            "PMID": "33237286",
            "PMCID": "PMC7778908",
            "container-title": "Nucleic Acids Research",
            "title": "Database resources of the NCBI",
            "issue": "D1",
            "issued": { "date-parts": [[2021, 1, 8]] },
            "page": "D10-D17",
            "type": "article-journal",
            "volume": 49,
            "author": [{ "given": "Eric W", "family": "Sayers" }],
        }))
        .unwrap();

        let record = record_from_item(item);
        assert_eq!(record.record_type, "article-journal");
        assert_eq!(record.pmid.as_deref(), Some("33237286"));
        assert_eq!(record.pmcid.as_deref(), Some("PMC7778908"));
        assert_eq!(record.volume.as_deref(), Some("49"));
        assert_eq!(record.issn, Some(vec!["1362-4962".to_string()]));
        assert_eq!(
            record.url.as_deref(),
            Some("https://doi.org/10.1093/nar/gkaa1100")
        );
        assert_eq!(record.issued.unwrap().date_parts, vec![vec![2021, 1, 8]]);
    }

    #[test]
    fn empty_item_still_yields_a_typed_record() {
        let record = record_from_item(CtxpItem::default());
        assert_eq!(record.record_type, "article-journal");
        assert!(record.title.is_none());
        assert!(record.author.is_none());
    }
}
