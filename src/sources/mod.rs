//! One source per identifier kind. Each source performs a single logical
//! retrieval and maps the response into a `CitationRecord`; the `resolve`
//! boundary converts every error into a `FailureRecord`.

pub mod crossref;
pub mod ncbi;
pub mod open_library;
pub mod webpage;

use crate::config::AppConfig;
use crate::constants;
use crate::error::Result;
use crate::types::{AuthorName, CitationRecord, FailureRecord, IdentifierKind, ResolutionOutcome, TypedIdentifier};
use serde::Deserialize;
use tracing::warn;

#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// The identifier kind this source handles.
    fn kind(&self) -> IdentifierKind;

    /// Fetch and normalize one identifier's metadata.
    async fn fetch(&self, value: &str) -> Result<CitationRecord>;
}

/// Picks the source for an identifier kind.
pub fn source_for(config: &AppConfig, kind: IdentifierKind) -> Option<Box<dyn Source>> {
    match kind {
        IdentifierKind::Doi => Some(Box::new(crossref::CrossrefSource::new(config.clone()))),
        IdentifierKind::Url => Some(Box::new(webpage::WebpageSource::new(config.clone()))),
        IdentifierKind::Isbn => Some(Box::new(open_library::OpenLibrarySource::new(config.clone()))),
        IdentifierKind::Pmid => Some(Box::new(ncbi::PubmedSource::new(config.clone()))),
        IdentifierKind::Pmcid => Some(Box::new(ncbi::PmcSource::new(config.clone()))),
        IdentifierKind::Unrecognized => None,
    }
}

/// Resolves one identifier to exactly one outcome. Retrieval errors stop
/// here: they become `FailureRecord`s carrying the original value and kind.
pub async fn resolve(config: &AppConfig, identifier: &TypedIdentifier) -> ResolutionOutcome {
    let Some(source) = source_for(config, identifier.kind) else {
        return ResolutionOutcome::Failed(FailureRecord::new(identifier.kind, &identifier.value));
    };

    match source.fetch(&identifier.value).await {
        Ok(record) => ResolutionOutcome::Resolved(record),
        Err(err) => {
            warn!(
                kind = %identifier.kind,
                identifier = %identifier.value,
                error = %err,
                "retrieval failed"
            );
            if config.log_errors {
                eprintln!(
                    "\n{} {}{}{}\n",
                    constants::error_banner(),
                    constants::RED,
                    err,
                    constants::RESET
                );
            }
            ResolutionOutcome::Failed(FailureRecord::new(identifier.kind, &identifier.value))
        }
    }
}

/// Author entry as the JSON upstreams ship it; organizations carry only
/// `name`, which lands in the family slot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UpstreamAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
    pub name: Option<String>,
}

impl UpstreamAuthor {
    pub(crate) fn into_author_name(self) -> AuthorName {
        AuthorName {
            given: self.given.unwrap_or_default(),
            family: self.family.or(self.name).unwrap_or_default(),
        }
    }
}

pub(crate) fn map_upstream_authors(authors: Vec<UpstreamAuthor>) -> Option<Vec<AuthorName>> {
    if authors.is_empty() {
        None
    } else {
        Some(authors.into_iter().map(UpstreamAuthor::into_author_name).collect())
    }
}

/// Upstream URL when present, otherwise a doi.org link derived from the DOI.
pub(crate) fn url_or_doi_link(url: Option<String>, doi: Option<&str>) -> Option<String> {
    url.or_else(|| doi.map(|doi| format!("https://doi.org/{doi}")))
}
