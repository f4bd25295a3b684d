//! Resolve bibliographic identifiers (URL, DOI, ISBN, PMID, PMCID) into
//! CSL-shaped citation records and render them as a formatted bibliography.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod render;
pub mod sources;
pub mod types;

pub use classify::classify;
pub use config::AppConfig;
pub use error::{CiteError, Result};
pub use types::{
    AuthorName, CitationRecord, FailureRecord, IdentifierKind, ResolutionOutcome, StructuredDate,
    TypedIdentifier,
};
