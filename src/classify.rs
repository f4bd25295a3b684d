//! Maps raw input tokens to typed identifiers.
//!
//! An explicit `kind:` prefix always wins; otherwise the first matching
//! pattern in the table decides. Unmatched input is `Unrecognized`, not an
//! error.

use crate::types::{IdentifierKind, TypedIdentifier};
use once_cell::sync::Lazy;
use regex::Regex;

static DOI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((https?://)?(dx\.)?doi\.org/)?10\.\d{4,9}/[-._;()/:a-zA-Z0-9]+$").unwrap()
});

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://)[a-zA-Z0-9\-._~:/?#\[\]@!$&'()*+,;=]+$").unwrap());

static PMCID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^PMC\d+$").unwrap());

static PMID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{7,10}$").unwrap());

// ISBN-13 only; ISBN-10 inputs need the explicit isbn: prefix.
static ISBN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(97[89])\d{9}(\d|X)$").unwrap());

const PREFIXES: [(&str, IdentifierKind); 5] = [
    ("url:", IdentifierKind::Url),
    ("doi:", IdentifierKind::Doi),
    ("pmcid:", IdentifierKind::Pmcid),
    ("pmid:", IdentifierKind::Pmid),
    ("isbn:", IdentifierKind::Isbn),
];

/// Classifies a raw token into a typed identifier.
pub fn classify(raw: &str) -> TypedIdentifier {
    let trimmed = raw.trim();

    for (prefix, kind) in PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return TypedIdentifier::new(kind, rest.trim());
        }
    }

    let rules: [(IdentifierKind, &Regex); 5] = [
        (IdentifierKind::Doi, &DOI_PATTERN),
        (IdentifierKind::Url, &URL_PATTERN),
        (IdentifierKind::Pmcid, &PMCID_PATTERN),
        (IdentifierKind::Pmid, &PMID_PATTERN),
        (IdentifierKind::Isbn, &ISBN_PATTERN),
    ];

    for (kind, pattern) in rules {
        // ISBNs match with hyphens stripped, but the stored value keeps them.
        let matched = if kind == IdentifierKind::Isbn {
            pattern.is_match(&trimmed.replace('-', ""))
        } else {
            pattern.is_match(trimmed)
        };
        if matched {
            return TypedIdentifier::new(kind, trimmed);
        }
    }

    TypedIdentifier::new(IdentifierKind::Unrecognized, trimmed)
}
