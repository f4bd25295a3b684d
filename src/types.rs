use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of bibliographic identifiers we know how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    #[serde(rename = "URL")]
    Url,
    #[serde(rename = "DOI")]
    Doi,
    #[serde(rename = "ISBN")]
    Isbn,
    #[serde(rename = "PMID")]
    Pmid,
    #[serde(rename = "PMCID")]
    Pmcid,
    Unrecognized,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierKind::Url => "URL",
            IdentifierKind::Doi => "DOI",
            IdentifierKind::Isbn => "ISBN",
            IdentifierKind::Pmid => "PMID",
            IdentifierKind::Pmcid => "PMCID",
            IdentifierKind::Unrecognized => "Unrecognized",
        };
        f.write_str(name)
    }
}

/// A raw input token after classification: its kind plus the cleaned value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
}

impl TypedIdentifier {
    pub fn new(kind: IdentifierKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A personal name split into given and family parts.
///
/// Free-text names are split on whitespace: first token is the given name,
/// the rest joined is the family name. Lossy for family-first or single-token
/// names; downstream rendering depends on this exact shape, so it stays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    pub given: String,
    pub family: String,
}

impl AuthorName {
    pub fn from_free_text(name: &str) -> Self {
        let mut tokens = name.split_whitespace();
        let given = tokens.next().unwrap_or_default().to_string();
        let family = tokens.collect::<Vec<_>>().join(" ");
        Self { given, family }
    }
}

/// Splits a list of free-text names, in order.
pub fn authors_from_free_text<I, S>(names: I) -> Vec<AuthorName>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| AuthorName::from_free_text(name.as_ref()))
        .collect()
}

/// A CSL date: an ordered `[year, month?, day?]` row under `date-parts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDate {
    #[serde(
        rename = "date-parts",
        default,
        deserialize_with = "de::lenient_date_parts"
    )]
    pub date_parts: Vec<Vec<i32>>,
}

impl StructuredDate {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date_parts: vec![vec![
                date.year(),
                date.month() as i32,
                date.day() as i32,
            ]],
        }
    }

    pub fn from_parts(year: i32, month: Option<u32>, day: Option<u32>) -> Self {
        let mut parts = vec![year];
        if let Some(month) = month {
            parts.push(month as i32);
            if let Some(day) = day {
                parts.push(day as i32);
            }
        }
        Self {
            date_parts: vec![parts],
        }
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// The first `[year, month?, day?]` row, if any.
    pub fn first_parts(&self) -> Option<&[i32]> {
        self.date_parts.first().map(Vec::as_slice)
    }
}

/// Parses a free-form date string the way upstream pages tend to write them.
pub fn parse_instant(value: &str) -> Option<NaiveDate> {
    let cleaned = value.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(cleaned) {
        return Some(dt.date_naive());
    }

    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%B %d, %Y",
        "%b %d, %Y",
        "%d %B %Y",
        "%d %b %Y",
    ];
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date);
        }
    }

    // "2020-05" and bare-year forms
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{cleaned}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(year) = cleaned.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

/// One source's normalized bibliographic metadata, CSL-JSON shaped.
///
/// Fields are sparse: absent metadata is omitted, never defaulted, except
/// `type` and `accessed` which every source sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Vec<AuthorName>>,
    #[serde(rename = "container-title", skip_serializing_if = "Option::is_none")]
    pub container_title: Option<String>,
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "ISSN", skip_serializing_if = "Option::is_none")]
    pub issn: Option<Vec<String>>,
    #[serde(rename = "ISBN", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(rename = "PMID", skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(rename = "PMCID", skip_serializing_if = "Option::is_none")]
    pub pmcid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<StructuredDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(rename = "publisher-place", skip_serializing_if = "Option::is_none")]
    pub publisher_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(rename = "number-of-pages", skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<u64>,
    pub accessed: StructuredDate,
}

/// Marker record for an identifier whose retrieval failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub identifier: String,
    pub kind: IdentifierKind,
    pub status: String,
}

impl FailureRecord {
    pub fn new(kind: IdentifierKind, identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            status: "failed".to_string(),
        }
    }
}

/// Exactly one of these exists per resolution attempt; retrieval errors are
/// converted to `Failed` at the source boundary, never propagated further.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolutionOutcome {
    Resolved(CitationRecord),
    Failed(FailureRecord),
}

impl ResolutionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ResolutionOutcome::Failed(_))
    }
}

/// Lenient deserializers for upstream JSON that mixes types.
pub mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// A string, or a number rendered as one.
    pub fn opt_stringlike<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }))
    }

    /// A string, or the first string of an array (Crossref wraps scalars).
    pub fn opt_first_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Array(items) => items
                .into_iter()
                .find_map(|item| item.as_str().map(str::to_string)),
            _ => None,
        }))
    }

    /// A string list, accepting a lone string as a one-element list.
    pub fn opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|value| match value {
            Value::String(s) => Some(vec![s]),
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }))
    }

    /// `date-parts` rows with non-numeric entries dropped; some upstreams
    /// send `[[null]]` for unknown dates.
    pub fn lenient_date_parts<'de, D>(deserializer: D) -> Result<Vec<Vec<i32>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<Vec<Value>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .filter_map(|part| part.as_i64().map(|n| n as i32))
                    .collect()
            })
            .collect())
    }
}
