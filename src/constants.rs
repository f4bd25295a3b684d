//! Process-wide read-only data: upstream endpoints and terminal styling.

/// CORS relay prepended to most upstream URLs. Overridable via `CITEFETCH_PROXY`.
pub const DEFAULT_PROXY: &str = "https://corsproxy.io/?";

pub const CROSSREF_WORKS_URL: &str = "https://api.crossref.org/works";
pub const OPEN_LIBRARY_SEARCH_URL: &str = "https://openlibrary.org/search.json";
pub const NCBI_CTXP_URL: &str = "https://api.ncbi.nlm.nih.gov/lit/ctxp/v1";

pub const STYLES_REPO_URL: &str =
    "https://raw.githubusercontent.com/citation-style-language/styles/master";
pub const LOCALES_REPO_URL: &str =
    "https://raw.githubusercontent.com/citation-style-language/locales/master";

pub const DEFAULT_STYLE: &str = "apa";
pub const DEFAULT_LOCALE: &str = "en-US";

// ANSI styling for grouped terminal output.
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[38;5;48m";
pub const BLUE: &str = "\x1b[38;5;33m";
pub const RED: &str = "\x1b[38;5;9m";
pub const BLACK: &str = "\x1b[38;5;0m";
pub const BG_GREEN: &str = "\x1b[48;5;48m";
pub const BG_RED: &str = "\x1b[48;5;9m";
pub const RESET: &str = "\x1b[0m";

pub fn success_banner() -> String {
    format!("{BG_GREEN}{BOLD}{BLACK} SUCCESS {RESET}")
}

pub fn fail_banner() -> String {
    format!("{BG_RED}{BOLD}{BLACK} FAIL {RESET}")
}

pub fn error_banner() -> String {
    format!("{BG_RED}{BOLD}{BLACK} ERROR {RESET}")
}
