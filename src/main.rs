use clap::{CommandFactory, Parser};
use tracing::warn;

use citefetch::aggregate;
use citefetch::classify::classify;
use citefetch::config::AppConfig;
use citefetch::constants::{
    self, BLUE, BOLD, DEFAULT_LOCALE, DEFAULT_STYLE, RED, RESET,
};
use citefetch::logging;
use citefetch::render::Renderer;
use citefetch::types::{IdentifierKind, TypedIdentifier};

#[derive(Parser)]
#[command(name = "citefetch")]
#[command(about = "Generate formatted citations from URLs, DOIs, ISBNs, PMIDs, and PMCIDs")]
#[command(version)]
struct Cli {
    /// Identifiers to resolve; explicit kind prefixes like doi: or isbn: are honored
    identifiers: Vec<String>,

    /// Citation style (e.g. apa, modern-language-association, chicago-author-date)
    #[arg(short, long, default_value = DEFAULT_STYLE)]
    style: String,

    /// Output locale (e.g. en-US, fr-FR, ar)
    #[arg(short, long, default_value = DEFAULT_LOCALE)]
    locale: String,

    /// Echo raw upstream errors to stderr for troubleshooting
    #[arg(short = 'e', long = "log-errors")]
    log_errors: bool,
}

fn print_identifier_group(header: &str, color: &str, identifiers: &[TypedIdentifier]) {
    println!("{color}{BOLD}{header}{RESET}");
    for identifier in identifiers {
        println!("{color}[{}]{RESET} {}", identifier.kind, identifier.value);
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    if cli.identifiers.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    // Tokens can escape a leading dash as "\-" to avoid flag parsing.
    let classified: Vec<TypedIdentifier> = cli
        .identifiers
        .iter()
        .map(|raw| classify(&raw.replace("\\-", "-")))
        .collect();

    let (recognized, unrecognized): (Vec<_>, Vec<_>) = classified
        .into_iter()
        .partition(|identifier| identifier.kind != IdentifierKind::Unrecognized);

    if !unrecognized.is_empty() {
        print_identifier_group(
            "Unable to determine the type of these identifiers:",
            RED,
            &unrecognized,
        );
    }

    if recognized.is_empty() {
        return Ok(());
    }

    print_identifier_group("Retrieving data for these identifiers:", BLUE, &recognized);

    let config = AppConfig::new(cli.log_errors);
    let outcomes = aggregate::resolve_all(&config, &recognized).await;
    let (records, failures) = aggregate::partition(outcomes);

    if !failures.is_empty() {
        println!("{RED}{BOLD}Failed to retrieve content from these identifiers:{RESET}");
        for failure in &failures {
            println!("{RED}[{}]{RESET} {}", failure.kind, failure.identifier);
        }
        println!();
    }

    if records.is_empty() {
        return Ok(());
    }

    let renderer = Renderer::new(config.clone());
    match renderer.bibliography(&records, &cli.style, &cli.locale).await {
        Ok(references) => {
            println!(
                "{} {}{}Successfully generated references:{}",
                constants::success_banner(),
                constants::GREEN,
                BOLD,
                RESET
            );
            println!("{references}");
        }
        Err(err) => {
            warn!(error = %err, "bibliography rendering failed");
            if cli.log_errors {
                eprintln!(
                    "\n{} {}{}{}\n",
                    constants::error_banner(),
                    RED,
                    err,
                    RESET
                );
            }
            println!(
                "{} {}{}Failed to format references!{}",
                constants::fail_banner(),
                RED,
                BOLD,
                RESET
            );
        }
    }

    Ok(())
}
