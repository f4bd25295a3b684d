//! Concurrent fan-out over independent identifiers: spawn one task each,
//! await them all, and hand back owned outcomes. One stalled or failed
//! retrieval never cancels its siblings.

use crate::config::AppConfig;
use crate::sources;
use crate::types::{CitationRecord, FailureRecord, ResolutionOutcome, TypedIdentifier};
use tracing::warn;

/// Resolves every identifier concurrently, join-all semantics. The result
/// has exactly one outcome per input, in input order.
pub async fn resolve_all(
    config: &AppConfig,
    identifiers: &[TypedIdentifier],
) -> Vec<ResolutionOutcome> {
    let mut handles = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        let config = config.clone();
        let task_identifier = identifier.clone();
        let handle =
            tokio::spawn(async move { sources::resolve(&config, &task_identifier).await });
        handles.push((identifier.clone(), handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (identifier, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                warn!(identifier = %identifier.value, error = %err, "resolution task aborted");
                outcomes.push(ResolutionOutcome::Failed(FailureRecord::new(
                    identifier.kind,
                    identifier.value,
                )));
            }
        }
    }
    outcomes
}

/// Splits outcomes into resolved records and failures, preserving order
/// within each group.
pub fn partition(outcomes: Vec<ResolutionOutcome>) -> (Vec<CitationRecord>, Vec<FailureRecord>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            ResolutionOutcome::Resolved(record) => records.push(record),
            ResolutionOutcome::Failed(failure) => failures.push(failure),
        }
    }
    (records, failures)
}
