#[cfg(test)]
mod tests {
    use citefetch::aggregate::{partition, resolve_all};
    use citefetch::config::AppConfig;
    use citefetch::sources;
    use citefetch::types::{
        CitationRecord, FailureRecord, IdentifierKind, ResolutionOutcome, StructuredDate,
        TypedIdentifier,
    };
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Loopback HTTP stub that answers every request with the given JSON
    /// body. Returns a relay prefix pointing at it, so sources that go
    /// through the CORS relay hit the stub instead of the network.
    async fn spawn_stub_upstream(body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut request = [0u8; 2048];
                    let _ = socket.read(&mut request).await;
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}/?u=")
    }

    /// A relay prefix nothing listens on; connections are refused.
    fn unroutable_config() -> AppConfig {
        AppConfig {
            client: reqwest::Client::new(),
            proxy: "http://127.0.0.1:1/?u=".to_string(),
            log_errors: false,
        }
    }

    fn record(title: &str) -> CitationRecord {
        CitationRecord {
            record_type: "webpage".to_string(),
            title: Some(title.to_string()),
            accessed: StructuredDate::from_parts(2024, Some(6), Some(1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_partition_splits_and_preserves_order() {
        let outcomes = vec![
            ResolutionOutcome::Resolved(record("first")),
            ResolutionOutcome::Failed(FailureRecord::new(IdentifierKind::Doi, "10.1000/bad")),
            ResolutionOutcome::Resolved(record("second")),
            ResolutionOutcome::Failed(FailureRecord::new(IdentifierKind::Isbn, "9780000000000")),
        ];

        let (records, failures) = partition(outcomes);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("first"));
        assert_eq!(records[1].title.as_deref(), Some("second"));

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].kind, IdentifierKind::Doi);
        assert_eq!(failures[0].identifier, "10.1000/bad");
        assert_eq!(failures[1].kind, IdentifierKind::Isbn);
        assert_eq!(failures[0].status, "failed");
    }

    #[tokio::test]
    async fn test_unresolvable_identifiers_yield_one_failure_each() {
        let config = AppConfig::new(false);
        let identifiers = vec![
            TypedIdentifier::new(IdentifierKind::Unrecognized, "first"),
            TypedIdentifier::new(IdentifierKind::Unrecognized, "second"),
            TypedIdentifier::new(IdentifierKind::Unrecognized, "third"),
        ];

        let outcomes = resolve_all(&config, &identifiers).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(ResolutionOutcome::is_failed));

        let (_, failures) = partition(outcomes);
        let names: Vec<&str> = failures
            .iter()
            .map(|failure| failure.identifier.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_source_error_becomes_failure_record() {
        let config = unroutable_config();
        let identifier = TypedIdentifier::new(IdentifierKind::Doi, "10.1000/unreachable");

        let outcome = sources::resolve(&config, &identifier).await;

        match outcome {
            ResolutionOutcome::Failed(failure) => {
                assert_eq!(failure.kind, IdentifierKind::Doi);
                assert_eq!(failure.identifier, "10.1000/unreachable");
                assert_eq!(failure.status, "failed");
            }
            ResolutionOutcome::Resolved(_) => panic!("connection-refused fetch must fail"),
        }
    }

    #[tokio::test]
    async fn test_url_source_error_becomes_failure_record() {
        let config = unroutable_config();
        let identifier =
            TypedIdentifier::new(IdentifierKind::Url, "https://example.com/article");

        let outcome = sources::resolve(&config, &identifier).await;

        match outcome {
            ResolutionOutcome::Failed(failure) => {
                assert_eq!(failure.kind, IdentifierKind::Url);
                assert_eq!(failure.identifier, "https://example.com/article");
            }
            ResolutionOutcome::Resolved(_) => panic!("connection-refused fetch must fail"),
        }
    }

    #[tokio::test]
    async fn test_mixed_batch_keeps_successes_and_failures_apart() {
        let proxy = spawn_stub_upstream(
            r#"{"message":{"DOI":"10.1000/good","type":"journal-article","title":["Stub article"]}}"#,
        )
        .await;
        let config = AppConfig {
            client: reqwest::Client::new(),
            proxy,
            log_errors: false,
        };

        let identifiers = vec![
            TypedIdentifier::new(IdentifierKind::Doi, "10.1000/good"),
            TypedIdentifier::new(IdentifierKind::Unrecognized, "mystery-token"),
            TypedIdentifier::new(IdentifierKind::Doi, "10.1000/good"),
        ];

        let outcomes = resolve_all(&config, &identifiers).await;
        assert_eq!(outcomes.len(), 3);

        let (records, failures) = partition(outcomes);

        // The render step receives exactly the two resolved records
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .all(|record| record.record_type == "article-journal"));
        assert_eq!(records[0].title.as_deref(), Some("Stub article"));

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].identifier, "mystery-token");
        assert_eq!(failures[0].status, "failed");
    }
}
