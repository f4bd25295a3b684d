#[cfg(test)]
mod tests {
    use citefetch::render::{entry_value, library_yaml};
    use citefetch::types::{AuthorName, CitationRecord, StructuredDate};

    fn article() -> CitationRecord {
        CitationRecord {
            record_type: "article-journal".to_string(),
            title: Some("The structure of scientific collaboration".to_string()),
            author: Some(vec![
                AuthorName {
                    given: "Jane".to_string(),
                    family: "Doe".to_string(),
                },
                AuthorName {
                    given: "Aristotle".to_string(),
                    family: String::new(),
                },
            ]),
            container_title: Some("American Psychologist".to_string()),
            doi: Some("10.1037/0003-066X.59.1.29".to_string()),
            url: Some("https://doi.org/10.1037/0003-066X.59.1.29".to_string()),
            issn: Some(vec!["0003-066X".to_string()]),
            issue: Some("1".to_string()),
            issued: Some(StructuredDate::from_parts(2004, Some(1), None)),
            page: Some("29-45".to_string()),
            volume: Some("59".to_string()),
            accessed: StructuredDate::from_parts(2024, Some(6), Some(1)),
            ..Default::default()
        }
    }

    #[test]
    fn test_article_entry_shape() {
        let entry = entry_value(&article());

        assert_eq!(entry["type"], "article");
        assert_eq!(entry["title"], "The structure of scientific collaboration");
        assert_eq!(entry["date"], "2004-01");
        assert_eq!(entry["page-range"], "29-45");
        assert_eq!(entry["author"][0], "Doe, Jane");
        // Single-token names stay as-is instead of gaining an empty family
        assert_eq!(entry["author"][1], "Aristotle");

        assert_eq!(entry["serial-number"]["doi"], "10.1037/0003-066X.59.1.29");
        assert_eq!(entry["serial-number"]["issn"], "0003-066X");

        // Journal metadata lives on the periodical parent
        assert_eq!(entry["parent"]["type"], "periodical");
        assert_eq!(entry["parent"]["title"], "American Psychologist");
        assert_eq!(entry["parent"]["volume"], "59");
        assert_eq!(entry["parent"]["issue"], "1");

        assert_eq!(entry["url"]["value"], "https://doi.org/10.1037/0003-066X.59.1.29");
        assert_eq!(entry["url"]["date"], "2024-06-01");
    }

    #[test]
    fn test_webpage_entry_shape() {
        let record = CitationRecord {
            record_type: "webpage".to_string(),
            title: Some("How Async Rust Works".to_string()),
            container_title: Some("Systems Weekly".to_string()),
            url: Some("https://example.com/async-rust".to_string()),
            issued: Some(StructuredDate::from_parts(2022, Some(3), Some(15))),
            accessed: StructuredDate::from_parts(2024, Some(6), Some(1)),
            ..Default::default()
        };

        let entry = entry_value(&record);
        assert_eq!(entry["type"], "web");
        assert_eq!(entry["date"], "2022-03-15");
        assert_eq!(entry["parent"]["type"], "web");
        assert_eq!(entry["parent"]["title"], "Systems Weekly");
    }

    #[test]
    fn test_book_entry_has_no_parent() {
        let record = CitationRecord {
            record_type: "book".to_string(),
            title: Some("The Rust Programming Language".to_string()),
            isbn: Some("9781718500440".to_string()),
            publisher: Some("No Starch Press".to_string()),
            publisher_place: Some("San Francisco".to_string()),
            number_of_pages: Some(560),
            issued: Some(StructuredDate::from_parts(2019, None, None)),
            accessed: StructuredDate::from_parts(2024, Some(6), Some(1)),
            ..Default::default()
        };

        let entry = entry_value(&record);
        assert_eq!(entry["type"], "book");
        assert_eq!(entry["date"], 2019);
        assert_eq!(entry["publisher"], "No Starch Press");
        assert_eq!(entry["location"], "San Francisco");
        assert_eq!(entry["page-total"], 560);
        assert_eq!(entry["serial-number"]["isbn"], "9781718500440");
        assert!(entry.get("parent").is_none());
    }

    #[test]
    fn test_unknown_type_becomes_misc() {
        let record = CitationRecord {
            record_type: "broadcast".to_string(),
            accessed: StructuredDate::from_parts(2024, Some(6), Some(1)),
            ..Default::default()
        };
        assert_eq!(entry_value(&record)["type"], "misc");
    }

    #[test]
    fn test_library_yaml_is_engine_parseable() {
        let records = vec![
            article(),
            CitationRecord {
                record_type: "book".to_string(),
                title: Some("A Book".to_string()),
                author: Some(vec![AuthorName {
                    given: "Ann".to_string(),
                    family: "Author".to_string(),
                }]),
                accessed: StructuredDate::from_parts(2024, Some(6), Some(1)),
                ..Default::default()
            },
        ];

        let yaml = library_yaml(&records).unwrap();
        let library = hayagriva::io::from_yaml_str(&yaml).unwrap();
        assert_eq!(library.iter().count(), 2);
    }

    #[test]
    fn test_library_keys_keep_batch_order_past_ten_entries() {
        let records: Vec<CitationRecord> = (0..11)
            .map(|index| CitationRecord {
                record_type: "book".to_string(),
                title: Some(format!("Book {index}")),
                accessed: StructuredDate::from_parts(2024, Some(6), Some(1)),
                ..Default::default()
            })
            .collect();

        let yaml = library_yaml(&records).unwrap();

        // Zero-padded keys sort lexically in batch order
        let second = yaml.find("ref-002").unwrap();
        let tenth = yaml.find("ref-010").unwrap();
        let eleventh = yaml.find("ref-011").unwrap();
        assert!(second < tenth);
        assert!(tenth < eleventh);

        let title_two = yaml.find("Book 1").unwrap();
        let title_ten = yaml.find("Book 9").unwrap();
        assert!(title_two < title_ten);
    }
}
