//! End-to-end pipeline tests: crawler files -> index -> query.
//!
//! Runs the real Tantivy-backed session and searches the committed index.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use character_indexing::{
    IndexingSession, JsonFileSource, RecordSource, SessionConfig, TantivyIndexUpdater,
};
use character_search::{format_hit, render_hits, SearchIndexConfig, SearchOptions, NO_RESULTS};
use character_types::{field_names, RawRecord};
use e2e_tests::{character, PanickingBuilder, TestHarness};

/// Name lookup on a namespaced field finds only the labeled record.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_groot_name_search() {
    let harness = TestHarness::new();
    let file = harness.write_source(
        "marvel_aarav1.json",
        &[
            character("groot", "Name: Groot\nPowers:\nRegeneration\nStrength"),
            RawRecord::new("empty-page"),
        ],
    );

    let stats = harness
        .index_files(&[file], SessionConfig::default())
        .await
        .unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.failed, 0);

    let searcher = harness.searcher();
    let options = SearchOptions::new().with_field(field_names::BASIC_INFO_NAME);
    let hits = searcher.search("Groot", &options).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id(), "groot");
    assert!(hits[0].score > 0.0);
    assert_eq!(
        hits[0].get(field_names::POWERS_POWERS),
        Some("Regeneration; Strength")
    );
}

/// A record without content is stored with only its id and url.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_empty_content_stores_id_only() {
    let harness = TestHarness::new();
    let file = harness.write_source(
        "marvel_aarav1.json",
        &[RawRecord::new("bare").with_url("https://marvel.fandom.com/wiki/bare")],
    );

    harness
        .index_files(&[file], SessionConfig::default())
        .await
        .unwrap();

    let hit = harness.searcher().get_by_id("bare").unwrap().unwrap();
    let names: Vec<&str> = hit.fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec![field_names::ID, field_names::URL]);
}

/// A panicking build is isolated to its own record.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_build_failure_isolated() {
    let harness = TestHarness::new();
    let records: Vec<RawRecord> = (1..=5)
        .map(|i| character(&format!("hero{}", i), &format!("Name Hero {}", i)))
        .collect();
    let file = harness.write_source("marvel_aarav1.json", &records);

    let stats = harness
        .index_files_with(
            &[file],
            SessionConfig::default(),
            Arc::new(PanickingBuilder::new(&["hero3"])),
        )
        .await
        .unwrap();

    assert_eq!(stats.total, 5);
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.failed, 1);

    let searcher = harness.searcher();
    assert_eq!(searcher.num_docs(), 4);
    assert!(searcher.get_by_id("hero3").unwrap().is_none());
    assert!(searcher.get_by_id("hero4").unwrap().is_some());
}

/// Zero matches yields an empty result and the explicit message.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_hits_reports_no_results() {
    let harness = TestHarness::new();
    let file = harness.write_source(
        "marvel_aarav1.json",
        &[character("storm", "Name Storm\nReality Earth-616")],
    );
    harness
        .index_files(&[file], SessionConfig::default())
        .await
        .unwrap();

    let hits = harness
        .searcher()
        .search("nonexistentterm12345", &SearchOptions::new())
        .unwrap();

    assert!(hits.is_empty());
    assert_eq!(render_hits(&hits), format!("{}\n", NO_RESULTS));
}

/// Records spread over several files and batches all land in the index.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_multiple_files_and_batches() {
    let harness = TestHarness::new();
    let first: Vec<RawRecord> = (0..7)
        .map(|i| character(&format!("a{}", i), "Name Alpha\nGender Female"))
        .collect();
    let second: Vec<RawRecord> = (0..4)
        .map(|i| character(&format!("b{}", i), "Name Beta\nGender Male"))
        .collect();
    let files = vec![
        harness.write_source("marvel_aarav1.json", &first),
        harness.write_source("marvel_aarav2.json", &second),
    ];

    let config = SessionConfig::default().with_batch_size(3).with_max_workers(2);
    let stats = harness.index_files(&files, config).await.unwrap();

    assert_eq!(stats.total, 11);
    assert_eq!(stats.processed, 11);
    // 7 -> 3 + 3 + 1, 4 -> 3 + 1
    assert_eq!(stats.batches_committed, 5);
    assert!(stats.stopped_at.is_some());

    let searcher = harness.searcher();
    assert_eq!(searcher.num_docs(), 11);

    let options = SearchOptions::new()
        .with_field(field_names::APPEARANCE_GENDER)
        .with_limit(20);
    assert_eq!(searcher.search("male", &options).unwrap().len(), 4);
}

/// An unparseable file is skipped and the others are still indexed.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_file_skipped() {
    let harness = TestHarness::new();
    let broken = harness.input_dir.join("marvel_aarav1.json");
    std::fs::write(&broken, "{ truncated").unwrap();
    let good = harness.write_source(
        "marvel_aarav2.json",
        &[character("thor", "Name Thor\nOrigin Asgard")],
    );

    let stats = harness
        .index_files(&[broken, good], SessionConfig::default())
        .await
        .unwrap();

    assert_eq!(stats.sources_skipped, 1);
    assert_eq!(stats.total, 1);
    assert_eq!(harness.searcher().num_docs(), 1);
}

/// Stored fields come back grouped into display sections.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_formatted_hit_sections() {
    let harness = TestHarness::new();
    let file = harness.write_source(
        "marvel_aarav.json",
        &[character(
            "spider-man",
            "Name Peter Parker\nCurrent Alias Spider-Man\nEyes Hazel\nLiving Status Alive\nPowers:\nWall-crawling\nSpider-sense",
        )],
    );
    harness
        .index_files(&[file], SessionConfig::default())
        .await
        .unwrap();

    let hits = harness
        .searcher()
        .search("Parker", &SearchOptions::new())
        .unwrap();
    assert_eq!(hits.len(), 1);

    let formatted = format_hit(&hits[0]);
    let titles: Vec<&str> = formatted.sections.iter().map(|s| s.title).collect();
    assert_eq!(
        titles,
        vec![
            "Basic Character Information",
            "Appearance and Physical Traits",
            "Origin and Status",
            "Powers & Abilities",
        ]
    );

    let powers: Vec<(&str, &str)> = formatted.sections[3].known_entries().collect();
    assert_eq!(powers, vec![("Powers", "Wall-crawling; Spider-sense")]);

    let rendered = render_hits(&hits);
    assert!(rendered.contains("  • Current Alias: Spider-Man"));
    assert!(rendered.contains("  • Eye Color: Hazel"));
}

/// A malformed entry fails alone; its siblings in the same file are indexed.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_entry_fails_alone() {
    let harness = TestHarness::new();
    let file = harness.input_dir.join("marvel_aarav1.json");
    std::fs::write(
        &file,
        r#"{
            "good1": {"url": "https://marvel.fandom.com/wiki/good1", "content": "Name Good One"},
            "bad": "not an object",
            "good2": {"url": "https://marvel.fandom.com/wiki/good2", "content": "Name Good Two"}
        }"#,
    )
    .unwrap();

    let stats = harness
        .index_files(&[file], SessionConfig::default())
        .await
        .unwrap();

    assert_eq!(stats.sources_skipped, 0);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.failed, 1);

    let searcher = harness.searcher();
    assert_eq!(searcher.num_docs(), 2);
    assert!(searcher.get_by_id("bad").unwrap().is_none());
}

/// Indexing into the input directory is refused and leaves the inputs alone.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_index_into_input_dir_refused() {
    let harness = TestHarness::new();
    let file = harness.write_source("marvel_aarav1.json", &[character("groot", "Name Groot")]);

    let index_config = SearchIndexConfig::new(&harness.input_dir)
        .with_memory_mb(e2e_tests::TEST_WRITER_MEMORY_MB);
    let sources: Vec<Box<dyn RecordSource>> = vec![Box::new(JsonFileSource::new(&file))];
    let result = IndexingSession::new(SessionConfig::default())
        .run(|| TantivyIndexUpdater::create(index_config), &sources)
        .await;

    assert!(result.is_err());
    assert!(file.exists());
}
