use snapscout::library::snapshot::{
    FilterOptions, SnapshotRecord, filter_snapshots, select_snapshot,
};

fn record(id: &str, description: &str, size_gib: i32) -> SnapshotRecord {
    SnapshotRecord {
        id: id.to_string(),
        description: description.to_string(),
        size_gib,
        start_time: None,
        region: "us-west-2".to_string(),
    }
}

#[test]
fn default_keyword_selects_the_backup_snapshot() {
    let fetched = vec![
        record("snap-1", "daily backup job", 8),
        record("snap-2", "test image", 20),
    ];

    let filtered = filter_snapshots(&fetched, &["backup".to_string()], FilterOptions::default());

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "snap-1");

    let chosen = select_snapshot(&filtered, "0").unwrap();
    assert_eq!(chosen.id, "snap-1");
}

#[test]
fn out_of_range_choice_aborts_before_provisioning() {
    let filtered = vec![
        record("snap-1", "backup a", 8),
        record("snap-2", "backup b", 8),
        record("snap-3", "backup c", 8),
    ];

    let error = select_snapshot(&filtered, "5").unwrap_err();

    assert!(error.to_string().contains("out of range"));
}

#[test]
fn multi_keyword_match_is_listed_twice_unless_deduped() {
    let fetched = vec![record("snap-1", "nightly db backup", 8)];
    let keywords = vec!["backup".to_string(), "db".to_string()];

    let filtered = filter_snapshots(&fetched, &keywords, FilterOptions::default());
    assert_eq!(filtered.len(), 2);

    let deduped = filter_snapshots(
        &fetched,
        &keywords,
        FilterOptions {
            dedup: true,
            ..Default::default()
        },
    );
    assert_eq!(deduped.len(), 1);
}
