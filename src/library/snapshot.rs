use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;

/// In-memory projection of an EBS snapshot as returned by the provider.
///
/// Only snapshots with `status=completed` and `encrypted=false` ever reach
/// this type; both are requested as server-side filters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnapshotRecord {
    pub id: String,
    /// Free text set by the snapshot owner. Absent descriptions map to an
    /// empty string and never match any keyword.
    pub description: String,
    pub size_gib: i32,
    pub start_time: Option<DateTime<Utc>>,
    pub region: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FilterOptions {
    pub ignore_case: bool,
    pub dedup: bool,
}

/// Keeps snapshots whose description contains at least one keyword as a
/// substring. Output is keyword-major: for each keyword in order, all matching
/// snapshots in their original order. A snapshot matching several keywords
/// appears once per keyword unless `dedup` is set.
pub fn filter_snapshots(
    snapshots: &[SnapshotRecord],
    keywords: &[String],
    options: FilterOptions,
) -> Vec<SnapshotRecord> {
    let normalize = |s: &str| match options.ignore_case {
        true => s.to_lowercase(),
        false => s.to_string(),
    };

    let mut matches: Vec<SnapshotRecord> = Vec::new();

    for keyword in keywords {
        let keyword = normalize(keyword);

        matches.extend(
            snapshots
                .iter()
                .filter(|snapshot| normalize(&snapshot.description).contains(&keyword))
                .cloned(),
        );
    }

    if options.dedup {
        matches = matches
            .into_iter()
            .unique_by(|snapshot| snapshot.id.clone())
            .collect();
    }

    matches
}

/// Fails when filtering produced nothing, naming the keywords, so the run
/// aborts before the chooser prompt is ever shown.
pub fn ensure_matches(snapshots: &[SnapshotRecord], keywords: &[String]) -> anyhow::Result<()> {
    if snapshots.is_empty() {
        bail!(
            "no snapshots matched the given keywords: {}",
            keywords.join(", ")
        );
    }

    Ok(())
}

/// Resolves one line of operator input to a snapshot. Fails explicitly on
/// non-numeric input and on out-of-range indices.
pub fn select_snapshot<'a>(
    snapshots: &'a [SnapshotRecord],
    input: &str,
) -> anyhow::Result<&'a SnapshotRecord> {
    let input = input.trim();

    let index: usize = input
        .parse()
        .map_err(|_| anyhow!("'{}' is not a snapshot number", input))?;

    snapshots.get(index).ok_or_else(|| {
        anyhow!(
            "snapshot number {} is out of range, pick one of 0..{}",
            index,
            snapshots.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, description: &str) -> SnapshotRecord {
        SnapshotRecord {
            id: id.to_string(),
            description: description.to_string(),
            size_gib: 8,
            start_time: None,
            region: "us-west-2".to_string(),
        }
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn default_keyword_keeps_only_matching_descriptions() {
        let snapshots = vec![
            record("snap-1", "daily backup job"),
            record("snap-2", "test image"),
        ];

        let filtered = filter_snapshots(&snapshots, &keywords(&["backup"]), Default::default());

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "snap-1");
    }

    #[test]
    fn every_match_contains_a_keyword() {
        let snapshots = vec![
            record("snap-1", "prod db backup"),
            record("snap-2", "scratch volume"),
            record("snap-3", "db dump, weekly"),
        ];

        let filtered = filter_snapshots(&snapshots, &keywords(&["backup", "db"]), Default::default());

        assert!(
            filtered
                .iter()
                .all(|s| s.description.contains("backup") || s.description.contains("db"))
        );
        assert!(!filtered.iter().any(|s| s.id == "snap-2"));
    }

    #[test]
    fn no_keywords_matches_nothing() {
        let snapshots = vec![record("snap-1", "daily backup job")];

        assert!(filter_snapshots(&snapshots, &[], Default::default()).is_empty());
    }

    #[test]
    fn empty_description_never_matches() {
        let snapshots = vec![record("snap-1", "")];

        assert!(filter_snapshots(&snapshots, &keywords(&["backup"]), Default::default()).is_empty());
    }

    #[test]
    fn matching_two_keywords_lists_the_snapshot_twice() {
        let snapshots = vec![record("snap-1", "db backup")];

        let filtered = filter_snapshots(&snapshots, &keywords(&["backup", "db"]), Default::default());

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, "snap-1");
        assert_eq!(filtered[1].id, "snap-1");
    }

    #[test]
    fn dedup_collapses_multi_keyword_matches() {
        let snapshots = vec![record("snap-1", "db backup"), record("snap-2", "db dump")];

        let filtered = filter_snapshots(
            &snapshots,
            &keywords(&["backup", "db"]),
            FilterOptions {
                dedup: true,
                ..Default::default()
            },
        );

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, "snap-1");
        assert_eq!(filtered[1].id, "snap-2");
    }

    #[test]
    fn matching_is_case_sensitive_by_default() {
        let snapshots = vec![record("snap-1", "Daily Backup")];

        assert!(filter_snapshots(&snapshots, &keywords(&["backup"]), Default::default()).is_empty());

        let filtered = filter_snapshots(
            &snapshots,
            &keywords(&["backup"]),
            FilterOptions {
                ignore_case: true,
                ..Default::default()
            },
        );

        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn ordering_is_keyword_major() {
        let snapshots = vec![
            record("snap-1", "alpha"),
            record("snap-2", "beta"),
            record("snap-3", "alpha and beta"),
        ];

        let filtered = filter_snapshots(&snapshots, &keywords(&["beta", "alpha"]), Default::default());

        let ids: Vec<&str> = filtered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["snap-2", "snap-3", "snap-1", "snap-3"]);
    }

    #[test]
    fn an_empty_filter_result_is_reported_with_the_keywords() {
        let error = ensure_matches(&[], &keywords(&["backup", "db"])).unwrap_err();

        assert!(error.to_string().contains("no snapshots matched"));
        assert!(error.to_string().contains("backup, db"));
    }

    #[test]
    fn a_non_empty_filter_result_passes_the_guard() {
        let snapshots = vec![record("snap-1", "daily backup job")];

        assert!(ensure_matches(&snapshots, &keywords(&["backup"])).is_ok());
    }

    #[test]
    fn select_returns_the_chosen_snapshot() {
        let snapshots = vec![record("snap-1", "a"), record("snap-2", "b")];

        assert_eq!(select_snapshot(&snapshots, "1").unwrap().id, "snap-2");
        assert_eq!(select_snapshot(&snapshots, " 0 ").unwrap().id, "snap-1");
    }

    #[test]
    fn select_rejects_out_of_range_indices() {
        let snapshots = vec![record("snap-1", "a"), record("snap-2", "b"), record("snap-3", "c")];

        let error = select_snapshot(&snapshots, "5").unwrap_err();
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn select_rejects_non_numeric_input() {
        let snapshots = vec![record("snap-1", "a")];

        assert!(select_snapshot(&snapshots, "one").is_err());
        assert!(select_snapshot(&snapshots, "-1").is_err());
        assert!(select_snapshot(&snapshots, "").is_err());
    }

    #[test]
    fn select_on_an_empty_list_is_always_out_of_range() {
        assert!(select_snapshot(&[], "0").is_err());
    }
}
