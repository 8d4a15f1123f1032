use console::style;
use tabled::{
    builder::Builder,
    settings::{Style, Theme},
};

use crate::library::snapshot::SnapshotRecord;

/// Numbered snapshot listing. The number in the first column is what the
/// chooser prompt expects.
pub fn print_snapshot_table(snapshots: &[SnapshotRecord]) {
    let header = ["#", "Snapshot Id", "Description", "Size (GiB)", "Region", "Started"]
        .iter()
        .map(|s| style(s).green().bold().to_string())
        .collect::<Vec<String>>();

    let mut builder = Builder::default();
    builder.push_record(header);

    for (index, snapshot) in snapshots.iter().enumerate() {
        let started = snapshot
            .start_time
            .map(|time| time.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        builder.push_record([
            index.to_string(),
            snapshot.id.clone(),
            snapshot.description.clone(),
            snapshot.size_gib.to_string(),
            snapshot.region.clone(),
            started,
        ]);
    }

    let mut table = builder.build();

    let mut style = Theme::from_style(Style::markdown());
    style.remove_borders_horizontal();

    table.with(style);

    println!("{}", table);
}

pub fn print_snapshot_json(snapshots: &[SnapshotRecord]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshots)?);

    Ok(())
}
