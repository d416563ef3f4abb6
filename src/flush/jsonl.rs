use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::model::Episode;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush an episode checkpoint to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes 7 files:
/// - `landmark.jsonl` — the single landmark root
/// - `locations.jsonl`, `junctions.jsonl`, `actors.jsonl`, `items.jsonl` —
///   one entity per line, current state only
/// - `actions.jsonl`, `outcomes.jsonl` — the full ordered logs
///
/// This is a persistence artifact, not an observable view: actor `internal`
/// state is written out in full.
pub fn flush_to_jsonl(episode: &Episode, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    write_jsonl(
        &output_dir.join("landmark.jsonl"),
        std::iter::once(&episode.landmark),
    )?;
    write_jsonl(
        &output_dir.join("locations.jsonl"),
        episode.locations.values(),
    )?;
    write_jsonl(
        &output_dir.join("junctions.jsonl"),
        episode.junctions.values(),
    )?;
    write_jsonl(&output_dir.join("actors.jsonl"), episode.actors.values())?;
    write_jsonl(&output_dir.join("items.jsonl"), episode.items.values())?;
    write_jsonl(&output_dir.join("actions.jsonl"), episode.actions.iter())?;
    write_jsonl(&output_dir.join("outcomes.jsonl"), episode.outcomes.iter())?;

    Ok(())
}
