//! Atomic CSV output
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! failed run never leaves a half-written table behind.

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use brewmatch_similarity::{FeatureTable, MatchResult};
use std::fs::File;
use std::path::Path;
use tracing::info;

pub const MATCH_COLUMNS: [&str; 4] = ["uid", "match_uid", "score", "rank"];

fn write_atomic<P, F>(path: P, body: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut csv::Writer<&mut File>) -> std::result::Result<(), csv::Error>,
{
    let path = path.as_ref();
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            body(&mut writer)?;
            writer.flush()?;
            Ok::<(), csv::Error>(())
        })
        .with_context(|| format!("cannot write {}", path.display()))
}

/// Write `uid,match_uid,score,rank` rows for every result
pub fn write_matches<P: AsRef<Path>>(path: P, results: &[MatchResult]) -> Result<()> {
    let mut rows = 0usize;
    write_atomic(&path, |writer| {
        writer.write_record(MATCH_COLUMNS)?;
        for row in results.iter().flat_map(MatchResult::rows) {
            writer.serialize(row)?;
            rows += 1;
        }
        Ok(())
    })?;

    info!(path = %path.as_ref().display(), users = results.len(), rows, "matches written");
    Ok(())
}

/// Write the processed feature table: `uid` then one column per schema entry
pub fn write_feature_table<P: AsRef<Path>>(path: P, table: &FeatureTable) -> Result<()> {
    write_atomic(&path, |writer| {
        let mut header = vec!["uid".to_string()];
        header.extend(table.schema().column_names());
        writer.write_record(&header)?;

        for row in table.rows() {
            let mut record = Vec::with_capacity(header.len());
            record.push(row.uid.clone());
            record.extend(row.interests.iter().chain(&row.traits).map(u8::to_string));
            record.extend(
                row.preferences
                    .iter()
                    .map(|flag| flag.map(|f| f.as_str().to_string()).unwrap_or_default()),
            );
            writer.write_record(&record)?;
        }
        Ok(())
    })?;

    info!(path = %path.as_ref().display(), users = table.len(), "feature table written");
    Ok(())
}
