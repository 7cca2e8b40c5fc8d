use anyhow::{anyhow, Context, Result};
use brewmatch_core::RawProfile;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

pub const UID_COLUMN: &str = "uid";
pub const BIO_COLUMN: &str = "bio";
pub const LOOKING_FOR_COLUMN: &str = "looking_for";

/// Read `(uid, text)` rows from a headered CSV file
///
/// Columns other than `uid` and `text_column` are ignored. Blank text cells
/// become [`RawProfile::missing`]; rows with a blank uid are skipped.
/// Duplicates are kept here and resolved by the feature builder.
pub fn read_profiles<P: AsRef<Path>>(path: P, text_column: &str) -> Result<Vec<RawProfile>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("cannot open profile file {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .with_context(|| format!("cannot read header of {}", path.display()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow!("{} has no `{}` column", path.display(), name))
    };
    let uid_idx = column(UID_COLUMN)?;
    let text_idx = column(text_column)?;

    let mut profiles = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("malformed row {} in {}", line + 2, path.display()))?;

        let uid = record.get(uid_idx).map(str::trim).unwrap_or_default();
        if uid.is_empty() {
            warn!(file = %path.display(), row = line + 2, "row without uid skipped");
            continue;
        }

        let profile = match record.get(text_idx).map(str::trim) {
            Some(text) if !text.is_empty() => RawProfile::new(uid, text),
            _ => RawProfile::missing(uid),
        };
        profiles.push(profile);
    }

    debug!(file = %path.display(), rows = profiles.len(), column = text_column, "profiles read");
    Ok(profiles)
}
