use anyhow::{Context, Result};
use brewmatch_similarity::{FeedbackAction, FeedbackEvent};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const HEADER: [&str; 3] = ["uid", "match_uid", "action"];

/// Append-only log of feedback events
///
/// One CSV line per event (`uid,match_uid,action` with action `1` or `-1`).
/// Each append is flushed before returning.
pub struct FeedbackLog {
    writer: Mutex<csv::Writer<File>>,
    raw_file: Mutex<File>,
    path: PathBuf,
}

impl FeedbackLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("cannot open feedback log {}", path.display()))?;
        let is_new = file.metadata()?.len() == 0;
        let raw_file = file.try_clone()?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            writer: Mutex::new(writer),
            raw_file: Mutex::new(raw_file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn append(&self, event: &FeedbackEvent) -> Result<()> {
        self.append_all(std::slice::from_ref(event))
    }

    /// Append a batch under one lock
    pub fn append_all(&self, events: &[FeedbackEvent]) -> Result<()> {
        let mut writer = self.writer.lock();
        for event in events {
            let action = event.action.as_i8().to_string();
            writer.write_record([
                event.actor_uid.as_str(),
                event.candidate_uid.as_str(),
                action.as_str(),
            ])?;
        }
        writer.flush()?;
        debug!(path = %self.path.display(), events = events.len(), "feedback appended");
        Ok(())
    }

    /// Flush and fdatasync the log
    pub fn sync(&self) -> Result<()> {
        self.writer.lock().flush()?;
        self.raw_file.lock().sync_data()?;
        Ok(())
    }

    /// Every well-formed event in file order; bad lines are skipped
    pub fn read_events(&self) -> Result<Vec<FeedbackEvent>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("cannot read feedback log {}", self.path.display()))?;

        let mut events = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let line = line + 2;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(line, error = %e, "unreadable feedback line skipped");
                    continue;
                }
            };
            match parse_event(&record) {
                Some(event) => events.push(event),
                None => warn!(line, record = ?record, "malformed feedback line skipped"),
            }
        }
        Ok(events)
    }
}

fn parse_event(record: &csv::StringRecord) -> Option<FeedbackEvent> {
    if record.len() != HEADER.len() {
        return None;
    }
    let actor = record.get(0)?.trim();
    let candidate = record.get(1)?.trim();
    if actor.is_empty() || candidate.is_empty() {
        return None;
    }
    let action = record.get(2)?.trim().trim_start_matches('+').parse::<i8>().ok()?;
    let action = FeedbackAction::try_from(action).ok()?;
    Some(FeedbackEvent::new(actor, candidate, action))
}
