//! Upload Tracker: per-file progress bookkeeping for the upload widget.
//!
//! Entries are transient. A file is tracked from registration until its
//! request finishes or the user removes it, whichever comes first. Removing
//! a file never cancels its request.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use smallvec::SmallVec;
use tokio::sync::mpsc;

use crate::plugins::history::new_id;
use crate::services::config::UploadMode;
use crate::services::events::{Events, SessionEvent};
use crate::services::gateway::FilePayload;
use crate::services::prompts::upload_messages;

pub const ACCEPTED_EXTENSIONS: [&str; 5] = [".pdf", ".docx", ".txt", ".csv", ".xlsx"];
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_TRACKED_FILES: usize = 5;

const SIMULATED_STEP: u8 = 10;
const SIMULATED_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub progress: u8,
}

/// How progress toward 100% is produced for each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Byte progress of the request body.
    Live,
    /// `step` percent every `interval`, then the request.
    Simulated { step: u8, interval: Duration },
}

impl ProgressMode {
    pub fn simulated() -> Self {
        Self::Simulated {
            step: SIMULATED_STEP,
            interval: SIMULATED_INTERVAL,
        }
    }
}

impl From<UploadMode> for ProgressMode {
    fn from(mode: UploadMode) -> Self {
        match mode {
            UploadMode::Live => Self::Live,
            UploadMode::Simulated => Self::simulated(),
        }
    }
}

/// Files that passed validation plus one message per rejected file.
#[derive(Debug, Default)]
pub struct BatchValidation {
    pub accepted: Vec<FilePayload>,
    pub rejected: Vec<String>,
}

#[derive(Clone, Default)]
pub struct UploadTracker {
    files: Arc<Mutex<Vec<UploadedFile>>>,
    events: Events,
}

impl UploadTracker {
    pub fn new(events: Events) -> Self {
        Self {
            files: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, Vec<UploadedFile>>> {
        match self.files.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                log::error!("Upload tracker lock poisoned");
                None
            }
        }
    }

    fn flush(&self, out: SmallVec<[SessionEvent; 4]>) {
        for event in out {
            self.events.emit(event);
        }
    }

    pub fn list(&self) -> Vec<UploadedFile> {
        self.lock().map(|files| files.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn progress(&self, file_id: &str) -> Option<u8> {
        self.lock()?
            .iter()
            .find(|f| f.id == file_id)
            .map(|f| f.progress)
    }

    /// Check a batch against the type, size and count limits.
    ///
    /// Too many files rejects the whole batch. Otherwise each bad file is
    /// dropped with its own message and the rest go through.
    pub fn validate_batch(&self, files: Vec<FilePayload>) -> BatchValidation {
        let mut out = BatchValidation::default();
        if files.len() + self.len() > MAX_TRACKED_FILES {
            out.rejected
                .push(upload_messages::too_many_files(MAX_TRACKED_FILES));
            return out;
        }

        for file in files {
            if !is_accepted_type(&file.name, &file.mime_type) {
                out.rejected
                    .push(upload_messages::unsupported_type(&ACCEPTED_EXTENSIONS));
                continue;
            }
            if file.size() > MAX_FILE_BYTES {
                out.rejected.push(upload_messages::too_large(MAX_FILE_BYTES));
                continue;
            }
            out.accepted.push(file);
        }
        out
    }

    /// Start tracking a file at 0%.
    pub fn register(&self, file: &FilePayload) -> UploadedFile {
        let entry = UploadedFile {
            id: new_id("upload"),
            name: file.name.clone(),
            size: file.size(),
            mime_type: file.mime_type.clone(),
            progress: 0,
        };
        if let Some(mut files) = self.lock() {
            files.push(entry.clone());
        }
        log::debug!("Tracking upload {} ({} bytes)", entry.name, entry.size);
        self.events.emit(SessionEvent::UploadRegistered {
            file_id: entry.id.clone(),
            name: entry.name.clone(),
        });
        entry
    }

    /// Move a file's progress forward to `progress` (clamped to 100).
    ///
    /// Progress never goes backwards. Returns the stored value, or `None`
    /// once the file is no longer tracked.
    pub fn advance(&self, file_id: &str, progress: u8) -> Option<u8> {
        let mut out = SmallVec::<[SessionEvent; 4]>::new();
        let current = {
            let mut files = self.lock()?;
            let entry = files.iter_mut().find(|f| f.id == file_id)?;
            let next = progress.min(100).max(entry.progress);
            if next != entry.progress {
                entry.progress = next;
                out.push(SessionEvent::UploadProgress {
                    file_id: file_id.to_string(),
                    progress: next,
                });
            }
            entry.progress
        };
        self.flush(out);
        Some(current)
    }

    /// Drop a file from the widget. Its request, if any, still completes.
    pub fn remove_file(&self, file_id: &str) -> bool {
        let mut out = SmallVec::<[SessionEvent; 4]>::new();
        let removed = {
            let Some(mut files) = self.lock() else {
                return false;
            };
            let before = files.len();
            files.retain(|f| f.id != file_id);
            before != files.len()
        };
        if removed {
            out.push(SessionEvent::UploadRemoved {
                file_id: file_id.to_string(),
            });
        }
        self.flush(out);
        removed
    }

    /// Terminal cleanup after a file's request settled.
    pub fn finish(&self, file_id: &str) {
        if self.remove_file(file_id) {
            log::debug!("Upload {} finished", file_id);
        }
    }

    pub fn clear(&self) {
        let had_any = match self.lock() {
            Some(mut files) => {
                let had_any = !files.is_empty();
                files.clear();
                had_any
            }
            None => false,
        };
        if had_any {
            self.events.emit(SessionEvent::UploadsCleared);
        }
    }

    /// Tick a file toward 100% on a fixed interval.
    ///
    /// Keeps ticking after the file is removed from the widget so the upload
    /// still completes on schedule.
    pub async fn drive_simulated(&self, file_id: &str, step: u8, interval: Duration) {
        let step = step.max(1);
        let mut progress: u8 = 0;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick of a tokio interval fires immediately.
        ticker.tick().await;
        while progress < 100 {
            ticker.tick().await;
            progress = progress.saturating_add(step).min(100);
            self.advance(file_id, progress);
        }
    }

    /// Mirror byte progress into the tracker until the sender goes away.
    ///
    /// `on_complete` runs once, the first time 100% is observed. Returns
    /// whether that happened.
    pub async fn watch_progress(
        &self,
        file_id: &str,
        mut rx: mpsc::UnboundedReceiver<u8>,
        mut on_complete: impl FnMut(),
    ) -> bool {
        let mut completed = false;
        while let Some(percent) = rx.recv().await {
            self.advance(file_id, percent);
            if percent >= 100 && !completed {
                completed = true;
                on_complete();
            }
        }
        completed
    }
}

fn is_accepted_type(name: &str, mime_type: &str) -> bool {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()));
    if let Some(ext) = ext {
        if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
            return true;
        }
    }

    mime_guess::get_mime_extensions_str(mime_type)
        .map(|exts| {
            exts.iter()
                .any(|e| ACCEPTED_EXTENSIONS.contains(&format!(".{}", e).as_str()))
        })
        .unwrap_or(false)
}

/// Read a local file into an upload payload.
pub async fn read_file(path: &Path) -> Result<FilePayload, String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Invalid file name: {}", path.display()))?
        .to_string();
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    Ok(FilePayload {
        mime_type: infer_mime_type(&name),
        name,
        data,
    })
}

fn infer_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, size: usize) -> FilePayload {
        FilePayload {
            name: name.to_string(),
            mime_type: infer_mime_type(name),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_advance_is_monotonic_and_clamped() {
        let tracker = UploadTracker::default();
        let file = tracker.register(&payload("lease.pdf", 10));

        assert_eq!(tracker.advance(&file.id, 40), Some(40));
        assert_eq!(tracker.advance(&file.id, 20), Some(40));
        assert_eq!(tracker.advance(&file.id, 250), Some(100));
        assert_eq!(tracker.progress(&file.id), Some(100));
    }

    #[test]
    fn test_remove_file_stops_tracking() {
        let (events, mut rx) = Events::channel();
        let tracker = UploadTracker::new(events);
        let file = tracker.register(&payload("lease.pdf", 10));

        assert!(tracker.remove_file(&file.id));
        assert!(!tracker.remove_file(&file.id));
        assert_eq!(tracker.advance(&file.id, 50), None);
        assert!(tracker.is_empty());

        let kinds: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| match e {
                SessionEvent::UploadRegistered { .. } => "registered",
                SessionEvent::UploadRemoved { .. } => "removed",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["registered", "removed"]);
    }

    #[test]
    fn test_clear_empties_tracker() {
        let tracker = UploadTracker::default();
        tracker.register(&payload("a.pdf", 1));
        tracker.register(&payload("b.csv", 1));
        assert_eq!(tracker.len(), 2);
        tracker.clear();
        assert!(tracker.list().is_empty());
    }

    #[test]
    fn test_validate_batch_drops_bad_files() {
        let tracker = UploadTracker::default();
        let report = tracker.validate_batch(vec![
            payload("statement.PDF", 1024),
            payload("photo.png", 1024),
            payload("ledger.xlsx", (MAX_FILE_BYTES + 1) as usize),
            payload("notes.txt", 10),
        ]);

        let accepted: Vec<&str> = report.accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(accepted, vec!["statement.PDF", "notes.txt"]);
        assert_eq!(report.rejected.len(), 2);
        assert!(report.rejected[0].starts_with("File type not supported"));
        assert_eq!(report.rejected[1], "File size exceeds the limit of 10MB.");
    }

    #[test]
    fn test_validate_batch_counts_tracked_files() {
        let tracker = UploadTracker::default();
        for i in 0..3 {
            tracker.register(&payload(&format!("f{i}.txt"), 1));
        }
        let report = tracker.validate_batch(vec![
            payload("a.txt", 1),
            payload("b.txt", 1),
            payload("c.txt", 1),
        ]);
        assert!(report.accepted.is_empty());
        assert_eq!(report.rejected, vec!["You can only upload up to 5 files"]);
    }

    #[test]
    fn test_mime_type_alone_is_accepted() {
        assert!(is_accepted_type("export", "text/csv"));
        assert!(is_accepted_type("scan", "application/pdf"));
        assert!(!is_accepted_type("archive", "application/zip"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_simulated_reaches_100() {
        let tracker = UploadTracker::default();
        let file = tracker.register(&payload("lease.pdf", 10));

        tracker
            .drive_simulated(&file.id, 10, Duration::from_millis(200))
            .await;
        assert_eq!(tracker.progress(&file.id), Some(100));
    }

    #[tokio::test]
    async fn test_watch_progress_fires_completion_once() {
        let tracker = UploadTracker::default();
        let file = tracker.register(&payload("lease.pdf", 10));
        let (tx, rx) = mpsc::unbounded_channel();
        for p in [10, 60, 100, 100] {
            tx.send(p).unwrap();
        }
        drop(tx);

        let mut calls = 0;
        let completed = tracker.watch_progress(&file.id, rx, || calls += 1).await;
        assert!(completed);
        assert_eq!(calls, 1);
        assert_eq!(tracker.progress(&file.id), Some(100));
    }

    #[tokio::test]
    async fn test_read_file_infers_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let file = read_file(&path).await.unwrap();
        assert_eq!(file.name, "contract.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size(), 8);
    }
}
