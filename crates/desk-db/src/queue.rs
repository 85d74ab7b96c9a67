//! Deferred-violation queue.
//!
//! Violation drafts that could not be written after retries are appended to
//! `{queue_dir}/deferred_violations.jsonl` with
//! `serde_jsonlines::append_json_lines`, one draft per line.
//!
//! Replay claims the file by renaming it aside before reading it. A push that
//! lands after the claim starts a fresh queue file instead of being deleted
//! along with the claimed one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use desk_core::rules::ViolationDraft;

use crate::error::DatabaseError;

const QUEUE_FILE: &str = "deferred_violations.jsonl";

static CLAIM_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct ViolationQueue {
    queue_dir: PathBuf,
    enabled: bool,
    file_lock: Mutex<()>,
}

impl ViolationQueue {
    /// Create a queue rooted at `queue_dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(queue_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&queue_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            queue_dir,
            enabled: true,
            file_lock: Mutex::new(()),
        })
    }

    /// A queue that accepts nothing. Drafts offered to it stay unpersisted
    /// and are only logged.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            queue_dir: PathBuf::new(),
            enabled: false,
            file_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn queue_dir(&self) -> &Path {
        &self.queue_dir
    }

    fn path(&self) -> PathBuf {
        self.queue_dir.join(QUEUE_FILE)
    }

    fn lock_file(&self) -> std::sync::MutexGuard<'_, ()> {
        self.file_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Append drafts. Returns whether they were stored.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn push(&self, drafts: &[ViolationDraft]) -> Result<bool, DatabaseError> {
        if !self.enabled {
            return Ok(false);
        }
        if drafts.is_empty() {
            return Ok(true);
        }
        let _guard = self.lock_file();
        serde_jsonlines::append_json_lines(self.path(), drafts)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(true)
    }

    /// Drafts currently queued, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file exists but cannot be read or parsed.
    pub fn pending(&self) -> Result<Vec<ViolationDraft>, DatabaseError> {
        if !self.enabled {
            return Ok(Vec::new());
        }
        let _guard = self.lock_file();
        read_drafts(&self.path())
    }

    /// Move the queue file aside so later pushes start a new one.
    ///
    /// Returns the claimed file, or `None` when nothing is queued. Pass it to
    /// [`ViolationQueue::take`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the rename fails.
    pub fn claim(&self) -> Result<Option<PathBuf>, DatabaseError> {
        if !self.enabled {
            return Ok(None);
        }
        let seq = CLAIM_SEQ.fetch_add(1, Ordering::Relaxed);
        let claimed = self
            .queue_dir
            .join(format!("deferred_violations.{}.{seq}.draining", std::process::id()));
        let _guard = self.lock_file();
        match std::fs::rename(self.path(), &claimed) {
            Ok(()) => Ok(Some(claimed)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DatabaseError::Other(e.into())),
        }
    }

    /// Read a claimed file and delete it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if reading or removing the file fails.
    pub fn take(claimed: &Path) -> Result<Vec<ViolationDraft>, DatabaseError> {
        let drafts = read_drafts(claimed)?;
        match std::fs::remove_file(claimed) {
            Ok(()) => Ok(drafts),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(drafts),
            Err(e) => Err(DatabaseError::Other(e.into())),
        }
    }

    /// Take every queued draft, leaving the queue empty.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if claiming, reading or removing the file fails.
    pub fn drain(&self) -> Result<Vec<ViolationDraft>, DatabaseError> {
        match self.claim()? {
            Some(claimed) => Self::take(&claimed),
            None => Ok(Vec::new()),
        }
    }
}

fn read_drafts(path: &Path) -> Result<Vec<ViolationDraft>, DatabaseError> {
    let lines = match serde_jsonlines::json_lines(path) {
        Ok(lines) => lines,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DatabaseError::Other(e.into())),
    };
    lines
        .collect::<std::io::Result<Vec<ViolationDraft>>>()
        .map_err(|e| DatabaseError::Other(e.into()))
}
