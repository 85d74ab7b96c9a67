//! Service layer.
//!
//! `DeskService` wraps `DeskDb` (raw database access) together with the
//! settings the workflow needs: photo intake limits, the retry policy for
//! derived violations and the deferred-violation queue. All repo methods are
//! implemented as `impl DeskService`.

use desk_config::{DeskConfig, IntakeConfig};

use crate::DeskDb;
use crate::error::DatabaseError;
use crate::queue::ViolationQueue;
use crate::retry::RetryConfig;

pub struct DeskService {
    db: DeskDb,
    intake: IntakeConfig,
    retry: RetryConfig,
    queue: ViolationQueue,
}

impl DeskService {
    /// Open the configured store and queue.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the queue
    /// directory cannot be created.
    pub async fn new_local(config: &DeskConfig) -> Result<Self, DatabaseError> {
        let db = DeskDb::open_local(&config.database.path).await?;
        let queue = match config.violations.queue_path() {
            Some(dir) => ViolationQueue::new(dir)?,
            None => ViolationQueue::disabled(),
        };
        Ok(Self {
            db,
            intake: config.intake.clone(),
            retry: RetryConfig::from_config(&config.violations),
            queue,
        })
    }

    /// Create from an existing `DeskDb` with default intake limits.
    #[must_use]
    pub fn from_db(db: DeskDb, retry: RetryConfig, queue: ViolationQueue) -> Self {
        Self {
            db,
            intake: IntakeConfig::default(),
            retry,
            queue,
        }
    }

    #[must_use]
    pub fn with_intake(mut self, intake: IntakeConfig) -> Self {
        self.intake = intake;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DeskDb {
        &self.db
    }

    #[must_use]
    pub const fn intake(&self) -> &IntakeConfig {
        &self.intake
    }

    #[must_use]
    pub const fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    #[must_use]
    pub const fn queue(&self) -> &ViolationQueue {
        &self.queue
    }
}
