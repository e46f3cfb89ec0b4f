//! File-based Meeting Repository
//!
//! Stores each meeting as a pretty-printed JSON document named after its id.
//! Writes go to a temporary file first and are renamed into place, so a
//! crash never leaves a half-written record behind.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, MeetingId};
use crate::domain::meeting::{MeetingStatus, RecurringMeeting};
use crate::ports::MeetingRepository;

use super::next_version;

/// File-based storage for meetings
#[derive(Debug)]
pub struct FileMeetingRepository {
    base_path: PathBuf,
    /// Serialises saves so the version check and the write are atomic.
    write_lock: Mutex<()>,
}

impl FileMeetingRepository {
    /// Create a new file repository rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileMeetingRepository::new("./data/meetings");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn meeting_path(&self, id: &MeetingId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    async fn ensure_dir(&self) -> Result<(), DomainError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| io_error("create storage directory", e))
    }

    async fn read_meeting(&self, path: &Path) -> Result<Option<RecurringMeeting>, DomainError> {
        let json = match fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read meeting", e)),
        };

        serde_json::from_str(&json).map(Some).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to deserialize meeting: {}", e),
            )
            .with_detail("path", path.display().to_string())
        })
    }

    /// Reads every record in the directory and keeps those matching `keep`.
    async fn list_where(
        &self,
        keep: impl Fn(&RecurringMeeting) -> bool,
    ) -> Result<Vec<RecurringMeeting>, DomainError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list meetings", e)),
        };

        let mut found = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("list meetings", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // One unreadable record must not stall every other meeting.
            match self.read_meeting(&path).await {
                Ok(Some(m)) if keep(&m) => found.push(m),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable meeting record");
                }
            }
        }

        found.sort_by_key(|m| m.id);
        Ok(found)
    }
}

fn io_error(action: &str, err: std::io::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, err),
    )
}

#[async_trait]
impl MeetingRepository for FileMeetingRepository {
    async fn save(&self, meeting: &RecurringMeeting) -> Result<u64, DomainError> {
        let _guard = self.write_lock.lock().await;
        self.ensure_dir().await?;

        let path = self.meeting_path(&meeting.id);
        let current = self.read_meeting(&path).await?.map(|m| m.version);
        let version = next_version(current, meeting)?;

        let mut stored = meeting.clone();
        stored.version = version;
        let json = serde_json::to_string_pretty(&stored).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to serialize meeting: {}", e),
            )
        })?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| io_error("write meeting", e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| io_error("replace meeting", e))?;

        Ok(version)
    }

    async fn find_by_id(&self, id: &MeetingId) -> Result<Option<RecurringMeeting>, DomainError> {
        self.read_meeting(&self.meeting_path(id)).await
    }

    async fn find_active(&self) -> Result<Vec<RecurringMeeting>, DomainError> {
        self.list_where(|m| m.active).await
    }

    async fn find_active_scheduled(&self) -> Result<Vec<RecurringMeeting>, DomainError> {
        self.list_where(|m| m.active && m.status == MeetingStatus::Scheduled)
            .await
    }
}
