use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::application::{AppError, AppResult, CooldownStore};

pub const DEFAULT_STATE_FILE: &str = "last_notification.txt";

/// Cooldown state kept as one timestamp in a text file; no file means no
/// prior notification.
pub struct FileCooldownStore {
    path: PathBuf,
}

impl FileCooldownStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Accepts RFC 3339 and, for files written by older versions, naive
/// ISO-8601 timestamps in local time.
pub fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| AppError::Storage(format!("invalid timestamp {raw:?}: {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| AppError::Storage(format!("nonexistent local time {raw:?}")))
}

#[async_trait]
impl CooldownStore for FileCooldownStore {
    async fn read(&self) -> AppResult<Option<DateTime<Utc>>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => parse_timestamp(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write(&self, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("{}: {e}", parent.display())))?;
        }
        tokio::fs::write(&self.path, at.to_rfc3339())
            .await
            .map_err(|e| AppError::Storage(format!("{}: {e}", self.path.display())))
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }
}
