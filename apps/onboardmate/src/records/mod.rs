//! Record Store: accumulates one row per successful onboarding plan.
//!
//! `CsvRecordStore` keeps a single CSV file with a fixed header row. Appends are
//! serialised behind a mutex and only ever add a line; the file is never rewritten,
//! so concurrent submissions cannot drop each other's rows.
//!
//! Blocking file I/O runs inside `tokio::task::spawn_blocking`.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::record::{PersistedRecord, RECORD_COLUMNS};

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("I/O error on record store: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error on record store: {0}")]
    Csv(#[from] csv::Error),

    #[error("record store header {found:?} does not match expected columns {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("record store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The persistence seam for onboarding records.
///
/// Carried in `AppState` as `Arc<dyn RecordStore>`. Implementations must make
/// `append` safe to call concurrently.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, record: &PersistedRecord) -> Result<(), RecordStoreError>;

    /// Every stored row, oldest first. An absent store is empty.
    async fn records(&self) -> Result<Vec<PersistedRecord>, RecordStoreError>;

    async fn len(&self) -> Result<usize, RecordStoreError> {
        Ok(self.records().await?.len())
    }
}

/// CSV-file record store with a single-writer discipline.
pub struct CsvRecordStore {
    path: Arc<PathBuf>,
    write_lock: Mutex<()>,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for CsvRecordStore {
    async fn append(&self, record: &PersistedRecord) -> Result<(), RecordStoreError> {
        let _guard = self.write_lock.lock().await;

        let path = self.path.clone();
        let record = record.clone();
        let created = tokio::task::spawn_blocking(move || append_sync(&path, &record)).await??;

        if created {
            info!("Created record store at {}", self.path.display());
        }
        Ok(())
    }

    async fn records(&self) -> Result<Vec<PersistedRecord>, RecordStoreError> {
        let _guard = self.write_lock.lock().await;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_all_sync(&path)).await?
    }
}

/// Appends one row. Returns true when the file had to be created.
fn append_sync(path: &Path, record: &PersistedRecord) -> Result<bool, RecordStoreError> {
    let is_new = !has_content(path)?;

    if is_new {
        // serialize() emits the header before the first row.
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        writer.serialize(record)?;
        writer.flush()?;
        return Ok(true);
    }

    check_header(path)?;

    let mut file = OpenOptions::new().read(true).append(true).open(path)?;
    if !ends_with_newline(&mut file)? {
        file.write_all(b"\n")?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(false)
}

/// The final newline is optional in CSV; a row must never be glued onto the last one.
fn ends_with_newline(file: &mut File) -> Result<bool, RecordStoreError> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn read_all_sync(path: &Path) -> Result<Vec<PersistedRecord>, RecordStoreError> {
    if !has_content(path)? {
        return Ok(Vec::new());
    }

    check_header(path)?;

    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<PersistedRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn has_content(path: &Path) -> Result<bool, RecordStoreError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.len() > 0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Rejects stores written with a different column set; rows are never realigned.
fn check_header(path: &Path) -> Result<(), RecordStoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    if found.iter().map(String::as_str).ne(RECORD_COLUMNS) {
        return Err(RecordStoreError::SchemaMismatch {
            expected: RECORD_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }
    Ok(())
}
