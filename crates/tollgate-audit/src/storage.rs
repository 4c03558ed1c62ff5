//! Audit log storage trait and implementations.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::entry::AuditEntry;
use crate::error::{AuditError, AuditResult};

/// Storage backend for audit logs.
///
/// Storage is append-only. Implementations must be thread-safe; the
/// [`AuditLog`](crate::AuditLog) serializes appends, so a backend never sees
/// two concurrent `append` calls from the same log.
pub trait AuditStorage: Send + Sync {
    /// Persist an entry after all previously appended entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be persisted.
    fn append(&self, entry: &AuditEntry) -> AuditResult<()>;

    /// Load every stored entry, in append order.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or deserialization fails.
    fn load(&self) -> AuditResult<Vec<AuditEntry>>;

    /// Flush pending writes to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to flush.
    fn flush(&self) -> AuditResult<()>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryAuditStorage {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStorage for MemoryAuditStorage {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        self.entries
            .lock()
            .map_err(|e| AuditError::Storage(e.to_string()))?
            .push(entry.clone());
        Ok(())
    }

    fn load(&self) -> AuditResult<Vec<AuditEntry>> {
        Ok(self
            .entries
            .lock()
            .map_err(|e| AuditError::Storage(e.to_string()))?
            .clone())
    }

    fn flush(&self) -> AuditResult<()> {
        Ok(())
    }
}

/// Append-only JSON-lines file storage: one [`AuditEntry`] per line.
#[derive(Debug)]
pub struct FileAuditStorage {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditStorage {
    /// Open or create the log file at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for appending.
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| storage_err(&path, &e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| storage_err(&path, &e))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// The log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditStorage for FileAuditStorage {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        let mut line =
            serde_json::to_vec(entry).map_err(|e| AuditError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let mut file = self
            .file
            .lock()
            .map_err(|e| AuditError::Storage(e.to_string()))?;
        append_line(&mut *file, &line).map_err(|e| storage_err(&self.path, &e))
    }

    fn load(&self) -> AuditResult<Vec<AuditEntry>> {
        let file = File::open(&self.path).map_err(|e| storage_err(&self.path, &e))?;
        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| storage_err(&self.path, &e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                AuditError::Serialization(format!(
                    "{} line {}: {e}",
                    self.path.display(),
                    index.saturating_add(1)
                ))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn flush(&self) -> AuditResult<()> {
        let file = self
            .file
            .lock()
            .map_err(|e| AuditError::Storage(e.to_string()))?;
        file.sync_all().map_err(|e| storage_err(&self.path, &e))
    }
}

/// A sink that can be cut back to an earlier length.
trait Rewind: Write {
    fn end(&mut self) -> io::Result<u64>;
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl Rewind for File {
    fn end(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Write one whole line or nothing.
///
/// A failed write is cut back to the length before it, so a partial line
/// never stays behind to break the next [`load`](AuditStorage::load).
fn append_line<W: Rewind + ?Sized>(out: &mut W, line: &[u8]) -> io::Result<()> {
    let len = out.end()?;
    let written = out.write_all(line).and_then(|()| out.flush());
    if let Err(e) = written {
        if let Err(undo) = out.truncate_to(len) {
            tracing::error!(error = %undo, len, "failed to remove partial audit line");
        }
        return Err(e);
    }
    Ok(())
}

fn storage_err(path: &Path, e: &io::Error) -> AuditError {
    AuditError::Storage(format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ChainHash;
    use crate::record::{AuditRecord, ExecutionOutcome};
    use tollgate_core::{Arguments, PermissionDecision, RequestId, Timestamp};

    fn entry(seq: u64, previous: ChainHash) -> AuditEntry {
        let now = Timestamp::now();
        AuditEntry::seal(
            seq,
            previous,
            AuditRecord {
                request_id: RequestId::new(),
                tool: "read_file".to_string(),
                arguments: Arguments::new(),
                decision: PermissionDecision::Allowed,
                asked: false,
                elicitation: None,
                outcome: ExecutionOutcome::Success {
                    payload: serde_json::json!({"text": "hello"}),
                },
                requested_at: now,
                decided_at: now,
                completed_at: now,
            },
        )
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryAuditStorage::new();
        let first = entry(0, ChainHash::zero());
        storage.append(&first).unwrap();
        storage.append(&entry(1, first.hash)).unwrap();
        assert_eq!(storage.load().unwrap().len(), 2);
    }

    #[test]
    fn test_file_storage_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("audit.jsonl");

        let first = entry(0, ChainHash::zero());
        let second = entry(1, first.hash);
        {
            let storage = FileAuditStorage::open(&path).unwrap();
            storage.append(&first).unwrap();
            storage.append(&second).unwrap();
            storage.flush().unwrap();
        }

        let storage = FileAuditStorage::open(&path).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded, vec![first, second]);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().lines().count(),
            2
        );
    }

    /// Accepts `room` more bytes, then fails mid-write.
    struct ShortDisk {
        data: Vec<u8>,
        room: usize,
    }

    impl Write for ShortDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.room);
            self.data.extend_from_slice(buf.get(..n).unwrap_or_default());
            self.room = self.room.saturating_sub(n);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Rewind for ShortDisk {
        fn end(&mut self) -> io::Result<u64> {
            Ok(u64::try_from(self.data.len()).unwrap())
        }

        fn truncate_to(&mut self, len: u64) -> io::Result<()> {
            self.data.truncate(usize::try_from(len).unwrap());
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_leaves_no_partial_line() {
        let mut disk = ShortDisk {
            data: b"{\"seq\":0}\n".to_vec(),
            room: 4,
        };

        let err = append_line(&mut disk, b"{\"seq\":1}\n").unwrap_err();
        assert_eq!(err.to_string(), "no space left on device");
        assert_eq!(disk.data, b"{\"seq\":0}\n");

        disk.room = 64;
        append_line(&mut disk, b"{\"seq\":1}\n").unwrap();
        assert_eq!(disk.data, b"{\"seq\":0}\n{\"seq\":1}\n");
    }

    #[test]
    fn test_file_truncates_back_over_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let storage = FileAuditStorage::open(&path).unwrap();
        let first = entry(0, ChainHash::zero());
        storage.append(&first).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        let before = file.end().unwrap();
        file.write_all(b"{\"seq\":1,\"prev").unwrap();
        file.truncate_to(before).unwrap();

        let second = entry(1, first.hash);
        storage.append(&second).unwrap();
        assert_eq!(storage.load().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(&path, "not json\n").unwrap();

        let storage = FileAuditStorage::open(&path).unwrap();
        let err = storage.load().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
