//! The audit log.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tollgate_core::RequestId;

use crate::entry::{AuditEntry, ChainHash};
use crate::error::{AuditError, AuditResult};
use crate::filter::AuditFilter;
use crate::record::AuditRecord;
use crate::storage::{AuditStorage, FileAuditStorage, MemoryAuditStorage};

/// A problem found while verifying the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainIssue {
    /// The entry's stored hash does not match its contents.
    HashMismatch {
        /// The tampered entry.
        seq: u64,
    },
    /// The entry does not link to the one before it.
    BrokenLink {
        /// The entry whose `previous_hash` is wrong.
        seq: u64,
    },
    /// Sequence numbers are not consecutive.
    SequenceGap {
        /// The sequence number expected at this position.
        expected: u64,
        /// The sequence number found.
        found: u64,
    },
    /// Two entries describe the same request.
    DuplicateRequest {
        /// The later entry.
        seq: u64,
        /// The request recorded twice.
        request_id: RequestId,
    },
}

impl fmt::Display for ChainIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMismatch { seq } => write!(f, "entry {seq}: hash does not match contents"),
            Self::BrokenLink { seq } => write!(f, "entry {seq}: does not follow previous entry"),
            Self::SequenceGap { expected, found } => {
                write!(f, "expected entry {expected}, found {found}")
            },
            Self::DuplicateRequest { seq, request_id } => {
                write!(f, "entry {seq}: second record for {request_id}")
            },
        }
    }
}

/// Result of [`AuditLog::verify_chain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainVerificationResult {
    /// Whether no issues were found.
    pub valid: bool,
    /// Number of entries checked.
    pub entries_verified: usize,
    /// Everything that was wrong.
    pub issues: Vec<ChainIssue>,
}

#[derive(Default)]
struct LogState {
    entries: Vec<AuditEntry>,
    by_request: HashMap<RequestId, usize>,
    reserved: HashSet<RequestId>,
}

/// Append-only log of tool-call records.
///
/// Holds at most one [`AuditRecord`] per request ID. Every record is sealed
/// into a chain-linked [`AuditEntry`] and written to the configured
/// [`AuditStorage`] before it becomes visible to queries.
///
/// # Example
///
/// ```
/// use tollgate_audit::{AuditFilter, AuditLog};
///
/// let log = AuditLog::in_memory();
/// assert!(log.query(&AuditFilter::all()).is_empty());
/// assert!(log.verify_chain().valid);
/// ```
pub struct AuditLog {
    storage: Arc<dyn AuditStorage>,
    state: RwLock<LogState>,
}

impl AuditLog {
    /// Create a log kept in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryAuditStorage::new()),
            state: RwLock::new(LogState::default()),
        }
    }

    /// Open (or create) a JSON-lines log file and verify its chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed, or
    /// [`AuditError::IntegrityViolation`] if the stored chain is broken.
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        Self::with_storage(Arc::new(FileAuditStorage::open(path)?))
    }

    /// Create a log over `storage`, loading and verifying what it holds.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the stored chain is broken.
    pub fn with_storage(storage: Arc<dyn AuditStorage>) -> AuditResult<Self> {
        let entries = storage.load()?;
        let verification = verify_entries(&entries);
        if let Some(issue) = verification.issues.first() {
            let seq = match issue {
                ChainIssue::HashMismatch { seq }
                | ChainIssue::BrokenLink { seq }
                | ChainIssue::DuplicateRequest { seq, .. } => *seq,
                ChainIssue::SequenceGap { found, .. } => *found,
            };
            return Err(AuditError::IntegrityViolation {
                seq,
                reason: issue.to_string(),
            });
        }

        let by_request = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.record.request_id, i))
            .collect();
        tracing::debug!(entries = entries.len(), "loaded audit log");

        Ok(Self {
            storage,
            state: RwLock::new(LogState {
                entries,
                by_request,
                reserved: HashSet::new(),
            }),
        })
    }

    /// Claim `request_id` for a call that is about to start.
    ///
    /// At most one claim succeeds per ID, and never for an ID that already
    /// has a record. A successful [`append`](Self::append) releases the
    /// claim; a failed one keeps it so the ID cannot be run again.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::DuplicateRecord`] if the ID is recorded or
    /// already claimed.
    pub fn reserve(&self, request_id: RequestId) -> AuditResult<()> {
        let mut state = self.write_state();
        if state.by_request.contains_key(&request_id) || !state.reserved.insert(request_id) {
            return Err(AuditError::DuplicateRecord { request_id });
        }
        Ok(())
    }

    /// Append the record for a completed call.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::DuplicateRecord`] if the request already has a
    /// record, or a storage error if the entry cannot be persisted. Nothing
    /// is added in either case.
    pub fn append(&self, record: AuditRecord) -> AuditResult<()> {
        let mut state = self.write_state();

        let request_id = record.request_id;
        if state.by_request.contains_key(&request_id) {
            return Err(AuditError::DuplicateRecord { request_id });
        }

        let (seq, previous_hash) = match state.entries.last() {
            Some(last) => (
                last.seq.checked_add(1).ok_or_else(|| {
                    AuditError::Storage("audit sequence exhausted".to_string())
                })?,
                last.hash,
            ),
            None => (0, ChainHash::zero()),
        };
        let entry = AuditEntry::seal(seq, previous_hash, record);
        self.storage.append(&entry)?;

        tracing::debug!(
            seq,
            request_id = %request_id,
            tool = %entry.record.tool,
            decision = %entry.record.decision,
            "audit record appended"
        );

        let index = state.entries.len();
        state.entries.push(entry);
        state.by_request.insert(request_id, index);
        state.reserved.remove(&request_id);
        Ok(())
    }

    /// Records matching `filter`, in insertion order.
    #[must_use]
    pub fn query(&self, filter: &AuditFilter) -> Vec<AuditRecord> {
        self.read_state()
            .entries
            .iter()
            .filter(|e| filter.matches(&e.record))
            .map(|e| e.record.clone())
            .collect()
    }

    /// The record for one request.
    #[must_use]
    pub fn get(&self, request_id: &RequestId) -> Option<AuditRecord> {
        let state = self.read_state();
        state
            .by_request
            .get(request_id)
            .and_then(|&i| state.entries.get(i))
            .map(|e| e.record.clone())
    }

    /// All stored entries, including chain metadata.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.read_state().entries.clone()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_state().entries.len()
    }

    /// Check whether the log holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_state().entries.is_empty()
    }

    /// Verify hashes, links and sequence numbers of every entry.
    #[must_use]
    pub fn verify_chain(&self) -> ChainVerificationResult {
        verify_entries(&self.read_state().entries)
    }

    /// Flush the storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to flush.
    pub fn flush(&self) -> AuditResult<()> {
        self.storage.flush()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LogState> {
        self.state.read().unwrap_or_else(|e| {
            tracing::warn!("AuditLog read lock poisoned, recovering");
            e.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LogState> {
        self.state.write().unwrap_or_else(|e| {
            tracing::warn!("AuditLog lock poisoned, recovering");
            e.into_inner()
        })
    }
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

fn verify_entries(entries: &[AuditEntry]) -> ChainVerificationResult {
    let mut issues = Vec::new();
    let mut seen = HashMap::new();
    let mut previous: Option<&AuditEntry> = None;

    for (expected, entry) in (0u64..).zip(entries) {
        if entry.seq != expected {
            issues.push(ChainIssue::SequenceGap {
                expected,
                found: entry.seq,
            });
        }
        if !entry.is_intact() {
            issues.push(ChainIssue::HashMismatch { seq: entry.seq });
        }
        let linked = match previous {
            Some(prev) => entry.previous_hash == prev.hash,
            None => entry.previous_hash.is_zero(),
        };
        if !linked {
            issues.push(ChainIssue::BrokenLink { seq: entry.seq });
        }
        if seen.insert(entry.record.request_id, entry.seq).is_some() {
            issues.push(ChainIssue::DuplicateRequest {
                seq: entry.seq,
                request_id: entry.record.request_id,
            });
        }
        previous = Some(entry);
    }

    ChainVerificationResult {
        valid: issues.is_empty(),
        entries_verified: entries.len(),
        issues,
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
