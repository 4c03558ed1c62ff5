//! The policy store.

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::entry::PolicyEntry;
use crate::error::{PolicyError, PolicyResult};

/// Per-tool remembered permission policy.
///
/// Entries live in a sharded map so lookups for different tools never block
/// each other. Read-then-write sequences for one tool are linearized through
/// a per-tool gate obtained with [`acquire`](Self::acquire).
///
/// A store is session-only by default. [`open`](Self::open) attaches a JSON
/// backing file: every persisted change is written through, and the file is
/// loaded on open.
///
/// # Example
///
/// ```
/// # tokio_test_block(async {
/// use tollgate_policy::{PolicyEntry, PolicyStore};
///
/// let store = PolicyStore::new();
/// assert_eq!(store.lookup("read_file"), None);
///
/// store.record("read_file", PolicyEntry::AlwaysAllow, true).await.unwrap();
/// assert_eq!(store.lookup("read_file"), Some(PolicyEntry::AlwaysAllow));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct PolicyStore {
    entries: DashMap<String, PolicyEntry>,
    gates: DashMap<String, Arc<Mutex<()>>>,
    path: Option<PathBuf>,
    flush_lock: Mutex<()>,
}

impl PolicyStore {
    /// Create an empty, session-only store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            gates: DashMap::new(),
            path: None,
            flush_lock: Mutex::new(()),
        }
    }

    /// Open a durable store backed by the JSON file at `path`.
    ///
    /// A missing or empty file yields an empty store; the file is created on
    /// the first persisted change.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Io`] if the file cannot be read and
    /// [`PolicyError::Corrupt`] if it does not contain a valid policy map.
    pub async fn open(path: impl Into<PathBuf>) -> PolicyResult<Self> {
        let path = path.into();
        let entries = DashMap::new();

        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.trim_ascii().is_empty() => {},
            Ok(bytes) => {
                let map: BTreeMap<String, PolicyEntry> =
                    serde_json::from_slice(&bytes).map_err(|e| PolicyError::Corrupt {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                for (tool, entry) in map {
                    entries.insert(tool, entry);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(source) => return Err(PolicyError::Io { path, source }),
        }

        tracing::debug!(path = %path.display(), count = entries.len(), "loaded policy file");

        Ok(Self {
            entries,
            gates: DashMap::new(),
            path: Some(path),
            flush_lock: Mutex::new(()),
        })
    }

    /// Seed entries, typically from configuration.
    ///
    /// Entries already present (for example loaded from the backing file)
    /// are kept. Seeded entries are not written to the backing file until
    /// the next persisted change.
    #[must_use]
    pub fn with_entries<I, S>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, PolicyEntry)>,
        S: Into<String>,
    {
        for (tool, entry) in entries {
            self.entries.entry(tool.into()).or_insert(entry);
        }
        self
    }

    /// The backing file, if the store is durable.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Check whether persisted changes are written to disk.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.path.is_some()
    }

    /// Current entry for `tool`. `None` means "ask".
    #[must_use]
    pub fn lookup(&self, tool: &str) -> Option<PolicyEntry> {
        self.entries.get(tool).map(|e| *e.value())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all entries, sorted by tool name.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, PolicyEntry)> {
        let mut out: Vec<(String, PolicyEntry)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Take the exclusive gate for `tool`.
    ///
    /// While the returned guard is alive, no other `acquire`, `record` or
    /// `forget` for the same tool can proceed. Other tools are unaffected.
    pub async fn acquire(&self, tool: &str) -> PolicyGuard<'_> {
        let gate = self.gates.entry(tool.to_string()).or_default().clone();
        let held = gate.lock_owned().await;
        PolicyGuard {
            store: self,
            tool: tool.to_string(),
            _held: held,
        }
    }

    /// Remember `entry` for `tool`.
    ///
    /// With `persist == false` this is a no-op: a one-time answer leaves the
    /// store unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written. The in-memory
    /// entry is rolled back in that case.
    pub async fn record(&self, tool: &str, entry: PolicyEntry, persist: bool) -> PolicyResult<()> {
        if !persist {
            return Ok(());
        }
        let guard = self.acquire(tool).await;
        guard.record(entry, true).await
    }

    /// Remove the entry for `tool`, reverting it to "ask".
    ///
    /// Returns the removed entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written. The entry is
    /// restored in that case.
    pub async fn forget(&self, tool: &str) -> PolicyResult<Option<PolicyEntry>> {
        let _guard = self.acquire(tool).await;
        let Some((_, previous)) = self.entries.remove(tool) else {
            return Ok(None);
        };
        if let Err(e) = self.flush().await {
            self.entries.insert(tool.to_string(), previous);
            return Err(e);
        }
        tracing::info!(tool, previous = %previous, "policy entry forgotten");
        Ok(Some(previous))
    }

    /// Clear every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written. The previous
    /// entries are restored in that case.
    pub async fn reset(&self) -> PolicyResult<()> {
        let previous = self.entries();
        self.entries.clear();
        if let Err(e) = self.flush().await {
            for (tool, entry) in previous {
                self.entries.entry(tool).or_insert(entry);
            }
            return Err(e);
        }
        tracing::info!(cleared = previous.len(), "policy store reset");
        Ok(())
    }

    async fn write_entry(&self, tool: &str, entry: PolicyEntry) -> PolicyResult<()> {
        let previous = self.entries.insert(tool.to_string(), entry);
        if let Err(e) = self.flush().await {
            match previous {
                Some(p) => {
                    self.entries.insert(tool.to_string(), p);
                },
                None => {
                    self.entries.remove(tool);
                },
            }
            return Err(e);
        }
        tracing::debug!(tool, entry = %entry, "policy entry recorded");
        Ok(())
    }

    /// Write the current entries to the backing file, if any.
    async fn flush(&self) -> PolicyResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let _flush = self.flush_lock.lock().await;

        let snapshot: BTreeMap<String, PolicyEntry> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        let json = serde_json::to_vec_pretty(&snapshot)?;

        let io_err = |source: std::io::Error| PolicyError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PolicyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyStore")
            .field("count", &self.entries.len())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to one tool's policy entry.
///
/// Obtained from [`PolicyStore::acquire`]. The gate is released on drop.
pub struct PolicyGuard<'a> {
    store: &'a PolicyStore,
    tool: String,
    _held: OwnedMutexGuard<()>,
}

impl PolicyGuard<'_> {
    /// The tool this guard covers.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Current entry for the tool. `None` means "ask".
    #[must_use]
    pub fn entry(&self) -> Option<PolicyEntry> {
        self.store.lookup(&self.tool)
    }

    /// Remember `entry` while holding the gate.
    ///
    /// # Errors
    ///
    /// See [`PolicyStore::record`].
    pub async fn record(&self, entry: PolicyEntry, persist: bool) -> PolicyResult<()> {
        if !persist {
            return Ok(());
        }
        self.store.write_entry(&self.tool, entry).await
    }
}

impl fmt::Debug for PolicyGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyGuard")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
