//! Chain-linked audit entries.
//!
//! Every stored [`AuditRecord`] is wrapped in an [`AuditEntry`] carrying its
//! append sequence number, the hash of the previous entry, and its own hash.
//! Editing or reordering entries in a persisted log breaks the chain.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::record::AuditRecord;

const HASH_DOMAIN: &str = "tollgate 2024 audit entry v1";

/// A BLAKE3 hash linking audit entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainHash([u8; 32]);

impl ChainHash {
    /// The hash preceding the first entry.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Check if this is the zero hash.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    /// Decode from hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, blake3::HexError> {
        blake3::Hash::from_hex(s).map(|h| Self(*h.as_bytes()))
    }
}

impl fmt::Debug for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ChainHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ChainHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A stored audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the log, starting at 0.
    pub seq: u64,
    /// Hash of the previous entry, or zero for the first.
    pub previous_hash: ChainHash,
    /// Hash of this entry.
    pub hash: ChainHash,
    /// The record itself.
    pub record: AuditRecord,
}

impl AuditEntry {
    /// Seal `record` as entry number `seq` following `previous_hash`.
    #[must_use]
    pub fn seal(seq: u64, previous_hash: ChainHash, record: AuditRecord) -> Self {
        let hash = Self::compute_hash(seq, &previous_hash, &record);
        Self {
            seq,
            previous_hash,
            hash,
            record,
        }
    }

    /// Recompute the hash from the entry's contents.
    #[must_use]
    pub fn content_hash(&self) -> ChainHash {
        Self::compute_hash(self.seq, &self.previous_hash, &self.record)
    }

    /// Check that the stored hash matches the contents.
    #[must_use]
    pub fn is_intact(&self) -> bool {
        self.hash == self.content_hash()
    }

    /// Check if this entry directly follows `previous`.
    #[must_use]
    pub fn follows(&self, previous: &AuditEntry) -> bool {
        self.previous_hash == previous.hash && Some(self.seq) == previous.seq.checked_add(1)
    }

    fn compute_hash(seq: u64, previous_hash: &ChainHash, record: &AuditRecord) -> ChainHash {
        let mut hasher = blake3::Hasher::new_derive_key(HASH_DOMAIN);
        hasher.update(&seq.to_le_bytes());
        hasher.update(previous_hash.as_bytes());
        // Serializing a record cannot fail: all keys are strings.
        if let Ok(body) = serde_json::to_vec(record) {
            hasher.update(&body);
        }
        ChainHash(*hasher.finalize().as_bytes())
    }
}
