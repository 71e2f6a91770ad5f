//! Content hashing for point-sets.
//!
//! A fingerprint is a SHA-256 digest over the sorted `(x, y, id)` triples of a
//! point-set, with domain separation and length prefixing. It depends only on
//! the multiset of points, never on their order, so two stages that hold the
//! same points hash equal regardless of how a pipeline produced them.
//!
//! # Citations
//! - SHA-256: NIST FIPS 180-4 (2015)
//! - Domain separation & length prefixing: Bernstein et al., "How to hash into elliptic curves" (2009)

use crate::point_set::PointSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Computes SHA-256 of `data` with domain separation.
    ///
    /// The digest input is `b"FRR:<domain>:v1" || le64(len(data)) || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"FRR:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are enough to tell stages apart in logs.
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Order-independent fingerprint of a point-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSetFingerprint(HashValue);

impl PointSetFingerprint {
    /// Fingerprints `points`.
    ///
    /// # Determinism guarantee
    /// Triples are sorted before hashing, so any permutation of the same
    /// points yields the same fingerprint.
    pub fn of(points: &PointSet) -> Self {
        let triples = points.canonical();
        let mut data = Vec::with_capacity(8 + triples.len() * 24);
        data.extend_from_slice(&(triples.len() as u64).to_le_bytes());
        for (x, y, id) in triples {
            data.extend_from_slice(&x.to_le_bytes());
            data.extend_from_slice(&y.to_le_bytes());
            data.extend_from_slice(&id.to_le_bytes());
        }
        Self(HashValue::hash_with_domain(b"POINT_SET", &data))
    }

    /// Returns the underlying hash value.
    #[inline]
    pub const fn hash(&self) -> HashValue {
        self.0
    }
}
