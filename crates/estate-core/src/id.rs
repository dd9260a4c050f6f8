//! Entity identifiers
//!
//! Every catalog document is keyed by a 12-byte identifier generated on the
//! client: a 4-byte big-endian timestamp (seconds since the Unix epoch), five
//! bytes unique to this process, and a 3-byte big-endian counter. Identifiers
//! are rendered as 24 lowercase hex characters. Because the timestamp leads
//! and the counter increments, ids generated by one process sort in creation
//! order.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const ID_LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
    let seed = uuid::Uuid::new_v4();
    let mut bytes = [0u8; 5];
    bytes.copy_from_slice(&seed.as_bytes()[..5]);
    bytes
});

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| {
    let seed = uuid::Uuid::new_v4();
    let b = seed.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, b[0], b[1], b[2]]))
});

/// Error returned when parsing an [`EntityId`] from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier must be {expected} hex characters, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("identifier is not valid hex: {0}")]
    Hex(String),
}

/// A 12-byte document identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId([u8; ID_LEN]);

impl EntityId {
    /// The empty identifier (all zero bytes)
    pub const EMPTY: EntityId = EntityId([0; ID_LEN]);

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        let now = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        Self::with_timestamp(now)
    }

    fn with_timestamp(seconds: u32) -> Self {
        let count = COUNTER.fetch_add(1, Ordering::SeqCst) & COUNTER_MASK;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; ID_LEN] {
        self.0
    }

    /// Whether this is the all-zero identifier
    pub fn is_empty(&self) -> bool {
        self.0 == [0; ID_LEN]
    }

    /// Creation time embedded in the identifier
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(seconds as i64, 0)
            .single()
            .unwrap_or_default()
    }

    /// Hex rendering used as the document key
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.to_hex())
    }
}

impl FromStr for EntityId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != ID_LEN * 2 {
            return Err(IdError::Length {
                expected: ID_LEN * 2,
                actual: s.len(),
            });
        }

        let decoded = hex::decode(s).map_err(|e| IdError::Hex(e.to_string()))?;
        let mut bytes = [0u8; ID_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Self::EMPTY);
        }
        raw.parse().map_err(serde::de::Error::custom)
    }
}
