//! File-backed record of produced carriers
//!
//! The codec does not embed the message length, and it cannot tell a genuine
//! carrier from a re-encoded one. The store keeps both facts next to each
//! carrier it produced: the exact bytes and the number of hidden units.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored carrier is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("No carrier recorded under id {0}")]
    UnknownCarrier(Uuid),

    #[error("Presented image does not match carrier {0}")]
    CarrierMismatch(Uuid),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One produced carrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierRecord {
    pub id: Uuid,
    /// SHA-256 of the carrier bytes, lowercase hex
    pub digest: String,
    /// Exact carrier bytes, base64
    pub carrier: String,
    pub message_length: usize,
    pub created_at: DateTime<Utc>,
}

impl CarrierRecord {
    fn new(carrier: &[u8], message_length: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            digest: digest_hex(carrier),
            carrier: STANDARD.encode(carrier),
            message_length,
            created_at: Utc::now(),
        }
    }

    pub fn carrier_bytes(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(&self.carrier)?)
    }

    /// First 16 hex digits of the digest, or all of it when shorter
    pub fn short_digest(&self) -> &str {
        self.digest.get(..16).unwrap_or(self.digest.as_str())
    }

    /// Byte-for-byte comparison against the stored carrier
    pub fn matches(&self, presented: &[u8]) -> Result<bool> {
        if self.digest != digest_hex(presented) {
            return Ok(false);
        }
        Ok(self.carrier_bytes()? == presented)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    carriers: Vec<CarrierRecord>,
}

/// Keyed collection of carrier records persisted as JSON
#[derive(Debug)]
pub struct CarrierStore {
    path: PathBuf,
    records: Vec<CarrierRecord>,
}

impl CarrierStore {
    /// Load the store at `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str::<StoreFile>(&data)?.carriers
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), records = records.len(), "carrier store opened");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[CarrierRecord] {
        &self.records
    }

    /// Record a new carrier and return its entry
    pub fn insert(&mut self, carrier: &[u8], message_length: usize) -> &CarrierRecord {
        let record = CarrierRecord::new(carrier, message_length);
        info!(id = %record.id, message_length, "carrier recorded");
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn get(&self, id: Uuid) -> Option<&CarrierRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Most recent record whose carrier is byte-identical to `presented`
    pub fn find_matching(&self, presented: &[u8]) -> Result<Option<&CarrierRecord>> {
        for record in self.records.iter().rev() {
            if record.matches(presented)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Check `presented` against the carrier recorded under `id`
    pub fn verify(&self, id: Uuid, presented: &[u8]) -> Result<&CarrierRecord> {
        let record = self.get(id).ok_or(StoreError::UnknownCarrier(id))?;
        if record.matches(presented)? {
            Ok(record)
        } else {
            Err(StoreError::CarrierMismatch(id))
        }
    }

    /// Write all records back to disk, creating parent directories
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            carriers: self.records.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        debug!(path = %self.path.display(), records = self.records.len(), "carrier store saved");
        Ok(())
    }
}

fn digest_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
