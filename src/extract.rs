//! Extraction from a presented carrier file
//!
//! The message length comes either from the caller or from the store record
//! whose carrier is byte-identical to the presented one.

use crate::error::StegoError;
use crate::steganography::PixelStego;
use crate::store::{CarrierStore, StoreError};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Text shown to the user when a carrier cannot be decoded
pub const EXTRACTION_FAILED: &str = "Message extraction error.";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Uploaded image does not match any recorded carrier")]
    UnknownCarrier,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Carrier is not a readable image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Codec(#[from] StegoError),
}

impl ExtractError {
    /// Message for the user; decode failures collapse into one fixed line
    pub fn user_message(&self) -> String {
        match self {
            ExtractError::Image(_) | ExtractError::Codec(_) => EXTRACTION_FAILED.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Where a message length came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSource {
    Explicit,
    Record(Uuid),
}

/// Pick the message length for `carrier`.
///
/// An explicit length is used as is and the store is not opened. Otherwise
/// the store at `store_path` must hold a byte-identical carrier.
pub fn resolve_length(
    explicit: Option<usize>,
    store_path: &Path,
    carrier: &[u8],
) -> Result<(usize, LengthSource), ExtractError> {
    if let Some(length) = explicit {
        return Ok((length, LengthSource::Explicit));
    }

    let store = CarrierStore::open(store_path)?;
    let record = store
        .find_matching(carrier)?
        .ok_or(ExtractError::UnknownCarrier)?;
    info!(id = %record.id, "carrier matched stored record");
    Ok((record.message_length, LengthSource::Record(record.id)))
}

/// Decode `carrier` bytes and read `length` units
pub fn extract_message(carrier: &[u8], length: usize) -> Result<Vec<u8>, ExtractError> {
    let image = image::load_from_memory(carrier)?;
    Ok(PixelStego::new().extract(&image, length)?)
}
