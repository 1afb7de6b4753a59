use thiserror::Error;

/// Errors raised by the embedding codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    #[error("Message unit {unit} at index {index} is outside the encodable range 0..=254")]
    InvalidUnit { index: usize, unit: u8 },

    #[error("Carrier has no pixels ({height}x{width})")]
    EmptyBuffer { height: usize, width: usize },

    #[error("Sample {value} at ({row}, {col}, {chan}) has no decodable unit (message index {index})")]
    UndecodableSample {
        index: usize,
        row: usize,
        col: usize,
        chan: usize,
        value: u8,
    },

    #[error("Sample buffer holds {actual} bytes, expected {expected} for {height}x{width}x3")]
    BufferSizeMismatch {
        height: usize,
        width: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Carrier geometry {height}x{width}x3 does not fit in memory")]
    GeometryOverflow { height: usize, width: usize },

    #[error("Character {ch:?} at index {index} cannot be represented in a carrier sample")]
    InvalidText { index: usize, ch: char },
}

pub type Result<T> = std::result::Result<T, StegoError>;
