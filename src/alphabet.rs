//! Unit <-> sample value mapping
//!
//! Units `0..=254` map onto sample values of the same magnitude. Sample 255
//! is never written and has no inverse, so it marks an undecodable position.

use crate::error::{Result, StegoError};

/// Sample value that no unit maps to
pub const RESERVED_SAMPLE: u8 = 255;

/// Number of encodable units
pub const ALPHABET_SIZE: usize = 255;

const fn build_forward() -> [u8; ALPHABET_SIZE] {
    let mut table = [0u8; ALPHABET_SIZE];
    let mut i = 0;
    while i < ALPHABET_SIZE {
        table[i] = i as u8;
        i += 1;
    }
    table
}

const fn build_inverse() -> [Option<u8>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < ALPHABET_SIZE {
        table[FORWARD[i] as usize] = Some(i as u8);
        i += 1;
    }
    table
}

const FORWARD: [u8; ALPHABET_SIZE] = build_forward();
const INVERSE: [Option<u8>; 256] = build_inverse();

/// Sample value for a unit, or `None` if the unit is not encodable
#[inline]
pub fn to_sample(unit: u8) -> Option<u8> {
    FORWARD.get(unit as usize).copied()
}

/// Unit stored by a sample value, or `None` for the reserved sample
#[inline]
pub fn from_sample(sample: u8) -> Option<u8> {
    INVERSE[sample as usize]
}

/// Convert user text into message units.
///
/// A character is accepted when its scalar value fits the alphabet, which
/// covers ASCII and most of Latin-1.
pub fn units_from_text(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| {
            u8::try_from(u32::from(ch))
                .ok()
                .filter(|&unit| to_sample(unit).is_some())
                .ok_or(StegoError::InvalidText { index, ch })
        })
        .collect()
}

/// Convert message units back into text.
///
/// Every unit in the alphabet is a valid Latin-1 scalar, so this never fails
/// for units produced by the decoder.
pub fn text_from_units(units: &[u8]) -> String {
    units.iter().map(|&u| char::from(u)).collect()
}
