/// Core embedding codec
/// Writes one message unit per visited channel sample and reads them back

use crate::alphabet::{from_sample, to_sample};
use crate::cursor::{capacity, TraversalCursor};
use crate::error::{Result, StegoError};
use crate::pixels::PixelBuffer;
use anyhow::Context;
use image::{DynamicImage, ImageFormat};
use rayon::prelude::*;
use std::io::Cursor;
use tracing::{debug, warn};

/// Hide `message` in `buffer`, returning the modified carrier.
///
/// Every unit is validated before the first write. Messages longer than
/// [`capacity`] wrap around and overwrite earlier units; this is logged but
/// not rejected.
pub fn encode(mut buffer: PixelBuffer, message: &[u8]) -> Result<PixelBuffer> {
    if buffer.is_empty() {
        return Err(StegoError::EmptyBuffer {
            height: buffer.height(),
            width: buffer.width(),
        });
    }

    let samples = message
        .iter()
        .enumerate()
        .map(|(index, &unit)| to_sample(unit).ok_or(StegoError::InvalidUnit { index, unit }))
        .collect::<Result<Vec<u8>>>()?;

    let cap = capacity(buffer.height(), buffer.width());
    if samples.len() > cap {
        warn!(
            units = samples.len(),
            capacity = cap,
            "message wraps the carrier; earlier units will be overwritten"
        );
    }

    let mut cursor = TraversalCursor::new(buffer.height(), buffer.width());
    for sample in samples {
        let (row, col, chan) = cursor.coord();
        buffer.set(row, col, chan, sample);
        cursor.advance();
    }

    debug!(
        units = message.len(),
        height = buffer.height(),
        width = buffer.width(),
        "message embedded"
    );
    Ok(buffer)
}

/// Recover `length` units from `buffer`.
///
/// Fails on the first sample without an inverse; no partial message is
/// returned in that case.
pub fn decode(buffer: &PixelBuffer, length: usize) -> Result<Vec<u8>> {
    if length == 0 {
        return Ok(Vec::new());
    }
    if buffer.is_empty() {
        return Err(StegoError::EmptyBuffer {
            height: buffer.height(),
            width: buffer.width(),
        });
    }

    let mut message = Vec::with_capacity(length);
    let mut cursor = TraversalCursor::new(buffer.height(), buffer.width());
    for index in 0..length {
        let (row, col, chan) = cursor.coord();
        let value = buffer.get(row, col, chan);
        let unit = from_sample(value).ok_or(StegoError::UndecodableSample {
            index,
            row,
            col,
            chan,
            value,
        })?;
        message.push(unit);
        cursor.advance();
    }

    debug!(units = length, "message extracted");
    Ok(message)
}

/// Encode independent carriers in parallel
pub fn encode_all(jobs: Vec<(PixelBuffer, Vec<u8>)>) -> Vec<Result<PixelBuffer>> {
    jobs.into_par_iter()
        .map(|(buffer, message)| encode(buffer, &message))
        .collect()
}

/// Decode independent carriers in parallel
pub fn decode_all(jobs: &[(PixelBuffer, usize)]) -> Vec<Result<Vec<u8>>> {
    jobs.par_iter()
        .map(|(buffer, length)| decode(buffer, *length))
        .collect()
}

/// Image-level front end to the codec
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelStego;

impl PixelStego {
    pub fn new() -> Self {
        Self
    }

    /// Embed message units into a copy of `carrier` (converted to RGB8)
    pub fn embed(&self, carrier: &DynamicImage, message: &[u8]) -> Result<DynamicImage> {
        let buffer = PixelBuffer::from_rgb_image(carrier.to_rgb8());
        let stego = encode(buffer, message)?;
        Ok(DynamicImage::ImageRgb8(stego.into_rgb_image()))
    }

    /// Extract `length` units from a carrier produced by [`embed`](Self::embed)
    pub fn extract(&self, stego: &DynamicImage, length: usize) -> Result<Vec<u8>> {
        let buffer = PixelBuffer::from_rgb_image(stego.to_rgb8());
        decode(&buffer, length)
    }

    /// Units the image holds before samples are overwritten
    pub fn calculate_capacity(image: &DynamicImage) -> usize {
        capacity(image.height() as usize, image.width() as usize)
    }
}

/// Decode an image file, embed `message` and serialize the result as PNG
pub fn encode_png(cover: &[u8], message: &[u8]) -> anyhow::Result<Vec<u8>> {
    let carrier = image::load_from_memory(cover).context("Failed to decode cover image")?;
    embed_to_png(&carrier, message)
}

/// Embed `message` into an already decoded cover and serialize it as PNG
pub fn embed_to_png(carrier: &DynamicImage, message: &[u8]) -> anyhow::Result<Vec<u8>> {
    let stego = PixelStego::new().embed(carrier, message)?;

    let mut out = Vec::new();
    stego
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .context("Failed to write PNG carrier")?;
    Ok(out)
}

/// Decode a PNG carrier and extract `length` units
pub fn decode_png(stego: &[u8], length: usize) -> anyhow::Result<Vec<u8>> {
    let image = image::load_from_memory(stego).context("Failed to decode carrier image")?;
    Ok(PixelStego::new().extract(&image, length)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Coord;

    fn gradient(height: usize, width: usize) -> PixelBuffer {
        let data = (0..height * width * 3).map(|i| (i % 200) as u8).collect();
        PixelBuffer::from_raw(height, width, data).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let message = b"Hello, this is a secret message for testing!";
        let stego = encode(gradient(16, 17), message).unwrap();
        assert_eq!(decode(&stego, message.len()).unwrap(), message);
    }

    #[test]
    fn test_single_pixel_wrap() {
        let stego = encode(PixelBuffer::filled(1, 1, 0).unwrap(), &[10, 20]).unwrap();
        assert_eq!(decode(&stego, 2).unwrap(), vec![10, 20]);
        assert_eq!(stego.as_raw(), &[10, 20, 0]);
    }

    #[test]
    fn test_writes_follow_independent_counters() {
        let expected: [Coord; 5] = [(0, 0, 0), (1, 1, 1), (0, 0, 2), (1, 1, 0), (0, 0, 1)];
        let message = [1, 2, 3, 4, 5];
        let stego = encode(PixelBuffer::filled(2, 2, 200).unwrap(), &message).unwrap();

        for (&(row, col, chan), &unit) in expected.iter().zip(&message) {
            assert_eq!(stego.get(row, col, chan), unit);
        }
        // Off-diagonal pixels are never visited on a 2x2 carrier
        for chan in 0..3 {
            assert_eq!(stego.get(0, 1, chan), 200);
            assert_eq!(stego.get(1, 0, chan), 200);
        }
        // (1, 1, 2) is not reached within five steps
        assert_eq!(stego.get(1, 1, 2), 200);
    }

    #[test]
    fn test_overflow_overwrites_first_unit() {
        // capacity(1, 1) == 3, so the fourth unit lands on (0, 0, 0)
        let stego = encode(PixelBuffer::filled(1, 1, 0).unwrap(), &[1, 2, 3, 4]).unwrap();
        assert_eq!(stego.as_raw(), &[4, 2, 3]);
        assert_eq!(decode(&stego, 4).unwrap(), vec![4, 2, 3, 4]);
    }

    #[test]
    fn test_empty_message() {
        let cover = gradient(3, 3);
        assert_eq!(encode(cover.clone(), &[]).unwrap(), cover);
        assert!(decode(&cover, 0).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_unit() {
        assert_eq!(
            encode(gradient(2, 2), &[255]),
            Err(StegoError::InvalidUnit { index: 0, unit: 255 })
        );
        assert_eq!(
            encode(gradient(2, 2), &[1, 2, 255, 3]),
            Err(StegoError::InvalidUnit { index: 2, unit: 255 })
        );
    }

    #[test]
    fn test_rejects_empty_buffer() {
        assert_eq!(
            encode(PixelBuffer::filled(0, 5, 0).unwrap(), &[1]),
            Err(StegoError::EmptyBuffer { height: 0, width: 5 })
        );
        assert_eq!(
            encode(PixelBuffer::filled(5, 0, 0).unwrap(), &[]),
            Err(StegoError::EmptyBuffer { height: 5, width: 0 })
        );
        assert_eq!(
            decode(&PixelBuffer::filled(0, 0, 0).unwrap(), 1),
            Err(StegoError::EmptyBuffer { height: 0, width: 0 })
        );
    }

    #[test]
    fn test_undecodable_first_sample() {
        let carrier = PixelBuffer::filled(4, 4, 255).unwrap();
        assert_eq!(
            decode(&carrier, 1),
            Err(StegoError::UndecodableSample {
                index: 0,
                row: 0,
                col: 0,
                chan: 0,
                value: 255,
            })
        );
    }

    #[test]
    fn test_undecodable_fails_whole_call() {
        let mut carrier = encode(PixelBuffer::filled(3, 4, 0).unwrap(), b"abcd").unwrap();
        // Third visited sample is (2, 2, 2)
        carrier.set(2, 2, 2, 255);

        let err = decode(&carrier, 4).unwrap_err();
        assert!(matches!(err, StegoError::UndecodableSample { index: 2, .. }));
        // Prefix before the bad sample still decodes on its own
        assert_eq!(decode(&carrier, 2).unwrap(), b"ab");
    }

    #[test]
    fn test_length_beyond_capacity_is_well_defined() {
        let carrier = encode(PixelBuffer::filled(1, 2, 0).unwrap(), &[9, 8, 7, 6, 5, 4]).unwrap();
        let decoded = decode(&carrier, 12).unwrap();
        assert_eq!(&decoded[..6], &decoded[6..]);
    }

    #[test]
    fn test_batch_matches_serial() {
        let jobs = vec![
            (gradient(4, 4), b"first".to_vec()),
            (gradient(5, 3), b"second".to_vec()),
            (gradient(2, 2), vec![255]),
        ];
        let results = encode_all(jobs);

        assert_eq!(results.len(), 3);
        assert!(results[2].is_err());

        let decode_jobs: Vec<(PixelBuffer, usize)> = vec![
            (results[0].clone().unwrap(), 5),
            (results[1].clone().unwrap(), 6),
        ];
        let decoded = decode_all(&decode_jobs);
        assert_eq!(decoded[0].as_deref().unwrap(), b"first");
        assert_eq!(decoded[1].as_deref().unwrap(), b"second");
    }

    #[test]
    fn test_image_front_end() {
        let mut img = image::RgbImage::new(20, 10);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = image::Rgb([x as u8, y as u8, 128]);
        }
        let carrier = DynamicImage::ImageRgb8(img);
        let stego = PixelStego::new();

        let out = stego.embed(&carrier, b"hidden").unwrap();
        assert_eq!(stego.extract(&out, 6).unwrap(), b"hidden");
        assert_eq!(PixelStego::calculate_capacity(&carrier), 60);
    }

    #[test]
    fn test_png_roundtrip() {
        let mut cover = Vec::new();
        DynamicImage::ImageRgb8(image::RgbImage::new(9, 7))
            .write_to(&mut Cursor::new(&mut cover), ImageFormat::Png)
            .unwrap();

        let stego = encode_png(&cover, b"png carrier").unwrap();
        assert_eq!(decode_png(&stego, 11).unwrap(), b"png carrier");
    }

    #[test]
    fn test_embed_to_png_matches_encode_png() {
        let carrier = DynamicImage::ImageRgb8(image::RgbImage::new(6, 5));
        let mut cover = Vec::new();
        carrier
            .write_to(&mut Cursor::new(&mut cover), ImageFormat::Png)
            .unwrap();

        let from_image = embed_to_png(&carrier, b"once").unwrap();
        assert_eq!(from_image, encode_png(&cover, b"once").unwrap());
        assert_eq!(decode_png(&from_image, 4).unwrap(), b"once");
        assert!(embed_to_png(&carrier, &[255]).is_err());
    }
}
