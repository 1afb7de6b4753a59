//! # pixel-stego
//!
//! Hides a message in the channel samples of an image and recovers it from
//! the exact carrier produced by the hide operation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pixel_stego::PixelStego;
//! use image::ImageReader;
//!
//! # fn main() -> anyhow::Result<()> {
//! let carrier = ImageReader::open("cover.png")?.decode()?;
//! let stego = PixelStego::new();
//!
//! let message = b"This is a secret message";
//! let stego_image = stego.embed(&carrier, message)?;
//! stego_image.save("stego.png")?;
//!
//! // The length travels separately from the image
//! let extracted = stego.extract(&stego_image, message.len())?;
//! assert_eq!(message.as_slice(), extracted.as_slice());
//! # Ok(())
//! # }
//! ```
//!
//! ## How it works
//!
//! Each message unit (a value in `0..=254`) overwrites one channel sample.
//! Samples are visited by three independent counters over row, column and
//! channel, so a carrier holds `lcm(height, width, 3)` units before the
//! cursor comes back to a sample it already wrote. The carrier must be
//! stored losslessly; any recompression destroys the message.
//!
//! ## Modules
//!
//! - `alphabet`: unit <-> sample tables and text conversion
//! - `cursor`: traversal order and capacity
//! - `pixels`: carrier buffer
//! - `steganography`: encoder, decoder and image front end
//! - `store`: record of produced carriers and their message lengths
//! - `extract`: length lookup and extraction for a presented carrier

pub mod alphabet;
pub mod config;
pub mod cursor;
pub mod error;
pub mod extract;
pub mod pixels;
pub mod steganography;
pub mod store;

pub use alphabet::{text_from_units, units_from_text};
pub use cursor::{capacity, TraversalCursor};
pub use error::StegoError;
pub use extract::{extract_message, resolve_length, ExtractError, LengthSource};
pub use pixels::PixelBuffer;
pub use steganography::{
    decode, decode_all, decode_png, embed_to_png, encode, encode_all, encode_png, PixelStego,
};
pub use store::{CarrierRecord, CarrierStore, StoreError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of units `image` holds before samples are overwritten
///
/// # Examples
///
/// ```no_run
/// use image::ImageReader;
/// # fn main() -> anyhow::Result<()> {
/// let img = ImageReader::open("photo.png")?.decode()?;
/// let capacity = pixel_stego::calculate_capacity(&img);
/// println!("Image can hold {} units", capacity);
/// # Ok(())
/// # }
/// ```
pub fn calculate_capacity(image: &image::DynamicImage) -> usize {
    PixelStego::calculate_capacity(image)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn create_test_image() -> DynamicImage {
        let mut img = RgbImage::new(256, 256);
        for y in 0..256 {
            for x in 0..256 {
                img.put_pixel(x, y, image::Rgb([x as u8, y as u8, 128]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_full_embed_extract_cycle() {
        let carrier = create_test_image();
        let message = units_from_text("Hello, this is a secret message for testing!").unwrap();

        let stego = PixelStego::new();
        let stego_image = stego.embed(&carrier, &message).unwrap();
        let extracted = stego.extract(&stego_image, message.len()).unwrap();

        assert_eq!(
            text_from_units(&extracted),
            "Hello, this is a secret message for testing!"
        );
    }

    #[test]
    fn test_capacity_calculation() {
        let img = create_test_image();
        // lcm(256, 256, 3)
        assert_eq!(calculate_capacity(&img), 768);
    }
}
