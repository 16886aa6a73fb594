// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing painted images out as binary PPM.

use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::{ColorType, RgbImage};
use std::fs::File;
use std::io;
use std::path::Path;

/// Write the image to `path` as a binary pixmap.
pub fn write_ppm<P: AsRef<Path>>(path: P, image: &RgbImage) -> io::Result<()> {
    let output = File::create(path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    let pixels: &[u8] = image;
    encoder.encode(pixels, image.width(), image.height(), ColorType::RGB(8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Pixel, Rgb};
    use std::fs;

    #[test]
    fn writes_header_and_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.ppm");
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, Rgb::from_channels(255, 128, 7, 0));
        write_ppm(&path, &image).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert_eq!(&bytes[bytes.len() - 6..], &[0, 0, 0, 255, 128, 7]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nowhere").join("tiny.ppm");
        assert!(write_ppm(&path, &RgbImage::new(1, 1)).is_err());
    }
}
