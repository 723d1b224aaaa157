//! Header-only image decoding.
//!
//! Only the container header is read, so a truncated download is enough as
//! long as it holds the first few kilobytes.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use image::ImageReader;

use super::{ImageDimensions, InspectError};

/// Read `(width, height)` from an image file on disk.
///
/// The format is sniffed from the content, not the extension.
pub fn file_dimensions(path: &Path) -> Result<ImageDimensions, InspectError> {
    let file = File::open(path)?;
    reader_dimensions(BufReader::new(file))
}

/// Read `(width, height)` from any seekable image source.
pub fn reader_dimensions<R: BufRead + Seek>(reader: R) -> Result<ImageDimensions, InspectError> {
    let (width, height) = ImageReader::new(reader)
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(ImageDimensions::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        RgbaImage::new(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_reader_dimensions_png() {
        let bytes = png_bytes(40, 12);
        let dims = reader_dimensions(Cursor::new(bytes)).unwrap();
        assert_eq!(dims, ImageDimensions::new(40, 12));
    }

    #[test]
    fn test_file_dimensions_ignores_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.jpg");
        std::fs::write(&path, png_bytes(16, 16)).unwrap();

        assert_eq!(file_dimensions(&path).unwrap(), ImageDimensions::new(16, 16));
    }

    #[test]
    fn test_truncated_png_still_has_header() {
        let mut bytes = png_bytes(300, 200);
        // Drop IEND and the tail of the pixel data
        bytes.truncate(bytes.len() - 20);
        let dims = reader_dimensions(Cursor::new(bytes)).unwrap();
        assert_eq!(dims, ImageDimensions::new(300, 200));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = reader_dimensions(Cursor::new(b"definitely not an image".to_vec()));
        assert!(matches!(result, Err(InspectError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = file_dimensions(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(InspectError::Io(_))));
    }
}
