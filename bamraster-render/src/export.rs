//! Image encoding to files or streams.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};
use log::info;

use crate::error::RenderError;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// PNG for a `.png` extension in any case, JPEG for everything else.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
            _ => OutputFormat::Jpeg,
        }
    }
}

/// Encode `image` into `writer`.
pub fn write<W: Write>(image: &RgbImage, writer: W, format: OutputFormat) -> Result<(), RenderError> {
    let (width, height) = image.dimensions();
    match format {
        OutputFormat::Png => PngEncoder::new(writer).write_image(image.as_raw(), width, height, ColorType::Rgb8)?,
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(writer, JPEG_QUALITY).write_image(image.as_raw(), width, height, ColorType::Rgb8)?
        }
    }
    Ok(())
}

/// Encode `image` to `path`, choosing the format from the extension.
pub fn save<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<OutputFormat, RenderError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path);
    let mut out = BufWriter::new(File::create(path)?);
    write(image, &mut out, format)?;
    out.flush()?;
    info!("Wrote {:?} image to {}", format, path.display());
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::RED;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path("out.png"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path("OUT.PNG"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path("out.jpg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path("out.jpeg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path("out"), OutputFormat::Jpeg);
    }

    #[test]
    fn test_png_round_trip_keeps_pixels() {
        let image = RgbImage::from_pixel(4, 3, RED);
        let mut bytes = Vec::new();
        write(&image, &mut bytes, OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_save_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image = RgbImage::from_pixel(8, 8, RED);

        let png = dir.path().join("a.png");
        assert_eq!(save(&image, &png).unwrap(), OutputFormat::Png);
        assert_eq!(image::ImageFormat::from_path(&png).unwrap(), image::ImageFormat::Png);
        assert_eq!(image::open(&png).unwrap().to_rgb8(), image);

        let jpg = dir.path().join("a.jpg");
        assert_eq!(save(&image, &jpg).unwrap(), OutputFormat::Jpeg);
        let bytes = std::fs::read(&jpg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
