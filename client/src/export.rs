use thiserror::Error;

use crate::render::{Snapshot, Surface};

/// Name offered for the downloaded image.
pub const EXPORT_FILE_NAME: &str = "drawing";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot export an empty {0}x{1} surface")]
    Empty(u32, u32),
    #[error("failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),
}

pub fn export_png<S: Surface>(surface: &S) -> Result<Vec<u8>, ExportError> {
    encode_png(&surface.snapshot())
}

pub fn encode_png(snapshot: &Snapshot) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (snapshot.width(), snapshot.height());
    if width == 0 || height == 0 {
        return Err(ExportError::Empty(width, height));
    }
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(snapshot.pixels())?;
        writer.finish()?;
    }
    log::debug!("encoded {width}x{height} drawing as {} bytes", png_data.len());
    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Pen, PixelSurface};
    use sketchboard_shared::{Color, Point};

    #[test]
    fn test_png_round_trip_pixels() {
        let mut surface = PixelSurface::new(16, 8, Color::WHITE);
        surface.stroke_segment(
            Point::new(2.0, 4.0),
            Point::new(12.0, 4.0),
            &Pen {
                color: Color::INK,
                width: 1.0,
            },
        );
        let bytes = export_png(&surface).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(bytes.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer).unwrap();
        assert_eq!((info.width, info.height), (16, 8));
        assert_eq!(&buffer[..info.buffer_size()], surface.snapshot().pixels());
    }

    #[test]
    fn test_empty_surface_is_rejected() {
        let surface = PixelSurface::new(0, 0, Color::WHITE);
        assert!(matches!(export_png(&surface), Err(ExportError::Empty(0, 0))));
    }
}
