//! Captured frame handling
//!
//! Wraps the raster supplied by the screen-capture collaborator. The
//! core does not trigger captures; it validates and crops what it is
//! given.

use image::RgbImage;

use super::VisionError;

/// A single captured screen frame (3-channel color)
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wrap an already-decoded image
    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a frame from raw packed RGB bytes
    ///
    /// Validates that the buffer length matches `width * height * 3`.
    pub fn from_raw(data: &[u8], width: u32, height: u32) -> Result<Self, VisionError> {
        if width == 0 || height == 0 {
            return Err(VisionError::EmptyFrame);
        }

        let expected = (width * height * 3) as usize;
        if data.len() != expected {
            return Err(VisionError::InvalidFrameData {
                expected,
                actual: data.len(),
            });
        }

        let image = RgbImage::from_raw(width, height, data.to_vec()).ok_or(
            VisionError::InvalidFrameData {
                expected,
                actual: data.len(),
            },
        )?;

        Ok(Self { image })
    }

    /// The underlying image
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Frame dimensions in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Origin of the bottom-right quadrant in full-frame coordinates
    pub fn quadrant_origin(&self) -> (u32, u32) {
        let (w, h) = self.image.dimensions();
        (w / 2, h / 2)
    }

    /// Crop to the bottom-right quadrant, where the UI panel sits
    pub fn bottom_right_quadrant(&self) -> RgbImage {
        let (w, h) = self.image.dimensions();
        let (ox, oy) = self.quadrant_origin();
        image::imageops::crop_imm(&self.image, ox, oy, w - ox, h - oy).to_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_from_raw_valid() {
        let data = vec![0u8; 10 * 8 * 3];
        let frame = Frame::from_raw(&data, 10, 8).unwrap();
        assert_eq!(frame.dimensions(), (10, 8));
    }

    #[test]
    fn test_from_raw_wrong_size() {
        let data = vec![0u8; 100];
        let err = Frame::from_raw(&data, 10, 8).unwrap_err();
        assert!(matches!(
            err,
            VisionError::InvalidFrameData {
                expected: 240,
                actual: 100
            }
        ));
    }

    #[test]
    fn test_from_raw_empty_dimensions() {
        let err = Frame::from_raw(&[], 0, 10).unwrap_err();
        assert!(matches!(err, VisionError::EmptyFrame));
    }

    #[test]
    fn test_quadrant_crop() {
        // 100x60 frame: quadrant starts at (50, 30), sized 50x30
        let mut image = RgbImage::new(100, 60);
        image.put_pixel(50, 30, Rgb([255, 0, 0]));

        let frame = Frame::from_image(image);
        assert_eq!(frame.quadrant_origin(), (50, 30));

        let quadrant = frame.bottom_right_quadrant();
        assert_eq!(quadrant.dimensions(), (50, 30));
        assert_eq!(*quadrant.get_pixel(0, 0), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_odd_dimensions_quadrant() {
        let image = RgbImage::new(101, 61);
        let frame = Frame::from_image(image);
        let quadrant = frame.bottom_right_quadrant();
        // Integer-floor origin leaves the larger half in the quadrant
        assert_eq!(quadrant.dimensions(), (51, 31));
    }
}
