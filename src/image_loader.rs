use crate::errors::{EqualizeError, Result};
use crate::pixels::OwnedPixels;
use image::{DynamicImage, GenericImageView};
use std::path::Path;

pub fn load_image(path: &Path) -> Result<OwnedPixels> {
    if !path.exists() {
        return Err(EqualizeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path).map_err(|e| EqualizeError::ImageLoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!(
        "Loaded {:?} ({}x{}, {:?})",
        path,
        image.width(),
        image.height(),
        image.color()
    );
    to_samples(image)
}

/// Convert a decoded image into 8-bit gray or RGB samples.
///
/// Alpha is dropped; wider sample types are narrowed to 8 bits.
pub fn to_samples(image: DynamicImage) -> Result<OwnedPixels> {
    let (width, height) = image.dimensions();
    if image.color().has_alpha() {
        log::info!("Image has an alpha channel; it is discarded before equalization");
    }

    match image {
        DynamicImage::ImageLuma8(gray) => OwnedPixels::new(gray.into_raw(), width, height, 1),
        DynamicImage::ImageRgb8(rgb) => OwnedPixels::new(rgb.into_raw(), width, height, 3),
        gray @ (DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_)) => {
            OwnedPixels::new(gray.to_luma8().into_raw(), width, height, 1)
        }
        other => OwnedPixels::new(other.to_rgb8().into_raw(), width, height, 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, LumaA, Rgba, RgbaImage};

    #[test]
    fn test_rgba_drops_alpha() {
        let rgba = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]));
        let pixels = to_samples(DynamicImage::ImageRgba8(rgba)).unwrap();

        assert_eq!(pixels.channels(), 3);
        assert_eq!(pixels.data().len(), 3 * 2 * 3);
        assert!(pixels.data().chunks(3).all(|p| p == [10, 20, 30]));
    }

    #[test]
    fn test_gray_alpha_becomes_gray() {
        let image = GrayAlphaImage::from_pixel(4, 4, LumaA([77, 0]));
        let pixels = to_samples(DynamicImage::ImageLumaA8(image)).unwrap();

        assert_eq!(pixels.channels(), 1);
        assert!(pixels.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_missing_file() {
        let err = load_image(Path::new("/no/such/image.png")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_fn(8, 4, |x, _| image::Luma([x as u8 * 30]))
            .save(&path)
            .unwrap();

        let pixels = load_image(&path).unwrap();
        assert_eq!((pixels.width(), pixels.height(), pixels.channels()), (8, 4, 1));
        assert_eq!(&pixels.data()[..8], &[0, 30, 60, 90, 120, 150, 180, 210]);
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = load_image(&path).unwrap_err();
        assert_eq!(err.error_code(), "IMAGE_LOAD_ERROR");
    }
}
