use image::RgbaImage;

/// Resize so the output height equals `target_height`, preserving aspect
/// ratio. Catmull-Rom keeps pixel-art sprite edges acceptable at 2x scales.
///
/// A zero target height is a caller contract violation.
pub fn resize_to_height(img: &RgbaImage, target_height: u32) -> RgbaImage {
    debug_assert!(target_height > 0, "resize_to_height target must be positive");
    let (w, h) = img.dimensions();
    if h == target_height {
        return img.clone();
    }
    let width = ((f64::from(w) * f64::from(target_height) / f64::from(h)).round() as u32).max(1);
    image::imageops::resize(img, width, target_height, image::imageops::FilterType::CatmullRom)
}

/// Left `ratio` fraction of the image at full height, `ratio` clamped to
/// [0, 1]. A zero-width result comes back as an empty image, which pastes as
/// a no-op.
pub fn crop_fraction(img: &RgbaImage, ratio: f32) -> RgbaImage {
    let ratio = ratio.clamp(0.0, 1.0);
    let width = (f64::from(img.width()) * f64::from(ratio)).round() as u32;
    if width == 0 {
        return RgbaImage::new(0, img.height());
    }
    if width >= img.width() {
        return img.clone();
    }
    image::imageops::crop_imm(img, 0, 0, width, img.height()).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 0, 255]))
    }

    #[test]
    fn resize_hits_target_height_exactly() {
        let img = gradient(96, 96);
        let out = resize_to_height(&img, 192);
        assert_eq!(out.height(), 192);
    }

    #[test]
    fn resize_preserves_aspect_ratio_within_rounding() {
        let img = gradient(120, 48);
        let out = resize_to_height(&img, 96);
        let expected = (120.0f64 * 96.0 / 48.0).round() as u32;
        assert_eq!(out.width(), expected);
        let in_ratio = 120.0 / 48.0;
        let out_ratio = f64::from(out.width()) / f64::from(out.height());
        assert!((in_ratio - out_ratio).abs() < 0.02);
    }

    #[test]
    fn resize_same_height_is_identity() {
        let img = gradient(17, 23);
        let out = resize_to_height(&img, 23);
        assert_eq!(out, img);
    }

    #[test]
    fn crop_zero_ratio_is_empty() {
        let img = gradient(10, 4);
        let out = crop_fraction(&img, 0.0);
        assert_eq!(out.width(), 0);
    }

    #[test]
    fn crop_full_ratio_is_identity() {
        let img = gradient(10, 4);
        let out = crop_fraction(&img, 1.0);
        assert_eq!(out, img);
    }

    #[test]
    fn crop_takes_left_fraction_at_full_height() {
        let img = gradient(10, 4);
        let out = crop_fraction(&img, 0.5);
        assert_eq!(out.dimensions(), (5, 4));
        assert_eq!(out.get_pixel(4, 3), img.get_pixel(4, 3));
    }

    #[test]
    fn crop_clamps_out_of_range_ratio() {
        let img = gradient(10, 4);
        assert_eq!(crop_fraction(&img, 2.5), img);
        assert_eq!(crop_fraction(&img, -1.0).width(), 0);
    }
}
