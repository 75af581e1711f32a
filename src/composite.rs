use std::io::Cursor;

use image::{Rgba, RgbaImage};

use crate::error::{BattleError, BattleResult};

pub type Rgba8 = [u8; 4];

/// Source-over compositing of straight-alpha RGBA8 pixels.
///
/// Integer arithmetic throughout; the destination is only changed inside the
/// blended pixel, so repeated pastes never disturb surrounding layers.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;

    // Alpha and color stay at a x255 scale until the final division so
    // rounding happens once per channel.
    let out_a255 = sa * 255 + da * inv;
    if out_a255 == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = ((out_a255 + 127) / 255) as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + out_a255 / 2) / out_a255) as u8;
    }
    out
}

/// Mutable RGBA canvas owned by a single render invocation.
///
/// All layer placement goes through [`Canvas::paste`]; text rendering blends
/// through [`Canvas::blend_pixel`] with the same over operator.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, Rgba(color)),
        }
    }

    pub fn from_image(img: RgbaImage) -> Self {
        Self { img }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    /// Alpha-composite `src` with its top-left corner at `(x, y)`.
    ///
    /// Anchors may be negative or partially off-canvas; out-of-bounds source
    /// pixels are clipped.
    pub fn paste(&mut self, src: &RgbaImage, x: i64, y: i64) {
        let w = i64::from(self.img.width());
        let h = i64::from(self.img.height());
        for (sx, sy, px) in src.enumerate_pixels() {
            let dx = x + i64::from(sx);
            let dy = y + i64::from(sy);
            if dx < 0 || dy < 0 || dx >= w || dy >= h {
                continue;
            }
            let dst = self.img.get_pixel_mut(dx as u32, dy as u32);
            dst.0 = over(dst.0, px.0);
        }
    }

    /// Opaque flat fill of the half-open rectangle `[x0, x1) x [y0, y1)`.
    ///
    /// Empty or inverted rectangles are a no-op; edges clip to the canvas.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba8) {
        let w = i64::from(self.img.width());
        let h = i64::from(self.img.height());
        let x0 = x0.clamp(0, w);
        let y0 = y0.clamp(0, h);
        let x1 = x1.clamp(0, w);
        let y1 = y1.clamp(0, h);
        for y in y0..y1 {
            for x in x0..x1 {
                self.img.put_pixel(x as u32, y as u32, Rgba(color));
            }
        }
    }

    /// Blend a single pixel over the canvas; out-of-bounds is ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, src: Rgba8) {
        if x < 0 || y < 0 || x >= i64::from(self.img.width()) || y >= i64::from(self.img.height()) {
            return;
        }
        let dst = self.img.get_pixel_mut(x as u32, y as u32);
        dst.0 = over(dst.0, src);
    }

    pub fn into_png(self) -> BattleResult<Vec<u8>> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(self.img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| BattleError::encode(e.to_string()))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(over(dst, src), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_half_alpha_blends_toward_src() {
        let dst = [0, 0, 0, 255];
        let src = [255, 255, 255, 128];
        let out = over(dst, src);
        assert_eq!(out[3], 255);
        assert!(out[0] > 120 && out[0] < 136, "got {}", out[0]);
    }

    #[test]
    fn paste_does_not_touch_pixels_outside_region() {
        let mut canvas = Canvas::new(4, 4, [9, 9, 9, 255]);
        let patch = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        canvas.paste(&patch, 1, 1);
        assert_eq!(canvas.image().get_pixel(0, 0).0, [9, 9, 9, 255]);
        assert_eq!(canvas.image().get_pixel(3, 3).0, [9, 9, 9, 255]);
        assert_eq!(canvas.image().get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(canvas.image().get_pixel(2, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn paste_clips_negative_anchor() {
        let mut canvas = Canvas::new(2, 2, [0, 0, 0, 255]);
        let patch = RgbaImage::from_pixel(3, 3, Rgba([0, 255, 0, 255]));
        canvas.paste(&patch, -2, -2);
        assert_eq!(canvas.image().get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(canvas.image().get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn transparent_paste_leaves_dst_alone() {
        let mut canvas = Canvas::new(2, 2, [7, 8, 9, 255]);
        let patch = RgbaImage::from_pixel(2, 2, Rgba([200, 200, 200, 0]));
        canvas.paste(&patch, 0, 0);
        assert_eq!(canvas.image().get_pixel(1, 0).0, [7, 8, 9, 255]);
    }

    #[test]
    fn fill_rect_inverted_is_noop() {
        let mut canvas = Canvas::new(4, 4, [0, 0, 0, 255]);
        canvas.fill_rect(3, 3, 1, 1, [255, 0, 0, 255]);
        assert_eq!(canvas.image().get_pixel(2, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut canvas = Canvas::new(4, 4, [0, 0, 0, 255]);
        canvas.fill_rect(2, 2, 100, 100, [255, 0, 0, 255]);
        assert_eq!(canvas.image().get_pixel(3, 3).0, [255, 0, 0, 255]);
        assert_eq!(canvas.image().get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn into_png_round_trips() {
        let canvas = Canvas::new(3, 2, [1, 2, 3, 255]);
        let png = canvas.into_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [1, 2, 3, 255]);
    }
}
