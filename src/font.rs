use std::path::Path;

use rusttype::{Font, Scale, point};
use tracing::warn;

use crate::composite::{Canvas, Rgba8};

/// 5x7 pixel glyphs used when no font file is available. Text must always
/// render something, so this is the floor, not an error path.
mod builtin {
    pub const GLYPH_WIDTH: u32 = 5;
    pub const GLYPH_HEIGHT: u32 = 7;
    /// Horizontal advance including the inter-glyph gap.
    pub const ADVANCE: u32 = 6;

    /// Rows are 5-bit masks, most significant bit leftmost.
    pub fn rows(ch: char) -> [u8; 7] {
        match ch.to_ascii_uppercase() {
            'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
            'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
            'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
            'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
            'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
            'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
            'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
            'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
            'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
            'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
            'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
            'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
            'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
            'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
            'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
            'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
            'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
            'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
            'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
            'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
            'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
            'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
            '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
            ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
            _ => [0x00; 7],
        }
    }
}

/// A resolved text face: a loaded TrueType font, or the builtin fallback
/// glyphs when the font file is missing or does not parse.
pub enum FontHandle {
    Truetype(Font<'static>),
    Builtin,
}

impl FontHandle {
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => match Font::try_from_vec(bytes) {
                Some(font) => Self::Truetype(font),
                None => {
                    warn!(path = %path.display(), "font file did not parse, using builtin glyphs");
                    Self::Builtin
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "font file unavailable, using builtin glyphs");
                Self::Builtin
            }
        }
    }

    fn builtin_scale(px: f32) -> u32 {
        ((px / builtin::GLYPH_HEIGHT as f32).round() as u32).max(1)
    }

    /// Advance width of `text` at `px` pixels, used to center labels around a
    /// fixed anchor x.
    pub fn measure(&self, text: &str, px: f32) -> u32 {
        match self {
            Self::Truetype(font) => {
                let scale = Scale::uniform(px);
                let width: f32 = text
                    .chars()
                    .map(|ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
                    .sum();
                width.round().max(0.0) as u32
            }
            Self::Builtin => {
                let scale = Self::builtin_scale(px);
                text.chars().count() as u32 * builtin::ADVANCE * scale
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut Canvas, text: &str, x: i64, y: i64, px: f32, color: Rgba8) {
        match self {
            Self::Truetype(font) => {
                let scale = Scale::uniform(px);
                let v_metrics = font.v_metrics(scale);
                let mut caret_x = x as f32;
                let baseline_y = y as f32 + v_metrics.ascent;

                for ch in text.chars() {
                    let glyph = font.glyph(ch).scaled(scale).positioned(point(caret_x, baseline_y));
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, v| {
                            let px_x = i64::from(gx as i32 + bb.min.x);
                            let px_y = i64::from(gy as i32 + bb.min.y);
                            let a = (v * f32::from(color[3])).round() as u8;
                            if a > 0 {
                                canvas.blend_pixel(px_x, px_y, [color[0], color[1], color[2], a]);
                            }
                        });
                    }
                    caret_x += glyph.unpositioned().h_metrics().advance_width;
                }
            }
            Self::Builtin => {
                let scale = i64::from(Self::builtin_scale(px));
                let mut caret_x = x;
                for ch in text.chars() {
                    let rows = builtin::rows(ch);
                    for (row, bits) in rows.iter().enumerate() {
                        for col in 0..builtin::GLYPH_WIDTH {
                            if bits & (1 << (builtin::GLYPH_WIDTH - 1 - col)) == 0 {
                                continue;
                            }
                            let bx = caret_x + i64::from(col) * scale;
                            let by = y + row as i64 * scale;
                            for oy in 0..scale {
                                for ox in 0..scale {
                                    canvas.blend_pixel(bx + ox, by + oy, color);
                                }
                            }
                        }
                    }
                    caret_x += i64::from(builtin::ADVANCE) * scale;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_falls_back_to_builtin() {
        let handle = FontHandle::load(Path::new("/nonexistent/battlefont.ttf"));
        assert!(matches!(handle, FontHandle::Builtin));
    }

    #[test]
    fn garbage_font_bytes_fall_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(FontHandle::load(&path), FontHandle::Builtin));
    }

    #[test]
    fn builtin_measure_scales_with_text_length() {
        let handle = FontHandle::Builtin;
        let one = handle.measure("A", 14.0);
        let three = handle.measure("ABC", 14.0);
        assert_eq!(three, one * 3);
        assert!(one > 0);
    }

    #[test]
    fn builtin_draw_marks_pixels() {
        let mut canvas = Canvas::new(16, 16, [0, 0, 0, 255]);
        FontHandle::Builtin.draw(&mut canvas, "I", 2, 2, 7.0, [255, 255, 255, 255]);
        let lit = canvas
            .image()
            .pixels()
            .filter(|p| p.0 == [255, 255, 255, 255])
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn draw_clips_offscreen_without_panicking() {
        let mut canvas = Canvas::new(4, 4, [0, 0, 0, 255]);
        FontHandle::Builtin.draw(&mut canvas, "WW", -3, -3, 7.0, [255, 255, 255, 255]);
        FontHandle::Builtin.draw(&mut canvas, "WW", 100, 100, 7.0, [255, 255, 255, 255]);
    }
}
