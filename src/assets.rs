use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::warn;

use crate::font::FontHandle;

/// Legacy-skin background.
pub const BACKGROUND_LEGACY: &str = "background_battle.jpg";
/// Legacy-skin frame overlay.
pub const FRAME_LEGACY: &str = "hpdesign_battle.png";
/// HUD-skin background.
pub const BACKGROUND_HUD: &str = "background_hud.png";
/// HUD-skin frame overlay, drawn after the HP bars.
pub const FRAME_HUD: &str = "hud_frame.png";
/// Battle font file, optional.
pub const FONT_FILE: &str = "pokemonfont.ttf";

/// Canvas substituted when the background asset is missing.
pub const DEFAULT_CANVAS: (u32, u32) = (960, 480);

/// Resolves named static assets from a directory of image files.
///
/// Missing or undecodable assets are non-fatal: the caller gets `None` and
/// skips the layer. The background is the one exception; it always yields a
/// base layer.
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a file by exact name, decoded and normalized to RGBA8.
    pub fn load(&self, name: &str) -> Option<RgbaImage> {
        let path = self.root.join(name);
        match image::open(&path) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn!(asset = name, error = %e, "asset unavailable, skipping layer");
                None
            }
        }
    }

    /// Load a background, substituting an opaque white canvas when missing so
    /// the pipeline always has a base layer.
    pub fn background(&self, name: &str) -> RgbaImage {
        self.load(name).unwrap_or_else(|| {
            let (w, h) = DEFAULT_CANVAS;
            RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]))
        })
    }

    /// Load an overlay icon from a caller-supplied token (`<token>.png`).
    ///
    /// Tokens naming anything outside the asset root are refused.
    pub fn overlay(&self, token: &str) -> Option<RgbaImage> {
        if token.is_empty() || token.contains(['/', '\\', '.']) {
            warn!(token, "refusing overlay token");
            return None;
        }
        self.load(&format!("{token}.png"))
    }

    /// Load the battle font, falling back to builtin glyphs.
    pub fn font(&self) -> FontHandle {
        FontHandle::load(&self.root.join(FONT_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn store_with(files: &[(&str, RgbaImage)]) -> (tempfile::TempDir, AssetStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, img) in files {
            img.save(dir.path().join(name)).unwrap();
        }
        let store = AssetStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn load_decodes_to_rgba() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let (_dir, store) = store_with(&[("frame.png", img)]);
        let loaded = store.load("frame.png").unwrap();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn missing_asset_is_none() {
        let (_dir, store) = store_with(&[]);
        assert!(store.load("nope.png").is_none());
    }

    #[test]
    fn missing_background_substitutes_white_canvas() {
        let (_dir, store) = store_with(&[]);
        let bg = store.background(BACKGROUND_LEGACY);
        assert_eq!(bg.dimensions(), DEFAULT_CANVAS);
        assert_eq!(bg.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn overlay_resolves_token_to_png() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255]));
        let (_dir, store) = store_with(&[("burn.png", img)]);
        assert!(store.overlay("burn").is_some());
        assert!(store.overlay("frozen").is_none());
    }

    #[test]
    fn overlay_refuses_path_escapes() {
        let (_dir, store) = store_with(&[]);
        assert!(store.overlay("../etc/passwd").is_none());
        assert!(store.overlay("a/b").is_none());
        assert!(store.overlay("a\\b").is_none());
        assert!(store.overlay("").is_none());
    }
}
