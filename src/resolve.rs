use image::RgbaImage;
use tracing::warn;

use crate::catalog::{CatalogEntry, SpriteSource};
use crate::scale::resize_to_height;

/// Which combatant a sprite is being resolved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The requesting player's creature, drawn from behind.
    Player,
    /// The opposing creature, always drawn from the front.
    Opponent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Front,
    Back,
}

/// A decoded, pre-scaled creature sprite.
pub struct Sprite {
    pub image: RgbaImage,
    pub facing: Facing,
    pub shiny: bool,
}

/// Numeric catalog IDs pass through untouched; names are lower-cased.
pub fn normalize_identifier(identifier: &str) -> String {
    if identifier.chars().all(|c| c.is_ascii_digit()) {
        identifier.to_string()
    } else {
        identifier.to_lowercase()
    }
}

fn select_sprite_url(entry: &CatalogEntry, side: Side, shiny: bool) -> Option<(&str, Facing)> {
    let sprites = &entry.sprites;
    match side {
        Side::Player => {
            let back = if shiny {
                sprites.back_shiny.as_deref()
            } else {
                sprites.back_default.as_deref()
            };
            if let Some(url) = back {
                return Some((url, Facing::Back));
            }
            // No back view in the catalog entry; show the front of the same
            // shininess rather than nothing.
            let front = if shiny {
                sprites.front_shiny.as_deref()
            } else {
                sprites.front_default.as_deref()
            };
            front.map(|url| (url, Facing::Front))
        }
        Side::Opponent => {
            let front = if shiny {
                sprites.front_shiny.as_deref()
            } else {
                sprites.front_default.as_deref()
            };
            front.map(|url| (url, Facing::Front))
        }
    }
}

/// Resolve a creature sprite, scaled to `target_height`.
///
/// Every failure mode (catalog miss, absent sprite URL, fetch or decode
/// error) resolves to `None`; the caller decides whether that aborts the
/// render.
pub fn resolve_sprite(
    source: &dyn SpriteSource,
    identifier: &str,
    side: Side,
    shiny: bool,
    target_height: u32,
) -> Option<Sprite> {
    let ident = normalize_identifier(identifier);
    let entry = match source.entry(&ident) {
        Ok(entry) => entry,
        Err(e) => {
            warn!(identifier = %ident, error = %e, "catalog entry lookup failed");
            return None;
        }
    };

    let (url, facing) = select_sprite_url(&entry, side, shiny)?;
    let bytes = match source.image_bytes(url) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(identifier = %ident, url, error = %e, "sprite fetch failed");
            return None;
        }
    };
    let image = match image::load_from_memory(&bytes) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!(identifier = %ident, url, error = %e, "sprite decode failed");
            return None;
        }
    };

    Some(Sprite {
        image: resize_to_height(&image, target_height),
        facing,
        shiny,
    })
}

/// Resolve the on-canvas display name for an identifier.
///
/// Numeric identifiers are translated through the catalog (an independent
/// lookup from sprite resolution); any failure falls back to the raw
/// identifier. Mega forms are abbreviated: `charizard-mega-x` becomes
/// `M. Charizard-x`.
pub fn resolve_display_name(source: &dyn SpriteSource, identifier: &str) -> String {
    let name = if identifier.chars().all(|c| c.is_ascii_digit()) {
        match source.entry(identifier) {
            Ok(entry) => entry.name,
            Err(e) => {
                warn!(identifier, error = %e, "name lookup failed, using identifier");
                identifier.to_string()
            }
        }
    } else {
        identifier.to_string()
    };
    format_display_name(&name)
}

/// Capitalize, abbreviating mega forms with an `M.` prefix.
pub fn format_display_name(name: &str) -> String {
    let lower = name.to_lowercase();
    if let Some(idx) = lower.find("-mega") {
        let base = &lower[..idx];
        let rest = &lower[idx + "-mega".len()..];
        format!("M. {}{}", capitalize(base), rest)
    } else {
        capitalize(&lower)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpriteSet;
    use crate::error::{BattleError, BattleResult};

    struct FixedEntry(SpriteSet);

    impl SpriteSource for FixedEntry {
        fn entry(&self, _identifier: &str) -> BattleResult<CatalogEntry> {
            Ok(CatalogEntry {
                name: "testmon".to_string(),
                sprites: self.0.clone(),
            })
        }

        fn image_bytes(&self, _url: &str) -> BattleResult<Vec<u8>> {
            let img = image::RgbaImage::from_pixel(4, 8, image::Rgba([5, 6, 7, 255]));
            let mut buf = Vec::new();
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
                .unwrap();
            Ok(buf)
        }
    }

    struct FailingSource;

    impl SpriteSource for FailingSource {
        fn entry(&self, identifier: &str) -> BattleResult<CatalogEntry> {
            Err(BattleError::catalog(format!("no such entry: {identifier}")))
        }

        fn image_bytes(&self, url: &str) -> BattleResult<Vec<u8>> {
            Err(BattleError::catalog(format!("no such url: {url}")))
        }
    }

    fn full_set() -> SpriteSet {
        SpriteSet {
            front_default: Some("front.png".into()),
            front_shiny: Some("front_shiny.png".into()),
            back_default: Some("back.png".into()),
            back_shiny: Some("back_shiny.png".into()),
        }
    }

    #[test]
    fn normalize_passes_numeric_ids_through() {
        assert_eq!(normalize_identifier("25"), "25");
        assert_eq!(normalize_identifier("Pikachu"), "pikachu");
    }

    #[test]
    fn player_prefers_back_facing() {
        let source = FixedEntry(full_set());
        let sprite = resolve_sprite(&source, "testmon", Side::Player, false, 16).unwrap();
        assert_eq!(sprite.facing, Facing::Back);
        assert_eq!(sprite.image.height(), 16);
    }

    #[test]
    fn player_falls_back_to_front_of_same_shininess() {
        let source = FixedEntry(SpriteSet {
            back_shiny: None,
            back_default: None,
            ..full_set()
        });
        let sprite = resolve_sprite(&source, "testmon", Side::Player, true, 16).unwrap();
        assert_eq!(sprite.facing, Facing::Front);
        assert!(sprite.shiny);
    }

    #[test]
    fn opponent_has_no_fallback() {
        let source = FixedEntry(SpriteSet {
            front_default: None,
            ..full_set()
        });
        assert!(resolve_sprite(&source, "testmon", Side::Opponent, false, 16).is_none());
    }

    #[test]
    fn failed_lookup_resolves_to_none() {
        assert!(resolve_sprite(&FailingSource, "missingno", Side::Player, false, 16).is_none());
    }

    #[test]
    fn sprite_is_scaled_to_target_height() {
        let source = FixedEntry(full_set());
        let sprite = resolve_sprite(&source, "testmon", Side::Opponent, false, 192).unwrap();
        assert_eq!(sprite.image.height(), 192);
        // 4x8 source keeps its 1:2 ratio.
        assert_eq!(sprite.image.width(), 96);
    }

    #[test]
    fn numeric_identifier_resolves_name_via_catalog() {
        let source = FixedEntry(full_set());
        assert_eq!(resolve_display_name(&source, "4"), "Testmon");
    }

    #[test]
    fn name_lookup_failure_falls_back_to_identifier() {
        assert_eq!(resolve_display_name(&FailingSource, "151"), "151");
    }

    #[test]
    fn textual_identifier_skips_the_catalog() {
        assert_eq!(resolve_display_name(&FailingSource, "pikachu"), "Pikachu");
    }

    #[test]
    fn mega_names_are_abbreviated() {
        assert_eq!(format_display_name("charizard-mega-x"), "M. Charizard-x");
        assert_eq!(format_display_name("mewtwo-mega"), "M. Mewtwo");
        assert_eq!(format_display_name("pikachu"), "Pikachu");
    }
}
