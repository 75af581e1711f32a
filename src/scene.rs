use image::RgbaImage;

use crate::assets::AssetStore;
use crate::catalog::SpriteSource;
use crate::composite::Canvas;
use crate::error::{BattleError, BattleResult};
use crate::font::FontHandle;
use crate::params::{BattleParams, SkinKind};
use crate::resolve::{Side, resolve_display_name, resolve_sprite};
use crate::scale::{crop_fraction, resize_to_height};
use crate::skin::{self, HpBarStyle, LayerOp, SkinDefinition, hp_color};

/// Backgrounds are scaled to this canvas height before compositing.
pub const CANVAS_HEIGHT: u32 = 480;

const TEXT_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Drives sprite resolution, asset loading, scaling, and compositing in the
/// fixed per-skin order, producing an encoded PNG.
///
/// Holds no mutable state; each render owns its canvas, so concurrent renders
/// never share anything but the read-only collaborators.
pub struct SceneBuilder<'a> {
    assets: &'a AssetStore,
    source: &'a dyn SpriteSource,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(assets: &'a AssetStore, source: &'a dyn SpriteSource) -> Self {
        Self { assets, source }
    }

    #[tracing::instrument(skip_all, fields(skin = ?params.skin))]
    pub fn render(&self, params: &BattleParams) -> BattleResult<Vec<u8>> {
        // Identifier validation happens before any catalog I/O.
        let (ident1, ident2) = params.require_identifiers()?;

        // Sprites are fetched at 2x the nominal on-canvas height; the anchor
        // math in the skin tables assumes that supersampled size. The height
        // knob is caller-controlled, so it is clamped to the canvas height
        // before the multiply.
        let target_height = params.sprite_height.clamp(1, CANVAS_HEIGHT) * 2;
        let sprite1 = resolve_sprite(self.source, ident1, Side::Player, params.shiny1(), target_height)
            .ok_or_else(|| {
                BattleError::sprite_unavailable(format!("failed to retrieve sprite for '{ident1}'"))
            })?;
        let sprite2 = resolve_sprite(self.source, ident2, Side::Opponent, params.shiny2(), target_height)
            .ok_or_else(|| {
                BattleError::sprite_unavailable(format!("failed to retrieve sprite for '{ident2}'"))
            })?;

        let def = SkinDefinition::for_kind(params.skin);
        let background = resize_to_height(&self.assets.background(def.background), CANVAS_HEIGHT);
        let mut canvas = Canvas::new(background.width(), background.height(), [255, 255, 255, 0]);
        let font = self.assets.font();

        let (ratio1, ratio2) = if def.clamp_hp {
            (params.hp1_ratio().clamp(0.0, 1.0), params.hp2_ratio().clamp(0.0, 1.0))
        } else {
            (params.hp1_ratio(), params.hp2_ratio())
        };

        for op in def.layers {
            match op {
                LayerOp::Background => canvas.paste(&background, 0, 0),
                LayerOp::PlayerSprite => {
                    let (x, y) = def.player_sprite;
                    canvas.paste(&sprite1.image, x, y);
                }
                LayerOp::OpponentSprite => {
                    let (x, y) = def.opponent_sprite;
                    canvas.paste(&sprite2.image, x, y);
                }
                LayerOp::PlayerHpBar => {
                    self.draw_hp_bar(&mut canvas, def, params, def.player_hp, ratio1, false);
                }
                LayerOp::OpponentHpBar => {
                    self.draw_hp_bar(&mut canvas, def, params, def.opponent_hp, ratio2, true);
                }
                LayerOp::Frame => {
                    if let Some(frame) = self.assets.load(def.frame) {
                        let (x, y) = def.frame_anchor;
                        canvas.paste(&frame, x, y);
                    }
                }
                LayerOp::LegacyEffects => {
                    self.paste_overlay(
                        &mut canvas,
                        params.battle_effect_pokemon2.as_deref(),
                        skin::LEGACY_EFFECT_OPPONENT_ANCHOR,
                    );
                    self.paste_overlay(
                        &mut canvas,
                        params.battle_effect_battle.as_deref(),
                        skin::LEGACY_EFFECT_BATTLE_ANCHOR,
                    );
                }
                LayerOp::EffectIcons => {
                    for (token, anchor) in params.effects().into_iter().zip(skin::HUD_EFFECT_ANCHORS) {
                        let Some(token) = token else { continue };
                        if let Some(icon) = self.assets.overlay(token) {
                            let icon = square_icon(&icon, skin::HUD_EFFECT_SIZE);
                            canvas.paste(&icon, anchor.0, anchor.1);
                        }
                    }
                }
                LayerOp::BallIcons => {
                    self.paste_overlay(&mut canvas, params.ball1.as_deref(), skin::HUD_BALL_ANCHORS[0]);
                    self.paste_overlay(&mut canvas, params.ball2.as_deref(), skin::HUD_BALL_ANCHORS[1]);
                }
                LayerOp::TurnText => {
                    if let (Some(turn), Some((x, y))) = (params.turn.as_deref(), def.text.turn) {
                        font.draw(
                            &mut canvas,
                            &format!("Turn {turn}"),
                            x,
                            y,
                            skin::HUD_TURN_FONT_PX,
                            TEXT_WHITE,
                        );
                    }
                }
                LayerOp::NameText => {
                    self.draw_names(&mut canvas, &font, def, params, ident1, ident2);
                }
            }
        }

        canvas.into_png()
    }

    fn draw_hp_bar(
        &self,
        canvas: &mut Canvas,
        def: &SkinDefinition,
        params: &BattleParams,
        anchor: (i64, i64),
        ratio: f32,
        right_anchored: bool,
    ) {
        match def.hp_style {
            HpBarStyle::FlatFill => {
                let (base_w, base_h) = skin::LEGACY_HP_BAR;
                let bar_w = (base_w as f32 * params.hp_bar_scale) as i64;
                let bar_h = (base_h as f32 * params.hp_bar_scale) as i64;
                let (x, y) = anchor;
                // Right-anchored bars grow from the right edge inward: the
                // empty portion is the left offset.
                let (x0, x1) = if right_anchored {
                    (x + (bar_w as f32 * (1.0 - ratio)) as i64, x + bar_w)
                } else {
                    (x, x + (bar_w as f32 * ratio) as i64)
                };
                canvas.fill_rect(x0, y, x1, y + bar_h, hp_color(ratio).rgba());
            }
            HpBarStyle::Strip => {
                if let Some(strip) = self.assets.load(hp_color(ratio).strip_asset()) {
                    let bar = crop_fraction(&strip, ratio);
                    canvas.paste(&bar, anchor.0, anchor.1);
                }
            }
        }
    }

    fn paste_overlay(&self, canvas: &mut Canvas, token: Option<&str>, anchor: (i64, i64)) {
        let Some(token) = token else { return };
        if let Some(overlay) = self.assets.overlay(token) {
            canvas.paste(&overlay, anchor.0, anchor.1);
        }
    }

    fn draw_names(
        &self,
        canvas: &mut Canvas,
        font: &FontHandle,
        def: &SkinDefinition,
        params: &BattleParams,
        ident1: &str,
        ident2: &str,
    ) {
        // Each name is a catalog lookup of its own, separate from sprite
        // resolution; see the resolver docs.
        let name1 = resolve_display_name(self.source, ident1);
        let name2 = resolve_display_name(self.source, ident2);

        let px = match def.kind {
            SkinKind::Legacy => skin::LEGACY_FONT_FACTOR * params.font_scale,
            SkinKind::Hud => skin::HUD_NAME_FONT_PX,
        };

        let (mut name1_x, name1_y) = def.text.player_name;
        if def.text.center_player_name {
            name1_x -= i64::from(font.measure(&name1, px)) / 2;
        }
        font.draw(canvas, &name1, name1_x, name1_y, px, TEXT_WHITE);

        let (x, y) = def.text.player_level;
        font.draw(canvas, &params.level1, x, y, px, TEXT_WHITE);

        let (x, y) = def.text.opponent_name;
        font.draw(canvas, &name2, x, y, px, TEXT_WHITE);

        let (x, y) = def.text.opponent_level;
        font.draw(canvas, &params.level2, x, y, px, TEXT_WHITE);
    }
}

/// Effect icons are always square-resized, ignoring the source aspect ratio.
fn square_icon(img: &RgbaImage, size: u32) -> RgbaImage {
    image::imageops::resize(img, size, size, image::imageops::FilterType::CatmullRom)
}
