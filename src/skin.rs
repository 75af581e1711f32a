use crate::assets;
use crate::composite::Rgba8;
use crate::params::SkinKind;

/// HP color bucket. Strict thresholds; 0.5 and 0.2 land in the lower bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HpColor {
    Green,
    Orange,
    Red,
}

pub fn hp_color(ratio: f32) -> HpColor {
    if ratio > 0.5 {
        HpColor::Green
    } else if ratio > 0.2 {
        HpColor::Orange
    } else {
        HpColor::Red
    }
}

impl HpColor {
    /// Flat-fill color used by the legacy skin.
    pub fn rgba(self) -> Rgba8 {
        match self {
            Self::Green => [0, 255, 0, 255],
            Self::Orange => [255, 165, 0, 255],
            Self::Red => [255, 0, 0, 255],
        }
    }

    /// Pre-rendered color strip used by the HUD skin.
    pub fn strip_asset(self) -> &'static str {
        match self {
            Self::Green => "hp_green.png",
            Self::Orange => "hp_orange.png",
            Self::Red => "hp_red.png",
        }
    }
}

/// How a skin draws its HP bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HpBarStyle {
    /// Flat color rectangle, width proportional to the ratio.
    FlatFill,
    /// Pre-rendered color strip cropped to the ratio.
    Strip,
}

/// One paste or text-draw step. The order of these in a skin's layer list is
/// the stacking contract: anything visible through the frame's transparent
/// cutouts must come before `Frame`, anything sitting on top of it after.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerOp {
    Background,
    PlayerSprite,
    OpponentSprite,
    PlayerHpBar,
    OpponentHpBar,
    Frame,
    /// The two legacy named overlays, loaded only if present locally.
    LegacyEffects,
    /// Up to five square effect icons (HUD).
    EffectIcons,
    /// Up to two ball icons, one per side (HUD).
    BallIcons,
    TurnText,
    NameText,
}

pub type Anchor = (i64, i64);

/// Text placement table for one skin.
pub struct TextAnchors {
    pub player_name: Anchor,
    pub player_level: Anchor,
    pub opponent_name: Anchor,
    pub opponent_level: Anchor,
    /// Turn counter anchor; skins without a turn readout leave this unset.
    pub turn: Option<Anchor>,
    /// Center the player name horizontally around its anchor x.
    pub center_player_name: bool,
}

/// A complete layer-ordering and positioning scheme.
pub struct SkinDefinition {
    pub kind: SkinKind,
    pub background: &'static str,
    pub frame: &'static str,
    pub frame_anchor: Anchor,
    /// Whether the HP ratio is clamped to [0, 1] before drawing. The legacy
    /// skin deliberately does not clamp; out-of-range bars are a preserved
    /// quirk of the original layout.
    pub clamp_hp: bool,
    pub hp_style: HpBarStyle,
    pub layers: &'static [LayerOp],
    pub player_sprite: Anchor,
    pub opponent_sprite: Anchor,
    pub player_hp: Anchor,
    pub opponent_hp: Anchor,
    pub text: TextAnchors,
}

impl SkinDefinition {
    pub fn for_kind(kind: SkinKind) -> &'static SkinDefinition {
        match kind {
            SkinKind::Legacy => &LEGACY,
            SkinKind::Hud => &HUD,
        }
    }
}

/// Legacy flat-bar layout. Sprites sit under the frame; the nominal HP bar is
/// 100x9 before `hp_bar_scale` is applied, left-anchored for the player and
/// right-anchored for the opponent.
pub static LEGACY: SkinDefinition = SkinDefinition {
    kind: SkinKind::Legacy,
    background: assets::BACKGROUND_LEGACY,
    frame: assets::FRAME_LEGACY,
    frame_anchor: (0, 15),
    clamp_hp: false,
    hp_style: HpBarStyle::FlatFill,
    layers: &[
        LayerOp::Background,
        LayerOp::PlayerSprite,
        LayerOp::OpponentSprite,
        LayerOp::PlayerHpBar,
        LayerOp::OpponentHpBar,
        LayerOp::Frame,
        LayerOp::LegacyEffects,
        LayerOp::NameText,
    ],
    player_sprite: (165, 245),
    opponent_sprite: (530, 110),
    player_hp: (70, 230),
    opponent_hp: (739, 230),
    text: TextAnchors {
        player_name: (5, 208),
        player_level: (194, 211),
        opponent_name: (868, 208),
        opponent_level: (770, 211),
        turn: None,
        center_player_name: false,
    },
};

/// Nominal legacy HP bar size before `hp_bar_scale`.
pub const LEGACY_HP_BAR: (u32, u32) = (100, 9);

/// Anchors for the two legacy named overlays.
pub const LEGACY_EFFECT_OPPONENT_ANCHOR: Anchor = (900, 198);
pub const LEGACY_EFFECT_BATTLE_ANCHOR: Anchor = (65, 25);

/// Legacy font size is `LEGACY_FONT_FACTOR * font_scale`.
pub const LEGACY_FONT_FACTOR: f32 = 2.2;

/// HUD layout. The frame is pasted after the HP strips so its cutouts mask
/// the strip edges; sprites and icons render on top of the frame.
pub static HUD: SkinDefinition = SkinDefinition {
    kind: SkinKind::Hud,
    background: assets::BACKGROUND_HUD,
    frame: assets::FRAME_HUD,
    frame_anchor: (0, 0),
    clamp_hp: true,
    hp_style: HpBarStyle::Strip,
    layers: &[
        LayerOp::Background,
        LayerOp::OpponentHpBar,
        LayerOp::PlayerHpBar,
        LayerOp::Frame,
        LayerOp::PlayerSprite,
        LayerOp::OpponentSprite,
        LayerOp::EffectIcons,
        LayerOp::BallIcons,
        LayerOp::TurnText,
        LayerOp::NameText,
    ],
    player_sprite: (140, 220),
    opponent_sprite: (560, 90),
    player_hp: (646, 334),
    opponent_hp: (126, 86),
    text: TextAnchors {
        player_name: (770, 306),
        player_level: (900, 306),
        opponent_name: (120, 56),
        opponent_level: (330, 56),
        turn: Some((20, 18)),
        center_player_name: true,
    },
};

/// HUD effect icon slots, each resized to a fixed square.
pub const HUD_EFFECT_ANCHORS: [Anchor; 5] = [(430, 40), (448, 40), (466, 40), (484, 40), (502, 40)];
pub const HUD_EFFECT_SIZE: u32 = 12;

/// HUD ball icon anchors: player side, then opponent side.
pub const HUD_BALL_ANCHORS: [Anchor; 2] = [(600, 340), (90, 80)];

/// HUD text sizes are fixed; `font_scale` is a legacy-only knob.
pub const HUD_NAME_FONT_PX: f32 = 18.0;
pub const HUD_TURN_FONT_PX: f32 = 28.0;
