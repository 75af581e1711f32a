use serde::Deserialize;

use crate::error::{BattleError, BattleResult};

/// Which layer-ordering scheme renders the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinKind {
    #[default]
    Legacy,
    Hud,
}

/// Typed request parameters with explicit defaults.
///
/// Booleans arrive as strings ("true" is truthy, case-insensitive, anything
/// else is false). HP is taken as-is; clamping is a per-skin decision.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BattleParams {
    pub pokemon1: Option<String>,
    pub pokemon2: Option<String>,
    pub shiny1: Option<String>,
    pub shiny2: Option<String>,
    pub hp1: i32,
    pub hp2: i32,
    pub level1: String,
    pub level2: String,
    pub sprite_height: u32,
    pub hp_bar_scale: f32,
    pub font_scale: f32,
    pub turn: Option<String>,
    pub effect1: Option<String>,
    pub effect2: Option<String>,
    pub effect3: Option<String>,
    pub effect4: Option<String>,
    pub effect5: Option<String>,
    pub ball1: Option<String>,
    pub ball2: Option<String>,
    pub battle_effect_pokemon2: Option<String>,
    pub battle_effect_battle: Option<String>,
    pub skin: SkinKind,
}

impl Default for BattleParams {
    fn default() -> Self {
        Self {
            pokemon1: None,
            pokemon2: None,
            shiny1: None,
            shiny2: None,
            hp1: 100,
            hp2: 100,
            level1: "1".to_string(),
            level2: "1".to_string(),
            sprite_height: 96,
            hp_bar_scale: 1.5,
            font_scale: 8.0,
            turn: None,
            effect1: None,
            effect2: None,
            effect3: None,
            effect4: None,
            effect5: None,
            ball1: None,
            ball2: None,
            battle_effect_pokemon2: None,
            battle_effect_battle: None,
            skin: SkinKind::Legacy,
        }
    }
}

fn truthy(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

impl BattleParams {
    /// Both creature identifiers, rejected before any catalog I/O when either
    /// is absent or empty.
    pub fn require_identifiers(&self) -> BattleResult<(&str, &str)> {
        let p1 = self.pokemon1.as_deref().filter(|s| !s.is_empty());
        let p2 = self.pokemon2.as_deref().filter(|s| !s.is_empty());
        match (p1, p2) {
            (Some(p1), Some(p2)) => Ok((p1, p2)),
            _ => Err(BattleError::missing_parameter(
                "both pokemon1 and pokemon2 are required",
            )),
        }
    }

    pub fn shiny1(&self) -> bool {
        truthy(&self.shiny1)
    }

    pub fn shiny2(&self) -> bool {
        truthy(&self.shiny2)
    }

    /// Raw HP ratio; out-of-range values survive here and are clamped (or
    /// not) by the skin.
    pub fn hp1_ratio(&self) -> f32 {
        self.hp1 as f32 / 100.0
    }

    pub fn hp2_ratio(&self) -> f32 {
        self.hp2 as f32 / 100.0
    }

    /// The five HUD effect slots, in order, with empty slots preserved.
    pub fn effects(&self) -> [Option<&str>; 5] {
        [
            self.effect1.as_deref(),
            self.effect2.as_deref(),
            self.effect3.as_deref(),
            self.effect4.as_deref(),
            self.effect5.as_deref(),
        ]
    }
}
