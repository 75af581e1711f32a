#![forbid(unsafe_code)]

pub mod assets;
pub mod catalog;
pub mod composite;
pub mod error;
pub mod font;
pub mod params;
pub mod resolve;
pub mod scale;
pub mod scene;
pub mod server;
pub mod skin;

pub use assets::AssetStore;
pub use catalog::{CatalogEntry, DEFAULT_CATALOG_URL, HttpCatalog, SpriteSet, SpriteSource};
pub use composite::Canvas;
pub use error::{BattleError, BattleResult};
pub use font::FontHandle;
pub use params::{BattleParams, SkinKind};
pub use resolve::{Facing, Side, Sprite};
pub use scene::SceneBuilder;
pub use server::{AppState, serve};
pub use skin::{HpColor, SkinDefinition, hp_color};
