use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::ConfigError;

const PALETTE_JSON: &str = include_str!("../assets/palette.json");

/// 预览图调色板：地形键名 / 装饰物 id → RGBA
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteConfig {
    pub terrain: BTreeMap<String, [u8; 4]>,
    pub props: BTreeMap<String, [u8; 4]>,
    pub fallback: [u8; 4],
}

pub fn load_palette_config() -> Result<PaletteConfig, ConfigError> {
    let config: PaletteConfig = serde_json::from_str(PALETTE_JSON)?;
    Ok(config)
}
