//! # 生成参数
//!
//! [`GenerationParameters`] 是一次生成运行的不可变参数集合，由
//! [`GenerationConfig`] 在生成开始前一次性校验、解析得到：
//!
//! - "使用随机种子" 在这里解析为具体种子，之后只记录这个值；
//! - 标记为 `randomize` 的噪声频率在这里抽取，使用由种子派生的独立随机源，
//!   因此结果可复现，也不会扰动地形生成所用的随机序列。
//!
//! 所有配置错误都在此处报告，生成过程中不会再出现配置类错误。

use std::collections::HashSet;

use crate::config::generation::{FrequencyConfig, GenerationConfig, TerrainConfig};
use crate::config::ConfigError;
use crate::core::layer::{build_overlay_layers, OverlayLayer};
use crate::core::prop::{build_prop_generators, build_structures, PropGenerator, StructureDefinition};
use crate::core::random::{derive_seed, resolve_seed, RandomSource};

/// 噪声频率的有效区间：过低近乎常量，过高退化为白噪声
pub const FREQUENCY_LIMITS: (f64, f64) = (0.01, 0.25);

/// 单次生成允许的最大格子数
pub const MAX_CELLS: u64 = 1 << 24;

/// 频率解析用子种子的盐值
const FREQUENCY_SALT: u64 = 0x0F4E_0001;

#[derive(Debug, Clone)]
pub struct GenerationParameters {
    pub width: u32,
    pub height: u32,
    /// 已解析的具体种子
    pub seed: u64,
    pub terrain: TerrainConfig,
    pub overlays: Vec<OverlayLayer>,
    pub props: Vec<PropGenerator>,
    pub structures: Vec<StructureDefinition>,
}

impl GenerationParameters {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ConfigError> {
        let (width, height) = resolve_size(config.width, config.height)?;
        check_percent("terrain.fill_percent", config.terrain.fill_percent, 100)?;

        let seed = resolve_seed(config.seed, config.use_random_seed);
        let mut frequency_rng = RandomSource::from_seed(derive_seed(seed, FREQUENCY_SALT));

        let overlays = build_overlay_layers(&config.overlays, &mut frequency_rng)?;
        let props = build_prop_generators(&config.props, &mut frequency_rng)?;
        let structures = build_structures(&config.structures, width, height)?;

        check_unique_keys(
            overlays
                .iter()
                .map(|l| l.key.as_str())
                .chain(props.iter().map(|p| p.key.as_str()))
                .chain(structures.iter().map(|s| s.key.as_str())),
        )?;

        Ok(Self {
            width,
            height,
            seed,
            terrain: config.terrain.clone(),
            overlays,
            props,
            structures,
        })
    }
}

impl GenerationConfig {
    /// 校验并解析为本次运行的不可变参数
    pub fn resolve(&self) -> Result<GenerationParameters, ConfigError> {
        GenerationParameters::from_config(self)
    }
}

fn resolve_size(width: u32, height: u32) -> Result<(u32, u32), ConfigError> {
    let cells = width as u64 * height as u64;
    if width == 0 || height == 0 || cells > MAX_CELLS {
        return Err(ConfigError::InvalidDimensions {
            width,
            height,
            max_cells: MAX_CELLS,
        });
    }
    Ok((width, height))
}

// ── 共用校验 ───────────────────────────────────────────────

pub(crate) fn check_percent(field: &str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::PercentOutOfRange {
            field: field.to_string(),
            value,
            max,
        });
    }
    Ok(())
}

/// 校验频率区间并解析出本次运行使用的频率
pub(crate) fn resolve_frequency(
    field: &str,
    frequency: &FrequencyConfig,
    rng: &mut RandomSource,
) -> Result<f64, ConfigError> {
    let (limit_min, limit_max) = FREQUENCY_LIMITS;
    let in_band = frequency.min.is_finite()
        && frequency.max.is_finite()
        && frequency.value.is_finite()
        && limit_min <= frequency.min
        && frequency.min <= frequency.max
        && frequency.max <= limit_max;
    // randomize 时 value 不参与，只要求区间合法
    let value_ok = frequency.randomize
        || (frequency.min <= frequency.value && frequency.value <= frequency.max);

    if !in_band || !value_ok {
        return Err(ConfigError::InvalidFrequency {
            field: field.to_string(),
            value: frequency.value,
            min: frequency.min,
            max: frequency.max,
            limit_min,
            limit_max,
        });
    }

    if frequency.randomize {
        Ok(rng.next_float(frequency.min, frequency.max))
    } else {
        Ok(frequency.value)
    }
}

/// 格内偏移必须落在 [0, 1]
pub(crate) fn check_offset(field: &str, offset: [f32; 2]) -> Result<(), ConfigError> {
    if offset.iter().all(|v| (0.0..=1.0).contains(v)) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field: field.to_string(),
        detail: format!("格内偏移 {offset:?} 超出 [0, 1]"),
    })
}

fn check_unique_keys<'a>(keys: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(ConfigError::DuplicateKey {
                key: key.to_string(),
            });
        }
    }
    Ok(())
}
