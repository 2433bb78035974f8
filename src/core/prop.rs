//! # 装饰物定义
//!
//! 从配置构建的装饰物生成器。生成器是一个封闭的变体集合：
//! 百分比阈值、噪声阈值（逐格密度放置）以及大型装饰物（空旷区域搜索）。

use serde::Serialize;

use crate::config::generation::{
    CompanionConfig, DensityModel, PropConfig, StructureConfig, VariantConfig,
};
use crate::config::ConfigError;
use crate::core::cell::Ground;
use crate::core::params::{check_offset, resolve_frequency};
use crate::core::random::RandomSource;

/// 伴生链最大深度
pub const MAX_COMPANION_DEPTH: usize = 3;

/// 格内偏移（格单位，[0, 1]）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubCellOffset {
    pub x: f32,
    pub y: f32,
}

impl From<[f32; 2]> for SubCellOffset {
    fn from(value: [f32; 2]) -> Self {
        Self {
            x: value[0],
            y: value[1],
        }
    }
}

// ── 变体集合 ───────────────────────────────────────────────

/// 带权重的装饰物变体集合，保证非空且总权重 > 0
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSet {
    ids: Vec<String>,
    weights: Vec<u32>,
}

impl VariantSet {
    fn build(generator: &str, configs: &[VariantConfig]) -> Result<Self, ConfigError> {
        let total: u64 = configs.iter().map(|v| v.weight as u64).sum();
        if configs.is_empty() || total == 0 {
            return Err(ConfigError::EmptyVariants {
                generator: generator.to_string(),
            });
        }
        Ok(Self {
            ids: configs.iter().map(|v| v.id.clone()).collect(),
            weights: configs.iter().map(|v| v.weight).collect(),
        })
    }

    /// 按权重抽取一个变体 id
    pub fn pick(&self, rng: &mut RandomSource) -> &str {
        let index = rng.pick_weighted(&self.weights).unwrap_or(0);
        &self.ids[index]
    }
}

// ── 逐格密度生成器 ─────────────────────────────────────────

/// 已解析的概率模型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityRule {
    /// `next_int(0, units) < density`
    Percent { density: u32, units: u32 },
    /// 该格噪声值 < `next_float(0, density_cap)`，阈值每次重新抽取
    Noise { frequency: f64, density_cap: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Companion {
    pub offset: SubCellOffset,
    /// 阈值缩放
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropGenerator {
    pub key: String,
    pub target: Ground,
    pub rule: DensityRule,
    pub variants: VariantSet,
    pub offset: SubCellOffset,
    pub companions: Vec<Companion>,
}

pub fn build_prop_generators(
    configs: &[PropConfig],
    rng: &mut RandomSource,
) -> Result<Vec<PropGenerator>, ConfigError> {
    let mut generators = Vec::with_capacity(configs.len());

    for config in configs.iter().filter(|c| c.enabled) {
        let rule = build_rule(config, rng)?;
        let variants = VariantSet::build(&config.key, &config.variants)?;
        check_offset(&format!("props.{}.offset", config.key), config.offset)?;
        let companions = build_companions(&config.key, &config.companions)?;

        generators.push(PropGenerator {
            key: config.key.clone(),
            target: config.target,
            rule,
            variants,
            offset: config.offset.into(),
            companions,
        });
    }

    Ok(generators)
}

fn build_rule(config: &PropConfig, rng: &mut RandomSource) -> Result<DensityRule, ConfigError> {
    match config.model {
        DensityModel::Percent { density, units } => {
            if units == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("props.{}.model.units", config.key),
                    detail: "密度单位必须 > 0".to_string(),
                });
            }
            if density > units {
                return Err(ConfigError::PercentOutOfRange {
                    field: format!("props.{}.model.density", config.key),
                    value: density,
                    max: units,
                });
            }
            Ok(DensityRule::Percent { density, units })
        }
        DensityModel::Noise {
            frequency,
            density_cap,
        } => {
            if !density_cap.is_finite() || density_cap < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("props.{}.model.density_cap", config.key),
                    detail: format!("{density_cap} 必须是非负有限数"),
                });
            }
            let frequency = resolve_frequency(
                &format!("props.{}.model.frequency", config.key),
                &frequency,
                rng,
            )?;
            Ok(DensityRule::Noise {
                frequency,
                density_cap,
            })
        }
    }
}

fn build_companions(
    generator: &str,
    configs: &[CompanionConfig],
) -> Result<Vec<Companion>, ConfigError> {
    if configs.len() > MAX_COMPANION_DEPTH {
        return Err(ConfigError::CompanionChainTooDeep {
            generator: generator.to_string(),
            depth: configs.len(),
            max: MAX_COMPANION_DEPTH,
        });
    }

    configs
        .iter()
        .enumerate()
        .map(|(i, c)| {
            check_offset(&format!("props.{generator}.companions[{i}].offset"), c.offset)?;
            if !c.scale.is_finite() || c.scale < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("props.{generator}.companions[{i}].scale"),
                    detail: format!("{} 必须是非负有限数", c.scale),
                });
            }
            Ok(Companion {
                offset: c.offset.into(),
                scale: c.scale,
            })
        })
        .collect()
}

// ── 大型装饰物 ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StructureDefinition {
    pub key: String,
    /// 邻域半径（窗口边长 2r+1）
    pub radius: u32,
    pub count: u32,
    /// 每个实例的尝试上限
    pub max_attempts: u64,
    pub variants: VariantSet,
    pub offset: SubCellOffset,
}

pub fn build_structures(
    configs: &[StructureConfig],
    width: u32,
    height: u32,
) -> Result<Vec<StructureDefinition>, ConfigError> {
    let mut structures = Vec::with_capacity(configs.len());

    for config in configs.iter().filter(|c| c.enabled) {
        let variants = VariantSet::build(&config.key, &config.variants)?;
        check_offset(&format!("structures.{}.offset", config.key), config.offset)?;
        if config.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: format!("structures.{}.max_attempts", config.key),
                detail: "尝试次数必须 > 0".to_string(),
            });
        }
        // 半径超过地图边长后窗口已覆盖全图，更大的值只会让面积计算溢出
        let max_radius = width.max(height);
        if config.neighborhood > max_radius {
            return Err(ConfigError::InvalidValue {
                field: format!("structures.{}.neighborhood", config.key),
                detail: format!("邻域半径 {} 超过地图边长 {max_radius}", config.neighborhood),
            });
        }

        structures.push(StructureDefinition {
            key: config.key.clone(),
            radius: config.neighborhood,
            count: config.count,
            max_attempts: config
                .max_attempts
                .unwrap_or(width as u64 * height as u64),
            variants,
            offset: config.offset.into(),
        });
    }

    Ok(structures)
}
