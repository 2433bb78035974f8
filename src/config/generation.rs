//! # 生成配置（generation.json）
//!
//! 一次生成运行的原始配置记录。只做反序列化，不做语义校验；
//! 校验与解析（随机种子、随机频率）在 [`crate::core::params`] 中一次完成。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::core::cell::Ground;

const GENERATION_JSON: &str = include_str!("../assets/generation.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub use_random_seed: bool,
    pub terrain: TerrainConfig,
    /// 合成覆盖层，按声明顺序依次叠加
    pub overlays: Vec<OverlayConfig>,
    /// 逐格密度装饰物，按声明顺序决定优先级
    pub props: Vec<PropConfig>,
    /// 需要空旷邻域的大型装饰物
    pub structures: Vec<StructureConfig>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 96,
            height: 64,
            seed: 0,
            use_random_seed: false,
            terrain: TerrainConfig::default(),
            overlays: Vec::new(),
            props: Vec::new(),
            structures: Vec::new(),
        }
    }
}

// ── 地形（元胞自动机） ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// 初始填充为水的百分比 (0-100)
    pub fill_percent: u32,
    pub smoothing_steps: u32,
    pub border: BorderPolicy,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            fill_percent: 45,
            smoothing_steps: 5,
            border: BorderPolicy::Edge,
        }
    }
}

/// 边界策略：填充阶段哪些边缘格强制为水
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BorderPolicy {
    /// 不强制边缘
    Open,
    /// 最外一圈为水
    Edge,
    /// 距任一边界 `cells` 格以内为水
    Thickness { cells: u32 },
}

impl BorderPolicy {
    /// 强制为水的边缘厚度（格）
    pub fn thickness(self) -> u32 {
        match self {
            BorderPolicy::Open => 0,
            BorderPolicy::Edge => 1,
            BorderPolicy::Thickness { cells } => cells,
        }
    }
}

// ── 噪声频率 ───────────────────────────────────────────────

/// 噪声频率（"modifier"）及其允许的随机区间
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// 每次运行在 [min, max) 内重新抽取频率
    pub randomize: bool,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            value: 0.05,
            min: 0.04,
            max: 0.06,
            randomize: false,
        }
    }
}

// ── 合成覆盖层 ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub key: String,
    pub source: OverlaySource,
    /// 只有当前恰好是此地貌的格子会被改写
    #[serde(default = "default_open")]
    pub open: Ground,
    /// 覆盖层为 0 时写入的地貌
    #[serde(default = "default_open")]
    pub clear: Ground,
    /// 覆盖层为 1 时写入的地貌
    pub claimed: Ground,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// 二值覆盖层的来源
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlaySource {
    /// 噪声场取整：值 >= threshold 为 1
    Noise {
        #[serde(default)]
        frequency: FrequencyConfig,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    /// 逐格百分比判定
    Percent { percent: u32 },
}

// ── 逐格密度装饰物 ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropConfig {
    pub key: String,
    /// 只在此地貌的空闲格上放置
    #[serde(default = "default_open")]
    pub target: Ground,
    pub model: DensityModel,
    pub variants: Vec<VariantConfig>,
    /// 主装饰物在格内的偏移（格单位）
    #[serde(default = "default_offset")]
    pub offset: [f32; 2],
    #[serde(default)]
    pub companions: Vec<CompanionConfig>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// 概率模型
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DensityModel {
    /// `next_int(0, units) < density`
    Percent {
        density: u32,
        #[serde(default = "default_units")]
        units: u32,
    },
    /// 噪声值 < `next_float(0, density_cap)`
    Noise {
        #[serde(default)]
        frequency: FrequencyConfig,
        density_cap: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConfig {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

/// 伴生装饰物：主装饰物成功后追加的二次判定，链式最多 3 层
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    pub offset: [f32; 2],
    /// 判定阈值缩放（默认减半）
    #[serde(default = "default_companion_scale")]
    pub scale: f64,
}

// ── 大型装饰物 ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureConfig {
    pub key: String,
    /// 邻域半径，1 表示 3×3 窗口
    pub neighborhood: u32,
    pub count: u32,
    /// 每个实例的最大尝试次数，缺省为 width*height
    #[serde(default)]
    pub max_attempts: Option<u64>,
    pub variants: Vec<VariantConfig>,
    #[serde(default = "default_offset")]
    pub offset: [f32; 2],
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_open() -> Ground {
    Ground::Clear
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    0.5
}

fn default_units() -> u32 {
    100
}

fn default_weight() -> u32 {
    1
}

fn default_offset() -> [f32; 2] {
    [0.5, 0.5]
}

fn default_companion_scale() -> f64 {
    0.5
}

// ── 加载 ───────────────────────────────────────────────────

/// 内置默认配置
pub fn load_default_generation_config() -> Result<GenerationConfig, ConfigError> {
    parse_generation_config(GENERATION_JSON)
}

pub fn parse_generation_config(json: &str) -> Result<GenerationConfig, ConfigError> {
    let config: GenerationConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// 从 JSON 文件加载
pub fn load_generation_config(path: &Path) -> Result<GenerationConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_generation_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = load_default_generation_config().unwrap();
        assert!(config.width > 0 && config.height > 0);
        assert!(!config.props.is_empty());
        assert!(!config.structures.is_empty());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config = parse_generation_config(r#"{ "width": 12, "height": 8 }"#).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.terrain.fill_percent, 45);
        assert_eq!(config.terrain.border, BorderPolicy::Edge);
        assert!(config.props.is_empty());
    }

    #[test]
    fn tagged_models_parse() {
        let json = r#"{
            "terrain": { "border": { "kind": "thickness", "cells": 3 } },
            "props": [
                { "key": "stump", "model": { "kind": "percent", "density": 15, "units": 1000 },
                  "variants": [ { "id": "stump" } ] },
                { "key": "tree", "target": "grove",
                  "model": { "kind": "noise", "density_cap": 0.5,
                             "frequency": { "value": 0.05, "min": 0.04, "max": 0.06, "randomize": true } },
                  "variants": [ { "id": "green_tree", "weight": 3 } ],
                  "companions": [ { "offset": [0.8, 0.8] } ] }
            ]
        }"#;
        let config = parse_generation_config(json).unwrap();
        assert_eq!(config.terrain.border.thickness(), 3);
        assert_eq!(
            config.props[0].model,
            DensityModel::Percent { density: 15, units: 1000 }
        );
        assert_eq!(config.props[1].target, Ground::Grove);
        assert_eq!(config.props[1].companions[0].scale, 0.5);
        assert_eq!(config.props[1].variants[0].weight, 3);
        assert_eq!(config.props[0].offset, [0.5, 0.5]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_generation_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("here.json"));
    }
}
