pub mod generation;
pub mod palette;
pub mod steps;

use std::path::PathBuf;

use thiserror::Error;

/// 配置加载与校验错误。全部在生成开始前报告。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("读取配置文件失败 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("世界尺寸非法: {width}x{height}，要求宽高 > 0 且总格数不超过 {max_cells}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        max_cells: u64,
    },

    #[error("百分比越界: {field} = {value}，要求 0..={max}")]
    PercentOutOfRange { field: String, value: u32, max: u32 },

    #[error("噪声频率非法: {field} (value={value}, min={min}, max={max})，要求 {limit_min}<=min<=value<=max<={limit_max}")]
    InvalidFrequency {
        field: String,
        value: f64,
        min: f64,
        max: f64,
        limit_min: f64,
        limit_max: f64,
    },

    #[error("参数非法: {field} — {detail}")]
    InvalidValue { field: String, detail: String },

    #[error("生成器 {generator} 已启用但没有可用的装饰物变体")]
    EmptyVariants { generator: String },

    #[error("生成器 {generator} 的伴生链深度 {depth} 超过上限 {max}")]
    CompanionChainTooDeep {
        generator: String,
        depth: usize,
        max: usize,
    },

    #[error("键名重复: {key}")]
    DuplicateKey { key: String },

    #[error("未知的生成步骤: {id}")]
    UnknownStep { id: String },
}
