//! # Lian Isle
//!
//! 由种子驱动、结果可复现的 2D 岛屿地形与装饰物生成器：
//! 元胞自动机生成陆地/水，柏林噪声覆盖层划分地貌，
//! 再按密度规则与占用约束放置装饰物，结果通过 [`TileSink`] 报告。

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod generation;
pub mod rendering;

pub use crate::config::generation::GenerationConfig;
pub use crate::core::cell::{Ground, LandCell, MapCell, Plot};
pub use crate::core::grid::Grid;
pub use crate::core::params::GenerationParameters;
pub use crate::error::Error;
pub use crate::generation::{
    generate, generate_with_params, GenerationOutcome, GenerationReport, NullSink, RecordingSink,
    TileSink,
};
