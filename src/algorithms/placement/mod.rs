//! # 装饰物放置
//!
//! 两种策略共用一张占用网格 [`Plot`]：
//!
//! - [`clear_region`]：大型装饰物，有上限的随机搜索，要求整个邻域空旷；
//! - [`density`]：逐格密度放置，每格最多一个装饰物（伴生装饰物不另占格）。
//!
//! 两者都是串行的：认领写入必须在下一格判定之前完成。

pub mod clear_region;
pub mod density;

pub use clear_region::{blocked_neighbors, claim_window, place_structures, StructureStats};
pub use density::{place_density_props, DensityStats};

use crate::core::cell::{MapCell, Plot};
use crate::core::grid::Grid;

/// 合成结果 → 占用网格（所有陆地格初始为 open）
pub fn plots_from_map(map: &Grid<MapCell>) -> Grid<Plot> {
    map.map(Plot::from)
}
