//! # 元胞自动机陆地生成
//!
//! 两个阶段：
//!
//! 1. **填充**：边界策略命中的格子强制为水，其余格子 `next_int(0,100) < fill_percent` 为水。
//!    边界策略只在这里判定一次，平滑阶段不会重新施加。
//! 2. **平滑**：重复 `smoothing_steps` 次。每次先对整张网格拍快照，从快照读、向网格写，
//!    避免同一轮内的级联。8 邻域中水的数量（越界算水）> 4 变水，< 4 变陆地，
//!    恰好 4 时保持原值。

use rayon::prelude::*;

use crate::config::generation::{BorderPolicy, TerrainConfig};
use crate::core::cell::LandCell;
use crate::core::grid::Grid;
use crate::core::random::RandomSource;

/// 8 邻域的平局点：恰好这么多水邻居时格子保持不变
pub const TIE_COUNT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellularAutomaton {
    pub width: u32,
    pub height: u32,
    pub fill_percent: u32,
    pub smoothing_steps: u32,
    pub border: BorderPolicy,
}

impl CellularAutomaton {
    pub fn from_terrain(width: u32, height: u32, terrain: &TerrainConfig) -> Self {
        Self {
            width,
            height,
            fill_percent: terrain.fill_percent,
            smoothing_steps: terrain.smoothing_steps,
            border: terrain.border,
        }
    }

    /// 填充 + 全部平滑轮次
    pub fn generate(&self, rng: &mut RandomSource) -> Grid<LandCell> {
        let mut grid = self.fill(rng);
        for _ in 0..self.smoothing_steps {
            smooth_step(&mut grid);
        }
        grid
    }

    /// 随机填充阶段（行优先消耗随机数，强制边缘格不消耗）
    pub fn fill(&self, rng: &mut RandomSource) -> Grid<LandCell> {
        let thickness = self.border.thickness();
        Grid::from_fn(self.width, self.height, |x, y| {
            if is_forced_edge(x, y, self.width, self.height, thickness) {
                LandCell::Water
            } else if rng.chance(self.fill_percent, 100) {
                LandCell::Water
            } else {
                LandCell::Land
            }
        })
    }
}

/// 是否落在距任一边界 `thickness` 格以内
pub fn is_forced_edge(x: u32, y: u32, width: u32, height: u32, thickness: u32) -> bool {
    if thickness == 0 {
        return false;
    }
    x < thickness
        || y < thickness
        || x >= width.saturating_sub(thickness)
        || y >= height.saturating_sub(thickness)
}

/// 8 邻域中水的数量，越界邻居算水
pub fn water_neighbors(grid: &Grid<LandCell>, x: u32, y: u32) -> u32 {
    let mut count = 0;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            match grid.get_signed(x as i64 + dx, y as i64 + dy) {
                Some(LandCell::Land) => {}
                Some(LandCell::Water) | None => count += 1,
            }
        }
    }
    count
}

/// 多数规则，平局（恰好 4）保持原值
pub fn next_state(current: LandCell, water_neighbors: u32) -> LandCell {
    match water_neighbors.cmp(&TIE_COUNT) {
        std::cmp::Ordering::Greater => LandCell::Water,
        std::cmp::Ordering::Less => LandCell::Land,
        std::cmp::Ordering::Equal => current,
    }
}

/// 执行一轮平滑，返回本轮改变的格子数。
///
/// 读快照、写网格，按行并行（不消耗随机数，结果与串行一致）。
pub fn smooth_step(grid: &mut Grid<LandCell>) -> usize {
    if grid.is_empty() {
        return 0;
    }
    let snapshot = grid.clone();
    let w = grid.width() as usize;

    grid.data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .map(|(y, row)| {
            let mut changed = 0usize;
            for (x, cell) in row.iter_mut().enumerate() {
                let n = water_neighbors(&snapshot, x as u32, y as u32);
                let next = next_state(*cell, n);
                if next != *cell {
                    *cell = next;
                    changed += 1;
                }
            }
            changed
        })
        .sum()
}
