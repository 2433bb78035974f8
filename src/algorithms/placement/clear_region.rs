//! 大型装饰物：空旷区域搜索。
//!
//! 每个实例最多尝试 `max_attempts` 次：随机抽取候选格，候选格本身必须 open，
//! 且半径 r 的方形邻域内（不含中心）被占格数为 0。越界邻居算被占，
//! 因此离边界不足 r 的格子永远不会被选中。接受后整个窗口被认领。
//!
//! 尝试次数耗尽只意味着少放一个，不是错误。

use serde::Serialize;

use crate::core::cell::Plot;
use crate::core::grid::Grid;
use crate::core::prop::StructureDefinition;
use crate::core::random::RandomSource;
use crate::generation::sink::TileSink;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureStats {
    pub key: String,
    pub requested: u32,
    pub placed: u32,
    /// 所有实例累计消耗的尝试次数
    pub attempts: u64,
}

/// 邻域内被占的格子数（越界、水、已认领都算），不含中心格
pub fn blocked_neighbors(plots: &Grid<Plot>, x: u32, y: u32, radius: u32) -> u64 {
    let window = plots.window(x, y, radius);
    let mut count = window.clipped();
    for (nx, ny) in window.cells() {
        if nx == x && ny == y {
            continue;
        }
        if plots.get(nx, ny).is_none_or(Plot::is_blocked) {
            count += 1;
        }
    }
    count
}

/// 认领 (x, y) 为中心的整个窗口，返回新认领的格子数
pub fn claim_window(plots: &mut Grid<Plot>, x: u32, y: u32, radius: u32) -> usize {
    let window = plots.window(x, y, radius);
    let mut claimed = 0;
    for (nx, ny) in window.cells() {
        match plots.get(nx, ny) {
            Some(plot) if plot.is_open() => {
                plots.set(nx, ny, plot.claim());
                claimed += 1;
            }
            _ => {}
        }
    }
    claimed
}

/// 候选格是否可接受
fn is_isolated(plots: &Grid<Plot>, x: u32, y: u32, radius: u32) -> bool {
    plots.get(x, y).is_some_and(Plot::is_open) && blocked_neighbors(plots, x, y, radius) == 0
}

/// 为单个实例搜索空旷区域，返回 (位置, 消耗的尝试次数)
pub fn search_clear_region(
    plots: &Grid<Plot>,
    radius: u32,
    max_attempts: u64,
    rng: &mut RandomSource,
) -> (Option<(u32, u32)>, u64) {
    let (width, height) = (plots.width() as i64, plots.height() as i64);
    for attempt in 1..=max_attempts {
        let x = rng.next_int(0, width) as u32;
        let y = rng.next_int(0, height) as u32;
        if is_isolated(plots, x, y, radius) {
            return (Some((x, y)), attempt);
        }
    }
    (None, max_attempts)
}

/// 按声明顺序放置全部大型装饰物
pub fn place_structures(
    plots: &mut Grid<Plot>,
    structures: &[StructureDefinition],
    rng: &mut RandomSource,
    sink: &mut dyn TileSink,
) -> Vec<StructureStats> {
    structures
        .iter()
        .map(|def| {
            let mut stats = StructureStats {
                key: def.key.clone(),
                requested: def.count,
                placed: 0,
                attempts: 0,
            };

            for _ in 0..def.count {
                let (found, used) = search_clear_region(plots, def.radius, def.max_attempts, rng);
                stats.attempts += used;
                let Some((x, y)) = found else {
                    continue;
                };
                let variant = def.variants.pick(rng);
                sink.place_prop(x, y, variant, def.offset);
                claim_window(plots, x, y, def.radius);
                stats.placed += 1;
            }

            if stats.placed < stats.requested {
                log::debug!(
                    "大型装饰物 {}: 请求 {} 个，仅放置 {} 个（{} 次尝试）",
                    stats.key,
                    stats.requested,
                    stats.placed,
                    stats.attempts
                );
            }
            stats
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::generation::{StructureConfig, VariantConfig};
    use crate::core::cell::Ground;
    use crate::core::prop::build_structures;
    use crate::generation::sink::RecordingSink;

    const OPEN: Plot = Plot::Open(Ground::Clear);

    fn structure(radius: u32, count: u32, max_attempts: Option<u64>, w: u32, h: u32) -> StructureDefinition {
        let config = StructureConfig {
            key: "ruin".to_string(),
            neighborhood: radius,
            count,
            max_attempts,
            variants: vec![VariantConfig {
                id: "stone_ruin".to_string(),
                weight: 1,
            }],
            offset: [0.5, 0.5],
            enabled: true,
        };
        build_structures(&[config], w, h).unwrap().remove(0)
    }

    #[test]
    fn out_of_bounds_counts_as_blocked() {
        let plots = Grid::new_filled(5, 5, OPEN);
        assert_eq!(blocked_neighbors(&plots, 2, 2, 1), 0);
        assert_eq!(blocked_neighbors(&plots, 0, 0, 1), 5);
        assert_eq!(blocked_neighbors(&plots, 2, 0, 1), 3);
        assert_eq!(blocked_neighbors(&plots, 2, 2, 3), 49 - 25);
    }

    #[test]
    fn claimed_and_water_neighbors_block() {
        let mut plots = Grid::new_filled(5, 5, OPEN);
        plots.set(1, 1, Plot::Water);
        plots.set(3, 2, Plot::Claimed(Ground::Grove));
        assert_eq!(blocked_neighbors(&plots, 2, 2, 1), 2);
        // 中心格本身不计入
        assert_eq!(blocked_neighbors(&plots, 1, 1, 1), 0);
        assert!(!is_isolated(&plots, 1, 1, 1));
    }

    #[test]
    fn window_on_non_square_grid_walks_each_axis_by_its_own_bound() {
        // 宽 7 高 3：窗口沿 x 不应被高度截断
        let mut plots = Grid::new_filled(7, 3, OPEN);
        let claimed = claim_window(&mut plots, 5, 1, 1);
        assert_eq!(claimed, 9);
        for (x, y, plot) in plots.iter() {
            let inside = (4..=6).contains(&x) && y <= 2;
            assert_eq!(plot.is_blocked(), inside, "({x},{y})");
        }
    }

    #[test]
    fn placement_claims_whole_window_and_excludes_it() {
        let mut plots = Grid::new_filled(9, 9, OPEN);
        let def = structure(1, 6, None, 9, 9);
        let mut rng = RandomSource::from_seed(11);
        let mut sink = RecordingSink::new();

        let stats = place_structures(&mut plots, std::slice::from_ref(&def), &mut rng, &mut sink);
        let placed: Vec<_> = sink.prop_events().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(placed.len() as u32, stats[0].placed);
        assert!(stats[0].placed >= 1);

        for &(px, py) in &placed {
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let cell = plots.get_signed(px as i64 + dx, py as i64 + dy);
                    assert!(matches!(cell, Some(Plot::Claimed(_))));
                }
            }
        }
        // 任意两个实例的中心都不在对方窗口内
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(a.0.abs_diff(b.0) > 1 || a.1.abs_diff(b.1) > 1, "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn saturated_grid_terminates_with_zero_placements() {
        let mut plots = Grid::new_filled(6, 6, Plot::Claimed(Ground::Clear));
        let def = structure(1, 3, Some(50), 6, 6);
        let mut rng = RandomSource::from_seed(2);
        let mut sink = RecordingSink::new();

        let stats = place_structures(&mut plots, &[def], &mut rng, &mut sink);
        assert_eq!(stats[0].placed, 0);
        assert_eq!(stats[0].requested, 3);
        assert_eq!(stats[0].attempts, 150);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn default_attempt_bound_is_cell_count() {
        let plots = Grid::new_filled(4, 5, Plot::Water);
        let def = structure(0, 1, None, 4, 5);
        let (found, used) =
            search_clear_region(&plots, def.radius, def.max_attempts, &mut RandomSource::from_seed(0));
        assert_eq!(found, None);
        assert_eq!(used, 20);
    }

    #[test]
    fn radius_zero_needs_only_an_open_center() {
        let mut plots = Grid::new_filled(3, 3, Plot::Water);
        plots.set(1, 1, OPEN);
        let (found, _) = search_clear_region(&plots, 0, 10_000, &mut RandomSource::from_seed(9));
        assert_eq!(found, Some((1, 1)));
    }
}
