//! # 图层合成
//!
//! 把若干二值覆盖层按声明顺序叠加到地形上。每一层只改写恰好处于
//! `rule.open` 状态的陆地格：覆盖层 0 → `rule.clear`，1 → `rule.claimed`。
//! 水格、以及已被前一层认领为其它地貌的格子原样保留。

use serde::Serialize;

use crate::algorithms::noise_field::{threshold_mask, NoiseField};
use crate::core::cell::{Ground, MapCell};
use crate::core::grid::Grid;
use crate::core::layer::{LayerSource, OverlayLayer, OverlayRule};
use crate::core::random::RandomSource;

/// 单个覆盖层的合成统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStats {
    pub key: String,
    /// 噪声层实际使用的频率；百分比层为 `None`
    pub frequency: Option<f64>,
    /// 合成前处于 open 状态、本层参与改写的格子数
    pub eligible: usize,
    /// 改写为 claimed 的格子数
    pub claimed: usize,
}

/// 将 `overlay` 合成到 `base`，返回被认领（改写为 `claimed`）的格子数
pub fn combine(base: &mut Grid<MapCell>, overlay: &Grid<bool>, rule: OverlayRule) -> usize {
    debug_assert_eq!(base.width(), overlay.width());
    debug_assert_eq!(base.height(), overlay.height());

    let open = MapCell::Land(rule.open);
    let mut claimed = 0;
    for (cell, &flag) in base.data_mut().iter_mut().zip(overlay.data()) {
        if *cell != open {
            continue;
        }
        *cell = if flag {
            claimed += 1;
            MapCell::Land(rule.claimed)
        } else {
            MapCell::Land(rule.clear)
        };
    }
    claimed
}

/// 百分比覆盖层：行优先逐格 `next_int(0,100) < percent`
pub fn percent_mask(width: u32, height: u32, percent: u32, rng: &mut RandomSource) -> Grid<bool> {
    Grid::from_fn(width, height, |_, _| rng.chance(percent, 100))
}

/// 按来源生成一张二值覆盖层
pub fn build_mask(
    source: LayerSource,
    width: u32,
    height: u32,
    noise: &NoiseField,
    rng: &mut RandomSource,
) -> Grid<bool> {
    match source {
        LayerSource::Noise {
            frequency,
            threshold,
        } => threshold_mask(&noise.generate(width, height, frequency, rng), threshold),
        LayerSource::Percent { percent } => percent_mask(width, height, percent, rng),
    }
}

/// 依次合成全部覆盖层
pub fn compose(
    base: &mut Grid<MapCell>,
    layers: &[OverlayLayer],
    noise: &NoiseField,
    rng: &mut RandomSource,
) -> Vec<OverlayStats> {
    let (width, height) = (base.width(), base.height());

    layers
        .iter()
        .map(|layer| {
            let mask = build_mask(layer.source, width, height, noise, rng);
            let eligible = base.count(|c| c == MapCell::Land(layer.rule.open));
            let claimed = combine(base, &mask, layer.rule);
            log::debug!(
                "覆盖层 {}: {} 格可用, {} 格认领为 {}",
                layer.key,
                eligible,
                claimed,
                layer.rule.claimed.key()
            );
            OverlayStats {
                key: layer.key.clone(),
                frequency: match layer.source {
                    LayerSource::Noise { frequency, .. } => Some(frequency),
                    LayerSource::Percent { .. } => None,
                },
                eligible,
                claimed,
            }
        })
        .collect()
}

/// 每种地貌的格子数（报告用）
pub fn ground_counts(map: &Grid<MapCell>) -> [(Ground, usize); 3] {
    [Ground::Clear, Ground::Grove, Ground::Meadow].map(|g| (g, map.count(|c| c == MapCell::Land(g))))
}
