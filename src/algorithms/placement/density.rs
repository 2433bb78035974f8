//! 逐格密度放置。
//!
//! 行优先遍历所有 open 格，按声明顺序尝试目标地貌与该格一致的生成器，
//! 第一个判定成功的生成器放置装饰物并认领该格，该格随即结束。
//!
//! - 百分比模型：`next_int(0, units) < density`
//! - 噪声模型：该格噪声值 `< next_float(0, density_cap)`。每格每次重新抽取阈值，
//!   噪声值本身不变，密度因此随噪声起伏成簇。
//!
//! 成功后依次判定伴生链：每一环使用缩放后的阈值，前一环失败即停止。
//! 伴生装饰物只以不同的格内偏移上报，不另占格。

use serde::Serialize;

use crate::algorithms::noise_field::NoiseField;
use crate::core::cell::Plot;
use crate::core::grid::Grid;
use crate::core::prop::{DensityRule, PropGenerator};
use crate::core::random::RandomSource;
use crate::generation::sink::TileSink;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityStats {
    pub key: String,
    /// 噪声模型实际使用的频率
    pub frequency: Option<f64>,
    pub placed: u64,
    pub companions: u64,
}

/// 单次密度判定。`scale` 缩放阈值（主装饰物为 1.0）。
pub fn roll(rule: DensityRule, scale: f64, noise_value: Option<f32>, rng: &mut RandomSource) -> bool {
    match rule {
        DensityRule::Percent { density, units } => {
            let drawn = rng.next_int(0, units as i64) as f64;
            drawn < density as f64 * scale
        }
        DensityRule::Noise { density_cap, .. } => {
            let threshold = rng.next_float(0.0, density_cap) * scale;
            match noise_value {
                Some(value) => (value as f64) < threshold,
                None => false,
            }
        }
    }
}

/// 为每个噪声模型生成器预先生成独立的噪声场（按声明顺序消耗随机数）
pub fn noise_fields(
    generators: &[PropGenerator],
    width: u32,
    height: u32,
    noise: &NoiseField,
    rng: &mut RandomSource,
) -> Vec<Option<Grid<f32>>> {
    generators
        .iter()
        .map(|generator| match generator.rule {
            DensityRule::Noise { frequency, .. } => {
                Some(noise.generate(width, height, frequency, rng))
            }
            DensityRule::Percent { .. } => None,
        })
        .collect()
}

pub fn place_density_props(
    plots: &mut Grid<Plot>,
    generators: &[PropGenerator],
    noise: &NoiseField,
    rng: &mut RandomSource,
    sink: &mut dyn TileSink,
) -> Vec<DensityStats> {
    let fields = noise_fields(generators, plots.width(), plots.height(), noise, rng);
    let mut stats: Vec<DensityStats> = generators
        .iter()
        .map(|g| DensityStats {
            key: g.key.clone(),
            frequency: match g.rule {
                DensityRule::Noise { frequency, .. } => Some(frequency),
                DensityRule::Percent { .. } => None,
            },
            placed: 0,
            companions: 0,
        })
        .collect();

    for y in 0..plots.height() {
        for x in 0..plots.width() {
            let Some(Plot::Open(ground)) = plots.get(x, y) else {
                continue;
            };

            for (i, generator) in generators.iter().enumerate() {
                if generator.target != ground {
                    continue;
                }
                let noise_value = fields[i].as_ref().and_then(|f| f.get(x, y));
                if !roll(generator.rule, 1.0, noise_value, rng) {
                    continue;
                }

                sink.place_prop(x, y, generator.variants.pick(rng), generator.offset);
                stats[i].placed += 1;

                for companion in &generator.companions {
                    if !roll(generator.rule, companion.scale, noise_value, rng) {
                        break;
                    }
                    sink.place_prop(x, y, generator.variants.pick(rng), companion.offset);
                    stats[i].companions += 1;
                }

                plots.set(x, y, Plot::Claimed(ground));
                break;
            }
        }
    }

    for s in &stats {
        log::debug!("装饰物 {}: 放置 {} 个，伴生 {} 个", s.key, s.placed, s.companions);
    }
    stats
}
