//! # 连续噪声场
//!
//! 每格采样 `perlin(x * frequency + x_offset, y * frequency + y_offset)` 并映射到 [0, 1]。
//! 偏移量每次调用从 ±[`OFFSET_RANGE`] 内重新抽取，同一频率的两次生成因此互不相关，
//! 也不会在原点附近重复出现相同的纹理。

use noise::{NoiseFn, Perlin};
use rayon::prelude::*;

use crate::core::grid::Grid;
use crate::core::random::RandomSource;

/// 域偏移的抽取范围
pub const OFFSET_RANGE: f64 = 10_000.0;

/// 噪声函数本身固定，差异完全来自偏移量
const PERLIN_SEED: u32 = 0;

/// 柏林噪声场生成器（无内部可变状态，可跨线程共享）
#[derive(Debug, Clone)]
pub struct NoiseField {
    perlin: Perlin,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseField {
    pub fn new() -> Self {
        Self {
            perlin: Perlin::new(PERLIN_SEED),
        }
    }

    /// 在连续坐标处采样，返回 [0, 1]
    pub fn sample(&self, x: f64, y: f64) -> f32 {
        let v = self.perlin.get([x, y]);
        ((v + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }

    /// 生成 W×H 的噪声场。
    ///
    /// 先从 `rng` 抽取 x、y 偏移各一次，之后按行并行采样，不再消耗随机数。
    pub fn generate(
        &self,
        width: u32,
        height: u32,
        frequency: f64,
        rng: &mut RandomSource,
    ) -> Grid<f32> {
        let x_offset = rng.next_float(-OFFSET_RANGE, OFFSET_RANGE);
        let y_offset = rng.next_float(-OFFSET_RANGE, OFFSET_RANGE);
        self.generate_at(width, height, frequency, (x_offset, y_offset))
    }

    /// 使用给定偏移生成噪声场
    pub fn generate_at(
        &self,
        width: u32,
        height: u32,
        frequency: f64,
        (x_offset, y_offset): (f64, f64),
    ) -> Grid<f32> {
        let mut field = Grid::new_filled(width, height, 0.0f32);
        if field.is_empty() {
            return field;
        }

        let w = width as usize;
        field
            .data_mut()
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                let sy = y as f64 * frequency + y_offset;
                for (x, value) in row.iter_mut().enumerate() {
                    *value = self.sample(x as f64 * frequency + x_offset, sy);
                }
            });

        field
    }
}

/// 将噪声场二值化：值 >= `threshold` 为 `true`（0.5 即四舍五入取整）
pub fn threshold_mask(field: &Grid<f32>, threshold: f64) -> Grid<bool> {
    field.map(|v| v as f64 >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_normalized() {
        let noise = NoiseField::new();
        let mut rng = RandomSource::from_seed(8);
        let field = noise.generate(64, 48, 0.25, &mut rng);
        assert!(field.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn same_rng_state_same_field() {
        let noise = NoiseField::new();
        let a = noise.generate(32, 32, 0.05, &mut RandomSource::from_seed(4));
        let b = noise.generate(32, 32, 0.05, &mut RandomSource::from_seed(4));
        assert_eq!(a, b);
    }

    #[test]
    fn successive_fields_are_offset() {
        // 同一频率连续生成两次，偏移不同，纹理不同
        let noise = NoiseField::new();
        let mut rng = RandomSource::from_seed(4);
        let a = noise.generate(32, 32, 0.05, &mut rng);
        let b = noise.generate(32, 32, 0.05, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn low_frequency_is_spatially_coherent() {
        let noise = NoiseField::new();
        let field = noise.generate_at(40, 40, 0.01, (123.4, -567.8));
        for (x, y, v) in field.iter() {
            if let Some(right) = field.get(x + 1, y) {
                assert!((v - right).abs() < 0.05, "({x},{y})");
            }
            if let Some(down) = field.get(x, y + 1) {
                assert!((v - down).abs() < 0.05, "({x},{y})");
            }
        }
    }

    #[test]
    fn threshold_mask_splits_at_threshold() {
        let field = Grid::from_fn(4, 1, |x, _| x as f32 * 0.25);
        let mask = threshold_mask(&field, 0.5);
        assert_eq!(mask.data(), &[false, false, true, true]);
    }
}
