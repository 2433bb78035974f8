//! # 随机源
//!
//! 一次生成只持有一个 [`RandomSource`]，并显式传给每个阶段。
//! 同一 seed 构造的两个实例产生完全相同的序列。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 带种子的均匀随机源
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `[low, high)` 内的均匀整数。
    ///
    /// 空区间（`low >= high`）不消耗随机数，直接返回 `low`；不会交换上下界。
    pub fn next_int(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    /// `[low, high)` 内的均匀浮点数，空区间规则同 [`RandomSource::next_int`]
    pub fn next_float(&mut self, low: f64, high: f64) -> f64 {
        if !(low < high) {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    /// 百分比判定：抽取 `[0, units)` 的整数，严格小于 `threshold` 即成功。
    ///
    /// `threshold == 0` 永不成功；`threshold >= units` 永远成功。
    pub fn chance(&mut self, threshold: u32, units: u32) -> bool {
        (self.next_int(0, units as i64)) < threshold as i64
    }

    /// 按权重选择下标；权重全为 0 或列表为空时返回 `None`
    pub fn pick_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.next_int(0, total as i64) as u64;
        for (i, &w) in weights.iter().enumerate() {
            if roll < w as u64 {
                return Some(i);
            }
            roll -= w as u64;
        }
        None
    }
}

/// 解析本次生成使用的种子。
///
/// `use_random_seed` 时从进程级熵源抽取一次，之后整轮生成都使用这个具体值，
/// 日志和报告里记录的也是它。
pub fn resolve_seed(seed: u64, use_random_seed: bool) -> u64 {
    if use_random_seed {
        rand::thread_rng().gen_range(0..RANDOM_SEED_LIMIT)
    } else {
        seed
    }
}

/// 随机种子的上限（保持在便于手抄复现的范围内）
pub const RANDOM_SEED_LIMIT: u64 = 1 << 32;

/// 从主种子派生用途独立的子种子
pub fn derive_seed(master: u64, salt: u64) -> u64 {
    master
        .wrapping_add(salt)
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomSource::from_seed(7);
        let mut b = RandomSource::from_seed(7);
        for _ in 0..64 {
            assert_eq!(a.next_int(0, 100), b.next_int(0, 100));
            assert_eq!(a.next_float(0.0, 1.0), b.next_float(0.0, 1.0));
        }
    }

    #[test]
    fn empty_range_returns_low_without_inverting() {
        let mut rng = RandomSource::from_seed(1);
        assert_eq!(rng.next_int(5, 5), 5);
        assert_eq!(rng.next_int(9, 3), 9);
        assert_eq!(rng.next_float(0.0, 0.0), 0.0);
        assert_eq!(rng.next_float(2.0, 1.0), 2.0);
    }

    #[test]
    fn ranges_are_half_open() {
        let mut rng = RandomSource::from_seed(99);
        for _ in 0..1000 {
            let v = rng.next_int(0, 3);
            assert!((0..3).contains(&v));
            let f = rng.next_float(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&f));
        }
    }

    #[test]
    fn chance_boundaries() {
        let mut rng = RandomSource::from_seed(3);
        assert!((0..1000).all(|_| !rng.chance(0, 100)));
        assert!((0..1000).all(|_| rng.chance(100, 100)));
        assert!((0..1000).all(|_| rng.chance(1000, 1000)));
    }

    #[test]
    fn pick_weighted_skips_zero_weights() {
        let mut rng = RandomSource::from_seed(11);
        for _ in 0..200 {
            assert_eq!(rng.pick_weighted(&[0, 5, 0]), Some(1));
        }
        assert_eq!(rng.pick_weighted(&[]), None);
        assert_eq!(rng.pick_weighted(&[0, 0]), None);
    }

    #[test]
    fn fixed_seed_is_kept() {
        assert_eq!(resolve_seed(42, false), 42);
        assert!(resolve_seed(42, true) < RANDOM_SEED_LIMIT);
    }

    #[test]
    fn derived_seeds_differ_by_salt() {
        assert_ne!(derive_seed(1, 0), derive_seed(1, 1));
        assert_eq!(derive_seed(5, 2), derive_seed(5, 2));
    }
}
