//! # 生成报告
//!
//! 一次生成的可观测结果。只包含由种子决定的数据（不含耗时），
//! 同一配置两次运行的报告完全相等。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::algorithms::composer::OverlayStats;
use crate::algorithms::placement::{DensityStats, StructureStats};
use crate::core::params::GenerationParameters;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// 已解析的具体种子
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub land_cells: usize,
    pub water_cells: usize,
    /// 每轮平滑改变的格子数
    pub smoothing_changes: Vec<usize>,
    /// 合成后各地貌的格子数
    pub grounds: BTreeMap<String, usize>,
    pub overlays: Vec<OverlayStats>,
    pub structures: Vec<StructureStats>,
    pub props: Vec<DensityStats>,
}

impl GenerationReport {
    pub fn new(params: &GenerationParameters) -> Self {
        Self {
            seed: params.seed,
            width: params.width,
            height: params.height,
            land_cells: 0,
            water_cells: 0,
            smoothing_changes: Vec::new(),
            grounds: BTreeMap::new(),
            overlays: Vec::new(),
            structures: Vec::new(),
            props: Vec::new(),
        }
    }

    pub fn land_ratio(&self) -> f64 {
        let total = self.land_cells + self.water_cells;
        if total == 0 {
            return 0.0;
        }
        self.land_cells as f64 / total as f64
    }

    /// 所有装饰物事件数（含大型装饰物与伴生装饰物）
    pub fn total_props(&self) -> u64 {
        let structures: u64 = self.structures.iter().map(|s| s.placed as u64).sum();
        let density: u64 = self.props.iter().map(|p| p.placed + p.companions).sum();
        structures + density
    }

    /// 未放满的大型装饰物
    pub fn shortfalls(&self) -> impl Iterator<Item = &StructureStats> {
        self.structures.iter().filter(|s| s.placed < s.requested)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 输出一行摘要日志
    pub fn log_summary(&self) {
        log::info!(
            "生成完成: seed={} {}x{} 陆地 {:.1}% 装饰物 {} 个",
            self.seed,
            self.width,
            self.height,
            self.land_ratio() * 100.0,
            self.total_props()
        );
        for s in self.shortfalls() {
            log::info!("  {}: 请求 {} 个，放置 {} 个", s.key, s.requested, s.placed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> GenerationReport {
        GenerationReport {
            seed: 1,
            width: 2,
            height: 2,
            land_cells: 0,
            water_cells: 0,
            smoothing_changes: Vec::new(),
            grounds: BTreeMap::new(),
            overlays: Vec::new(),
            structures: Vec::new(),
            props: Vec::new(),
        }
    }

    #[test]
    fn ratio_and_totals() {
        let mut report = empty();
        assert_eq!(report.land_ratio(), 0.0);
        report.land_cells = 3;
        report.water_cells = 1;
        assert_eq!(report.land_ratio(), 0.75);

        report.structures.push(StructureStats {
            key: "ruin".to_string(),
            requested: 3,
            placed: 1,
            attempts: 40,
        });
        report.props.push(DensityStats {
            key: "tree".to_string(),
            frequency: Some(0.05),
            placed: 5,
            companions: 2,
        });
        assert_eq!(report.total_props(), 8);
        assert_eq!(report.shortfalls().count(), 1);
    }
}
