use crate::algorithms::noise_field::NoiseField;
use crate::config::steps::StepMeta;
use crate::core::cell::{LandCell, MapCell, Plot};
use crate::core::grid::Grid;
use crate::core::params::GenerationParameters;
use crate::core::random::RandomSource;

use super::report::GenerationReport;
use super::sink::TileSink;
use super::GenerationError;

// ── State ────────────────────────────────────────────────

/// 生成过程中的共享状态（在步骤间传递）。
///
/// 每个阶段写入自己的网格，后续阶段只读取上一阶段的类型，不回读更早的阶段。
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    /// 元胞自动机输出
    pub land: Option<Grid<LandCell>>,
    /// 图层合成输出
    pub map: Option<Grid<MapCell>>,
    /// 放置阶段的占用网格
    pub plots: Option<Grid<Plot>>,
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ── Context ─────────────────────────────────────────────────

/// Everything a generation step needs to do its work.
pub struct GenerationContext<'a> {
    pub params: &'a GenerationParameters,
    /// 整轮生成唯一的随机源
    pub rng: &'a mut RandomSource,
    pub noise: &'a NoiseField,
    pub state: &'a mut GenerationState,
    pub sink: &'a mut dyn TileSink,
    pub report: &'a mut GenerationReport,
}

// ── Step trait ───────────────────────────────────────────────

/// Trait that every generation step must implement.
///
/// # How to add a new step
///
/// 1. Implement this trait on a struct in `src/generation/`
/// 2. Add its metadata to `assets/steps.json`
/// 3. Wire the id up in [`super::build_default_pipeline()`]
pub trait GenerationStep {
    /// Execute the step, reading and writing `ctx.state`.
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError>;
}

/// 管线中的一个步骤 = 元数据 + 执行逻辑
pub struct PipelineStep {
    pub meta: StepMeta,
    pub step: Box<dyn GenerationStep>,
}
