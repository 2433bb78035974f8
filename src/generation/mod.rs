pub mod compose;
pub mod pipeline;
pub mod placement;
pub mod report;
pub mod sink;
pub mod step;
pub mod terrain;

use thiserror::Error;

use crate::algorithms::noise_field::NoiseField;
use crate::config::generation::GenerationConfig;
use crate::config::steps::{load_steps_config, StepMeta};
use crate::config::ConfigError;
use crate::core::cell::{MapCell, Plot};
use crate::core::grid::Grid;
use crate::core::params::GenerationParameters;
use crate::core::random::RandomSource;

pub use pipeline::GenerationPipeline;
pub use report::GenerationReport;
pub use sink::{NullSink, RecordingSink, SinkEvent, TeeSink, TileSink};
pub use step::{GenerationContext, GenerationState, GenerationStep};

use self::compose::{ComposeStep, EmitTilesStep};
use self::placement::{DensityPropStep, StructureStep};
use self::terrain::TerrainStep;

/// 管线内部错误：某个步骤需要的网格尚未由前面的步骤生成。
///
/// 只会在手工组装的管线里出现，默认管线的顺序保证不会触发。
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("步骤 {step} 需要的 {layer} 网格尚未生成")]
    MissingLayer {
        step: &'static str,
        layer: &'static str,
    },
}

/// Build the default generation pipeline.
///
/// Reads step metadata from `assets/steps.json`,
/// then wires up the concrete step implementations.
pub fn build_default_pipeline() -> Result<GenerationPipeline, ConfigError> {
    let steps_config = load_steps_config()?;
    let mut pipeline = GenerationPipeline::new();

    for meta in steps_config.steps {
        let step = build_step(&meta)?;
        pipeline.register(meta, step);
    }

    Ok(pipeline)
}

fn build_step(meta: &StepMeta) -> Result<Box<dyn GenerationStep>, ConfigError> {
    let step: Box<dyn GenerationStep> = match meta.id.as_str() {
        "terrain" => Box::new(TerrainStep),
        "compose" => Box::new(ComposeStep),
        "emit_tiles" => Box::new(EmitTilesStep),
        "structures" => Box::new(StructureStep),
        "density_props" => Box::new(DensityPropStep),
        other => {
            return Err(ConfigError::UnknownStep {
                id: other.to_string(),
            });
        }
    };
    Ok(step)
}

/// 一次生成的完整结果
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// 已解析的具体种子
    pub seed: u64,
    /// 最终的地貌 + 占用网格
    pub plots: Grid<Plot>,
    pub report: GenerationReport,
}

impl GenerationOutcome {
    /// 分类后的地形网格（去掉占用信息）
    pub fn terrain(&self) -> Grid<MapCell> {
        self.plots.map(Plot::terrain)
    }
}

/// 生成入口：校验配置、解析种子，然后同步跑完整条管线。
///
/// 配置错误在任何网格计算之前返回。
pub fn generate(
    config: &GenerationConfig,
    sink: &mut dyn TileSink,
) -> Result<GenerationOutcome, crate::Error> {
    let params = config.resolve()?;
    generate_with_params(&params, sink)
}

/// 使用已解析的参数生成
pub fn generate_with_params(
    params: &GenerationParameters,
    sink: &mut dyn TileSink,
) -> Result<GenerationOutcome, crate::Error> {
    log::info!("开始生成: seed={} 尺寸 {}x{}", params.seed, params.width, params.height);

    let mut pipeline = build_default_pipeline()?;
    let mut rng = RandomSource::from_seed(params.seed);
    let noise = NoiseField::new();
    let mut state = GenerationState::new();
    let mut report = GenerationReport::new(params);

    let mut ctx = GenerationContext {
        params,
        rng: &mut rng,
        noise: &noise,
        state: &mut state,
        sink,
        report: &mut report,
    };
    pipeline.run_all(&mut ctx)?;

    // 没有任何放置步骤时占用网格直接来自合成结果
    let plots = match (state.plots, state.map) {
        (Some(plots), _) => plots,
        (None, Some(map)) => map.map(Plot::from),
        (None, None) => {
            return Err(GenerationError::MissingLayer {
                step: "generate",
                layer: "map",
            }
            .into());
        }
    };

    report.log_summary();
    Ok(GenerationOutcome {
        seed: params.seed,
        plots,
        report,
    })
}
