use crate::algorithms::placement::{place_density_props, place_structures, plots_from_map};
use crate::core::cell::Plot;
use crate::core::grid::Grid;

use super::step::{GenerationContext, GenerationState, GenerationStep};
use super::GenerationError;

/// 取出占用网格，首次访问时由地貌网格初始化
fn plots_mut<'s>(
    state: &'s mut GenerationState,
    step: &'static str,
) -> Result<&'s mut Grid<Plot>, GenerationError> {
    if state.plots.is_none() {
        let map = state
            .map
            .as_ref()
            .ok_or(GenerationError::MissingLayer { step, layer: "map" })?;
        state.plots = Some(plots_from_map(map));
    }
    state
        .plots
        .as_mut()
        .ok_or(GenerationError::MissingLayer { step, layer: "plots" })
}

/// 大型装饰物（空旷区域搜索）
pub struct StructureStep;

impl GenerationStep for StructureStep {
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let plots = plots_mut(ctx.state, "structures")?;
        ctx.report.structures = place_structures(plots, &ctx.params.structures, ctx.rng, ctx.sink);
        Ok(())
    }
}

/// 逐格密度装饰物
pub struct DensityPropStep;

impl GenerationStep for DensityPropStep {
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let plots = plots_mut(ctx.state, "density_props")?;
        ctx.report.props = place_density_props(plots, &ctx.params.props, ctx.noise, ctx.rng, ctx.sink);
        Ok(())
    }
}
