use crate::algorithms::cellular::{smooth_step, CellularAutomaton};
use crate::core::cell::LandCell;

use super::step::{GenerationContext, GenerationStep};
use super::GenerationError;

/// 随机填充 + 平滑，写入 `state.land`
pub struct TerrainStep;

impl GenerationStep for TerrainStep {
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let params = ctx.params;
        let automaton = CellularAutomaton::from_terrain(params.width, params.height, &params.terrain);

        let mut land = automaton.fill(ctx.rng);
        ctx.report.smoothing_changes = (0..automaton.smoothing_steps)
            .map(|_| smooth_step(&mut land))
            .collect();

        ctx.report.water_cells = land.count(LandCell::is_water);
        ctx.report.land_cells = land.len() - ctx.report.water_cells;
        log::debug!(
            "平滑 {} 轮，各轮变化 {:?}",
            automaton.smoothing_steps,
            ctx.report.smoothing_changes
        );

        ctx.state.land = Some(land);
        Ok(())
    }
}
