use crate::algorithms::composer::{compose, ground_counts};
use crate::core::cell::MapCell;

use super::step::{GenerationContext, GenerationStep};
use super::GenerationError;

/// 陆地网格 → 地貌网格，再依次叠加覆盖层，写入 `state.map`
pub struct ComposeStep;

impl GenerationStep for ComposeStep {
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let land = ctx
            .state
            .land
            .as_ref()
            .ok_or(GenerationError::MissingLayer {
                step: "compose",
                layer: "land",
            })?;

        let mut map = land.map(MapCell::from);
        ctx.report.overlays = compose(&mut map, &ctx.params.overlays, ctx.noise, ctx.rng);
        ctx.report.grounds = ground_counts(&map)
            .into_iter()
            .map(|(ground, count)| (ground.key().to_string(), count))
            .collect();

        ctx.state.map = Some(map);
        Ok(())
    }
}

/// 逐格向接收端报告合成后的地形类别（每格恰好一次，行优先）
pub struct EmitTilesStep;

impl GenerationStep for EmitTilesStep {
    fn execute(&self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        let map = ctx
            .state
            .map
            .as_ref()
            .ok_or(GenerationError::MissingLayer {
                step: "emit_tiles",
                layer: "map",
            })?;

        for (x, y, category) in map.iter() {
            ctx.sink.set_terrain_tile(x, y, category);
        }
        Ok(())
    }
}
