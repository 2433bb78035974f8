use std::time::Instant;

use crate::config::steps::StepMeta;

use super::step::{GenerationContext, GenerationStep, PipelineStep};
use super::GenerationError;

/// Manages an ordered list of generation steps.
///
/// All steps share the context's single `RandomSource`, so running them
/// in order from a fresh context always reproduces the same map.
pub struct GenerationPipeline {
    steps: Vec<PipelineStep>,
    /// Number of steps already executed (0 = none).
    executed: usize,
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationPipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            executed: 0,
        }
    }

    /// Append a step to the pipeline.
    pub fn register(&mut self, meta: StepMeta, step: Box<dyn GenerationStep>) {
        self.steps.push(PipelineStep { meta, step });
    }

    // ── accessors ───────────────────────────────────────────

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_complete(&self) -> bool {
        self.executed >= self.steps.len()
    }

    // ── stepping ────────────────────────────────────────────

    /// Execute the next pending step.
    ///
    /// Returns `Ok(true)` if a step ran, `Ok(false)` if all
    /// steps are already complete, or `Err` on failure.
    pub fn step_forward(&mut self, ctx: &mut GenerationContext) -> Result<bool, GenerationError> {
        let Some(current) = self.steps.get(self.executed) else {
            return Ok(false);
        };

        let start = Instant::now();
        current.step.execute(ctx)?;
        log::info!(
            "[{}/{}] {} 完成 ({:.1} ms)",
            self.executed + 1,
            self.steps.len(),
            current.meta.name,
            start.elapsed().as_secs_f64() * 1000.0
        );

        self.executed += 1;
        Ok(true)
    }

    /// Run every remaining step at once.
    pub fn run_all(&mut self, ctx: &mut GenerationContext) -> Result<(), GenerationError> {
        while self.step_forward(ctx)? {}
        Ok(())
    }
}
