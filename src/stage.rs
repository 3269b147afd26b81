/// Stage: the backdrop and the population caretaker
///
/// Draws the background and, every tick, asks its generator to top the fish
/// school back up to quota. The stage is pushed first, so new fish spawned
/// here are already in place before anything else ticks next frame.
use crate::generator::FishGenerator;
use crate::scene::{DrawCtx, Entity, TickContext, Vitals};

pub struct Stage {
    vitals: Vitals,
    generator: FishGenerator,
}

impl Stage {
    pub fn new(generator: FishGenerator) -> Self {
        Stage {
            vitals: Vitals::new(),
            generator,
        }
    }
}

impl Entity for Stage {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.generator.top_up(ctx);
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        let texture = ctx.assets.image(ctx.sprite)?;
        // Fill the whole logical view
        ctx.canvas.copy(texture, None, None)
    }
}
