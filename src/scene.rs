/// Scene scheduler: entity lifecycle, depth-sorted drawing, pointer routing
///
/// The scene owns every simulated object and runs the per-frame pipeline in a
/// fixed order:
///
/// 1. **Animate**: advance cosmetic tweens/frames for every live entity.
/// 2. **Logic**: tick every live entity registered for ticking. Ticks may move
///    the entity, flip its dead flag, or enqueue spawns; spawns are pushed
///    after the tick loop so survivors keep their relative order and new
///    entities append behind them.
/// 3. **Draw**: when the draw order is stale, stable-sort the render records —
///    visible before dead, then zIndex ascending — then draw front-to-back,
///    stopping at the first dead record (the sort keeps them contiguous at the
///    end) and dropping them from the list.
///
/// # Architecture
///
/// - `Entity` trait: the capability set (animate / tick / draw / pointer
///   actions), no inheritance hierarchy. Every entity exposes a shared
///   `Vitals` handle; death is a flag on it, never an error.
/// - `Spirit`: the scene-owned render record pairing an entity with its image
///   name and zIndex, so draw order can change without touching the entity.
/// - Dead-flag side effects are polled: once per phase the scene compares each
///   spirit's flag against the last observed value, marks the draw order
///   stale on an edge and fires the owner's one-shot notification.
/// - Pointer events are routed through regions registered once at attach
///   time; within an entity the first containing region wins, and entities
///   are scanned in registration order.
///
/// Everything runs on one thread; `Rc`/`Cell` sharing is deliberate and safe
/// because pointer events and frames are never delivered concurrently.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::assets::Assets;
use crate::geometry::{OrientedRect, Vec2};

/// Shared liveness handle. The entity keeps one clone, its `Spirit` keeps
/// another; killing is idempotent and there is no way back.
#[derive(Clone, Default)]
pub struct Vitals {
    state: Rc<VitalsState>,
}

#[derive(Default)]
struct VitalsState {
    dead: Cell<bool>,
    hidden: Cell<bool>,
}

impl Vitals {
    pub fn new() -> Self {
        Vitals::default()
    }

    pub fn kill(&self) {
        self.state.dead.set(true);
    }

    pub fn is_dead(&self) -> bool {
        self.state.dead.get()
    }

    /// Hidden entities keep simulating but are skipped by the draw phase.
    pub fn set_hidden(&self, hidden: bool) {
        self.state.hidden.set(hidden);
    }

    pub fn is_hidden(&self) -> bool {
        self.state.hidden.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Click,
}

#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Vec2,
}

/// One hit region and the entity-defined action fired when the pointer lands
/// in it. The region is purely for containment testing and is independent of
/// the entity's collision shape (the cannon aims with a full-stage region).
#[derive(Debug, Clone)]
pub struct PointerBinding {
    pub region: OrientedRect,
    pub action: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PointerMap {
    pub moves: Vec<PointerBinding>,
    pub clicks: Vec<PointerBinding>,
}

/// A spawn queued from inside a tick or pointer handler; applied by the scene
/// once the current dispatch loop ends.
pub struct SpawnRequest {
    asset: String,
    entity: Box<dyn Entity>,
    z_index: i32,
    on_death: Option<Box<dyn FnMut()>>,
}

impl SpawnRequest {
    pub fn new(asset: &str, entity: Box<dyn Entity>, z_index: i32) -> Self {
        SpawnRequest {
            asset: asset.to_string(),
            entity,
            z_index,
            on_death: None,
        }
    }

    /// Owner notification fired once when the spawned entity dies.
    pub fn on_death(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_death = Some(Box::new(callback));
        self
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }
}

/// The narrow view of the scene handed to tick and pointer handlers.
pub struct TickContext<'a> {
    spawns: &'a mut Vec<SpawnRequest>,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(spawns: &'a mut Vec<SpawnRequest>) -> Self {
        TickContext { spawns }
    }

    pub fn spawn(&mut self, request: SpawnRequest) {
        self.spawns.push(request);
    }
}

/// Rendering context handed to `Entity::draw`. `sprite` is the image name the
/// entity was pushed with.
pub struct DrawCtx<'a, 'tc> {
    pub canvas: &'a mut Canvas<Window>,
    pub assets: &'a Assets<'tc>,
    pub sprite: &'a str,
    pub debug_shapes: bool,
}

/// The capability set every simulated object implements. All methods except
/// `draw` and `vitals` are optional; the scene only calls what an entity
/// declares interest in (`ticks`, registered pointer regions).
pub trait Entity {
    /// The entity's shared liveness handle.
    fn vitals(&self) -> &Vitals;

    /// Whether this entity joins the per-frame tick list. Queried once at
    /// push time.
    fn ticks(&self) -> bool {
        true
    }

    /// Cosmetic animation step; runs for every live entity before any tick.
    fn animate(&mut self) {}

    /// One simulation step with scene access for spawning.
    fn tick(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Fired when the pointer lands in one of the entity's registered
    /// regions; `action` is the id the entity put in the binding.
    fn pointer(&mut self, _action: u32, _event: PointerEvent, _ctx: &mut TickContext<'_>) {}

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String>;
}

pub type SpiritRef = Rc<Spirit>;

/// Scene membership record: one per pushed entity, owned exclusively by the
/// scene. Holds the draw-side state (image name, zIndex, last observed dead
/// flag) so resorting never has to touch the entity itself.
pub struct Spirit {
    entity: RefCell<Box<dyn Entity>>,
    asset: String,
    z_index: Cell<i32>,
    vitals: Vitals,
    was_dead: Cell<bool>,
    on_death: RefCell<Option<Box<dyn FnMut()>>>,
    pointer: RefCell<PointerMap>,
    // Shared with the owning scene; z writes invalidate the draw order.
    sorted: Rc<Cell<bool>>,
}

impl Spirit {
    pub fn visible(&self) -> bool {
        !self.vitals.is_dead()
    }

    pub fn covered(&self) -> bool {
        self.vitals.is_hidden()
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn z_index(&self) -> i32 {
        self.z_index.get()
    }

    pub fn set_z_index(&self, z_index: i32) {
        self.z_index.set(z_index);
        self.sorted.set(false);
    }

    /// Registers the owner notification fired once when this entity dies.
    pub fn notify_death(&self, callback: impl FnMut() + 'static) {
        *self.on_death.borrow_mut() = Some(Box::new(callback));
    }
}

pub struct Scene {
    spirits: Vec<SpiritRef>,
    tick_list: Vec<SpiritRef>,
    move_targets: Vec<SpiritRef>,
    click_targets: Vec<SpiritRef>,
    sorted: Rc<Cell<bool>>,
    running: bool,
    pub debug_shapes: bool,
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            spirits: Vec::new(),
            tick_list: Vec::new(),
            move_targets: Vec::new(),
            click_targets: Vec::new(),
            sorted: Rc::new(Cell::new(true)),
            running: false,
            debug_shapes: false,
        }
    }

    /// Registers an entity for drawing (and ticking, if it declares so) and
    /// returns its membership record for chaining `attach`/`notify_death`.
    pub fn push(&mut self, asset: &str, entity: Box<dyn Entity>, z_index: i32) -> SpiritRef {
        let vitals = entity.vitals().clone();
        let ticks = entity.ticks();
        let spirit = Rc::new(Spirit {
            entity: RefCell::new(entity),
            asset: asset.to_string(),
            z_index: Cell::new(z_index),
            vitals,
            was_dead: Cell::new(false),
            on_death: RefCell::new(None),
            pointer: RefCell::new(PointerMap::default()),
            sorted: Rc::clone(&self.sorted),
        });
        self.spirits.push(Rc::clone(&spirit));
        if ticks {
            self.tick_list.push(Rc::clone(&spirit));
        }
        self.sorted.set(false);
        log::debug!("push '{asset}' z={z_index}");
        spirit
    }

    /// Registers the entity's pointer-hit regions. Done once, right after the
    /// push; dispatch scans entities in the order they attached.
    pub fn attach(&mut self, spirit: &SpiritRef, map: PointerMap) {
        if !map.moves.is_empty() {
            self.move_targets.push(Rc::clone(spirit));
        }
        if !map.clicks.is_empty() {
            self.click_targets.push(Rc::clone(spirit));
        }
        *spirit.pointer.borrow_mut() = map;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Cooperative stop: takes effect at the top of the next frame; the host
    /// keeps invoking `frame`, which becomes a no-op.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drops every record and registration, ready for a fresh setup.
    pub fn reset(&mut self) {
        self.spirits.clear();
        self.tick_list.clear();
        self.move_targets.clear();
        self.click_targets.clear();
        self.sorted.set(true);
        self.running = false;
    }

    pub fn spirit_count(&self) -> usize {
        self.spirits.len()
    }

    /// One full frame: animate, logic, draw. No-op while stopped.
    pub fn frame(
        &mut self,
        canvas: &mut Canvas<Window>,
        assets: &Assets<'_>,
    ) -> Result<(), String> {
        if !self.running {
            return Ok(());
        }
        self.animate();
        self.logic();
        self.draw(canvas, assets)
    }

    /// Phase 1: cosmetic animation for every live entity, before any tick.
    pub fn animate(&mut self) {
        for spirit in &self.spirits {
            if !spirit.vitals.is_dead() {
                spirit.entity.borrow_mut().animate();
            }
        }
    }

    /// Phase 2: tick every live entity in the tick list, prune the dead, then
    /// apply queued spawns (they first tick next frame).
    pub fn logic(&mut self) {
        let mut spawns = Vec::new();
        {
            let mut ctx = TickContext {
                spawns: &mut spawns,
            };
            for spirit in &self.tick_list {
                if spirit.vitals.is_dead() {
                    continue;
                }
                spirit.entity.borrow_mut().tick(&mut ctx);
            }
        }
        self.tick_list.retain(|spirit| !spirit.vitals.is_dead());
        for request in spawns {
            self.push_request(request);
        }
        self.poll_vitals();
    }

    /// Phase 3 bookkeeping: resort when stale, collect the entities to draw
    /// this frame (visible and not covered, in depth order) and compact the
    /// record list down to the visible prefix. Split from the actual canvas
    /// work so the ordering rules are testable without a window.
    pub fn draw_pass(&mut self) -> Vec<SpiritRef> {
        self.poll_vitals();
        if !self.sorted.get() {
            // Stable sort: visible before dead regardless of zIndex, then
            // zIndex ascending; insertion order breaks ties.
            self.spirits.sort_by(|a, b| {
                b.visible()
                    .cmp(&a.visible())
                    .then_with(|| a.z_index.get().cmp(&b.z_index.get()))
            });
            self.sorted.set(true);
        }
        let mut drawn = Vec::new();
        let mut kept = Vec::new();
        for spirit in &self.spirits {
            if !spirit.visible() {
                // The sort put every dead record after this one; stop early
                // and let the compaction below drop them all.
                break;
            }
            if !spirit.covered() {
                drawn.push(Rc::clone(spirit));
            }
            kept.push(Rc::clone(spirit));
        }
        self.spirits = kept;
        drawn
    }

    pub fn draw(
        &mut self,
        canvas: &mut Canvas<Window>,
        assets: &Assets<'_>,
    ) -> Result<(), String> {
        let debug_shapes = self.debug_shapes;
        for spirit in self.draw_pass() {
            let entity = spirit.entity.borrow();
            let mut ctx = DrawCtx {
                canvas: &mut *canvas,
                assets,
                sprite: &spirit.asset,
                debug_shapes,
            };
            entity.draw(&mut ctx)?;
        }
        Ok(())
    }

    /// Routes a pointer event through the registered hit regions. Hit testing
    /// happens in scene coordinates — the host must deliver events untransformed.
    pub fn pointer(&mut self, event: PointerEvent) {
        let mut spawns = Vec::new();
        {
            let targets = match event.kind {
                PointerKind::Move => &self.move_targets,
                PointerKind::Click => &self.click_targets,
            };
            let mut ctx = TickContext {
                spawns: &mut spawns,
            };
            for spirit in targets {
                let map = spirit.pointer.borrow();
                let bindings = match event.kind {
                    PointerKind::Move => &map.moves,
                    PointerKind::Click => &map.clicks,
                };
                for binding in bindings {
                    if binding.region.contains(event.pos) {
                        spirit
                            .entity
                            .borrow_mut()
                            .pointer(binding.action, event, &mut ctx);
                        // First matching region wins within an entity.
                        break;
                    }
                }
            }
        }
        for request in spawns {
            self.push_request(request);
        }
        self.poll_vitals();
    }

    fn push_request(&mut self, request: SpawnRequest) {
        let SpawnRequest {
            asset,
            entity,
            z_index,
            on_death,
        } = request;
        let spirit = self.push(&asset, entity, z_index);
        if let Some(callback) = on_death {
            *spirit.on_death.borrow_mut() = Some(callback);
        }
    }

    /// Edge-detects dead-flag writes since the last poll: marks the draw
    /// order stale and fires the owner notification exactly once per death.
    fn poll_vitals(&mut self) {
        for spirit in &self.spirits {
            let dead = spirit.vitals.is_dead();
            if dead != spirit.was_dead.get() {
                spirit.was_dead.set(dead);
                self.sorted.set(false);
                if dead {
                    if let Some(callback) = spirit.on_death.borrow_mut().as_mut() {
                        callback();
                    }
                }
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}
