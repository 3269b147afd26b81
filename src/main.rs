use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

mod assets;
mod bullet;
mod cannon;
mod coin;
mod collision;
mod config;
mod fish;
mod generator;
mod geometry;
mod hud;
mod net;
mod quadtree;
mod scene;
mod school;
mod sprite;
mod stage;
mod tween;

use assets::{Assets, MANIFEST};
use cannon::{cannon_frame_size, Cannon, CannonLevel};
use config::EntityTables;
use generator::FishGenerator;
use geometry::{Bounds, Vec2};
use hud::{Hud, Score};
use scene::{PointerEvent, PointerKind, Scene};
use school::School;
use stage::Stage;

// Logical game resolution; the stage background is authored at this size
const GAME_WIDTH: u32 = 800;
const GAME_HEIGHT: u32 = 480;

const FISH_QUOTA: usize = 10;

const STAGE_Z: i32 = 0;
const HUD_Z: i32 = 4;
const CANNON_Z: i32 = 6;

/// Builds the whole entity graph into an empty scene: stage (with its fish
/// generator), cannon and HUD, wired together through the shared school,
/// score and cannon level. Also used by the R-key restart.
fn setup_scene(
    scene: &mut Scene,
    assets: &Assets,
    tables: &Rc<EntityTables>,
) -> Result<(), String> {
    let view = Vec2::new(GAME_WIDTH as f32, GAME_HEIGHT as f32);
    let bounds = Bounds::new(0.0, view.x, 0.0, view.y);
    let school = School::new(bounds);
    let score = Score::new();
    let level = CannonLevel::new();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let generator = FishGenerator::new(
        school.clone(),
        Rc::clone(tables),
        score.clone(),
        bounds,
        FISH_QUOTA,
        seed,
    );
    scene.push("game_bg", Box::new(Stage::new(generator)), STAGE_Z);

    let frame_size = cannon_frame_size(assets.size("cannon1")?);
    let cannon = Cannon::new(
        view,
        frame_size,
        level.clone(),
        bounds,
        school.clone(),
        Rc::clone(tables),
    );
    let spirit = scene.push("cannon1", Box::new(cannon), CANNON_Z);
    scene.attach(&spirit, Cannon::pointer_map(view));

    let hud = Hud::new(view, level, score);
    let spirit = scene.push("bottom", Box::new(hud), HUD_Z);
    scene.attach(&spirit, Hud::pointer_map(view));

    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;

    let window = video_subsystem
        .window("Fish Hunt", GAME_WIDTH, GAME_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

    // Logical size keeps pointer coordinates in scene space whatever the
    // window scale; the scene's hit testing depends on that.
    canvas
        .set_logical_size(GAME_WIDTH, GAME_HEIGHT)
        .map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump()?;

    // Every asset must be resident before the loop starts; a missing file is
    // reported here, once, and the game never launches half-loaded.
    let assets = Assets::load(&texture_creator, MANIFEST)?;
    let tables = Rc::new(
        EntityTables::load_from_file("assets/config/entity_tables.json")
            .map_err(|e| e.to_string())?,
    );

    let mut scene = Scene::new();
    setup_scene(&mut scene, &assets, &tables)?;
    scene.start();

    println!("Controls:");
    println!("Mouse Move - Aim the cannon");
    println!("Left Click - Fire (or press the HUD +/- buttons)");
    println!("Space - Pause / resume");
    println!("R - Restart");
    println!("B - Toggle collision debug boxes");
    println!("ESC - Quit");

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    scene.stop();
                    break 'running;
                }
                Event::KeyDown {
                    keycode: Some(Keycode::Space),
                    ..
                } => {
                    if scene.is_running() {
                        scene.stop();
                    } else {
                        scene.start();
                    }
                }
                Event::KeyDown {
                    keycode: Some(Keycode::R),
                    ..
                } => {
                    scene.reset();
                    setup_scene(&mut scene, &assets, &tables)?;
                    scene.start();
                    log::info!("restarted");
                }
                Event::KeyDown {
                    keycode: Some(Keycode::B),
                    ..
                } => {
                    scene.debug_shapes = !scene.debug_shapes;
                    log::info!(
                        "collision boxes: {}",
                        if scene.debug_shapes { "on" } else { "off" }
                    );
                }
                Event::MouseMotion { x, y, .. } => {
                    scene.pointer(PointerEvent {
                        kind: PointerKind::Move,
                        pos: Vec2::new(x as f32, y as f32),
                    });
                }
                Event::MouseButtonDown {
                    mouse_btn: sdl2::mouse::MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    scene.pointer(PointerEvent {
                        kind: PointerKind::Click,
                        pos: Vec2::new(x as f32, y as f32),
                    });
                }
                _ => {}
            }
        }

        canvas.set_draw_color(Color::RGB(0, 0, 0));
        canvas.clear();
        scene.frame(&mut canvas, &assets)?;
        canvas.present();

        // Cap framerate to ~60 FPS
        std::thread::sleep(std::time::Duration::new(0, 1_000_000_000u32 / 60));
    }

    Ok(())
}
