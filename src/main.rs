use anyhow::Result;
use glam::{Quat, Vec2, Vec3};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    event::{DeviceEvent, Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use shooter::engine::effects::{LogSink, Transform};
use shooter::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use shooter::engine::input::{Action, InputManager};
use shooter::game::characters::{CharacterId, CharacterTuning};
use shooter::game::items::{weapon_desc, ItemDesc, ItemRarity};
use shooter::game::GameWorld;

/// Floor, a few walls, the player with a starter rifle and some weapons to
/// pick up
fn build_sandbox(world: &mut GameWorld<LogSink>) -> Result<CharacterId> {
    world.spawn_floor(0.0, 5000.0);
    world.spawn_block(Vec3::new(0.0, 300.0, -3000.0), Vec3::new(3000.0, 300.0, 50.0));
    world.spawn_block(Vec3::new(-3000.0, 300.0, 0.0), Vec3::new(50.0, 300.0, 3000.0));
    world.spawn_block(Vec3::new(3000.0, 300.0, 0.0), Vec3::new(50.0, 300.0, 3000.0));

    let player = world.spawn_character(
        "Player",
        CharacterTuning::standard(),
        Vec3::new(0.0, 95.0, 0.0),
    )?;
    world.give_default_weapon(player, weapon_desc("Rifle", ItemRarity::Common))?;

    let pickups = [
        ("Pistol", ItemRarity::Damaged, Vec3::new(-400.0, 30.0, -600.0)),
        ("SMG", ItemRarity::UnCommon, Vec3::new(0.0, 30.0, -800.0)),
        ("Shotgun", ItemRarity::Rare, Vec3::new(400.0, 30.0, -600.0)),
        ("Railgun", ItemRarity::Legendary, Vec3::new(0.0, 30.0, -1600.0)),
    ];
    for (name, rarity, location) in pickups {
        world.spawn_weapon(
            weapon_desc(name, rarity),
            Transform::from_location_rotation(location, Quat::from_rotation_y(0.5)),
        );
    }

    world.spawn_item(
        ItemDesc {
            name: "Ammo".to_string(),
            count: 30,
            ..ItemDesc::default()
        },
        Transform::from_location(Vec3::new(-200.0, 20.0, -300.0)),
    );

    Ok(player)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting shooter sandbox...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Shooter Sandbox")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    let mut world = GameWorld::with_effects(LogSink::new(), StdRng::from_entropy());
    let player = build_sandbox(&mut world)?;
    let size = window.inner_size();
    world.resize_viewport(Vec2::new(size.width as f32, size.height as f32));

    let mut input = InputManager::new();
    let mut game_loop = GameLoop::new();
    let mut last_fps_log = 0.0;

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    info!("Window resized to {:?}", physical_size);
                    world.resize_viewport(Vec2::new(
                        physical_size.width as f32,
                        physical_size.height as f32,
                    ));
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.process_keyboard_event(&event);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input.process_mouse_button(button, state);
                }
                WindowEvent::RedrawRequested => {
                    // Nothing is drawn; the window only collects input
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                input.process_mouse_motion(delta);
            }
            Event::AboutToWait => {
                if input.just_pressed(Action::Menu) {
                    info!("Menu requested, shutting down...");
                    elwt.exit();
                    return;
                }
                if game_loop.update_pause_button(input.player().is_pressed(Action::Pause)) {
                    info!("Paused: {}", game_loop.is_paused());
                }

                let steps = game_loop.begin_frame();
                for _ in 0..steps {
                    let applied =
                        world.apply_player_input(player, input.player(), FIXED_TIMESTEP);
                    if let Err(err) = applied {
                        log::error!("Input dropped: {}", err);
                    }
                    input.update();
                    world.tick(FIXED_TIMESTEP);
                }
                if game_loop.is_paused() {
                    input.update();
                }

                if game_loop.game_time() - last_fps_log >= 5.0 {
                    last_fps_log = game_loop.game_time();
                    if let Ok(character) = world.character(player) {
                        info!(
                            "{:.0} fps, player at {:?}, weapon {:?}",
                            game_loop.fps(),
                            character.location(),
                            character.equipped_weapon()
                        );
                    }
                }

                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
