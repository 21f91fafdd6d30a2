//! Grab demo application
//!
//! Runs the interaction core headless: a procedurally generated room stands
//! in for the asset loader, two scripted controllers sweep their rays across
//! it and grab and drop objects, and a logging renderer reports what would be
//! drawn each frame.
//!
//! Usage: `grab_demo [config.toml|config.ron]`

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vr_interaction::prelude::*;

const FRAMES: usize = 120;
const OBJECT_COUNT: usize = 12;
const SEED: u64 = 0x5EED;

/// Random boxes and spheres in front of the player, plus a floor
struct ProceduralRoom {
    rng: StdRng,
}

impl ProceduralRoom {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AssetSource for ProceduralRoom {
    fn populate(&mut self, graph: &mut SceneGraph, layout: &SceneLayout) -> Result<(), AppError> {
        graph.add_child(
            layout.environment,
            Node::new("Floor")
                .with_transform(
                    Transform::from_position(Vec3::new(0.0, -0.05, -3.0)).with_scale(Vec3::new(10.0, 0.1, 10.0)),
                )
                .with_geometry(Geometry::cube(1.0)),
        )?;

        for i in 0..OBJECT_COUNT {
            // Spread objects on an arc so every yaw sees something
            let angle = (i as f32 / OBJECT_COUNT as f32 - 0.5) * PI * 0.8;
            let distance = self.rng.gen_range(1.5..4.0);
            let position = Vec3::new(
                angle.sin() * distance,
                self.rng.gen_range(0.8..1.6),
                -angle.cos() * distance,
            );
            let size = self.rng.gen_range(0.2..0.5);

            let (name, geometry) = if self.rng.gen_bool(0.5) {
                (format!("Box {i}"), Geometry::cube(size))
            } else {
                (format!("Ball {i}"), Geometry::Sphere { radius: size * 0.5 })
            };

            let opacity = if self.rng.gen_bool(0.25) { 0.8 } else { 1.0 };
            graph.add_child(
                layout.interactables,
                Node::new(name)
                    .with_transform(Transform::from_position(position))
                    .with_geometry(geometry)
                    .with_material(Material::new(opacity, opacity < 1.0)),
            )?;
        }

        log::info!("ProceduralRoom: placed {} interactables", OBJECT_COUNT);
        Ok(())
    }
}

/// Two hands sweeping left and right, pressing select on a fixed schedule
struct ScriptedHands {
    left: ControllerId,
    right: ControllerId,
    frame: usize,
}

impl ScriptedHands {
    fn new(left: ControllerId, right: ControllerId) -> Self {
        Self { left, right, frame: 0 }
    }

    fn yaw(&self, phase: f32) -> Quat {
        let yaw = (self.frame as f32 * 0.05 + phase).sin() * 1.2;
        Quat::from_axis_angle(&Vec3::y_axis(), yaw)
    }
}

impl InputSource for ScriptedHands {
    fn poses(&mut self) -> Vec<(ControllerId, ControllerPose)> {
        vec![
            (self.left, ControllerPose::new(Vec3::new(-0.25, 1.2, 0.0), self.yaw(0.0))),
            (self.right, ControllerPose::new(Vec3::new(0.25, 1.2, 0.0), self.yaw(PI))),
        ]
    }

    fn events(&mut self) -> Vec<InputEvent> {
        let events = match self.frame % 40 {
            5 => vec![InputEvent::SelectStart(self.left)],
            15 => vec![InputEvent::SelectStart(self.right)],
            25 => vec![InputEvent::SelectEnd(self.left)],
            // Duplicate press while holding is refused and logged
            30 => vec![InputEvent::SelectStart(self.right), InputEvent::SelectStart(self.right)],
            35 => vec![InputEvent::SelectEnd(self.right)],
            _ => Vec::new(),
        };
        self.frame += 1;
        events
    }
}

/// Logs a summary of the scene instead of drawing it
#[derive(Default)]
struct LogRenderer {
    frames: u64,
}

impl FrameRenderer for LogRenderer {
    fn render(&mut self, graph: &SceneGraph, frame: u64) -> Result<(), AppError> {
        self.frames += 1;
        if frame % 20 == 0 {
            let translucent = graph
                .roots()
                .flat_map(|root| graph.traverse(root))
                .filter_map(|id| graph.get(id))
                .filter(|node| node.material.as_ref().is_some_and(|m| m.transparent))
                .count();
            log::info!("Frame {}: {} nodes, {} translucent", frame, graph.len(), translucent);
        }
        Ok(())
    }
}

fn load_config() -> Result<InteractionConfig, AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading interaction config from {}", path);
            InteractionConfig::load_from_file(&path)?
        }
        None => {
            log::info!("No config given, using defaults");
            InteractionConfig::default()
        }
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting grab demo");

    let config = load_config()?;
    let mut system = InteractionSystem::new(config)?;
    let left = system.add_controller(true)?;
    let right = system.add_controller(true)?;

    let mut driver = FrameDriver::new(system, ScriptedHands::new(left, right), LogRenderer::default());
    driver.load_assets(&mut ProceduralRoom::new(SEED))?;

    let mut failures = 0;
    for report in driver.run(FRAMES)? {
        for (event, outcome) in &report.outcomes {
            let name = driver
                .system()
                .controller(event.controller())
                .map_or("?", |c| c.name());
            match outcome {
                GrabOutcome::Grabbed(node) | GrabOutcome::Released(node) => {
                    let object = driver.system().graph().get(*node).map_or("?", |n| n.name.as_str());
                    log::info!("Frame {}: {} {:?} {}", report.frame, name, outcome, object);
                }
                GrabOutcome::NothingTargeted | GrabOutcome::NothingHeld => {
                    log::info!("Frame {}: {} {:?}", report.frame, name, outcome);
                }
            }
        }
        failures += report.failures;
    }

    log::info!(
        "Grab demo finished: {} frames, {} rendered, {} recovered failures",
        driver.system().frame_count(),
        driver.renderer().frames,
        failures
    );
    Ok(())
}
