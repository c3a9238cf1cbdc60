use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;

use orrery::{
    run_interactive, FrameClock, InputState, Scene, SceneLayout, WindowInitError, WINDOW_HEIGHT,
    WINDOW_WIDTH,
};

const DEFAULT_LAYOUT_FILE: &str = "values.xml";
const DEFAULT_HEADLESS_FRAMES: u32 = 120;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let layout = SceneLayout::load_or_default(&options.config_path)?;

    if options.headless {
        return run_headless(&layout, options.frames);
    }

    match run_interactive(layout) {
        Ok(()) => Ok(()),
        Err(err) => {
            if err.downcast_ref::<WindowInitError>().is_some() {
                eprintln!(
                    "{err}. Falling back to --headless mode (set DISPLAY or install GPU drivers to enable rendering)."
                );
                run_headless(&layout, options.frames)
            } else {
                Err(err)
            }
        }
    }
}

/// Steps the simulation on the synthetic clock and prints where
/// everything ended up. Used on machines without a display or GPU, and
/// by the integration tests.
fn run_headless(layout: &SceneLayout, frames: u32) -> Result<()> {
    let input = InputState::new();
    let mut scene = Scene::new(layout, WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32);
    let mut clock = FrameClock::fixed(FrameClock::SYNTHETIC_STEP);

    let mut t = 0.0;
    for _ in 0..frames {
        t = clock.tick();
        scene.update(t, &input);
    }

    println!("Simulated {frames} frames ({t:.2}s of scene time)");
    print_final_state(&scene);
    Ok(())
}

fn print_final_state(scene: &Scene) {
    println!("Final scene state:");
    for instance in &scene.instances {
        let origin = instance.world.transform_point3(Vec3::ZERO);
        println!(
            " - {} at ({:.2}, {:.2}, {:.2})",
            instance.name, origin.x, origin.y, origin.z
        );
    }
    let car = scene.drive.position;
    println!("Car position ({:.2}, {:.2}, {:.2})", car.x, car.y, car.z);
    let eye = scene.active_camera().eye();
    println!("Active camera eye ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z);
}

struct CliOptions {
    config_path: PathBuf,
    headless: bool,
    frames: u32,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut config_path: Option<PathBuf> = None;
        let mut headless = false;
        let mut frames = DEFAULT_HEADLESS_FRAMES;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => headless = true,
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames expects a number"))?;
                    frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count '{value}'"))?;
                }
                other if other.starts_with('-') => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: orrery [layout.xml] [--headless] [--frames N]"
                    ));
                }
                other => {
                    if config_path.replace(PathBuf::from(other)).is_some() {
                        return Err(anyhow!("more than one layout file given"));
                    }
                }
            }
        }

        Ok(Self {
            config_path: config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_LAYOUT_FILE)),
            headless,
            frames,
        })
    }
}
