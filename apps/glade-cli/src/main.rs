use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glade_camera::{CameraMode, OrbitPath};
use glade_common::{Material, Primitive, Transform};
use glade_host::{ObjectSpec, RecordingHost, SceneHost};
use glade_input::InputEvent;
use glade_runtime::{Session, SessionConfig};
use glade_terrain::TerrainBuilder;
use glade_tools::SessionInspector;
use glade_tween::{Easing, TweenRequest};
use glam::Vec3;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glade", about = "Procedural worlds, transform graphs and tweens, driven headless")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session configuration (JSON). Missing fields use defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a world into a recording host and print statistics
    Build {
        /// Cells along each side
        #[arg(long)]
        size: Option<usize>,
        /// Noise octaves
        #[arg(long)]
        octaves: Option<u32>,
        /// World seed
        #[arg(long)]
        seed: Option<u64>,
        /// Write the placement directives to this file as JSON
        #[arg(long)]
        dump: Option<PathBuf>,
        /// Print every host object
        #[arg(long)]
        scene: bool,
    },
    /// Tween one object from the origin to (10, 0, 0) and print its progress
    Tween {
        #[arg(short, long, default_value = "1000")]
        duration_ms: f32,
        /// Frame length in milliseconds
        #[arg(short, long, default_value = "100")]
        frame_ms: u64,
        /// linear, quadratic or cubic
        #[arg(short, long, default_value = "linear")]
        easing: String,
    },
    /// Build a world, walk the camera a little, then orbit it
    Fly {
        #[arg(long, default_value = "12")]
        radius: f32,
        #[arg(long, default_value = "10")]
        height: f32,
        #[arg(long, default_value = "1")]
        laps: u32,
        /// Frame length in milliseconds
        #[arg(short, long, default_value = "50")]
        frame_ms: u64,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("glade v{}", env!("CARGO_PKG_VERSION"));
            println!("host: {}", glade_host::crate_info());
            println!("tools: {}", glade_tools::crate_info());
            println!(
                "terrain: size={} octaves={} seed={:?}",
                config.terrain.world_size, config.terrain.octaves, config.terrain.seed
            );
            println!(
                "camera: speed={} sensitivity={} pitch_input={:?}",
                config.camera.speed, config.camera.sensitivity, config.camera.pitch_input
            );
        }
        Commands::Build {
            size,
            octaves,
            seed,
            dump,
            scene,
        } => {
            if let Some(size) = size {
                config.terrain.world_size = size;
            }
            if let Some(octaves) = octaves {
                config.terrain.octaves = octaves;
            }
            if seed.is_some() {
                config.terrain.seed = seed;
            }

            if let Some(path) = dump {
                let build = TerrainBuilder::new(config.terrain.clone())?.build()?;
                let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                serde_json::to_writer_pretty(BufWriter::new(file), &build.directives)?;
                println!("Wrote {} directives to {}", build.directives.len(), path.display());
            }

            let mut session = Session::new(config)?;
            let mut host = RecordingHost::new();
            session.build_world(&mut host)?;
            session.step(Duration::ZERO, &mut host)?;

            println!("{}", SessionInspector::summary(&session));
            println!("Host calls: {}", host.commands().len());
            if scene {
                print!("{host}");
            }
        }
        Commands::Tween {
            duration_ms,
            frame_ms,
            easing,
        } => {
            anyhow::ensure!(frame_ms > 0, "frame length must be positive");
            let easing: Easing = easing.parse()?;
            config.max_step = config.max_step.max(frame_ms as f32 / 1000.0);
            let mut session = Session::new(config)?;
            let mut host = RecordingHost::new();
            let id = session.spawn_object(
                &mut host,
                ObjectSpec {
                    primitive: Primitive::Sphere {
                        radius: 0.5,
                        segments: 16,
                    },
                    material: Material::new("marker", [1.0, 0.4, 0.1]),
                    transform: Transform::default(),
                },
                None,
            )?;
            session.animate(
                id,
                TweenRequest::new(Vec3::new(10.0, 0.0, 0.0), duration_ms)
                    .with_easing(easing)
                    .on_nearing_end(|id| println!("  nearing end: {}", id.short()))
                    .on_complete(|id| println!("  completed: {}", id.short())),
            )?;

            println!("Tween {} over {duration_ms} ms ({easing:?})", id.short());
            while session.tweens().is_active(id) {
                let report = session.step(Duration::from_millis(frame_ms), &mut host)?;
                let p = host.object_position(id)?;
                println!(
                    "tick={:3} x={:7.3} progress={}",
                    report.tick,
                    p.x,
                    session
                        .tweens()
                        .progress(id)
                        .map_or("done".to_string(), |t| format!("{:.0}%", t * 100.0))
                );
            }
        }
        Commands::Fly {
            radius,
            height,
            laps,
            frame_ms,
        } => {
            anyhow::ensure!(frame_ms > 0, "frame length must be positive");
            let mut session = Session::new(config)?;
            let mut host = RecordingHost::new();
            session.build_world(&mut host)?;
            let frame = Duration::from_millis(frame_ms);

            // Free-look: walk forward and turn a little before the flight.
            let forward = session.config().bindings.forward.clone();
            session.handle_input(&InputEvent::key_down(forward.clone()));
            session.handle_input(&InputEvent::pointer(40.0, 10.0));
            for _ in 0..10 {
                session.step(frame, &mut host)?;
            }
            session.handle_input(&InputEvent::key_up(forward));
            let p = host.camera_position();
            println!("Walked to ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);

            let centre = Vec3::ZERO;
            session.follow_camera_path(OrbitPath::new(centre, radius, height).with_segments(8, 400.0).with_laps(laps))?;
            let mut ticks = 0u32;
            while session.camera().mode() == CameraMode::Scripted {
                let report = session.step(frame, &mut host)?;
                ticks += 1;
                if let Some(transition) = report.camera_transition {
                    let p = host.camera_position();
                    println!(
                        "tick={:4} {:?} camera=({:.2}, {:.2}, {:.2})",
                        report.tick, transition, p.x, p.y, p.z
                    );
                }
                anyhow::ensure!(ticks < 100_000, "camera flight did not finish");
            }
            println!("{}", SessionInspector::summary(&session));
        }
    }

    Ok(())
}
