use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use physstep_integrators::IntegratorRegistry;
use physstep_kernel::{DEFAULT_FIXED_TIMESTEP, World};
use physstep_scene::Scene;
use physstep_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "physstep-cli", about = "Drive fixed-timestep physics worlds")]
struct Cli {
    /// Enable verbose logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SceneArgs {
    /// Scene file (.json, .yaml, .yml); the built-in demo when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,
    /// Override the scene's integrator
    #[arg(short, long)]
    integrator: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and defaults
    Info,
    /// List registered integrators
    Integrators,
    /// Step a world on a synthetic frame clock
    Run {
        #[command(flatten)]
        scene: SceneArgs,
        /// Number of frames to drive
        #[arg(short, long, default_value = "300")]
        frames: u32,
        /// Wall-clock milliseconds between frames
        #[arg(long, default_value_t = DEFAULT_FIXED_TIMESTEP)]
        frame_ms: f64,
        /// Inject a stall every N frames
        #[arg(long)]
        hitch_every: Option<u32>,
        /// Length of an injected stall in milliseconds
        #[arg(long, default_value = "250")]
        hitch_ms: f64,
        /// Pause the world at this frame
        #[arg(long)]
        pause_at: Option<u32>,
        /// Resume the world at this frame
        #[arg(long, requires = "pause_at")]
        resume_at: Option<u32>,
        /// Print every body after the run
        #[arg(long)]
        bodies: bool,
    },
    /// Run a scene under steady and jittery frame pacing and compare end states
    Replay {
        #[command(flatten)]
        scene: SceneArgs,
        /// Number of whole timesteps to simulate
        #[arg(short = 'n', long, default_value = "600")]
        steps: u32,
    },
    /// Write the built-in demo scene to a file
    ExportDemo {
        /// Output path (.json, .yaml, .yml)
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Info => {
            println!("physstep-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", physstep_common::crate_info());
            println!("kernel: {}", physstep_kernel::crate_info());
            println!("integrators: {}", physstep_integrators::crate_info());
            println!("behaviors: {}", physstep_behaviors::crate_info());
            println!("scene: {}", physstep_scene::crate_info());
            println!("tools: {}", physstep_tools::crate_info());
            println!(
                "defaults: dt={:.3}ms max_substeps={} integrator={}",
                DEFAULT_FIXED_TIMESTEP,
                physstep_kernel::DEFAULT_MAX_SUBSTEPS,
                physstep_kernel::DEFAULT_INTEGRATOR
            );
        }
        Commands::Integrators => {
            for name in IntegratorRegistry::with_builtins().names() {
                println!("{name}");
            }
        }
        Commands::Run {
            scene,
            frames,
            frame_ms,
            hitch_every,
            hitch_ms,
            pause_at,
            resume_at,
            bodies,
        } => {
            anyhow::ensure!(
                frame_ms > 0.0 && frame_ms.is_finite(),
                "--frame-ms must be positive, got {frame_ms}"
            );
            let mut world = build_world(&scene)?;
            println!("{}", WorldInspector::summary(&world));

            let mut now = 0.0;
            world.step(now)?;
            for frame in 1..=frames {
                if pause_at == Some(frame) {
                    world.pause();
                    println!("frame {frame}: paused");
                }
                if resume_at == Some(frame) {
                    world.unpause();
                    println!("frame {frame}: resumed");
                }
                now += frame_ms;
                if hitch_every.is_some_and(|n| n > 0 && frame % n == 0) {
                    now += hitch_ms;
                    tracing::info!(frame, hitch_ms, "injected stall");
                }
                let substeps = world
                    .step(now)
                    .with_context(|| format!("step failed at frame {frame} (t={now:.3}ms)"))?;
                tracing::debug!(frame, substeps, "frame");
            }

            println!("{}", WorldInspector::summary(&world));
            println!("diagnostics: {}", world.diagnostics());
            println!("state hash: {:#018x}", WorldInspector::state_hash(&world));
            if bodies {
                for id in WorldInspector::list_bodies(&world) {
                    if let Some(info) = WorldInspector::inspect_body(&world, id) {
                        println!("  {info}");
                    }
                }
            }
        }
        Commands::Replay { scene, steps } => {
            println!("Frame pacing replay: {steps} timesteps");

            let mut steady = build_world(&scene)?;
            let dt = steady.fixed_timestep();
            drive(&mut steady, (0..=steps).map(|i| f64::from(i) * dt))?;

            // Alternate half and one-and-a-half frames, landing on whole
            // timesteps every other frame and on the last one.
            let mut jittery = build_world(&scene)?;
            let jitter = (0..=steps).map(|i| {
                let base = f64::from(i) * dt;
                if i % 2 == 1 && i != steps { base + 0.5 * dt } else { base }
            });
            drive(&mut jittery, jitter)?;

            let a = WorldInspector::state_hash(&steady);
            let b = WorldInspector::state_hash(&jittery);
            println!(
                "Steady:  substeps={}, hash={a:#018x}",
                steady.diagnostics().total_substeps
            );
            println!(
                "Jittery: substeps={}, hash={b:#018x}",
                jittery.diagnostics().total_substeps
            );
            if a != b {
                anyhow::bail!("MISMATCH: frame pacing changed the simulation");
            }
            println!("Match: OK");
        }
        Commands::ExportDemo { out } => {
            Scene::demo()
                .save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("wrote demo scene to {}", out.display());
        }
    }

    Ok(())
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<Scene> {
    match path {
        Some(path) => Scene::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(Scene::demo()),
    }
}

fn build_world(args: &SceneArgs) -> anyhow::Result<World> {
    let mut scene = load_scene(args.scene.as_deref())?;
    if let Some(name) = &args.integrator {
        scene.world.integrator = Some(name.clone());
    }
    let factory = IntegratorRegistry::with_builtins().into_factory();
    Ok(scene.build(factory)?)
}

fn drive(world: &mut World, times: impl IntoIterator<Item = f64>) -> anyhow::Result<()> {
    for now in times {
        world.step(now)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use physstep_kernel::ConfigError;
    use physstep_scene::SceneError;

    fn scene_args(integrator: Option<&str>) -> SceneArgs {
        SceneArgs {
            scene: None,
            integrator: integrator.map(str::to_string),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn replay_flags_parse() {
        let args = ["physstep-cli", "replay", "-s", "a.yaml", "-n", "12"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Replay { scene, steps } => {
                assert_eq!(scene.scene, Some(PathBuf::from("a.yaml")));
                assert_eq!(steps, 12);
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn demo_world_uses_default_integrator() {
        let world = build_world(&scene_args(None)).unwrap();
        assert_eq!(world.integrator_name(), physstep_kernel::DEFAULT_INTEGRATOR);
        assert_eq!(world.body_count(), Scene::demo().bodies.len());
    }

    #[test]
    fn integrator_override_applies() {
        let world = build_world(&scene_args(Some("verlet"))).unwrap();
        assert_eq!(world.integrator_name(), "verlet");
    }

    #[test]
    fn unknown_integrator_override_fails() {
        let err = build_world(&scene_args(Some("rk4"))).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<SceneError>(),
            Some(SceneError::Config(ConfigError::UnknownIntegrator { .. }))
        ));
    }

    #[test]
    fn scene_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.yaml");
        Scene::demo().save(&path).unwrap();
        let args = SceneArgs {
            scene: Some(path),
            integrator: Some("euler".into()),
        };
        let world = build_world(&args).unwrap();
        assert_eq!(world.integrator_name(), "euler");
        assert_eq!(world.body_count(), Scene::demo().bodies.len());
    }

    #[test]
    fn missing_scene_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_scene(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn steady_and_jittery_pacing_agree() {
        let mut steady = build_world(&scene_args(None)).unwrap();
        let mut jittery = build_world(&scene_args(None)).unwrap();
        let dt = steady.fixed_timestep();
        drive(&mut steady, (0..=60).map(|i| f64::from(i) * dt)).unwrap();
        drive(
            &mut jittery,
            (0..=60).map(|i| {
                let base = f64::from(i) * dt;
                if i % 2 == 1 { base + 0.5 * dt } else { base }
            }),
        )
        .unwrap();
        assert_eq!(steady.diagnostics().total_substeps, 60);
        assert_eq!(jittery.diagnostics().total_substeps, 60);
        assert_eq!(
            WorldInspector::state_hash(&steady),
            WorldInspector::state_hash(&jittery)
        );
    }
}
