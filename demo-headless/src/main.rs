use clap::Parser;
use fireplace_core::{Scene, SceneConfig, Vec2};
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Headless fire placement scene runner
#[derive(Parser, Debug)]
#[command(name = "fireplace-demo")]
#[command(about = "Build a terrain scene and light fires with a simulated pointer", long_about = None)]
struct Args {
    /// Scene preset (sine-field, noise-field, fire-box, fire-box-rising, fire-box-falling, flat-plane)
    #[arg(short, long, default_value = "sine-field")]
    preset: String,

    /// JSON scene config; overrides --preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run time in seconds
    #[arg(short, long, default_value_t = 5.0)]
    duration: f32,

    /// Frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for ambient fire placement
    #[arg(long)]
    seed: Option<u64>,

    /// Probability that each vertex gets an ambient fire
    #[arg(long)]
    fire_density: Option<f32>,

    /// Pointer position in normalized device coordinates, as x,y
    #[arg(long, value_delimiter = ',', num_args = 2, allow_negative_numbers = true, default_values_t = [0.0, -0.5])]
    pointer: Vec<f32>,

    /// Seconds to hold the pointer down (0 = never press)
    #[arg(long, default_value_t = 1.0)]
    hold: f32,

    /// Pointer sweep speed along X in NDC units per second while held
    #[arg(long, default_value_t = 0.0)]
    sweep: f32,

    /// Viewport width over height
    #[arg(long, default_value_t = 16.0 / 9.0)]
    aspect: f32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 0.5)]
    report_interval: f32,

    /// Print the resolved scene config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(args: &Args) -> Result<SceneConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SceneConfig::preset(&args.preset).ok_or_else(|| {
            format!(
                "unknown preset '{}', expected one of {}",
                args.preset,
                SceneConfig::PRESETS.join(", ")
            )
        })?,
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(density) = args.fire_density {
        config.fire_density = density;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    if args.fps <= 0.0 || args.duration < 0.0 {
        return Err("fps must be positive and duration non-negative".into());
    }

    println!("=== Fire Placement Demo ===\n");
    let mut scene = Scene::bootstrap(config)?;
    let mesh = scene.mesh();
    let (low, high) = mesh.elevation_range();
    println!(
        "Terrain: {}x{} vertices, {} faces, elevation {:.2}..{:.2}",
        mesh.width(),
        mesh.length(),
        mesh.face_count(),
        low,
        high
    );
    if let Some(volume) = scene.fire_volume() {
        println!(
            "Fire volume: {} vertices, {} faces",
            volume.vertex_count(),
            volume.face_count()
        );
    }
    println!("Ambient fires: {}\n", scene.fires().ambient().len());

    let mut pointer = Vec2::new(args.pointer[0], args.pointer[1]);
    if args.hold > 0.0 {
        let ray = scene.pick_ray(pointer, args.aspect)?;
        scene.pointer_down(ray);
        info!("Pointer down at ({:.2}, {:.2})", pointer.x, pointer.y);
    }

    println!("Time(s) | Attempts | Ignited | Lit faces | Ambient");
    println!("--------|----------|---------|-----------|--------");

    let dt = 1.0 / args.fps;
    let mut time = 0.0;
    let mut next_report = 0.0;
    let mut attempts = 0;
    let mut ignited = 0;
    let mut peak_frame = 0;

    while time < args.duration {
        if scene.pointer_held() && time >= args.hold {
            scene.pointer_up();
            info!("Pointer released at {:.2}s", time);
        } else if scene.pointer_held() && args.sweep != 0.0 {
            pointer.x = (pointer.x + args.sweep * dt).clamp(-1.0, 1.0);
            let ray = scene.pick_ray(pointer, args.aspect)?;
            scene.pointer_move(ray);
        }

        let report = scene.update(dt)?;
        time += dt;
        attempts += report.ignition_attempts;
        ignited += report.ignited;
        peak_frame = peak_frame.max(report.ignited);

        if time >= next_report {
            println!(
                "{:7.2} | {:8} | {:7} | {:9} | {:7}",
                time, attempts, ignited, report.lit, report.ambient
            );
            next_report += args.report_interval;
        }
    }

    if args.hold > 0.0 && ignited == 0 {
        warn!("Pointer never crossed the terrain; try a different --pointer");
    }

    println!("\n=== Run Complete ===");
    println!("Final time: {:.2}s", scene.elapsed());
    println!("Ignition attempts: {}", attempts);
    println!("Faces lit: {}", scene.fires().lit_count());
    println!("Most faces lit in one frame: {}", peak_frame);
    println!("Total fires: {}", scene.fires().total_fires());

    Ok(())
}
