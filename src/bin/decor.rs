use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use decor::{
    Bucket, Canvas, CpuSurface, DecorEngine, DrawOpts, EngineOpts, ExclusionRect, FsAssetLoader,
    ManualClock, Rgba8, StaticScene,
};

#[derive(Parser, Debug)]
#[command(name = "decor", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every bucket plus post-effects into a PNG.
    Frame(FrameArgs),
    /// Print per-layer placement counts as JSON.
    Inspect(SceneArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Decoration config JSON. Built-in defaults are used if it cannot be loaded.
    #[arg(long)]
    config: PathBuf,

    /// Directory logical asset paths are resolved against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Prefix for relative asset names.
    #[arg(long, default_value = decor::DEFAULT_ASSET_BASE)]
    asset_base: String,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Placement seed.
    #[arg(long, default_value = "seed")]
    seed: String,

    /// Error tier selecting the theme folder (clamped to 0..=3).
    #[arg(long, default_value_t = 0)]
    tier: i32,

    /// Grid tile size in pixels.
    #[arg(long)]
    tile_size: Option<f64>,

    /// Track rectangle `x,y,w,h`; repeatable.
    #[arg(long = "track", value_parser = parse_rect)]
    tracks: Vec<ExclusionRect>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Animation clock time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Background color `#rrggbb`.
    #[arg(long, default_value = "#4a7a3a")]
    background: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn parse_rect(s: &str) -> Result<ExclusionRect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(ExclusionRect::new(*x, *y, *w, *h)),
        _ => Err(format!("expected x,y,w,h, got '{s}'")),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn engine_for(args: &SceneArgs, clock: Arc<ManualClock>) -> DecorEngine {
    let scene = StaticScene {
        canvas: Canvas::new(args.width, args.height),
        tile_size: args.tile_size,
        track_mask: args.tracks.clone(),
        error_tier: args.tier,
    };
    let opts = EngineOpts::new(
        Arc::new(scene),
        Arc::new(FsAssetLoader::new(&args.assets)),
    )
    .with_config_path(&args.config)
    .with_asset_base(args.asset_base.clone())
    .with_clock(clock);

    let mut engine = DecorEngine::new();
    engine.init(opts);
    engine.rebuild(&args.seed);
    engine
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let clock = Arc::new(ManualClock::new(args.time));
    let mut engine = engine_for(&args.scene, clock);
    engine.update(0.0);

    let mut surface = CpuSurface::new(args.scene.width, args.scene.height)?;
    surface.clear(Rgba8::from_hex(&args.background)?);
    for bucket in Bucket::ALL {
        engine.draw(&mut surface, bucket, &DrawOpts::default())?;
    }
    engine.draw_post(&mut surface)?;
    let frame = surface.readback().into_straight();

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: SceneArgs) -> anyhow::Result<()> {
    let engine = engine_for(&args, Arc::new(ManualClock::new(0.0)));
    let Some(scene) = engine.scene() else {
        anyhow::bail!("no scene was built");
    };
    let layers: Vec<serde_json::Value> = scene
        .layers()
        .iter()
        .map(|l| {
            serde_json::json!({
                "id": l.id,
                "z": l.z,
                "bucket": l.bucket.map(Bucket::as_str),
                "items": l.items.len(),
                "animated": l.is_animated(),
            })
        })
        .collect();
    let report = serde_json::json!({
        "seed": scene.seed(),
        "width": scene.canvas().width,
        "height": scene.canvas().height,
        "animated": engine.has_animated_content(),
        "layers": layers,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
