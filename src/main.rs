use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palette_match::{canvas_palette, quantize, ColorMatcher, Palette, QuantizeOptions};
use tileplan::coords::{AnchorSet, ScreenPosition};
use tileplan::error::BotError;
use tileplan::models::AppConfig;
use tileplan::services::{
    decode_png, encode_png, load_image_relative, CachedCanvasReader, HttpTileSource,
    JsonLinesActuator, PaintActuator, PaletteSource, RecordingActuator, RetryPolicy, SaveStore,
    Services, Session, SessionSettings, StaticCalibrationSource, StaticPaletteSource,
};

#[derive(Parser)]
#[command(name = "tileplan")]
#[command(about = "Plan and paint pixel art on a shared tile canvas")]
struct Cli {
    /// Config file (defaults to $CONFIG_FILE, then ./config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the palette and which colors are available
    Palette,
    /// Quantize one image and print the colors it needs
    Quantize {
        /// PNG file to quantize
        image: PathBuf,

        /// Width in canvas pixels
        #[arg(short, long)]
        width: usize,

        /// Brightness bias; positive prefers lighter colors
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        brightness: f64,

        /// Keep exact palette swatches and use a 1000x1000 grid
        #[arg(long)]
        exact: bool,

        /// Write a preview PNG of the quantized image
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read the canvas and print the planned tasks as JSON lines
    Plan {
        /// Seed for random traversal
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Resolve screen clicks to anchors and print them as config YAML
    Calibrate {
        /// Screen position as x,y; give at least two
        #[arg(long = "click", required = true, num_args = 1)]
        clicks: Vec<ScreenPosition>,
    },
    /// Read the canvas and paint, one JSON line per pixel on stdout
    Run {
        /// Seed for random traversal
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tileplan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.yaml"));

    let result = match cli.command {
        Some(Commands::Palette) => run_palette_command(&config_path).await,
        Some(Commands::Quantize {
            image,
            width,
            brightness,
            exact,
            output,
        }) => run_quantize_command(&config_path, &image, width, brightness, exact, output).await,
        Some(Commands::Plan { seed }) => run_plan_command(&config_path, seed).await,
        Some(Commands::Calibrate { clicks }) => run_calibrate_command(&config_path, &clicks).await,
        Some(Commands::Run { seed }) => run_paint_command(&config_path, seed).await,
        None => {
            run_status_command(&config_path).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        if let Some(bot) = e.downcast_ref::<BotError>() {
            if bot.is_unexpected() {
                tracing::error!(error = ?e, "Unexpected failure");
            }
            eprintln!("{}", bot.status());
            std::process::exit(1);
        }
        return Err(e);
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<AppConfig, BotError> {
    let config = AppConfig::load(path);
    config.validate()?;
    Ok(config)
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Build a session from config, restoring images from the save if present.
async fn open_session(
    config: &AppConfig,
    config_path: &Path,
    actuator: Arc<dyn PaintActuator>,
) -> anyhow::Result<(Session, SaveStore)> {
    let tiles = HttpTileSource::new(config.tile_url.clone(), Palette::new(canvas_palette())?)?;
    let retry = RetryPolicy {
        retries: config.tile_retries,
        backoff: config.tile_backoff(),
    };
    let services = Services {
        palette: Arc::new(StaticPaletteSource::new(config.available_colors.clone())),
        canvas: Arc::new(CachedCanvasReader::new(tiles, retry)),
        actuator,
        calibration: Arc::new(StaticCalibrationSource::new(
            AnchorSet::new(config.anchors.clone()),
            config.min_anchor_separation,
        )),
    };

    let store = SaveStore::new(&config.save_path);
    let (strategy, images) = match store.load().await? {
        Some(saved) => (saved.strategy, saved.images),
        None => (config.strategy, config.images.clone()),
    };

    let settings = SessionSettings {
        strategy,
        min_anchor_separation: config.min_anchor_separation,
        pixels_per_hour: config.pixels_per_hour,
    };
    let mut session = Session::start(services, settings).await?;

    let base = config_path.parent().unwrap_or(Path::new("."));
    for image in images {
        session.add_image(load_image_relative(image, base).await?);
    }
    session.sync_anchors().map_err(BotError::from)?;
    Ok((session, store))
}

/// List palette entries with availability
async fn run_palette_command(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let source = StaticPaletteSource::new(config.available_colors.clone());
    let palette = Palette::new(source.current_palette().await?).map_err(BotError::from)?;

    for entry in palette.paintable() {
        let hex = entry.rgb.map(|rgb| rgb.to_hex()).unwrap_or_default();
        let mark = if entry.available { "" } else { "  (locked)" };
        println!("{:>3}  {hex}{mark}", entry.id);
    }
    println!(
        "\n{} of {} colors available",
        palette.available_count(),
        palette.paintable().count()
    );
    Ok(())
}

/// Quantize one PNG and print its demand table
async fn run_quantize_command(
    config_path: &Path,
    image: &Path,
    width: usize,
    brightness: f64,
    exact: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let source = StaticPaletteSource::new(config.available_colors.clone());
    let palette = Palette::new(source.current_palette().await?).map_err(BotError::from)?;
    let mut matcher = ColorMatcher::new(palette);

    let bitmap = decode_png(&tokio::fs::read(image).await?)?;
    let options = if exact {
        QuantizeOptions::exact().brightness(brightness)
    } else {
        QuantizeOptions::new(width).brightness(brightness)
    };
    let (grid, demand) = quantize(&bitmap, &options, &mut matcher).map_err(BotError::from)?;

    println!("Grid: {}x{} ({} cells)", grid.width(), grid.height(), grid.len());
    println!("\nColors by demand:");
    for id in demand.ids_by_demand() {
        let hex = matcher.palette().rgb(id).map(|rgb| rgb.to_hex()).unwrap_or_default();
        println!("  {id:>3}  {hex}  {:>8}", demand.count(id));
    }

    let to_buy = demand.colors_to_buy();
    if !to_buy.is_empty() {
        println!("\nColors to buy ({} cells substituted):", demand.total_substituted());
        for (id, count) in to_buy {
            let hex = matcher.palette().rgb(id).map(|rgb| rgb.to_hex()).unwrap_or_default();
            println!("  {id:>3}  {hex}  {count:>8}");
        }
    }

    if let Some(output) = output {
        let png = encode_png(&grid.to_bitmap(matcher.palette()))?;
        tokio::fs::write(&output, &png).await?;
        println!("\nWrote preview {} ({} bytes)", output.display(), png.len());
    }
    Ok(())
}

/// Print planned tasks without painting
async fn run_plan_command(config_path: &Path, seed: Option<u64>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let (mut session, _) = open_session(&config, config_path, Arc::new(RecordingActuator::new())).await?;
    let planned = session.plan(&mut rng(seed)).await?;

    for queue in &planned.queues {
        for task in &queue.tasks {
            println!("{}", serde_json::to_string(task)?);
        }
    }
    for (image, counts) in session.images().iter().zip(&planned.plans) {
        tracing::info!(
            source = %image.settings().source,
            tasks = counts.tasks,
            done = counts.done,
            filtered = counts.filtered,
            unread = counts.unread,
            "Plan"
        );
    }
    Ok(())
}

/// Resolve clicks against the current view and print the new anchors
async fn run_calibrate_command(config_path: &Path, clicks: &[ScreenPosition]) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let (mut session, _) = open_session(&config, config_path, Arc::new(RecordingActuator::new())).await?;

    let stop = session.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    session.calibrate(clicks, config.calibration_timeout()).await?;
    println!("anchors:");
    print!("{}", serde_yaml::to_string(session.coords().anchors())?);
    Ok(())
}

/// Paint until done or interrupted, then save
async fn run_paint_command(config_path: &Path, seed: Option<u64>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let actuator = Arc::new(JsonLinesActuator::new(std::io::stdout()));
    let (mut session, store) = open_session(&config, config_path, actuator).await?;

    let stop = session.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Stopping after the current pixel");
            stop.stop();
        }
    });

    let report = session.run(&mut rng(seed)).await;
    store.save(&session.save_data()).await?;
    let report = report?;

    eprintln!("Painted {} pixels, {}", report.painted, report.progress);
    if !report.failed_tiles.is_empty() {
        let tiles: Vec<String> = report.failed_tiles.iter().map(ToString::to_string).collect();
        eprintln!("Unreadable tiles skipped: {}", tiles.join(", "));
    }
    Ok(())
}

/// Display configuration and save state
async fn run_status_command(config_path: &Path) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Tileplan v{VERSION}");
    println!("Pixel art planner for shared tile canvases\n");

    let config_source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_path.display())
    };
    let config = AppConfig::load(config_path);

    println!("Configuration:");
    println!("  Config:    {config_source}");
    println!("  Tiles:     {}", config.tile_url);
    println!("  Anchors:   {}", config.anchors.len());
    println!("  Strategy:  {}", config.strategy);
    println!(
        "  Colors:    {}",
        config
            .available_colors
            .as_ref()
            .map_or("all".to_string(), |ids| format!("{} available", ids.len()))
    );
    if let Err(e) = config.validate() {
        println!("  Problem:   {e}");
    }

    println!("\nSave:");
    match SaveStore::new(&config.save_path).load().await {
        Ok(Some(saved)) => {
            println!("  {} ({} images, {})", config.save_path.display(), saved.images.len(), saved.strategy);
            for image in &saved.images {
                println!("    {} at {} width {}", image.source, image.position, image.width);
            }
        }
        Ok(None) => println!("  none ({} configured images)", config.images.len()),
        Err(e) => println!("  {}", e.status()),
    }

    println!("\nCommands:");
    println!("  tileplan palette    List palette colors");
    println!("  tileplan quantize   Quantize an image and list the colors it needs");
    println!("  tileplan plan       Print planned pixels as JSON lines");
    println!("  tileplan calibrate  Turn screen clicks into anchors");
    println!("  tileplan run        Paint planned pixels");
    println!("\nRun 'tileplan --help' for more details.");
}
