// ./src/main.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bevy::app::App;
use bevy::core::TaskPoolPlugin;
use bevy::log::{LogPlugin, info, warn};
use clap::Parser;
use thiserror::Error;

use hexweave::color::ImageRaster;
use hexweave::generator::{GeneratePattern, LatestPattern, PatternGeneratorPlugin, PolygonBuffer, Scene};
use hexweave::math::MathError;
use hexweave::render::{PixmapSurface, RasterOptions, RenderError, SvgSurface, rasterize};

#[derive(Parser)]
#[command(name = "hexweave")]
#[command(author, version, about = "Render tiled noise patterns from a scene description")]
struct Cli {
    /// Scene description (JSON)
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Output file; the extension selects the format (png, svg or json)
    #[arg(short, long)]
    output: PathBuf,

    /// Image to sample colors from (only used with the `image` noise)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Overrides the seed from the scene file
    #[arg(short, long)]
    seed: Option<String>,

    /// Seconds to wait for the background generation
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene file: {0}")]
    Scene(#[from] serde_json::Error),

    #[error("Could not load image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Generation did not finish within {0} s")]
    Timeout(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Png,
    Svg,
    Json,
}

impl OutputFormat {
    fn from_path(path: &Path) -> Result<Self, CliError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "json" => Ok(Self::Json),
            _ => Err(CliError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let format = OutputFormat::from_path(&cli.output)?;

    let mut scene: Scene = serde_json::from_str(&std::fs::read_to_string(&cli.scene)?)?;
    if let Some(seed) = cli.seed.clone() {
        scene = scene.with_seed(seed);
    }

    let mut app = App::new();
    app.add_plugins((LogPlugin::default(), TaskPoolPlugin::default(), PatternGeneratorPlugin));
    app.finish();
    app.cleanup();

    let raster = cli
        .image
        .as_deref()
        .map(|path| load_raster(path, &scene))
        .transpose()?;

    let mut request = GeneratePattern::new(scene.clone());
    if let Some(raster) = raster {
        request = request.with_image(Arc::new(raster));
    }
    app.world.send_event(request);

    let buffer = wait_for_pattern(&mut app, Duration::from_secs(cli.timeout))
        .ok_or(CliError::Timeout(cli.timeout))?;
    if buffer.is_empty() {
        warn!("Scene produced no polygons, writing an empty picture");
    }

    write_output(&buffer, &scene, format, &cli.output)?;
    info!("Wrote {}", cli.output.display());
    Ok(())
}

fn load_raster(path: &Path, scene: &Scene) -> Result<ImageRaster, CliError> {
    let image = image::open(path)?;
    let (columns, rows) = scene.cell_counts();
    Ok(ImageRaster::from_image(&image, columns, rows)?)
}

fn wait_for_pattern(app: &mut App, timeout: Duration) -> Option<Arc<PolygonBuffer>> {
    let deadline = Instant::now() + timeout;
    loop {
        app.update();
        if let Some(buffer) = &app.world.resource::<LatestPattern>().buffer {
            return Some(Arc::clone(buffer));
        }
        if Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn write_output(
    buffer: &PolygonBuffer,
    scene: &Scene,
    format: OutputFormat,
    path: &Path,
) -> Result<(), CliError> {
    let options = RasterOptions::for_scene(scene);
    let size = scene.canvas_size;
    match format {
        OutputFormat::Png => {
            let mut surface = PixmapSurface::new(size.width, size.height)?;
            rasterize(buffer, scene, options, &mut surface);
            surface.save_png(path)?;
        }
        OutputFormat::Svg => {
            let mut surface = SvgSurface::new(size.width, size.height);
            rasterize(buffer, scene, options, &mut surface);
            surface.save(path)?;
        }
        OutputFormat::Json => {
            std::fs::write(path, serde_json::to_string(buffer)?)?;
        }
    }
    Ok(())
}
