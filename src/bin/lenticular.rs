use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lenticular::{
    AspectRatio, CalibrationParameters, ColorMode, DevicePreset, FrameInput, FrameLoop,
    FrameLoopOpts, Orientation, OutputGeometry, RasterSurface, StillImage, StripeLayout,
    TickOutcome, VideoFrameSlot, fingerprint_mask,
};

#[derive(Parser, Debug)]
#[command(name = "lenticular", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one calibration frame as a PNG.
    Pattern(PatternArgs),
    /// Interlace one side-by-side image into a PNG.
    Stereo(StereoArgs),
    /// Interlace a directory of side-by-side frames, one PNG per frame.
    Sequence(SequenceArgs),
    /// Print the stripe layout for the given parameters.
    Info(ParamArgs),
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// Calibration parameters JSON (camelCase keys). Missing keys take their defaults.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Output width in logical pixels.
    #[arg(long, default_value_t = 1080.0)]
    width: f64,

    /// Output height in logical pixels.
    #[arg(long, default_value_t = 1920.0)]
    height: f64,

    /// Device pixel density.
    #[arg(long, default_value_t = 1.0)]
    density: f64,

    /// Override lens pitch (lines per inch).
    #[arg(long)]
    lpi: Option<f64>,

    /// Override phase offset in lenses, within [-1, 1].
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<f64>,

    /// Override stripe thickness as a fraction of the pitch.
    #[arg(long)]
    thickness: Option<f64>,

    /// Override stripe direction.
    #[arg(long, value_enum)]
    orientation: Option<OrientationChoice>,

    /// Pick stripe direction from the output shape (landscape gets horizontal stripes).
    #[arg(long, conflicts_with = "orientation")]
    auto_orientation: bool,

    /// Override stripe coloring.
    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    /// Take the display density from a known device.
    #[arg(long, value_enum)]
    preset: Option<PresetChoice>,

    /// Print the status label with four decimals.
    #[arg(long)]
    precision: bool,
}

#[derive(Args, Debug)]
struct PatternArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct StereoArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Side-by-side input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target aspect ratio: auto, 16:9, 4:3, 21:9 or 1:1.
    #[arg(long)]
    aspect: Option<AspectRatio>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Directory of side-by-side frames (png or jpeg), processed in file name order.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Target aspect ratio: auto, 16:9, 4:3, 21:9 or 1:1.
    #[arg(long)]
    aspect: Option<AspectRatio>,

    /// Output directory for `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrientationChoice {
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorChoice {
    Mono,
    Tinted,
    Rgb,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    S22Ultra,
    Iphone14,
    Standard,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Pattern(args) => cmd_pattern(args),
        Command::Stereo(args) => cmd_stereo(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("LENTICULAR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

impl ParamArgs {
    fn geometry(&self) -> OutputGeometry {
        OutputGeometry::from_logical(self.width, self.height, self.density)
    }

    fn resolve(&self) -> anyhow::Result<CalibrationParameters> {
        let mut p = match &self.params {
            Some(path) => CalibrationParameters::from_path(path)?,
            None => CalibrationParameters::default(),
        };
        if let Some(v) = self.lpi {
            p.lpi = v;
        }
        if let Some(v) = self.offset {
            p.offset_phase = v;
        }
        if let Some(v) = self.thickness {
            p.stripe_thickness = v;
        }
        if let Some(o) = self.orientation {
            p.orientation = match o {
                OrientationChoice::Vertical => Orientation::Vertical,
                OrientationChoice::Horizontal => Orientation::Horizontal,
            };
        }
        if self.auto_orientation {
            p.orientation = Orientation::for_viewport(self.width, self.height);
        }
        if let Some(c) = self.color {
            p.color_mode = match c {
                ColorChoice::Mono => ColorMode::Mono,
                ColorChoice::Tinted => ColorMode::Tinted,
                ColorChoice::Rgb => ColorMode::RgbSubpixel,
            };
        }
        if let Some(preset) = self.preset {
            p.base_ppi = match preset {
                PresetChoice::S22Ultra => DevicePreset::GalaxyS22Ultra,
                PresetChoice::Iphone14 => DevicePreset::IPhone14,
                PresetChoice::Standard => DevicePreset::Standard,
            }
            .ppi();
        }
        p.validate()?;
        Ok(p)
    }
}

fn frame_loop(geometry: OutputGeometry, aspect: Option<AspectRatio>) -> anyhow::Result<FrameLoop> {
    let mut opts = FrameLoopOpts::from_env();
    if let Some(a) = aspect {
        opts.aspect_ratio = a;
    }
    Ok(FrameLoop::new(geometry, opts)?)
}

fn check_rendered(outcome: TickOutcome) -> anyhow::Result<()> {
    match outcome {
        TickOutcome::Rendered { .. } => Ok(()),
        TickOutcome::Skipped { reason, .. } => anyhow::bail!("frame skipped: {reason}"),
        TickOutcome::Failed { reason, .. } => anyhow::bail!("frame failed: {reason}"),
    }
}

fn write_png(surface: &RasterSurface, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let img = surface.to_rgba_image()?;
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_pattern(args: PatternArgs) -> anyhow::Result<()> {
    let params = args.params.resolve()?;
    let geometry = args.params.geometry();
    let mut fl = frame_loop(geometry, None)?;

    check_rendered(fl.tick(&FrameInput::calibration(&params)))?;
    write_png(fl.output(), &args.out)?;

    eprintln!("{}", params.status_label(args.params.precision));
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_stereo(args: StereoArgs) -> anyhow::Result<()> {
    let params = args.params.resolve()?;
    let geometry = args.params.geometry();
    let media = StillImage::open(&args.in_path)?;
    let mut fl = frame_loop(geometry, args.aspect)?;

    check_rendered(fl.tick(&FrameInput::stereo(&params, &media, true)))?;
    write_png(fl.output(), &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let params = args.params.resolve()?;
    let geometry = args.params.geometry();
    let frames = list_frames(&args.in_dir)?;
    anyhow::ensure!(
        !frames.is_empty(),
        "no png or jpeg frames in '{}'",
        args.in_dir.display()
    );

    let mut fl = frame_loop(geometry, args.aspect)?;
    let mut slot = VideoFrameSlot::new();

    for (i, path) in frames.iter().enumerate() {
        let rgba = image::open(path)
            .with_context(|| format!("decode frame '{}'", path.display()))?
            .to_rgba8();
        let (w, h) = rgba.dimensions();
        slot.push_rgba8(w, h, rgba.into_raw())?;

        let outcome = fl.tick(&FrameInput::stereo(&params, &slot, true));
        if !outcome.is_rendered() {
            tracing::warn!(frame = i, ?outcome, "frame not rendered, keeping previous output");
        }
        write_png(fl.output(), &args.out_dir.join(format!("frame_{i:05}.png")))?;
    }

    let s = fl.stats();
    eprintln!(
        "ticks={} stereo={} calibration={} skipped={} failed={} mask_regenerations={}",
        s.ticks,
        s.stereo_frames,
        s.calibration_frames,
        s.skipped_frames,
        s.failed_frames,
        s.mask_regenerations
    );
    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}

fn list_frames(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read frame dir '{}'", dir.display()))?
    {
        let path = entry?.path();
        let is_frame = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"));
        if is_frame {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn cmd_info(args: ParamArgs) -> anyhow::Result<()> {
    let params = args.resolve()?;
    let geometry = args.geometry();
    let layout = StripeLayout::compute(&params, geometry)
        .context("parameters do not produce a stripe layout")?;
    let fp = fingerprint_mask(&params, geometry);

    println!("{}", params.status_label(args.precision));
    println!(
        "output: {}x{} @ {}x",
        geometry.width, geometry.height, geometry.pixel_density
    );
    println!("pixels per lens: {:.6}", layout.pixels_per_lens);
    println!("phase shift: {:.6} px", layout.phase_shift_px);
    println!("stripe width: {:.6} px", layout.stripe_width);
    println!("stripes: {}", layout.stripe_count);
    let first: Vec<String> = layout
        .positions()
        .take(4)
        .map(|p| format!("{p:.3}"))
        .collect();
    println!("first positions: {}", first.join(", "));
    println!("fingerprint: {:016x}{:016x}", fp.hi, fp.lo);
    Ok(())
}
