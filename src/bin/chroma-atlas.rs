use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use chroma_atlas::{
    AnimationConfig, AnimationFormat, Canvas, ColorFraction, DriveReport, FanoutSink, GeoPoint,
    JsonSink, MapRenderer, PngDirSink, RegionSet, RunConfig, Sample, SampleStore, SequenceDriver,
    SequenceStatus,
};

#[derive(Parser, Debug)]
#[command(name = "chroma-atlas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one PNG map per year and assemble an animation.
    Render(RenderArgs),
    /// Compute every year's region colors and write them as JSON (no drawing).
    Frames(FramesArgs),
    /// Measure the color shares of a painting image.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Run configuration JSON; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sample CSV (year, latitude, longitude, red_pct, green_pct, blue_pct).
    #[arg(long)]
    samples: Option<PathBuf>,

    /// GeoJSON country boundaries; repeat to try several files in order.
    #[arg(long = "regions")]
    regions: Vec<PathBuf>,

    /// Fail instead of falling back to demo samples.
    #[arg(long, default_value_t = false)]
    no_demo: bool,

    /// Resolve regions in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

impl InputArgs {
    fn load_config(&self) -> anyhow::Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::from_path(path)?,
            None => RunConfig::default(),
        };
        if self.samples.is_some() {
            cfg.samples = self.samples.clone();
        }
        if !self.regions.is_empty() {
            cfg.region_sources = self.regions.clone();
        }
        if self.no_demo {
            cfg.demo_fallback = false;
        }
        if self.parallel {
            cfg.parallel = true;
        }
        if self.threads.is_some() {
            cfg.threads = self.threads;
        }
        Ok(cfg)
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory for the frame PNGs.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Animation format (`none` writes frames only).
    #[arg(long, value_enum)]
    animation: Option<AnimationChoice>,

    /// Animation output path.
    #[arg(long)]
    animation_path: Option<PathBuf>,

    /// Time each frame is shown in the animation, in milliseconds.
    #[arg(long)]
    frame_delay_ms: Option<u32>,

    /// Also write every frame's colors to this JSON file.
    #[arg(long)]
    export_json: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Painting image (any format the `image` crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Minimum share, in percent, for a listed swatch.
    #[arg(long, default_value_t = chroma_atlas::DEFAULT_MIN_PERCENT)]
    min_percent: f64,

    /// Append the measured sample to this CSV.
    #[arg(long, requires = "year")]
    append: Option<PathBuf>,

    /// Year of the painting (for `--append`).
    #[arg(long)]
    year: Option<i32>,

    /// Latitude of the painting's origin (for `--append`).
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of the painting's origin (for `--append`).
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AnimationChoice {
    Gif,
    Mp4,
    None,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Analyze(args) => cmd_analyze(args),
    }
}

fn load_inputs(cfg: &RunConfig) -> anyhow::Result<(SampleStore, RegionSet)> {
    let (samples, used) = chroma_atlas::load_samples(&cfg.sample_providers())
        .context("no usable sample data")?;
    eprintln!("loaded {} samples ({used:?})", samples.len());
    let (regions, used) = chroma_atlas::load_regions(&cfg.region_providers());
    eprintln!("loaded {} regions ({used:?})", regions.len());
    Ok((samples, regions))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = args.input.load_config()?;
    if let Some(dir) = args.out_dir {
        cfg.out_dir = dir;
    }
    if args.width.is_some() || args.height.is_some() {
        cfg.canvas = Canvas {
            width: args.width.unwrap_or(cfg.canvas.width),
            height: args.height.unwrap_or(cfg.canvas.height),
        };
    }
    match args.animation {
        Some(AnimationChoice::None) => cfg.animation = None,
        Some(choice) => {
            let anim = cfg.animation.get_or_insert_with(AnimationConfig::default);
            anim.format = match choice {
                AnimationChoice::Mp4 => AnimationFormat::Mp4,
                _ => AnimationFormat::Gif,
            };
        }
        None => {}
    }
    if let Some(anim) = cfg.animation.as_mut() {
        if let Some(path) = args.animation_path {
            anim.path = path;
        }
        if let Some(ms) = args.frame_delay_ms {
            anim.frame_delay_ms = ms;
        }
    }
    if args.export_json.is_some() {
        cfg.export_json = args.export_json;
    }
    cfg.validate()?;

    let (samples, regions) = load_inputs(&cfg)?;
    let renderer = MapRenderer::new(cfg.layout())?;
    let mut png = PngDirSink::new(&cfg.out_dir, &regions, renderer);
    if let Some(anim) = &cfg.animation {
        png = png.with_assembler(anim.assembler());
    }

    let mut sinks = FanoutSink::new();
    sinks.push(png);
    if let Some(path) = &cfg.export_json {
        sinks.push(JsonSink::new(path));
    }

    let report = SequenceDriver::new(&samples, &regions)
        .with_parallelism(cfg.parallel, cfg.threads)
        .drive(&mut sinks)?;
    print_report(&report);
    if report.status == SequenceStatus::Completed {
        eprintln!("frames saved in '{}'", cfg.out_dir.display());
    }
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let cfg = args.input.load_config()?;
    cfg.validate()?;

    let (samples, regions) = load_inputs(&cfg)?;
    let mut sink = JsonSink::new(&args.out);
    let report = SequenceDriver::new(&samples, &regions)
        .with_parallelism(cfg.parallel, cfg.threads)
        .drive(&mut sink)?;
    print_report(&report);
    if let Some(e) = &report.finalize_error {
        anyhow::bail!("could not write '{}': {e}", args.out.display());
    }
    Ok(())
}

fn print_report(report: &DriveReport) {
    match report.status {
        SequenceStatus::Empty => eprintln!("No years found in the data."),
        SequenceStatus::Completed => {
            eprintln!(
                "{} frames written, {} failed",
                report.frames_written, report.frames_failed
            );
        }
    }
    if let Some(e) = &report.finalize_error {
        eprintln!("could not finish output: {e}");
    }
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let img = image::open(&args.image)
        .with_context(|| format!("open image '{}'", args.image.display()))?;

    let shares: ColorFraction = chroma_atlas::channel_fractions(&img);
    println!(
        "red_pct={:.4} green_pct={:.4} blue_pct={:.4}",
        shares.red, shares.green, shares.blue
    );
    for swatch in chroma_atlas::dominant_swatches(&img, args.min_percent) {
        println!("Color: {}, Percentage: {:.2}%", swatch.color, swatch.percent);
    }

    if let Some(csv_path) = &args.append {
        let year = args.year.context("--year is required with --append")?;
        let location = GeoPoint::new(args.lat.unwrap_or(0.0), args.lon.unwrap_or(0.0));
        let sample = Sample::new(year, location, shares);
        chroma_atlas::append_sample_csv(csv_path, &sample)?;
        eprintln!("appended sample to '{}'", csv_path.display());
    }
    Ok(())
}
