use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use barrace::FrameSink as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "barrace", version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize the frame shown at one instant as a PNG.
    Frame(FrameArgs),
    /// Play the whole dataset and write every frame as JSON lines.
    Export(ExportArgs),
    /// Print the ranking at one instant.
    Inspect(InspectArgs),
    /// Draw a static bar, line or area chart as SVG.
    Chart(ChartArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input dataset JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Race config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset instant to show.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input dataset JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Race config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output JSON-lines path.
    #[arg(long)]
    out: PathBuf,

    /// Also write one PNG per frame into this directory.
    #[arg(long)]
    png_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input dataset JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Race config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset instant to sample.
    #[arg(long)]
    time: f64,
}

#[derive(Parser, Debug)]
struct ChartArgs {
    /// Input dataset JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Race config JSON (canvas, margins, palette).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chart kind.
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    kind: ChartKind,

    /// Instant sampled by bar charts (defaults to the last keyframe).
    #[arg(long)]
    time: Option<f64>,

    /// Straight segments instead of Catmull-Rom curves.
    #[arg(long)]
    straight: bool,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartKind {
    Bar,
    Line,
    Area,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Chart(args) => cmd_chart(args),
    }
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(
    in_path: &Path,
    config: Option<&Path>,
) -> anyhow::Result<(Arc<barrace::Dataset>, barrace::RaceConfig)> {
    let cfg = match config {
        Some(p) => barrace::RaceConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => barrace::RaceConfig::default(),
    };
    let dataset = barrace::Dataset::from_path(in_path, &cfg.palette())
        .with_context(|| format!("load dataset '{}'", in_path.display()))?;
    Ok((Arc::new(dataset), cfg))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_png(path: &Path, frame: &barrace::FrameRGBA) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (dataset, cfg) = load(&args.in_path, args.config.as_deref())?;
    let canvas = cfg.canvas;
    let frame = barrace::frame_at(dataset, cfg, args.time)?;
    let pixels = barrace::rasterize(&frame, canvas, &barrace::RasterOpts::default());

    ensure_parent(&args.out)?;
    write_png(&args.out, &pixels)?;
    eprintln!("wrote {} (t={})", args.out.display(), frame.instant);
    Ok(())
}

/// Streams frames to JSON Lines; keeps them in memory only when PNGs are requested.
struct ExportSink<W: std::io::Write + Send> {
    jsonl: barrace::JsonLinesSink<W>,
    keep: Option<barrace::InMemorySink>,
}

impl<W: std::io::Write + Send> barrace::FrameSink for ExportSink<W> {
    fn begin(&mut self, cfg: barrace::SinkConfig) -> barrace::RaceResult<()> {
        if let Some(keep) = self.keep.as_mut() {
            keep.begin(cfg)?;
        }
        self.jsonl.begin(cfg)
    }

    fn push_frame(&mut self, frame: &barrace::Frame) -> barrace::RaceResult<()> {
        if let Some(keep) = self.keep.as_mut() {
            keep.push_frame(frame)?;
        }
        self.jsonl.push_frame(frame)
    }

    fn end(&mut self) -> barrace::RaceResult<()> {
        if let Some(keep) = self.keep.as_mut() {
            keep.end()?;
        }
        self.jsonl.end()
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let (dataset, cfg) = load(&args.in_path, args.config.as_deref())?;
    let canvas = cfg.canvas;
    let fps = barrace::Fps::new(args.fps, 1)?;

    ensure_parent(&args.out)?;
    let f = File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    let mut sink = ExportSink {
        jsonl: barrace::JsonLinesSink::new(BufWriter::new(f)),
        keep: args.png_dir.as_ref().map(|_| barrace::InMemorySink::new()),
    };
    let stats = barrace::export_frames(dataset, cfg, fps, &mut sink)?;

    if let (Some(dir), Some(kept)) = (&args.png_dir, sink.keep) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create png dir '{}'", dir.display()))?;
        let pixels =
            barrace::rasterize_all(kept.frames(), canvas, &barrace::RasterOpts::default());
        for (i, px) in pixels.iter().enumerate() {
            write_png(&dir.join(format!("frame_{i:05}.png")), px)?;
        }
    }

    eprintln!(
        "wrote {} frames to {} (skipped {})",
        stats.frames,
        args.out.display(),
        stats.skipped
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (dataset, cfg) = load(&args.in_path, args.config.as_deref())?;
    let s = barrace::sample(&dataset, args.time, cfg.missing);
    let at = dataset.clamp_time(args.time);
    println!(
        "t={at} keyframes {}..{} progress {:.3}",
        dataset.keyframes()[s.prev].time,
        dataset.keyframes()[s.next].time,
        s.t
    );
    for e in barrace::rank(&s.values, cfg.visible) {
        let label = dataset
            .category(e.id.as_str())
            .map_or(e.id.as_str(), |c| c.label.as_str());
        let mark = if e.visible { ' ' } else { '-' };
        println!("{mark}{:>3}  {label:<24} {:>12.3}", e.rank, e.value);
    }
    Ok(())
}

fn cmd_chart(args: ChartArgs) -> anyhow::Result<()> {
    let (dataset, cfg) = load(&args.in_path, args.config.as_deref())?;
    let smooth = !args.straight;
    let chart = match args.kind {
        ChartKind::Bar => barrace::Chart::Bar {
            time: args.time,
            padding: cfg.bar_padding,
        },
        ChartKind::Line => barrace::Chart::Line {
            smooth,
            dots: true,
        },
        ChartKind::Area => barrace::Chart::Area { smooth },
    };
    let marks = chart.marks(&dataset, cfg.plot_rect());
    let svg = barrace::chart::to_svg(
        &marks,
        cfg.canvas,
        barrace::RasterOpts::default().background,
    );

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, svg).with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} marks)", args.out.display(), marks.len());
    Ok(())
}
