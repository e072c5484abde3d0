use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use goban_anim::{
    GraphicsCache, RenderOutcome, RenderSettings, Style, TimingConfig, ViewportInputs,
    read_record, render_animated, render_static, write_animated_gif, write_static_png,
};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "goban-anim", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the final position of a record as a PNG diagram.
    Static(StaticArgs),
    /// Render a record as an animated GIF.
    Animate(AnimateArgs),
    /// Render every `.sgf` below a directory as a GIF plus a PNG.
    Batch(BatchArgs),
    /// Write the stone and marker graphics as PNG files.
    Graphics(GraphicsArgs),
}

#[derive(Parser, Debug)]
struct RecordArgs {
    /// Input SGF record.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// JSON settings file, used as-is instead of the built-in preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Size the visible window from a sibling `<name>.png` next to the record.
    #[arg(long, default_value_t = false)]
    reference: bool,

    /// Extra directory of font files for labels and numbers.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StaticArgs {
    #[command(flatten)]
    record: RecordArgs,
}

#[derive(Parser, Debug)]
struct TimingArgs {
    /// Delay between moves in milliseconds.
    #[arg(long)]
    delay_ms: Option<u32>,

    /// Duration of the first frame in milliseconds.
    #[arg(long)]
    start_freeze_ms: Option<u32>,

    /// Duration of the last frame in milliseconds.
    #[arg(long)]
    end_freeze_ms: Option<u32>,

    /// How long a new move number stays visible in milliseconds.
    #[arg(long)]
    number_ms: Option<u32>,
}

impl TimingArgs {
    fn timing(&self) -> TimingConfig {
        let d = TimingConfig::default();
        TimingConfig {
            frame_delay_ms: self.delay_ms.unwrap_or(d.frame_delay_ms),
            start_freeze_ms: self.start_freeze_ms.unwrap_or(d.start_freeze_ms),
            end_freeze_ms: self.end_freeze_ms.unwrap_or(d.end_freeze_ms),
            number_display_ms: self.number_ms.unwrap_or(d.number_display_ms),
        }
    }
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    #[command(flatten)]
    record: RecordArgs,

    #[command(flatten)]
    timing: TimingArgs,

    /// Use the full-game preset: move numbers are hidden again after the last move too.
    #[arg(long, default_value_t = false)]
    game: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory searched recursively for `.sgf` files.
    dir: PathBuf,

    /// Appended to each record's file stem to name its outputs.
    #[arg(long, default_value = "_output")]
    suffix: String,

    /// Render independent records in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// JSON settings file; its style and limits are combined with each output's preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Size each window from a sibling `<name>.png`.
    #[arg(long, default_value_t = false)]
    reference: bool,

    #[command(flatten)]
    timing: TimingArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleName {
    Main,
    Frost,
}

#[derive(Parser, Debug)]
struct GraphicsArgs {
    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Cell size in pixels.
    #[arg(long, default_value_t = 64)]
    size: u32,

    /// Built-in style to export.
    #[arg(long, value_enum, default_value_t = StyleName::Main)]
    style: StyleName,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Static(args) => cmd_static(args),
        Command::Animate(args) => cmd_animate(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Graphics(args) => cmd_graphics(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn graphics_cache(font_dir: Option<&Path>) -> GraphicsCache {
    match font_dir {
        Some(dir) => GraphicsCache::with_font_dirs(&[dir]),
        None => GraphicsCache::new(),
    }
}

fn load_settings(
    config: Option<&Path>,
    preset: fn() -> RenderSettings,
) -> anyhow::Result<RenderSettings> {
    match config {
        Some(path) => RenderSettings::from_path(path)
            .with_context(|| format!("load settings '{}'", path.display())),
        None => Ok(preset()),
    }
}

/// Cell counts read from the companion image next to `record`, if requested and present.
fn viewport_inputs(record: &Path, reference: bool) -> ViewportInputs {
    if !reference {
        return ViewportInputs::default();
    }
    let png = record.with_extension("png");
    match image::image_dimensions(&png) {
        Ok(size) => ViewportInputs {
            reference_image_size: Some(size),
        },
        Err(e) => {
            tracing::warn!(path = %png.display(), error = %e, "reference image unavailable");
            ViewportInputs::default()
        }
    }
}

fn cmd_static(args: StaticArgs) -> anyhow::Result<()> {
    let rec = &args.record;
    let settings = load_settings(rec.config.as_deref(), RenderSettings::for_static_diagram)?;
    let graphics = graphics_cache(rec.font_dir.as_deref());
    let nodes = read_record(&rec.in_path)?;
    let inputs = viewport_inputs(&rec.in_path, rec.reference);

    match render_static(&nodes, inputs, &settings, &graphics)? {
        RenderOutcome::Rendered(image) => {
            write_static_png(&rec.out, &image)?;
            eprintln!("wrote {}", rec.out.display());
        }
        RenderOutcome::Skipped(reason) => eprintln!("{}: {reason}", rec.in_path.display()),
    }
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let rec = &args.record;
    let preset = if args.game {
        RenderSettings::for_animated_game
    } else {
        RenderSettings::for_animated_diagram
    };
    let settings = load_settings(rec.config.as_deref(), preset)?;
    let graphics = graphics_cache(rec.font_dir.as_deref());
    let nodes = read_record(&rec.in_path)?;
    let inputs = viewport_inputs(&rec.in_path, rec.reference);

    match render_animated(&nodes, inputs, &settings, args.timing.timing(), &graphics)? {
        RenderOutcome::Rendered(frames) => {
            write_animated_gif(&rec.out, &frames)?;
            eprintln!("wrote {} ({} frames)", rec.out.display(), frames.len());
        }
        RenderOutcome::Skipped(reason) => eprintln!("{}: {reason}", rec.in_path.display()),
    }
    Ok(())
}

fn find_records(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            find_records(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("sgf"))
        {
            out.push(path);
        }
    }
    Ok(())
}

#[derive(Default)]
struct BatchCounts {
    written: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

struct BatchJob<'a> {
    animated: RenderSettings,
    still: RenderSettings,
    timing: TimingConfig,
    suffix: &'a str,
    reference: bool,
    graphics: GraphicsCache,
    counts: BatchCounts,
}

impl BatchJob<'_> {
    fn run(&self, path: &Path) {
        match self.render_one(path) {
            Ok(written) => {
                let counter = if written > 0 {
                    &self.counts.written
                } else {
                    &self.counts.skipped
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.counts.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(path = %path.display(), error = %format!("{e:#}"), "render failed");
            }
        }
    }

    /// Number of files written for `path`.
    fn render_one(&self, path: &Path) -> anyhow::Result<usize> {
        let nodes = read_record(path)?;
        let inputs = viewport_inputs(path, self.reference);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let out_base = path.with_file_name(format!("{stem}{}", self.suffix));
        let mut written = 0;

        match render_animated(&nodes, inputs, &self.animated, self.timing, &self.graphics)? {
            RenderOutcome::Rendered(frames) => {
                write_animated_gif(&out_base.with_extension("gif"), &frames)?;
                written += 1;
            }
            RenderOutcome::Skipped(reason) => {
                tracing::info!(path = %path.display(), %reason, "no animation")
            }
        }
        if let RenderOutcome::Rendered(image) =
            render_static(&nodes, inputs, &self.still, &self.graphics)?
        {
            write_static_png(&out_base.with_extension("png"), &image)?;
            written += 1;
        }
        Ok(written)
    }
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let base = match &args.config {
        Some(path) => RenderSettings::from_path(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => RenderSettings::default(),
    };
    let mut records = Vec::new();
    find_records(&args.dir, &mut records)?;
    records.sort();
    tracing::info!(count = records.len(), dir = %args.dir.display(), "records found");

    let job = BatchJob {
        animated: base.clone().with_animated_diagram_behavior(),
        still: base.with_static_diagram_behavior(),
        timing: args.timing.timing(),
        suffix: &args.suffix,
        reference: args.reference,
        graphics: GraphicsCache::new(),
        counts: BatchCounts::default(),
    };
    if args.parallel {
        records.par_iter().for_each(|p| job.run(p));
    } else {
        records.iter().for_each(|p| job.run(p));
    }

    let written = job.counts.written.load(Ordering::Relaxed);
    let skipped = job.counts.skipped.load(Ordering::Relaxed);
    let failed = job.counts.failed.load(Ordering::Relaxed);
    eprintln!("rendered {written}, skipped {skipped}, failed {failed}");
    if failed > 0 {
        anyhow::bail!("{failed} record(s) failed to render");
    }
    Ok(())
}

fn cmd_graphics(args: GraphicsArgs) -> anyhow::Result<()> {
    let style = match args.style {
        StyleName::Main => Style::main(),
        StyleName::Frost => Style::frost(),
    };
    let written = GraphicsCache::new().export_png(&style, args.size, &args.out)?;
    eprintln!("wrote {} graphics to {}", written.len(), args.out.display());
    Ok(())
}
