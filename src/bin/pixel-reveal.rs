use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "pixel-reveal", version)]
struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the reveal at one instant as a PNG.
    Frame(FrameArgs),
    /// Tick a full run at a fixed rate and write every frame as a PNG.
    Render(RenderArgs),
    /// Print the whole days left until an event date.
    Countdown(CountdownArgs),
}

#[derive(Args, Debug)]
struct RevealArgs {
    /// Image to reveal.
    #[arg(long)]
    subject: PathBuf,

    /// Control map; its red channel orders the reveal.
    #[arg(long)]
    control: PathBuf,

    /// Reveal config JSON. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reveal algorithm.
    #[arg(long, value_enum)]
    strategy: Option<StrategyChoice>,

    /// Run duration in milliseconds.
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Scatter shuffle seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Output width; defaults to the subject's width.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Output height; defaults to the subject's height.
    #[arg(long, requires = "width")]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    reveal: RevealArgs,

    /// Milliseconds since the run's first tick.
    #[arg(long)]
    at_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    reveal: RevealArgs,

    /// Tick rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct CountdownArgs {
    /// Event date, `YYYY-MM-DD`.
    #[arg(long)]
    date: String,

    /// Reference instant (RFC 3339); defaults to now.
    #[arg(long)]
    now: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyChoice {
    ThresholdFade,
    ScatterDelay,
}

impl From<StrategyChoice> for pixel_reveal::StrategyKind {
    fn from(c: StrategyChoice) -> Self {
        match c {
            StrategyChoice::ThresholdFade => Self::ThresholdFade,
            StrategyChoice::ScatterDelay => Self::ScatterDelay,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Countdown(args) => cmd_countdown(args),
    }
}

fn read_config(args: &RevealArgs, fps: Option<u32>) -> anyhow::Result<pixel_reveal::RevealConfig> {
    let mut cfg = match &args.config {
        Some(path) => pixel_reveal::RevealConfig::from_path(path)?,
        None => pixel_reveal::RevealConfig::default(),
    };
    if let Some(s) = args.strategy {
        cfg.strategy = s.into();
    }
    if let Some(ms) = args.duration_ms {
        cfg.duration_ms = ms;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if let Some(fps) = fps {
        cfg.fps = fps;
    }
    cfg.validate().context("invalid reveal config")?;
    Ok(cfg)
}

type Loaded = (
    pixel_reveal::RevealResult<pixel_reveal::PixelBuffer>,
    pixel_reveal::RevealResult<pixel_reveal::PixelBuffer>,
    pixel_reveal::Canvas,
);

/// Decode both inputs. Decode failures are kept, not raised: the run falls back to a sweep.
fn load_inputs(args: &RevealArgs) -> anyhow::Result<Loaded> {
    let subject = pixel_reveal::load_image(&args.subject);
    let control = pixel_reveal::load_image(&args.control);

    let canvas = match (args.width, args.height) {
        (Some(w), Some(h)) => pixel_reveal::Canvas::new(w, h),
        _ => subject
            .as_ref()
            .or(control.as_ref())
            .map(pixel_reveal::PixelBuffer::canvas)
            .map_err(|e| anyhow::anyhow!("no readable input to size the output: {e}"))?,
    };
    Ok((subject, control, canvas))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.reveal, None)?;
    let (subject, control, canvas) = load_inputs(&args.reveal)?;

    let frame = pixel_reveal::render_at(
        subject,
        control,
        canvas,
        &cfg.opts(),
        Duration::from_millis(args.at_ms),
    )?;

    if let Some(parent) = args.out.parent() {
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

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.reveal, args.fps)?;
    let (subject, control, canvas) = load_inputs(&args.reveal)?;
    let opts = cfg.opts();
    let fps = cfg.fps()?;

    let surface = pixel_reveal::PngSequenceSurface::new(&args.out_dir, canvas);
    let mut animator = pixel_reveal::Animator::new(surface);
    animator.start(subject, control, opts.clone())?;
    let mode = animator.mode();

    let stats = pixel_reveal::drive_fixed_rate(
        &mut animator,
        fps,
        Instant::now(),
        pixel_reveal::ticks_for(opts.duration, fps),
    )?;
    anyhow::ensure!(stats.completed, "run did not complete after {} ticks", stats.ticks);

    eprintln!(
        "wrote {} frames to {} ({})",
        animator.surface().written(),
        args.out_dir.display(),
        mode.map_or("none", mode_name),
    );
    Ok(())
}

fn cmd_countdown(args: CountdownArgs) -> anyhow::Result<()> {
    let countdown = pixel_reveal::Countdown::new(pixel_reveal::parse_event_date(&args.date)?);
    let now = args.now.unwrap_or_else(chrono::Utc::now);
    println!("{}", countdown.days(now));
    Ok(())
}

fn mode_name(mode: pixel_reveal::RevealMode) -> &'static str {
    match mode {
        pixel_reveal::RevealMode::ThresholdFade => "threshold fade",
        pixel_reveal::RevealMode::ScatterDelay => "scatter delay",
        pixel_reveal::RevealMode::Sweep => "sweep fallback",
    }
}
