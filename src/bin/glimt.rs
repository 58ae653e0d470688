use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "glimt", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single widget frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Widget kind (snake, kebab, or squashed form).
    #[arg(long)]
    widget: String,

    /// Widget options as a JSON file path.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Logical surface width.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Logical surface height.
    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Device pixel ratio, clamped into [1, 2].
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Resolution scale in (0, 1].
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Override the widget's `seed` option (widgets without one reject this).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Duration in seconds.
    #[arg(long = "duration-s", default_value_t = 4.0)]
    duration_s: f64,

    /// Output path: `.mp4` streams to ffmpeg, anything else is treated as a
    /// directory of numbered PNG frames.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_options(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<serde_json::Value> {
    let mut options = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("read options '{}'", p.display()))?;
            serde_json::from_str(&text).with_context(|| "parse options JSON")?
        }
        None => serde_json::json!({}),
    };
    if let Some(seed) = seed {
        let obj = options
            .as_object_mut()
            .context("options JSON must be an object when --seed is used")?;
        obj.insert("seed".to_string(), serde_json::json!(seed));
    }
    Ok(options)
}

fn make_player(common: &CommonArgs) -> anyhow::Result<glimt::Player> {
    let kind = glimt::WidgetKind::parse(&common.widget)?;
    let options = read_options(common.options.as_deref(), common.seed)?;
    let widget = glimt::build_widget(kind, options)?;

    let opts = glimt::SurfaceOpts {
        width: common.width,
        height: common.height,
        dpr: common.dpr,
        scale: common.scale,
    };
    let fps = glimt::Fps::new(common.fps, 1)?;
    Ok(glimt::Player::new(widget, opts, fps)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut player = make_player(&args.common)?;
    player.render_frame(glimt::FrameIndex(args.frame))?;
    let frame = player.surface().frame();

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
    let mut player = make_player(&args.common)?;

    let frames = player.fps().secs_to_frames_floor(args.duration_s);
    anyhow::ensure!(frames > 0, "duration of {} s yields no frames", args.duration_s);
    let range = glimt::FrameRange::new(glimt::FrameIndex(0), glimt::FrameIndex(frames))?;

    let is_mp4 = args
        .out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"));
    if is_mp4 {
        let mut sink = glimt::FfmpegSink::new(glimt::FfmpegSinkOpts::new(args.out.clone()));
        player.render_range(range, &mut sink)?;
    } else {
        let mut sink = glimt::PngDirSink::new(args.out.clone());
        player.render_range(range, &mut sink)?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
