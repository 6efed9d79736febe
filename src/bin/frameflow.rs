use std::{
    cell::RefCell,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use frameflow::{
    Action, BoxTask, Driver, DriverOpts, ExportOpts, Fps, FrameIndex, FrameRange, JsonLinesSink,
    Project, ProjectSettings, TaskExt, TimeEventRegistry, any, chain, every, export, tween,
    wait_for, wait_until_then,
};

#[derive(Parser, Debug)]
#[command(name = "frameflow", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert between seconds and frames.
    Convert(ConvertArgs),
    /// Inspect and edit a saved time-event file.
    Events(EventsArgs),
    /// Export the built-in demo scene as JSON lines.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ConvertWhat {
    /// Duration in seconds.
    #[arg(long)]
    seconds: Option<f64>,

    /// Duration in frames.
    #[arg(long, allow_negative_numbers = true)]
    frames: Option<i64>,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    #[command(flatten)]
    what: ConvertWhat,
}

#[derive(Parser, Debug)]
struct EventsArgs {
    /// Saved time events (JSON array of `{name, target_time}`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frames per second used to place events on the frame grid.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Schedule an event, as `NAME=SECONDS`. Repeatable.
    #[arg(long = "set", value_parser = parse_event)]
    set: Vec<(String, f64)>,

    /// Write the resulting events here.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output JSON-lines path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// First exported frame.
    #[arg(long)]
    start: Option<u64>,

    /// Exclusive end frame.
    #[arg(long)]
    end: Option<u64>,

    /// Seconds at which the dot starts fading out.
    #[arg(long, default_value_t = 1.5)]
    fade_at: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Events(args) => cmd_events(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn parse_event(s: &str) -> Result<(String, f64), String> {
    let (name, secs) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=SECONDS, got '{s}'"))?;
    let secs: f64 = secs
        .parse()
        .map_err(|e| format!("invalid seconds in '{s}': {e}"))?;
    if name.is_empty() {
        return Err(format!("empty event name in '{s}'"));
    }
    Ok((name.to_owned(), secs))
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let fps = Fps::whole(args.fps)?;
    match (args.what.seconds, args.what.frames) {
        (Some(seconds), _) => println!("{}", fps.seconds_to_frames(seconds)),
        (None, Some(frames)) => println!("{}", fps.frames_to_seconds(frames)),
        (None, None) => anyhow::bail!("pass --seconds or --frames"),
    }
    Ok(())
}

fn cmd_events(args: EventsArgs) -> anyhow::Result<()> {
    let fps = Fps::whole(args.fps)?;
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read events '{}'", args.in_path.display()))?;
    let mut events = TimeEventRegistry::new();
    events
        .load_json(&json, fps)
        .with_context(|| format!("parse events '{}'", args.in_path.display()))?;

    for (name, seconds) in &args.set {
        let frame = fps.seconds_to_frames(*seconds).max(0) as u64;
        events.set_target(name, FrameIndex(frame));
    }

    for event in events.iter() {
        println!(
            "{}\t{}\t{:.3}s",
            event.name,
            event.target_frame.0,
            fps.frames_to_seconds(event.target_frame.as_i64())
        );
    }

    if let Some(out) = &args.out {
        write_file(out, events.to_json(fps)?.as_bytes())?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

#[derive(Clone, Debug, Default, serde::Serialize)]
struct Dot {
    x: f64,
    opacity: f64,
    pulses: u64,
}

/// A dot slides in, pulses while it waits, and fades out at the `fade` event.
fn demo_threads(dot: &Rc<RefCell<Dot>>) -> Vec<BoxTask> {
    let slide = {
        let (a, b) = (dot.clone(), dot.clone());
        chain([
            Action::task(tween(1.0, move |p| a.borrow_mut().x = 100.0 * p)),
            Action::task(wait_until_then(
                "fade",
                Action::task(tween(0.5, move |p| b.borrow_mut().opacity = 1.0 - p)),
            )),
        ])
    };
    let pulse = {
        let d = dot.clone();
        let (_timer, runner) = every(0.25, move |tick| d.borrow_mut().pulses = tick + 1);
        any([runner.boxed(), wait_for(1.0).boxed()])
    };
    vec![slide.named("slide").boxed(), pulse.named("pulse").boxed()]
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let fps = Fps::whole(args.fps)?;
    let mut project = Project::new(ProjectSettings {
        name: "demo".to_owned(),
        fps,
    })?;
    let fade = fps.seconds_to_frames(args.fade_at).max(0) as u64;
    project.events_mut().set_target("fade", FrameIndex(fade));

    let scene = frameflow::FnScene::new(
        "dot",
        || Dot {
            opacity: 1.0,
            ..Dot::default()
        },
        demo_threads,
        |dot: &Dot, _| dot.clone(),
    );
    let mut driver = Driver::new(project, scene, DriverOpts::default());

    let range = match (args.start, args.end) {
        (None, None) => None,
        (start, end) => Some(FrameRange::new(
            FrameIndex(start.unwrap_or(0)),
            FrameIndex(end.unwrap_or(u64::MAX)),
        )?),
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    let mut sink = JsonLinesSink::new(BufWriter::new(file));
    let stats = export(
        &mut driver,
        ExportOpts {
            range,
            ..ExportOpts::default()
        },
        &mut sink,
    )?;
    sink.into_inner().flush().context("flush output")?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_written,
        args.out.display()
    );
    Ok(())
}
