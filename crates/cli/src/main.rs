use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use timesweep_core::svg::render_svg;
use timesweep_core::views::{drawing_size, render_timesweep};
use timesweep_protocol::{GenotypePosition, SweepView, TimesweepInput};

#[derive(Parser, Debug)]
#[command(name = "timesweep", version, about = "Lay out and draw clonal-evolution timesweeps")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the layout and write it as JSON.
    Layout(LayoutArgs),
    /// Draw one view of the timesweep as SVG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Which view to draw.
    #[arg(long, default_value = "traditional")]
    view: SweepView,

    /// Override the document's layout policy (centre, stack or space).
    #[arg(long)]
    position: Option<GenotypePosition>,

    /// Override the document's visibility threshold.
    #[arg(long)]
    threshold: Option<f64>,

    /// Use the dark theme.
    #[arg(long, default_value_t = false)]
    dark: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Layout(args) => cmd_layout(&args),
        Command::Render(args) => cmd_render(&args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> anyhow::Result<TimesweepInput> {
    let data = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    timesweep_core::parse_input(&data).with_context(|| format!("parse '{}'", path.display()))
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_layout(args: &LayoutArgs) -> anyhow::Result<()> {
    let doc = load(&args.in_path)?;
    let (_, result) = timesweep_core::compute(&doc).context("compute layout")?;
    let json = if args.pretty {
        serde_json::to_vec_pretty(&result)?
    } else {
        serde_json::to_vec(&result)?
    };

    match &args.out {
        Some(out) => {
            create_parent(out)?;
            std::fs::write(out, &json).with_context(|| format!("write '{}'", out.display()))?;
            tracing::info!(path = %out.display(), "wrote layout");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&json)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn cmd_render(args: &RenderArgs) -> anyhow::Result<()> {
    let mut doc = load(&args.in_path)?;
    if let Some(position) = args.position {
        doc.config.genotype_position = position;
    }
    if let Some(threshold) = args.threshold {
        doc.config.threshold = threshold;
    }

    let (input, result) = timesweep_core::compute(&doc).context("compute layout")?;
    let commands = render_timesweep(&input, &result, args.view);
    let (width, height) = drawing_size(&input.config);
    let svg = render_svg(&commands, width, height, args.dark);

    create_parent(&args.out)?;
    std::fs::write(&args.out, svg).with_context(|| format!("write svg '{}'", args.out.display()))?;
    tracing::info!(path = %args.out.display(), view = ?args.view, "wrote svg");
    Ok(())
}
