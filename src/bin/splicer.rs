use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "splicer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a request into a timeline JSON.
    Compose(ComposeArgs),
    /// Check a timeline JSON against every timing invariant.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input composition request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output timeline JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Per-user lead-in/lead-out defaults (JSON `{"users": {...}}`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print diagnostics as JSON lines on stderr.
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let res = match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Validate(args) => cmd_validate(args),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<splicer::SplicerError>() {
                Some(err) => eprintln!("error [{:?}]: {e:#}", err.category()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    let value = serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))?;
    Ok(value)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let req: splicer::CompositionRequest = read_json(&args.in_path, "request")?;
    let settings: splicer::StaticSettings = match &args.settings {
        Some(path) => read_json(path, "settings")?,
        None => splicer::StaticSettings::default(),
    };

    let composed = splicer::Assembler::new(&settings).assemble(&req)?;
    composed.log_diagnostics();
    if args.diagnostics {
        for d in &composed.diagnostics {
            eprintln!("{}", serde_json::to_string(d)?);
        }
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create timeline '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(f, &composed.timeline)
        .with_context(|| format!("write timeline '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} segments, {:.2}s)",
        args.out.display(),
        composed.timeline.segments.len(),
        composed.timeline.durations.total
    );
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let timeline: splicer::Timeline = read_json(&args.in_path, "timeline")?;
    timeline.validate()?;
    eprintln!(
        "{} ok ({} segments, {:.2}s)",
        timeline.id,
        timeline.segments.len(),
        timeline.durations.total
    );
    Ok(())
}
