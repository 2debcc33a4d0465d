use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "showertrack", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct all three category files of a simulation run.
    Run(RunArgs),
    /// Reconstruct a single track file (binary or text records).
    File(FileArgs),
    /// Convert a binary track file into text records.
    Convert(ConvertArgs),
}

#[derive(clap::Args, Debug)]
struct TuningArgs {
    /// Pipeline options JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Snap endpoint coordinates to this grid (display units) instead of exact matching.
    #[arg(long)]
    match_step: Option<f64>,

    /// Keep at most this many valid samples per file.
    #[arg(long)]
    max_samples: Option<usize>,

    /// Byte order of the frame payload.
    #[arg(long, value_enum)]
    byte_order: Option<OrderChoice>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Directory holding the `DATnnnnnn.track_*` files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Run number.
    #[arg(long, default_value_t = 1)]
    run: u32,

    /// Output curve list JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Parser, Debug)]
struct FileArgs {
    /// Input track file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Particle category the file holds.
    #[arg(long, value_enum)]
    category: CategoryChoice,

    /// Input is whitespace-separated text records rather than binary frames.
    #[arg(long)]
    text: bool,

    /// Output curve list JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input binary track file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output text file.
    #[arg(long)]
    out: PathBuf,

    /// Byte order of the frame payload.
    #[arg(long, value_enum, default_value_t = OrderChoice::Native)]
    byte_order: OrderChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryChoice {
    Em,
    Mu,
    Hd,
}

impl From<CategoryChoice> for showertrack::Category {
    fn from(c: CategoryChoice) -> Self {
        match c {
            CategoryChoice::Em => Self::Electromagnetic,
            CategoryChoice::Mu => Self::Muon,
            CategoryChoice::Hd => Self::Hadronic,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderChoice {
    Native,
    Little,
    Big,
}

impl From<OrderChoice> for showertrack::ByteOrder {
    fn from(o: OrderChoice) -> Self {
        match o {
            OrderChoice::Native => Self::Native,
            OrderChoice::Little => Self::Little,
            OrderChoice::Big => Self::Big,
        }
    }
}

#[derive(Serialize)]
struct CurveList<'a> {
    frame_end: i64,
    categories: Vec<CategorySummary<'a>>,
    curves: Vec<&'a showertrack::Curve>,
}

impl<'a> CurveList<'a> {
    fn from_batch(batch: &'a showertrack::BatchReport) -> Self {
        Self {
            frame_end: batch.frame_end(),
            categories: batch
                .outcomes
                .iter()
                .map(CategorySummary::from_outcome)
                .collect(),
            curves: batch.curves().collect(),
        }
    }
}

#[derive(Serialize)]
struct CategorySummary<'a> {
    category: showertrack::Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a showertrack::FilterStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconcile: Option<&'a showertrack::ReconcileStats>,
}

impl<'a> CategorySummary<'a> {
    fn from_outcome(o: &'a showertrack::CategoryOutcome) -> Self {
        match o {
            showertrack::CategoryOutcome::Done(r) => Self {
                category: r.category,
                error: None,
                filter: Some(&r.filter),
                reconcile: Some(&r.reconcile),
            },
            showertrack::CategoryOutcome::Failed { category, error } => Self {
                category: *category,
                error: Some(error.to_string()),
                filter: None,
                reconcile: None,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::File(args) => cmd_file(args),
        Command::Convert(args) => cmd_convert(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_opts(tuning: &TuningArgs) -> anyhow::Result<showertrack::PipelineOpts> {
    let mut opts = match &tuning.config {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("open pipeline config '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("parse pipeline config '{}'", path.display()))?
        }
        None => showertrack::PipelineOpts::default(),
    };
    if let Some(step) = tuning.match_step {
        opts.tolerance = showertrack::MatchTolerance::Quantized { step };
    }
    if tuning.max_samples.is_some() {
        opts.max_samples = tuning.max_samples;
    }
    if let Some(order) = tuning.byte_order {
        opts.byte_order = order.into();
    }
    Ok(opts)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut opts = load_opts(&args.tuning)?;
    if args.threads.is_some() {
        opts.threads = args.threads;
    }

    let files = showertrack::CategoryFiles::for_run(&args.dir, args.run);
    for missing in files.missing() {
        tracing::warn!(path = %missing.display(), "track file not found");
    }

    let batch = showertrack::process_batch(&files, &opts)?;
    if batch.outcomes.iter().all(|o| o.report().is_none()) {
        anyhow::bail!("no category of run {} could be reconstructed", args.run);
    }

    let list = CurveList::from_batch(&batch);
    write_json(args.out.as_deref(), &list)?;
    tracing::info!(
        curves = list.curves.len(),
        failed = batch.failures().count(),
        frame_end = list.frame_end,
        "run reconstructed"
    );
    Ok(())
}

fn cmd_file(args: FileArgs) -> anyhow::Result<()> {
    let opts = load_opts(&args.tuning)?;
    opts.validate()?;
    let category: showertrack::Category = args.category.into();

    let report = if args.text {
        let f = File::open(&args.in_path)
            .with_context(|| format!("open text records '{}'", args.in_path.display()))?;
        let parsed = showertrack::parse_records(BufReader::new(f))?;
        if parsed.skipped > 0 {
            tracing::warn!(skipped = parsed.skipped, "skipped malformed text records");
        }
        showertrack::process_samples(category, &parsed.samples, &opts)?
    } else {
        showertrack::process_file(category, &args.in_path, &opts)?
    };

    let batch = showertrack::BatchReport::single(report, &opts);
    write_json(args.out.as_deref(), &CurveList::from_batch(&batch))
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let samples = showertrack::read_track_file(&args.in_path, args.byte_order.into())?;
    ensure_parent_dir(&args.out)?;
    let f = File::create(&args.out)
        .with_context(|| format!("create text records '{}'", args.out.display()))?;
    showertrack::write_records(BufWriter::new(f), &samples)?;
    eprintln!("wrote {} ({} records)", args.out.display(), samples.len());
    Ok(())
}

fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            ensure_parent_dir(path)?;
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, value).context("write curve list JSON")?;
            w.flush().context("flush curve list JSON")?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, value).context("write curve list JSON")?;
            writeln!(w).context("write curve list JSON")?;
        }
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
